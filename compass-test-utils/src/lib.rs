//! COMPASS Test Utilities
//!
//! Shared test infrastructure for the COMPASS workspace:
//! - An in-memory employee directory with injectable latency and failures
//! - Proptest generators for employees and whole org lists
//! - Fixtures for the common hierarchy shapes
//! - Assertions over forests

pub use compass_core::{
    Competency, CompetencyLevel, CompetencyType, DirectoryError, Employee, EmploymentStatus,
    IdpPriority, IdpStatus, IndividualDevelopmentPlan, Job, JobCompetencyMapping,
    ProficiencyLevel, Sid,
};
pub use compass_org::{EmployeeDirectory, Forest, OrgNode};

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Build a sid, panicking on blank input. Test code only.
#[track_caller]
pub fn sid(raw: &str) -> Sid {
    match Sid::new(raw) {
        Ok(sid) => sid,
        Err(e) => panic!("invalid test sid {raw:?}: {e}"),
    }
}

// ============================================================================
// MOCK DIRECTORY
// ============================================================================

/// In-memory [`EmployeeDirectory`].
///
/// `team(manager)` returns everyone transitively below `manager`, the way
/// the REST endpoint does. Latency and failures can be set per manager to
/// reproduce out-of-order responses.
#[derive(Debug, Clone, Default)]
pub struct MockDirectory {
    employees: Vec<Employee>,
    delays: HashMap<Sid, Duration>,
    failure: Option<DirectoryError>,
    calls: Arc<AtomicUsize>,
}

impl MockDirectory {
    pub fn new(employees: Vec<Employee>) -> Self {
        Self {
            employees,
            ..Self::default()
        }
    }

    /// Delay responses for `manager` by `delay`.
    pub fn with_delay_for(mut self, manager: Sid, delay: Duration) -> Self {
        self.delays.insert(manager, delay);
        self
    }

    /// Fail every request with `error`.
    pub fn failing(mut self, error: DirectoryError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Number of `team` calls served so far (clones share the counter).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn subtree(&self, manager: &Sid) -> Vec<Employee> {
        let mut reports: HashMap<&str, Vec<&Employee>> = HashMap::new();
        for employee in &self.employees {
            if let Some(m) = &employee.line_manager_sid {
                reports.entry(m.as_str()).or_default().push(employee);
            }
        }

        let mut seen: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::from([manager.as_str()]);
        let mut out = Vec::new();
        while let Some(current) = queue.pop_front() {
            for employee in reports.get(current).into_iter().flatten() {
                if employee.sid != *manager && seen.insert(employee.sid.as_str()) {
                    out.push((*employee).clone());
                    queue.push_back(employee.sid.as_str());
                }
            }
        }
        out
    }
}

#[async_trait]
impl EmployeeDirectory for MockDirectory {
    async fn team(&self, manager: &Sid) -> Result<Vec<Employee>, DirectoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(manager) {
            tokio::time::sleep(*delay).await;
        }
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(self.subtree(manager)),
        }
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for COMPASS records and org lists.

    use super::*;
    use proptest::prelude::*;

    /// Root manager used by [`arb_org`].
    pub const ORG_ROOT: &str = "ROOT";

    /// Generate a plausible staff identifier.
    pub fn arb_sid() -> impl Strategy<Value = Sid> {
        "[A-Z][0-9]{3,5}".prop_map(|raw| sid(&raw))
    }

    /// Generate an EmploymentStatus variant.
    pub fn arb_employment_status() -> impl Strategy<Value = EmploymentStatus> {
        prop_oneof![
            Just(EmploymentStatus::Active),
            Just(EmploymentStatus::Inactive),
            Just(EmploymentStatus::Terminated),
            Just(EmploymentStatus::OnLeave),
            Just(EmploymentStatus::Suspended),
        ]
    }

    /// Generate a ProficiencyLevel variant.
    pub fn arb_proficiency_level() -> impl Strategy<Value = ProficiencyLevel> {
        prop_oneof![
            Just(ProficiencyLevel::Basic),
            Just(ProficiencyLevel::Intermediate),
            Just(ProficiencyLevel::Advanced),
            Just(ProficiencyLevel::Mastery),
        ]
    }

    /// Generate an employee with the given identity and manager.
    pub fn arb_employee(sid: Sid, manager: Option<Sid>) -> impl Strategy<Value = Employee> {
        (
            "[A-Z][a-z]{2,8}",
            "[A-Z][a-z]{2,10}",
            prop::option::of(prop_oneof![
                Just("Finance".to_string()),
                Just("Operations".to_string()),
                Just("Engineering".to_string()),
            ]),
            arb_employment_status(),
        )
            .prop_map(move |(first, last, division, status)| {
                let mut employee = Employee::new(sid.clone(), first.clone(), last)
                    .with_email(format!("{}@example.com", first.to_lowercase()))
                    .with_status(status);
                employee.division = division;
                employee.line_manager_sid = manager.clone();
                employee
            })
    }

    /// Generate an acyclic org under [`ORG_ROOT`] with up to `max_size`
    /// people, in shuffled order. Every manager reference resolves.
    pub fn arb_org(max_size: usize) -> impl Strategy<Value = (Sid, Vec<Employee>)> {
        (0..=max_size)
            .prop_flat_map(|n| {
                // Parent choice 0 is the root; j > 0 is the (j-1)-th person.
                let parents: Vec<std::ops::RangeInclusive<usize>> = (0..n).map(|i| 0..=i).collect();
                (parents, prop::collection::vec(arb_employment_status(), n))
            })
            .prop_map(|(parents, statuses)| {
                let root = sid(ORG_ROOT);
                let employees: Vec<Employee> = parents
                    .iter()
                    .zip(statuses)
                    .enumerate()
                    .map(|(i, (&parent, status))| {
                        let manager = if parent == 0 {
                            root.clone()
                        } else {
                            org_sid(parent - 1)
                        };
                        Employee::new(org_sid(i), format!("First{i}"), format!("Last{i}"))
                            .with_manager(manager)
                            .with_status(status)
                    })
                    .collect();
                (root, employees)
            })
            .prop_flat_map(|(root, employees)| (Just(root), Just(employees).prop_shuffle()))
    }

    /// Sid of the `index`-th person produced by [`arb_org`].
    pub fn org_sid(index: usize) -> Sid {
        sid(&format!("E{index:04}"))
    }

    /// Generate a list with dangling managers, cycles and repeated sids.
    /// Sids come from `P0..P7`; manager `X` is never in the list.
    pub fn arb_messy_list(max_size: usize) -> impl Strategy<Value = Vec<Employee>> {
        prop::collection::vec((0u8..8, prop::option::of(0u8..9)), 0..=max_size).prop_map(
            |pairs| {
                pairs
                    .into_iter()
                    .map(|(s, m)| {
                        let employee = Employee::new(sid(&format!("P{s}")), format!("P{s}"), "");
                        match m {
                            Some(8) => employee.with_manager(sid("X")),
                            Some(m) => employee.with_manager(sid(&format!("P{m}"))),
                            None => employee,
                        }
                    })
                    .collect()
            },
        )
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built records for common scenarios.

    use super::*;

    fn person(id: &str, first: &str, last: &str, manager: Option<&str>) -> Employee {
        let employee = Employee::new(sid(id), first, last);
        match manager {
            Some(m) => employee.with_manager(sid(m)),
            None => employee,
        }
    }

    /// `[A(null), B(A), C(B), D(X)]`: root A yields roots `[B]`, B has `[C]`,
    /// D is an orphan.
    pub fn canonical_list() -> Vec<Employee> {
        vec![
            person("A", "Amara", "Okafor", None),
            person("B", "Bruno", "Silva", Some("A")),
            person("C", "Chen", "Wei", Some("B")),
            person("D", "Dana", "Ivers", Some("X")),
        ]
    }

    /// A small department under `M001` with two managers and their reports.
    pub fn department() -> Vec<Employee> {
        vec![
            person("M001", "Maya", "Reyes", Some("CEO1"))
                .with_job("DIR-OPS", "Operations Director")
                .with_division("Operations"),
            person("M002", "Omar", "Haddad", Some("M001"))
                .with_job("MGR-LOG", "Logistics Manager")
                .with_division("Operations"),
            person("M003", "Ines", "Duarte", Some("M001"))
                .with_job("MGR-FIN", "Finance Manager")
                .with_division("Finance"),
            person("E101", "Tom", "Becker", Some("M002"))
                .with_job("LOG-01", "Dispatcher")
                .with_division("Operations"),
            person("E102", "Lena", "Kraus", Some("M002"))
                .with_job("LOG-02", "Fleet Planner")
                .with_division("Operations")
                .with_status(EmploymentStatus::OnLeave),
            person("E201", "Ravi", "Menon", Some("M003"))
                .with_job("FIN-01", "Accountant")
                .with_division("Finance"),
        ]
    }

    /// Two people reporting to each other, plus one clean report of root `A`.
    pub fn with_cycle() -> Vec<Employee> {
        vec![
            person("B", "Bruno", "Silva", Some("A")),
            person("P", "Pia", "Lund", Some("Q")),
            person("Q", "Quinn", "Moss", Some("P")),
        ]
    }

    pub fn jobs() -> Vec<Job> {
        let job = |code: &str, title: &str, division: &str| Job {
            id: None,
            code: code.to_string(),
            title: title.to_string(),
            division: Some(division.to_string()),
            unit: None,
            department: None,
            section: None,
            location: None,
            grade: None,
            is_active: true,
        };
        vec![
            job("DIR-OPS", "Operations Director", "Operations"),
            job("LOG-01", "Dispatcher", "Operations"),
            job("FIN-01", "Accountant", "Finance"),
        ]
    }

    pub fn competencies() -> Vec<Competency> {
        let level = |level, description: &str| CompetencyLevel {
            level,
            description: description.to_string(),
            indicators: vec![],
        };
        vec![
            Competency {
                id: 1,
                name: "Route Planning".to_string(),
                competency_type: CompetencyType::Technical,
                family: Some("Logistics".to_string()),
                definition: Some("Plans efficient delivery routes.".to_string()),
                levels: vec![
                    level(ProficiencyLevel::Basic, "Follows planned routes"),
                    level(ProficiencyLevel::Advanced, "Optimizes multi-stop routes"),
                ],
            },
            Competency {
                id: 2,
                name: "Coaching".to_string(),
                competency_type: CompetencyType::Leadership,
                family: None,
                definition: None,
                levels: vec![],
            },
        ]
    }

    pub fn job_competencies() -> Vec<JobCompetencyMapping> {
        vec![
            JobCompetencyMapping {
                id: None,
                job_code: "LOG-01".to_string(),
                competency_id: 1,
                required_level: ProficiencyLevel::Intermediate,
                is_required: true,
            },
            JobCompetencyMapping {
                id: None,
                job_code: "DIR-OPS".to_string(),
                competency_id: 2,
                required_level: ProficiencyLevel::Advanced,
                is_required: true,
            },
        ]
    }

    pub fn plans_for(employee: &str) -> Vec<IndividualDevelopmentPlan> {
        vec![
            IndividualDevelopmentPlan {
                id: Some(1),
                employee_sid: sid(employee),
                competency_id: 1,
                status: IdpStatus::InProgress,
                priority: IdpPriority::High,
                progress_percentage: 40,
                intervention: Some("Shadow senior planner".to_string()),
                target_date: None,
                notes: None,
            },
            IndividualDevelopmentPlan {
                id: Some(2),
                employee_sid: sid(employee),
                competency_id: 2,
                status: IdpStatus::Completed,
                priority: IdpPriority::Low,
                progress_percentage: 100,
                intervention: None,
                target_date: None,
                notes: None,
            },
        ]
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions over built forests.

    use super::*;

    /// Assert that every sid in the forest is unique.
    #[track_caller]
    pub fn assert_unique_nodes(forest: &Forest) {
        let mut seen = HashSet::new();
        for node in forest.iter() {
            assert!(
                seen.insert(node.sid().as_str()),
                "sid {} appears twice in forest",
                node.sid()
            );
        }
    }

    /// Assert that every child reports to its parent and every root reports
    /// to `root`.
    #[track_caller]
    pub fn assert_links_consistent(forest: &Forest, root: &Sid) {
        fn check(node: &OrgNode) {
            for child in &node.children {
                assert!(
                    child.employee.reports_to(node.sid()),
                    "{} placed under {} but reports to {:?}",
                    child.sid(),
                    node.sid(),
                    child.employee.line_manager_sid
                );
                check(child);
            }
        }
        for node in &forest.roots {
            assert!(
                node.employee.reports_to(root),
                "root node {} does not report to {}",
                node.sid(),
                root
            );
            check(node);
        }
    }

    /// Assert the forest's top-level sids, in order.
    #[track_caller]
    pub fn assert_roots(forest: &Forest, expected: &[&str]) {
        let actual: Vec<&str> = forest.roots.iter().map(|n| n.sid().as_str()).collect();
        assert_eq!(actual, expected, "unexpected forest roots");
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use compass_org::build_tree;
    use proptest::prelude::*;

    #[test]
    fn test_canonical_fixture_shape() {
        let forest = build_tree(&fixtures::canonical_list(), &sid("A"));
        assertions::assert_roots(&forest, &["B"]);
        assertions::assert_links_consistent(&forest, &sid("A"));
    }

    #[test]
    fn test_department_fixture_is_clean() {
        let forest = build_tree(&fixtures::department(), &sid("CEO1"));
        assertions::assert_roots(&forest, &["M001"]);
        assert_eq!(forest.len(), 6);
    }

    #[tokio::test]
    async fn test_mock_directory_returns_subtree() {
        let directory = MockDirectory::new(fixtures::department());
        let team = directory.team(&sid("M002")).await.unwrap();
        let mut sids: Vec<&str> = team.iter().map(|e| e.sid.as_str()).collect();
        sids.sort();
        assert_eq!(sids, vec!["E101", "E102"]);

        let everyone = directory.team(&sid("CEO1")).await.unwrap();
        assert_eq!(everyone.len(), 6);
        assert_eq!(directory.calls(), 2);
    }

    #[tokio::test]
    async fn test_mock_directory_survives_cycles() {
        let directory = MockDirectory::new(fixtures::with_cycle());
        let team = directory.team(&sid("P")).await.unwrap();
        let sids: Vec<&str> = team.iter().map(|e| e.sid.as_str()).collect();
        assert_eq!(sids, vec!["Q"]);
    }

    #[tokio::test]
    async fn test_mock_directory_failure() {
        let directory = MockDirectory::new(vec![]).failing(DirectoryError::Unavailable {
            reason: "offline".to_string(),
        });
        assert!(directory.team(&sid("A")).await.is_err());
    }

    proptest! {
        #[test]
        fn generated_org_is_fully_placed((root, employees) in generators::arb_org(30)) {
            let forest = build_tree(&employees, &root);
            prop_assert_eq!(forest.len(), employees.len());
            assertions::assert_unique_nodes(&forest);
            assertions::assert_links_consistent(&forest, &root);
        }
    }
}
