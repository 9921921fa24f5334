//! Hierarchy diagnostics: who was left out of the forest and why.

use crate::tree::{Forest, Linkage};
use compass_core::{Employee, HierarchyError, Sid};
use std::collections::HashSet;

/// The forest plus everything that could not be placed in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyReport {
    pub forest: Forest,
    /// Records whose manager is missing or not in the list.
    pub unassigned: Vec<Sid>,
    /// Manager cycles, each listed in reporting order (`A` reports to the
    /// next) starting from the member listed first in the input. Cycles are
    /// ordered the same way.
    pub cycles: Vec<Vec<Sid>>,
    /// The root manager's own record reporting, directly or through others,
    /// to someone in this team. Starts at the root. Its members other than
    /// the root stay in the forest.
    pub root_cycle: Option<Vec<Sid>>,
    /// Sids that appeared more than once; only the first record was used.
    pub duplicates: Vec<Sid>,
    /// Every distinct employee missing from the forest, the root manager
    /// excepted. Includes everyone below an unassigned or cyclic record.
    pub detached: Vec<Sid>,
}

impl HierarchyReport {
    /// Nothing was left out, no sid repeated and the root reports outside
    /// its team.
    pub fn is_clean(&self) -> bool {
        self.detached.is_empty() && self.duplicates.is_empty() && self.root_cycle.is_none()
    }

    /// Fail on the first manager cycle, then on a loop through the root.
    pub fn ensure_acyclic(&self) -> Result<(), HierarchyError> {
        match self.cycles.first().or(self.root_cycle.as_ref()) {
            Some(sids) => Err(HierarchyError::Cycle { sids: sids.clone() }),
            None => Ok(()),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    White,
    Grey,
    Black,
}

/// Find manager cycles by following each record's manager link.
///
/// Each record has at most one manager, so every walk is a chain; a chain
/// that re-enters a grey record closes a cycle. Walks start in input order.
fn find_cycles(employees: &[Employee], linkage: &Linkage<'_>, root: &Sid) -> Vec<Vec<Sid>> {
    let mut marks = vec![Mark::White; employees.len()];
    let mut cycles: Vec<Vec<usize>> = Vec::new();

    for start in 0..employees.len() {
        if marks[start] != Mark::White || !linkage.is_first(employees, start) {
            continue;
        }
        let mut path = Vec::new();
        let mut current = Some(start);
        while let Some(index) = current {
            match marks[index] {
                Mark::White => {
                    marks[index] = Mark::Grey;
                    path.push(index);
                    current = linkage.parent_of(employees, index, root);
                }
                Mark::Grey => {
                    if let Some(pos) = path.iter().position(|&i| i == index) {
                        let mut cycle = path[pos..].to_vec();
                        rotate_to_earliest(&mut cycle);
                        cycles.push(cycle);
                    }
                    break;
                }
                Mark::Black => break,
            }
        }
        for index in path {
            marks[index] = Mark::Black;
        }
    }

    cycles.sort_by_key(|cycle| cycle.first().copied());
    cycles
        .iter()
        .map(|cycle| sids_of(employees, cycle))
        .collect()
}

/// Follow the root record's managers; a chain that comes back to the root
/// is a loop through the team.
///
/// A root managing itself is the usual top-of-company record, not a loop.
/// A chain that runs into some other cycle is left to [`find_cycles`].
fn find_root_cycle(
    employees: &[Employee],
    linkage: &Linkage<'_>,
    root: &Sid,
) -> Option<Vec<Sid>> {
    let start = *linkage.index_of.get(root.as_str())?;
    let mut path = vec![start];
    let mut seen = HashSet::from([start]);
    let mut current = start;
    loop {
        let manager = employees[current].line_manager_sid.as_ref()?;
        if manager == root {
            break;
        }
        let next = *linkage.index_of.get(manager.as_str())?;
        if !seen.insert(next) {
            return None;
        }
        path.push(next);
        current = next;
    }
    (path.len() > 1).then(|| sids_of(employees, &path))
}

fn rotate_to_earliest(cycle: &mut [usize]) {
    let earliest = cycle
        .iter()
        .enumerate()
        .min_by_key(|(_, index)| **index)
        .map(|(pos, _)| pos);
    if let Some(pos) = earliest {
        cycle.rotate_left(pos);
    }
}

fn sids_of(employees: &[Employee], indices: &[usize]) -> Vec<Sid> {
    indices.iter().map(|&i| employees[i].sid.clone()).collect()
}

/// Build the forest under `root` and explain every record it left out.
pub fn analyze_hierarchy(employees: &[Employee], root: &Sid) -> HierarchyReport {
    let linkage = Linkage::resolve(employees, root);
    let forest = linkage.materialize(employees);

    let unassigned = sids_of(employees, &linkage.orphans);

    let duplicates: Vec<Sid> = {
        let mut seen = HashSet::new();
        linkage
            .duplicates
            .iter()
            .map(|&i| &employees[i].sid)
            .filter(|sid| seen.insert(sid.as_str()))
            .cloned()
            .collect()
    };

    let cycles = find_cycles(employees, &linkage, root);
    let root_cycle = find_root_cycle(employees, &linkage, root);

    let placed: HashSet<&str> = forest.iter().map(|node| node.sid().as_str()).collect();
    let detached: Vec<Sid> = employees
        .iter()
        .enumerate()
        .filter(|(i, _)| linkage.is_first(employees, *i))
        .map(|(_, e)| &e.sid)
        .filter(|sid| *sid != root && !placed.contains(sid.as_str()))
        .cloned()
        .collect();

    for cycle in &cycles {
        tracing::warn!(
            error = %HierarchyError::Cycle { sids: cycle.clone() },
            "Manager cycle excluded from org chart"
        );
    }
    if let Some(chain) = &root_cycle {
        tracing::warn!(
            error = %HierarchyError::Cycle { sids: chain.clone() },
            "Root manager reports into their own team"
        );
    }
    if !detached.is_empty() {
        tracing::debug!(
            root = %root,
            unassigned = unassigned.len(),
            detached = detached.len(),
            "Employees outside the org chart"
        );
    }

    HierarchyReport {
        forest,
        unassigned,
        cycles,
        root_cycle,
        duplicates,
        detached,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sid(raw: &str) -> Sid {
        Sid::new(raw).unwrap()
    }

    fn emp(id: &str, manager: Option<&str>) -> Employee {
        let employee = Employee::new(sid(id), id, "");
        match manager {
            Some(m) => employee.with_manager(sid(m)),
            None => employee,
        }
    }

    fn names(sids: &[Sid]) -> Vec<&str> {
        sids.iter().map(Sid::as_str).collect()
    }

    #[test]
    fn test_canonical_example_report() {
        let list = vec![
            emp("A", None),
            emp("B", Some("A")),
            emp("C", Some("B")),
            emp("D", Some("X")),
        ];
        let report = analyze_hierarchy(&list, &sid("A"));
        assert_eq!(report.forest.len(), 2);
        // A is the root context, never unassigned.
        assert_eq!(names(&report.unassigned), vec!["D"]);
        assert_eq!(names(&report.detached), vec!["D"]);
        assert!(report.cycles.is_empty());
        assert!(report.ensure_acyclic().is_ok());
        assert!(!report.is_clean());
    }

    #[test]
    fn test_clean_hierarchy() {
        let list = vec![emp("B", Some("A")), emp("C", Some("B"))];
        let report = analyze_hierarchy(&list, &sid("A"));
        assert!(report.is_clean());
    }

    #[test]
    fn test_two_cycle_detected_in_reporting_order() {
        let list = vec![emp("B", Some("A")), emp("P", Some("Q")), emp("Q", Some("P"))];
        let report = analyze_hierarchy(&list, &sid("A"));
        assert_eq!(report.cycles.len(), 1);
        assert_eq!(names(&report.cycles[0]), vec!["P", "Q"]);
        assert_eq!(names(&report.detached), vec!["P", "Q"]);

        let err = report.ensure_acyclic().unwrap_err();
        assert!(err.to_string().contains("Manager cycle detected"));
    }

    #[test]
    fn test_self_managed_is_a_one_cycle() {
        let list = vec![emp("S", Some("S"))];
        let report = analyze_hierarchy(&list, &sid("A"));
        assert_eq!(report.cycles, vec![vec![sid("S")]]);
        assert!(report.forest.is_empty());
    }

    #[test]
    fn test_reports_below_a_cycle_are_detached_not_cyclic() {
        let list = vec![
            emp("P", Some("Q")),
            emp("Q", Some("P")),
            emp("T", Some("P")),
        ];
        let report = analyze_hierarchy(&list, &sid("A"));
        assert_eq!(report.cycles.len(), 1);
        assert_eq!(report.cycles[0].len(), 2);
        assert!(report.detached.contains(&sid("T")));
        assert!(report.unassigned.is_empty());
    }

    #[test]
    fn test_duplicates_listed_once() {
        let list = vec![
            emp("B", Some("A")),
            emp("B", Some("A")),
            emp("B", Some("A")),
        ];
        let report = analyze_hierarchy(&list, &sid("A"));
        assert_eq!(names(&report.duplicates), vec!["B"]);
        assert_eq!(report.forest.len(), 1);
        assert!(report.detached.is_empty());
    }

    #[test]
    fn test_root_record_with_manager_is_not_detached() {
        let list = vec![emp("A", Some("CEO")), emp("B", Some("A"))];
        let report = analyze_hierarchy(&list, &sid("A"));
        assert!(report.unassigned.is_empty());
        assert!(report.detached.is_empty());
        assert!(report.root_cycle.is_none());
        assert!(report.is_clean());
    }

    #[test]
    fn test_ring_reported_in_one_rotation() {
        let ring: Vec<Employee> = (0..6)
            .map(|i| emp(&format!("P{i}"), Some(&format!("P{}", (i + 1) % 6))))
            .collect();
        let expected = vec!["P0", "P1", "P2", "P3", "P4", "P5"];
        for _ in 0..50 {
            let report = analyze_hierarchy(&ring, &sid("ROOT"));
            assert_eq!(report.cycles.len(), 1);
            assert_eq!(names(&report.cycles[0]), expected);
        }
    }

    #[test]
    fn test_cycle_entered_from_a_tail_starts_at_earliest_member() {
        // T walks into the ring at Q, but P is listed first.
        let list = vec![
            emp("T", Some("Q")),
            emp("P", Some("Q")),
            emp("Q", Some("R")),
            emp("R", Some("P")),
        ];
        let report = analyze_hierarchy(&list, &sid("A"));
        assert_eq!(report.cycles.len(), 1);
        assert_eq!(names(&report.cycles[0]), vec!["P", "Q", "R"]);
    }

    #[test]
    fn test_cycles_ordered_by_first_listed_member() {
        let list = vec![
            emp("Y", Some("X")),
            emp("P", Some("Q")),
            emp("X", Some("Y")),
            emp("Q", Some("P")),
        ];
        let report = analyze_hierarchy(&list, &sid("A"));
        let cycles: Vec<Vec<&str>> = report.cycles.iter().map(|c| names(c)).collect();
        assert_eq!(cycles, vec![vec!["Y", "X"], vec!["P", "Q"]]);
    }

    #[test]
    fn test_root_reporting_into_own_team_is_reported() {
        let list = vec![emp("B", Some("R")), emp("R", Some("B"))];
        let report = analyze_hierarchy(&list, &sid("R"));
        assert_eq!(report.root_cycle, Some(vec![sid("R"), sid("B")]));
        assert!(report.cycles.is_empty());
        assert!(report.forest.contains("B"));
        assert!(!report.is_clean());

        let err = report.ensure_acyclic().unwrap_err();
        assert!(err.to_string().contains("R -> B -> R"));
    }

    #[test]
    fn test_root_loop_through_a_longer_chain() {
        let list = vec![
            emp("B", Some("R")),
            emp("C", Some("B")),
            emp("R", Some("C")),
        ];
        let report = analyze_hierarchy(&list, &sid("R"));
        assert_eq!(report.root_cycle, Some(vec![sid("R"), sid("C"), sid("B")]));
        assert_eq!(report.forest.len(), 2);
    }

    #[test]
    fn test_self_managed_root_is_not_a_loop() {
        let list = vec![emp("R", Some("R")), emp("B", Some("R"))];
        let report = analyze_hierarchy(&list, &sid("R"));
        assert!(report.root_cycle.is_none());
        assert!(report.cycles.is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn test_root_chain_into_other_cycle_reported_once() {
        let list = vec![
            emp("R", Some("P")),
            emp("P", Some("Q")),
            emp("Q", Some("P")),
        ];
        let report = analyze_hierarchy(&list, &sid("R"));
        assert!(report.root_cycle.is_none());
        assert_eq!(report.cycles.len(), 1);
        assert_eq!(names(&report.cycles[0]), vec!["P", "Q"]);
    }
}
