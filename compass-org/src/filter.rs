//! Search and division filter over the flat employee list.
//!
//! The forest is rebuilt from the filtered list, not pruned afterwards, so a
//! manager that does not match cuts their matching reports off from the root.

use compass_core::Employee;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeFilter {
    /// Substring matched against name, email, title and sid.
    #[serde(default)]
    pub search: String,
    /// Exact division, applied after the search.
    #[serde(default)]
    pub division: Option<String>,
}

impl EmployeeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_division(mut self, division: impl Into<String>) -> Self {
        self.division = Some(division.into());
        self
    }

    /// Lowercased search needle, `None` when blank.
    fn needle(&self) -> Option<String> {
        let trimmed = self.search.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
    }

    fn division_filter(&self) -> Option<&str> {
        self.division.as_deref().filter(|d| !d.trim().is_empty())
    }

    /// Whether applying this filter can drop anyone.
    pub fn is_active(&self) -> bool {
        self.needle().is_some() || self.division_filter().is_some()
    }

    pub fn matches(&self, employee: &Employee) -> bool {
        self.matches_needle(employee, self.needle().as_deref())
    }

    fn matches_needle(&self, employee: &Employee, needle: Option<&str>) -> bool {
        let text_ok = match needle {
            None => true,
            Some(needle) => [
                employee.first_name.as_str(),
                employee.last_name.as_str(),
                employee.email.as_str(),
                employee.job_title.as_str(),
                employee.sid.as_str(),
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(needle)),
        };
        text_ok
            && self
                .division_filter()
                .map_or(true, |d| employee.division.as_deref() == Some(d))
    }

    /// Keep the matching records, in input order.
    ///
    /// An inactive filter hands the input back borrowed.
    pub fn apply<'a>(&self, employees: &'a [Employee]) -> Cow<'a, [Employee]> {
        if !self.is_active() {
            return Cow::Borrowed(employees);
        }
        let needle = self.needle();
        let kept: Vec<Employee> = employees
            .iter()
            .filter(|e| self.matches_needle(e, needle.as_deref()))
            .cloned()
            .collect();
        tracing::debug!(
            input = employees.len(),
            kept = kept.len(),
            "Applied employee filter"
        );
        Cow::Owned(kept)
    }
}

/// Distinct non-blank divisions in first-seen order.
pub fn divisions(employees: &[Employee]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for division in employees.iter().filter_map(|e| e.division.as_deref()) {
        let division = division.trim();
        if !division.is_empty() && !seen.iter().any(|d| d == division) {
            seen.push(division.to_string());
        }
    }
    seen
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_tree;
    use compass_core::Sid;

    fn sid(raw: &str) -> Sid {
        Sid::new(raw).unwrap()
    }

    fn people() -> Vec<Employee> {
        vec![
            Employee::new(sid("A"), "Ada", "Lovelace").with_division("Engineering"),
            Employee::new(sid("B"), "Bob", "Stone")
                .with_manager(sid("A"))
                .with_email("bob@example.com")
                .with_division("Finance"),
            Employee::new(sid("C"), "Cleo", "Park")
                .with_manager(sid("B"))
                .with_job("J9", "Payroll Analyst")
                .with_division("Finance"),
            Employee::new(sid("D"), "Dev", "Rao").with_manager(sid("X")),
        ]
    }

    #[test]
    fn test_blank_search_borrows_input() {
        let list = people();
        let filtered = EmployeeFilter::new().with_search("   ").apply(&list);
        assert!(matches!(filtered, Cow::Borrowed(_)));
        assert!(std::ptr::eq(filtered.as_ref(), list.as_slice()));
    }

    #[test]
    fn test_search_matches_each_field_case_insensitively() {
        let list = people();
        let hit = |q: &str| -> Vec<String> {
            EmployeeFilter::new()
                .with_search(q)
                .apply(&list)
                .iter()
                .map(|e| e.sid.to_string())
                .collect()
        };
        assert_eq!(hit("ada"), vec!["A"]);
        assert_eq!(hit("STONE"), vec!["B"]);
        assert_eq!(hit("bob@"), vec!["B"]);
        assert_eq!(hit("payroll"), vec!["C"]);
        assert_eq!(hit("d"), vec!["A", "D"]);
        assert!(hit("zzz").is_empty());
    }

    #[test]
    fn test_division_is_exact_and_anded() {
        let list = people();
        let finance = EmployeeFilter::new().with_division("Finance");
        assert_eq!(finance.apply(&list).len(), 2);

        let narrowed = finance.clone().with_search("cleo");
        assert_eq!(narrowed.apply(&list).len(), 1);

        assert!(EmployeeFilter::new()
            .with_division("finance")
            .apply(&list)
            .is_empty());
    }

    #[test]
    fn test_filter_disconnects_non_matching_manager() {
        let list = people();
        let filtered = EmployeeFilter::new().with_search("cleo").apply(&list);
        assert_eq!(filtered.len(), 1);
        // C's manager B is filtered out and B is not the root.
        assert!(build_tree(&filtered, &sid("A")).is_empty());
    }

    #[test]
    fn test_no_match_gives_empty_tree() {
        let list = people();
        let filtered = EmployeeFilter::new().with_search("nobody").apply(&list);
        assert!(build_tree(&filtered, &sid("A")).is_empty());
    }

    #[test]
    fn test_is_active() {
        assert!(!EmployeeFilter::new().is_active());
        assert!(!EmployeeFilter::new().with_division(" ").is_active());
        assert!(EmployeeFilter::new().with_search("x").is_active());
        assert!(EmployeeFilter::new().with_division("Finance").is_active());
    }

    #[test]
    fn test_divisions_first_seen_order() {
        let list = people();
        assert_eq!(divisions(&list), vec!["Engineering", "Finance"]);
    }
}
