//! Property tests for record validation and enum parsing.

use compass_core::{
    Employee, EmployeeRecord, EmploymentStatus, IdpPriority, ProficiencyLevel, Sid,
};
use proptest::prelude::*;

fn random_case(input: &str, mask: &[bool]) -> String {
    input
        .chars()
        .zip(mask.iter().cycle())
        .map(|(c, upper)| {
            if *upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn sid_accepts_any_non_blank_text(raw in "[A-Za-z0-9]{1,12}", pad in " {0,3}") {
        let padded = format!("{pad}{raw}{pad}");
        let sid = Sid::new(&padded).unwrap();
        prop_assert_eq!(sid.as_str(), raw.as_str());
    }

    #[test]
    fn employment_status_parse_ignores_case(
        idx in 0usize..5,
        mask in prop::collection::vec(any::<bool>(), 1..8),
    ) {
        let status = EmploymentStatus::ALL[idx];
        let mangled = random_case(status.as_wire_str(), &mask);
        prop_assert_eq!(mangled.parse::<EmploymentStatus>().unwrap(), status);
    }

    #[test]
    fn proficiency_rank_matches_order(a in 0usize..4, b in 0usize..4) {
        let left = ProficiencyLevel::ALL[a];
        let right = ProficiencyLevel::ALL[b];
        prop_assert_eq!(left < right, left.rank() < right.rank());
    }

    #[test]
    fn priority_display_parses_back(idx in 0usize..4) {
        let priority = IdpPriority::ALL[idx];
        prop_assert_eq!(priority.to_string().parse::<IdpPriority>().unwrap(), priority);
    }

    #[test]
    fn record_validation_never_keeps_blank_manager(
        sid in "[A-Z][0-9]{1,5}",
        manager in prop::option::of(" {0,2}|[A-Z][0-9]{1,5}"),
    ) {
        let record = EmployeeRecord {
            sid: Some(sid.clone()),
            line_manager_sid: manager.clone(),
            ..Default::default()
        };
        let employee = Employee::try_from(record).unwrap();
        prop_assert_eq!(employee.sid.as_str(), sid.as_str());
        match manager.as_deref().map(str::trim) {
            Some(m) if !m.is_empty() => {
                prop_assert_eq!(employee.line_manager_sid.as_ref().map(Sid::as_str), Some(m));
            }
            _ => prop_assert!(employee.line_manager_sid.is_none()),
        }
    }
}
