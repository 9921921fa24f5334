//! Wire records and validation at the directory boundary.
//!
//! The API hands out employee objects whose shape drifts with whichever
//! import script last touched the table: fields go missing, managers are
//! sent as empty strings, statuses arrive in any case. [`EmployeeRecord`]
//! accepts all of that; converting it into an [`Employee`] is where the
//! required fields are enforced.

use crate::{EmploymentStatus, Employee, EntityId, Sid, ValidationError};
use serde::{Deserialize, Serialize};

/// Loosely-typed employee as served by the REST API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct EmployeeRecord {
    pub id: Option<EntityId>,
    pub sid: Option<String>,
    #[serde(alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(alias = "lastName")]
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "jobCode")]
    pub job_code: Option<String>,
    #[serde(alias = "jobTitle")]
    pub job_title: Option<String>,
    pub division: Option<String>,
    pub unit: Option<String>,
    pub department: Option<String>,
    pub section: Option<String>,
    pub location: Option<String>,
    pub grade: Option<String>,
    #[serde(alias = "employmentStatus")]
    pub employment_status: Option<String>,
    #[serde(alias = "lineManagerSid")]
    pub line_manager_sid: Option<String>,
}

/// Trim and drop empty strings.
fn clean(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

impl TryFrom<EmployeeRecord> for Employee {
    type Error = ValidationError;

    fn try_from(record: EmployeeRecord) -> Result<Self, Self::Error> {
        let sid = match clean(record.sid) {
            Some(raw) => Sid::new(raw)?,
            None => {
                return Err(ValidationError::RequiredFieldMissing {
                    field: "sid".to_string(),
                })
            }
        };

        // Missing status means the row predates the status column.
        let employment_status = match clean(record.employment_status) {
            Some(raw) => EmploymentStatus::from_wire_str(&raw).map_err(|err| {
                ValidationError::InvalidValue {
                    field: "employment_status".to_string(),
                    value: raw.clone(),
                    reason: err.to_string(),
                }
            })?,
            None => EmploymentStatus::Active,
        };

        let line_manager_sid = clean(record.line_manager_sid).map(Sid::new).transpose()?;

        Ok(Employee {
            id: record.id,
            sid,
            first_name: clean(record.first_name).unwrap_or_default(),
            last_name: clean(record.last_name).unwrap_or_default(),
            email: clean(record.email).unwrap_or_default(),
            job_code: clean(record.job_code),
            job_title: clean(record.job_title).unwrap_or_default(),
            division: clean(record.division),
            unit: clean(record.unit),
            department: clean(record.department),
            section: clean(record.section),
            location: clean(record.location),
            grade: clean(record.grade),
            employment_status,
            line_manager_sid,
        })
    }
}

impl From<&Employee> for EmployeeRecord {
    fn from(employee: &Employee) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            id: employee.id,
            sid: Some(employee.sid.to_string()),
            first_name: non_empty(&employee.first_name),
            last_name: non_empty(&employee.last_name),
            email: non_empty(&employee.email),
            job_code: employee.job_code.clone(),
            job_title: non_empty(&employee.job_title),
            division: employee.division.clone(),
            unit: employee.unit.clone(),
            department: employee.department.clone(),
            section: employee.section.clone(),
            location: employee.location.clone(),
            grade: employee.grade.clone(),
            employment_status: Some(employee.employment_status.to_string()),
            line_manager_sid: employee.line_manager_sid.as_ref().map(Sid::to_string),
        }
    }
}

/// A record that failed validation, with its position in the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    pub index: usize,
    pub sid: Option<String>,
    pub error: ValidationError,
}

/// Outcome of validating a batch of wire records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedBatch {
    pub employees: Vec<Employee>,
    pub rejected: Vec<RejectedRecord>,
}

/// Validate a batch, keeping every record that passes and logging the rest.
/// Input order is preserved among the accepted employees.
pub fn validate_records(records: Vec<EmployeeRecord>) -> ValidatedBatch {
    let mut batch = ValidatedBatch::default();
    for (index, record) in records.into_iter().enumerate() {
        let sid = record.sid.clone();
        match Employee::try_from(record) {
            Ok(employee) => batch.employees.push(employee),
            Err(error) => {
                tracing::warn!(index, sid = ?sid, %error, "Rejected employee record");
                batch.rejected.push(RejectedRecord { index, sid, error });
            }
        }
    }
    batch
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sid: &str, manager: Option<&str>) -> EmployeeRecord {
        EmployeeRecord {
            sid: Some(sid.to_string()),
            first_name: Some("Test".to_string()),
            line_manager_sid: manager.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_sid_rejected() {
        let err = Employee::try_from(EmployeeRecord::default()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::RequiredFieldMissing {
                field: "sid".to_string()
            }
        );
    }

    #[test]
    fn test_blank_manager_becomes_none() {
        let employee = Employee::try_from(record("E1", Some("  "))).unwrap();
        assert!(employee.line_manager_sid.is_none());
    }

    #[test]
    fn test_manager_is_trimmed() {
        let employee = Employee::try_from(record("E2", Some(" E1 "))).unwrap();
        assert_eq!(employee.line_manager_sid.unwrap().as_str(), "E1");
    }

    #[test]
    fn test_missing_status_defaults_active() {
        let employee = Employee::try_from(record("E1", None)).unwrap();
        assert_eq!(employee.employment_status, EmploymentStatus::Active);
    }

    #[test]
    fn test_bad_status_rejected() {
        let mut rec = record("E1", None);
        rec.employment_status = Some("retired".to_string());
        let err = Employee::try_from(rec).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { ref field, .. } if field == "employment_status"));
    }

    #[test]
    fn test_deserialize_camel_case_payload() {
        let json = r#"{
            "id": 12,
            "sid": "E12",
            "firstName": "Rina",
            "lastName": "Hadi",
            "jobTitle": "Analyst",
            "employmentStatus": "on_leave",
            "lineManagerSid": "E1"
        }"#;
        let rec: EmployeeRecord = serde_json::from_str(json).unwrap();
        let employee = Employee::try_from(rec).unwrap();
        assert_eq!(employee.id, Some(12));
        assert_eq!(employee.full_name(), "Rina Hadi");
        assert_eq!(employee.employment_status, EmploymentStatus::OnLeave);
        assert_eq!(employee.line_manager_sid.unwrap().as_str(), "E1");
    }

    #[test]
    fn test_validate_records_keeps_order_and_reports_rejects() {
        let records = vec![
            record("A", None),
            EmployeeRecord::default(),
            record("B", Some("A")),
        ];
        let batch = validate_records(records);
        let sids: Vec<&str> = batch.employees.iter().map(|e| e.sid.as_str()).collect();
        assert_eq!(sids, vec!["A", "B"]);
        assert_eq!(batch.rejected.len(), 1);
        assert_eq!(batch.rejected[0].index, 1);
    }

    #[test]
    fn test_record_from_employee_roundtrip() {
        let employee = Employee::new(Sid::new("E5").unwrap(), "Ari", "Wong")
            .with_manager(Sid::new("E1").unwrap())
            .with_division("Finance");
        let rec = EmployeeRecord::from(&employee);
        let back = Employee::try_from(rec).unwrap();
        assert_eq!(back, employee);
    }
}
