//! Core entity structures

use crate::{
    CompetencyType, EmploymentStatus, EntityId, IdpPriority, IdpStatus, ProficiencyLevel, Sid,
    ValidationError,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Employee - a validated staff record.
///
/// Built from the loosely-typed wire shape via
/// [`EmployeeRecord`](crate::EmployeeRecord); downstream code can rely on
/// `sid` being present and `line_manager_sid` being either a valid sid or
/// `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Employee {
    pub id: Option<EntityId>,
    pub sid: Sid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub job_code: Option<String>,
    pub job_title: String,
    pub division: Option<String>,
    pub unit: Option<String>,
    pub department: Option<String>,
    pub section: Option<String>,
    pub location: Option<String>,
    pub grade: Option<String>,
    pub employment_status: EmploymentStatus,
    pub line_manager_sid: Option<Sid>,
}

impl Employee {
    /// Minimal employee with everything optional left empty.
    pub fn new(sid: Sid, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: None,
            sid,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: String::new(),
            job_code: None,
            job_title: String::new(),
            division: None,
            unit: None,
            department: None,
            section: None,
            location: None,
            grade: None,
            employment_status: EmploymentStatus::Active,
            line_manager_sid: None,
        }
    }

    pub fn with_manager(mut self, manager: Sid) -> Self {
        self.line_manager_sid = Some(manager);
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_job(mut self, code: impl Into<String>, title: impl Into<String>) -> Self {
        self.job_code = Some(code.into());
        self.job_title = title.into();
        self
    }

    pub fn with_division(mut self, division: impl Into<String>) -> Self {
        self.division = Some(division.into());
        self
    }

    pub fn with_status(mut self, status: EmploymentStatus) -> Self {
        self.employment_status = status;
        self
    }

    pub fn full_name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.last_name),
            (false, true) => self.first_name.clone(),
            (true, false) => self.last_name.clone(),
            (true, true) => self.sid.to_string(),
        }
    }

    /// One-line label used by tree rows.
    pub fn label(&self) -> String {
        if self.job_title.is_empty() {
            format!("{} ({})", self.full_name(), self.sid)
        } else {
            format!("{} ({}) - {}", self.full_name(), self.sid, self.job_title)
        }
    }

    pub fn reports_to(&self, manager: &Sid) -> bool {
        self.line_manager_sid.as_ref() == Some(manager)
    }
}

/// Job - a position in the job catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Job {
    #[serde(default)]
    pub id: Option<EntityId>,
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub division: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default = "default_true", alias = "isActive")]
    pub is_active: bool,
}

/// Competency - an entry of the competency dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Competency {
    pub id: EntityId,
    pub name: String,
    #[serde(rename = "type", alias = "competency_type")]
    pub competency_type: CompetencyType,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub levels: Vec<CompetencyLevel>,
}

impl Competency {
    /// Descriptor for a given proficiency level, if the dictionary has one.
    pub fn level(&self, level: ProficiencyLevel) -> Option<&CompetencyLevel> {
        self.levels.iter().find(|l| l.level == level)
    }

    /// Levels sorted from `Basic` to `Mastery`.
    pub fn sorted_levels(&self) -> Vec<&CompetencyLevel> {
        let mut levels: Vec<&CompetencyLevel> = self.levels.iter().collect();
        levels.sort_by_key(|l| l.level);
        levels
    }

    /// At most one descriptor per proficiency level.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: "name".to_string(),
            });
        }
        for (index, level) in self.levels.iter().enumerate() {
            if self.levels[..index].iter().any(|l| l.level == level.level) {
                return Err(ValidationError::ConstraintViolation {
                    constraint: "competency_level_unique".to_string(),
                    reason: format!("{} defined twice for {}", level.level, self.name),
                });
            }
        }
        Ok(())
    }
}

/// Behavioural description of one proficiency level of a competency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CompetencyLevel {
    pub level: ProficiencyLevel,
    pub description: String,
    #[serde(default)]
    pub indicators: Vec<String>,
}

/// Job-competency profile entry (JCP): the level a job requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct JobCompetencyMapping {
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(alias = "jobCode")]
    pub job_code: String,
    #[serde(alias = "competencyId")]
    pub competency_id: EntityId,
    #[serde(alias = "requiredLevel")]
    pub required_level: ProficiencyLevel,
    #[serde(default = "default_true", alias = "isRequired")]
    pub is_required: bool,
}

/// Qualifies an employee to assess a competency up to a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AssessorMapping {
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(alias = "assessorSid")]
    pub assessor_sid: Sid,
    #[serde(alias = "competencyId")]
    pub competency_id: EntityId,
    #[serde(alias = "competencyLevel")]
    pub competency_level: ProficiencyLevel,
    #[serde(default = "default_true", alias = "isActive")]
    pub is_active: bool,
}

/// Individual development plan (IDP) for one employee and one competency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct IndividualDevelopmentPlan {
    #[serde(default)]
    pub id: Option<EntityId>,
    pub employee_sid: Sid,
    pub competency_id: EntityId,
    pub status: IdpStatus,
    pub priority: IdpPriority,
    #[serde(default)]
    pub progress_percentage: u8,
    /// Linked learning intervention (course, mentoring, assignment).
    #[serde(default)]
    pub intervention: Option<String>,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl IndividualDevelopmentPlan {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.progress_percentage > 100 {
            return Err(ValidationError::InvalidValue {
                field: "progress_percentage".to_string(),
                value: self.progress_percentage.to_string(),
                reason: "must be between 0 and 100".to_string(),
            });
        }
        if self.status == IdpStatus::Completed && self.progress_percentage != 100 {
            return Err(ValidationError::ConstraintViolation {
                constraint: "idp_completed_progress".to_string(),
                reason: format!(
                    "completed plan reports {}% progress",
                    self.progress_percentage
                ),
            });
        }
        Ok(())
    }

    /// Past its target date and not completed.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.target_date {
            Some(target) => self.status != IdpStatus::Completed && target < today,
            None => false,
        }
    }
}

fn default_true() -> bool {
    true
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

    fn plan(status: IdpStatus, progress: u8, target: Option<NaiveDate>) -> IndividualDevelopmentPlan {
        IndividualDevelopmentPlan {
            id: None,
            employee_sid: sid("E1"),
            competency_id: 7,
            status,
            priority: IdpPriority::Medium,
            progress_percentage: progress,
            intervention: None,
            target_date: target,
            notes: None,
        }
    }

    #[test]
    fn test_full_name_falls_back_to_sid() {
        let employee = Employee::new(sid("E9"), "", "");
        assert_eq!(employee.full_name(), "E9");
        let employee = Employee::new(sid("E9"), "Ana", "");
        assert_eq!(employee.full_name(), "Ana");
    }

    #[test]
    fn test_label_includes_title() {
        let employee = Employee::new(sid("E1"), "Ana", "Lim").with_job("J-10", "Engineer");
        assert_eq!(employee.label(), "Ana Lim (E1) - Engineer");
    }

    #[test]
    fn test_reports_to() {
        let employee = Employee::new(sid("E2"), "Bo", "Tan").with_manager(sid("E1"));
        assert!(employee.reports_to(&sid("E1")));
        assert!(!employee.reports_to(&sid("E3")));
    }

    #[test]
    fn test_competency_rejects_duplicate_level() {
        let level = CompetencyLevel {
            level: ProficiencyLevel::Basic,
            description: "Knows the basics".to_string(),
            indicators: vec![],
        };
        let competency = Competency {
            id: 1,
            name: "SQL".to_string(),
            competency_type: CompetencyType::Technical,
            family: None,
            definition: None,
            levels: vec![level.clone(), level],
        };
        assert!(matches!(
            competency.validate(),
            Err(ValidationError::ConstraintViolation { .. })
        ));
    }

    #[test]
    fn test_competency_sorted_levels() {
        let make = |level| CompetencyLevel {
            level,
            description: String::new(),
            indicators: vec![],
        };
        let competency = Competency {
            id: 1,
            name: "Negotiation".to_string(),
            competency_type: CompetencyType::Behavioral,
            family: Some("Influence".to_string()),
            definition: None,
            levels: vec![make(ProficiencyLevel::Mastery), make(ProficiencyLevel::Basic)],
        };
        let sorted: Vec<_> = competency.sorted_levels().iter().map(|l| l.level).collect();
        assert_eq!(sorted, vec![ProficiencyLevel::Basic, ProficiencyLevel::Mastery]);
        assert!(competency.level(ProficiencyLevel::Advanced).is_none());
    }

    #[test]
    fn test_competency_deserializes_type_field() {
        let json = r#"{"id":3,"name":"Coaching","type":"LEADERSHIP"}"#;
        let competency: Competency = serde_json::from_str(json).unwrap();
        assert_eq!(competency.competency_type, CompetencyType::Leadership);
        assert!(competency.levels.is_empty());
    }

    #[test]
    fn test_jcp_accepts_camel_case_fields() {
        let json = r#"{"jobCode":"J-1","competencyId":4,"requiredLevel":"ADVANCED","isRequired":false}"#;
        let mapping: JobCompetencyMapping = serde_json::from_str(json).unwrap();
        assert_eq!(mapping.job_code, "J-1");
        assert_eq!(mapping.required_level, ProficiencyLevel::Advanced);
        assert!(!mapping.is_required);
    }

    #[test]
    fn test_idp_progress_bounds() {
        assert!(plan(IdpStatus::InProgress, 40, None).validate().is_ok());
        assert!(plan(IdpStatus::InProgress, 101, None).validate().is_err());
        assert!(plan(IdpStatus::Completed, 90, None).validate().is_err());
        assert!(plan(IdpStatus::Completed, 100, None).validate().is_ok());
    }

    #[test]
    fn test_idp_overdue() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let past = NaiveDate::from_ymd_opt(2025, 5, 1);
        let future = NaiveDate::from_ymd_opt(2025, 7, 1);
        assert!(plan(IdpStatus::Planned, 0, past).is_overdue(today));
        assert!(!plan(IdpStatus::Completed, 100, past).is_overdue(today));
        assert!(!plan(IdpStatus::InProgress, 10, future).is_overdue(today));
        assert!(!plan(IdpStatus::InProgress, 10, None).is_overdue(today));
    }
}
