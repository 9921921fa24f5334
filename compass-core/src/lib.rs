//! COMPASS Core - HR Data Types
//!
//! Employees, the job catalog, the competency dictionary, job-competency
//! profiles, assessor mappings and development plans. Every other crate in
//! the workspace depends on this one. Aside from record validation and a
//! handful of catalog queries, it holds data only; the hierarchy engine
//! lives in `compass-org`.

pub mod catalog;
pub mod entities;
pub mod enums;
pub mod error;
pub mod identity;
pub mod records;

pub use catalog::{
    assessors_for, duplicate_assessor_pairs, search_competencies, search_jobs, CompetencyProfile,
    IdpSummary, ProfileEntry,
};
pub use entities::{
    AssessorMapping, Competency, CompetencyLevel, Employee, IndividualDevelopmentPlan, Job,
    JobCompetencyMapping,
};
pub use enums::{
    CompetencyType, CompetencyTypeParseError, EmploymentStatus, EmploymentStatusParseError,
    IdpPriority, IdpPriorityParseError, IdpStatus, IdpStatusParseError, ProficiencyLevel,
    ProficiencyLevelParseError,
};
pub use error::{CompassError, CompassResult, DirectoryError, HierarchyError, ValidationError};
pub use identity::{EntityId, Sid, Timestamp};
pub use records::{validate_records, EmployeeRecord, RejectedRecord, ValidatedBatch};
