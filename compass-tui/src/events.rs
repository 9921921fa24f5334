//! Event types for the TUI event loop.

use compass_core::{
    AssessorMapping, Competency, DirectoryError, Employee, IndividualDevelopmentPlan, Job,
    JobCompetencyMapping, Sid,
};
use compass_org::LoadTicket;
use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum TuiEvent {
    Input(KeyEvent),
    Resize { width: u16, height: u16 },
    /// Response to a team fetch; applied only if `ticket` is still current.
    TeamLoaded {
        ticket: LoadTicket,
        result: Result<Vec<Employee>, DirectoryError>,
    },
    IdpsLoaded {
        sid: Sid,
        result: Result<Vec<IndividualDevelopmentPlan>, DirectoryError>,
    },
    JobsLoaded(Result<Vec<Job>, DirectoryError>),
    CompetenciesLoaded(Result<Vec<Competency>, DirectoryError>),
    AssessorsLoaded(Result<Vec<AssessorMapping>, DirectoryError>),
    ProfileLoaded {
        job_code: String,
        result: Result<Vec<JobCompetencyMapping>, DirectoryError>,
    },
}
