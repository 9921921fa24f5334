//! The employee directory seam.

use crate::analysis::{analyze_hierarchy, HierarchyReport};
use crate::filter::EmployeeFilter;
use async_trait::async_trait;
use compass_core::{DirectoryError, Employee, Sid};

/// Source of team lists. Implemented over REST in the terminal app and by
/// in-memory mocks in tests.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// Everyone below `manager` in the hierarchy, flat and in any order.
    async fn team(&self, manager: &Sid) -> Result<Vec<Employee>, DirectoryError>;
}

/// Fetch the team under `root`, filter it and analyze the hierarchy.
pub async fn load_hierarchy<D>(
    directory: &D,
    root: &Sid,
    filter: &EmployeeFilter,
) -> Result<HierarchyReport, DirectoryError>
where
    D: EmployeeDirectory + ?Sized,
{
    let team = directory.team(root).await?;
    let filtered = filter.apply(&team);
    Ok(analyze_hierarchy(&filtered, root))
}
