//! COMPASS Org - Org Chart Engine
//!
//! Turns the flat team list returned by the employee directory into a
//! forest under a root manager, and keeps the state the org chart view
//! needs around it:
//!
//! - [`build_tree`] / [`analyze_hierarchy`]: forest construction plus
//!   diagnostics for orphans, manager cycles and duplicate sids
//! - [`ExpansionState`]: which nodes are open
//! - [`EmployeeFilter`]: search and division filter applied before the build
//! - [`render_walk`]: the visible rows, with connector cosmetics
//! - [`TeamLoader`]: last-write-wins bookkeeping for in-flight fetches
//!
//! Everything except [`load_hierarchy`] is synchronous and pure over its
//! inputs.

pub mod analysis;
pub mod directory;
pub mod expansion;
pub mod filter;
pub mod loader;
pub mod tree;
pub mod walk;

pub use analysis::{analyze_hierarchy, HierarchyReport};
pub use directory::{load_hierarchy, EmployeeDirectory};
pub use expansion::{ExpandIndicator, ExpansionState};
pub use filter::{divisions, EmployeeFilter};
pub use loader::{LoadOutcome, LoadState, LoadTicket, TeamLoader};
pub use tree::{build_tree, Forest, OrgNode, PreOrder};
pub use walk::{render_walk, RenderRow};
