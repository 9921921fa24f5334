//! Reusable widget components.

pub mod detail;
pub mod filter;
pub mod progress;
pub mod tree;

pub use detail::DetailPanel;
pub use filter::{FilterBar, FilterOption, SearchBox};
pub use progress::ProgressBar;
pub use tree::{TreeStyle, TreeWidget};
