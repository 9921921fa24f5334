//! Which org nodes are expanded.
//!
//! Kept apart from the forest so a rebuilt tree (new fetch, new filter)
//! keeps the user's expand/collapse choices by sid.

use crate::tree::{Forest, OrgNode};
use compass_core::Sid;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Expand/collapse indicator shown next to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpandIndicator {
    Expanded,
    Collapsed,
    /// No children: the toggle is inert.
    Leaf,
}

impl ExpandIndicator {
    pub fn glyph(&self) -> &'static str {
        match self {
            ExpandIndicator::Expanded => "▾ ",
            ExpandIndicator::Collapsed => "▸ ",
            ExpandIndicator::Leaf => "· ",
        }
    }
}

/// Set of expanded sids. Persisted as a sorted list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Sid>", into = "Vec<Sid>")]
pub struct ExpansionState {
    expanded: HashSet<Sid>,
}

impl From<Vec<Sid>> for ExpansionState {
    fn from(sids: Vec<Sid>) -> Self {
        Self {
            expanded: sids.into_iter().collect(),
        }
    }
}

impl From<ExpansionState> for Vec<Sid> {
    fn from(state: ExpansionState) -> Self {
        let mut sids: Vec<Sid> = state.expanded.into_iter().collect();
        sids.sort();
        sids
    }
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, sid: &str) -> bool {
        self.expanded.contains(sid)
    }

    /// Flip `sid` and return whether it is now expanded.
    pub fn toggle(&mut self, sid: &Sid) -> bool {
        if self.expanded.remove(sid.as_str()) {
            false
        } else {
            self.expanded.insert(sid.clone());
            true
        }
    }

    pub fn expand(&mut self, sid: &Sid) {
        self.expanded.insert(sid.clone());
    }

    pub fn collapse(&mut self, sid: &str) {
        self.expanded.remove(sid);
    }

    /// Expand every node in the forest, nested included. Leaves are flagged
    /// too; their indicator stays [`ExpandIndicator::Leaf`].
    pub fn expand_all(&mut self, forest: &Forest) {
        self.expanded
            .extend(forest.iter().map(|node| node.sid().clone()));
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// Expand every ancestor of `sid` so it becomes visible.
    /// Returns false when `sid` is not in the forest.
    pub fn expand_path(&mut self, forest: &Forest, sid: &str) -> bool {
        match forest.path_to(sid) {
            Some(mut path) => {
                path.pop();
                self.expanded.extend(path);
                true
            }
            None => false,
        }
    }

    /// Drop sids the forest no longer contains.
    pub fn retain_present(&mut self, forest: &Forest) {
        let present: HashSet<&str> = forest.iter().map(|n| n.sid().as_str()).collect();
        self.expanded.retain(|sid| present.contains(sid.as_str()));
    }

    /// Whether the children of `node` are shown. A leaf never shows children,
    /// whatever its flag says.
    pub fn shows_children(&self, node: &OrgNode) -> bool {
        node.has_children() && self.is_expanded(node.sid().as_str())
    }

    pub fn indicator(&self, node: &OrgNode) -> ExpandIndicator {
        if !node.has_children() {
            ExpandIndicator::Leaf
        } else if self.is_expanded(node.sid().as_str()) {
            ExpandIndicator::Expanded
        } else {
            ExpandIndicator::Collapsed
        }
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sid> {
        self.expanded.iter()
    }
}

// =============================================================================
// TESTS
// =============================================================================
