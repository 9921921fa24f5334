//! Flatten the visible part of a forest into display rows.

use crate::expansion::{ExpandIndicator, ExpansionState};
use crate::tree::{Forest, OrgNode};
use compass_core::{EmploymentStatus, Sid};

/// One visible line of the org chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRow {
    pub sid: Sid,
    pub label: String,
    pub status: EmploymentStatus,
    /// Roots are depth 0.
    pub depth: usize,
    pub is_last_sibling: bool,
    /// `is_last_sibling` of each ancestor, outermost first.
    pub ancestors_last: Vec<bool>,
    pub has_children: bool,
    pub indicator: ExpandIndicator,
}

impl RenderRow {
    /// Connector glyphs drawn before the indicator: a guide per ancestor
    /// level, then the row's own branch.
    pub fn prefix(&self) -> String {
        let mut prefix = String::with_capacity((self.depth + 1) * 8);
        for last in &self.ancestors_last {
            prefix.push_str(if *last { "   " } else { "│  " });
        }
        prefix.push_str(if self.is_last_sibling { "└─ " } else { "├─ " });
        prefix
    }
}

/// Pre-order walk in children order, descending only into nodes whose
/// children are shown.
pub fn render_walk(forest: &Forest, expansion: &ExpansionState) -> Vec<RenderRow> {
    let mut rows = Vec::new();
    let mut ancestors_last: Vec<bool> = Vec::new();
    let mut stack: Vec<(&OrgNode, bool, usize)> = siblings(&forest.roots, 0).collect();

    while let Some((node, is_last, depth)) = stack.pop() {
        ancestors_last.truncate(depth);
        rows.push(RenderRow {
            sid: node.sid().clone(),
            label: node.employee.label(),
            status: node.employee.employment_status,
            depth,
            is_last_sibling: is_last,
            ancestors_last: ancestors_last.clone(),
            has_children: node.has_children(),
            indicator: expansion.indicator(node),
        });

        if expansion.shows_children(node) {
            ancestors_last.push(is_last);
            stack.extend(siblings(&node.children, depth + 1));
        }
    }
    rows
}

/// Siblings in reverse, ready to be pushed on the walk stack.
fn siblings(nodes: &[OrgNode], depth: usize) -> impl Iterator<Item = (&OrgNode, bool, usize)> {
    let count = nodes.len();
    nodes
        .iter()
        .enumerate()
        .rev()
        .map(move |(i, node)| (node, i + 1 == count, depth))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_tree;
    use compass_core::Employee;

    fn sid(raw: &str) -> Sid {
        Sid::new(raw).unwrap()
    }

    fn forest() -> Forest {
        let list = vec![
            Employee::new(sid("B"), "Bea", "").with_manager(sid("A")),
            Employee::new(sid("C"), "Cal", "").with_manager(sid("B")),
            Employee::new(sid("D"), "Dot", "").with_manager(sid("B")),
            Employee::new(sid("F"), "Fay", "").with_manager(sid("C")),
            Employee::new(sid("E"), "Eli", "").with_manager(sid("A")),
        ];
        build_tree(&list, &sid("A"))
    }

    fn order(rows: &[RenderRow]) -> Vec<&str> {
        rows.iter().map(|r| r.sid.as_str()).collect()
    }

    #[test]
    fn test_collapsed_shows_roots_only() {
        let rows = render_walk(&forest(), &ExpansionState::new());
        assert_eq!(order(&rows), vec!["B", "E"]);
        assert_eq!(rows[0].indicator, ExpandIndicator::Collapsed);
        assert_eq!(rows[1].indicator, ExpandIndicator::Leaf);
        assert!(rows[1].is_last_sibling);
    }

    #[test]
    fn test_expanded_walk_is_preorder() {
        let forest = forest();
        let mut expansion = ExpansionState::new();
        expansion.expand_all(&forest);
        let rows = render_walk(&forest, &expansion);
        assert_eq!(order(&rows), vec!["B", "C", "F", "D", "E"]);
        let depths: Vec<usize> = rows.iter().map(|r| r.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 1, 0]);
    }

    #[test]
    fn test_partial_expansion() {
        let forest = forest();
        let mut expansion = ExpansionState::new();
        expansion.toggle(&sid("B"));
        let rows = render_walk(&forest, &expansion);
        assert_eq!(order(&rows), vec!["B", "C", "D", "E"]);
        assert_eq!(rows[1].indicator, ExpandIndicator::Collapsed);
    }

    #[test]
    fn test_prefix_connectors() {
        let forest = forest();
        let mut expansion = ExpansionState::new();
        expansion.expand_all(&forest);
        let rows = render_walk(&forest, &expansion);
        let prefixes: Vec<String> = rows.iter().map(RenderRow::prefix).collect();
        assert_eq!(
            prefixes,
            vec![
                "├─ ".to_string(),
                "│  ├─ ".to_string(),
                "│  │  └─ ".to_string(),
                "│  └─ ".to_string(),
                "└─ ".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_forest_renders_nothing() {
        assert!(render_walk(&Forest::default(), &ExpansionState::new()).is_empty());
    }
}
