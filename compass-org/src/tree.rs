//! Hierarchy builder: flat employee list to a forest under a root manager.

use compass_core::{Employee, Sid};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// One employee in the org chart plus their direct reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgNode {
    pub employee: Employee,
    pub children: Vec<OrgNode>,
}

impl OrgNode {
    pub fn leaf(employee: Employee) -> Self {
        Self {
            employee,
            children: Vec::new(),
        }
    }

    pub fn sid(&self) -> &Sid {
        &self.employee.sid
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Generic tree fold.
    ///
    /// Applies `f` bottom-up: each node receives the already-folded results
    /// of its children, in children order.
    pub fn fold<'a, B, F>(&'a self, f: &F) -> B
    where
        F: Fn(&'a OrgNode, Vec<B>) -> B,
    {
        self.fold_with_depth(0, &|node: &'a OrgNode, _depth: usize, children: Vec<B>| {
            f(node, children)
        })
    }

    /// Like [`OrgNode::fold`], but passes the depth of each node.
    pub fn fold_with_depth<'a, B, F>(&'a self, depth: usize, f: &F) -> B
    where
        F: Fn(&'a OrgNode, usize, Vec<B>) -> B,
    {
        let children = fold_nodes(&self.children, depth + 1, f);
        f(self, depth, children)
    }

    /// Number of people below this node (direct and indirect).
    pub fn descendant_count(&self) -> usize {
        self.fold(&|_, counts: Vec<usize>| counts.iter().map(|c| c + 1).sum())
    }
}

/// The org chart under one root manager. The root manager is the context,
/// not a node: the forest's roots are the manager's direct reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forest {
    pub roots: Vec<OrgNode>,
}

impl Forest {
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes, nested included.
    pub fn len(&self) -> usize {
        self.roots.iter().map(|r| r.descendant_count() + 1).sum()
    }

    /// Pre-order traversal in children order.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder {
            stack: self.roots.iter().rev().collect(),
        }
    }

    pub fn find(&self, sid: &str) -> Option<&OrgNode> {
        self.iter().find(|node| node.sid().as_str() == sid)
    }

    pub fn contains(&self, sid: &str) -> bool {
        self.find(sid).is_some()
    }

    /// Sids from the forest root down to `sid`, both ends included.
    pub fn path_to(&self, sid: &str) -> Option<Vec<Sid>> {
        let mut stack: Vec<(&OrgNode, usize)> =
            self.roots.iter().rev().map(|node| (node, 0)).collect();
        let mut path = Vec::new();
        while let Some((node, depth)) = stack.pop() {
            path.truncate(depth);
            path.push(node.sid().clone());
            if node.sid().as_str() == sid {
                return Some(path);
            }
            stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
        }
        None
    }

    /// Depth of `sid` (roots are depth 0).
    pub fn depth_of(&self, sid: &str) -> Option<usize> {
        self.path_to(sid).map(|path| path.len() - 1)
    }

    /// Deepest level present, `None` for an empty forest.
    pub fn max_depth(&self) -> Option<usize> {
        fold_nodes(&self.roots, 0, &|_, depth, children: Vec<usize>| {
            children.into_iter().max().unwrap_or(depth)
        })
        .into_iter()
        .max()
    }
}

/// Siblings being folded at one level, with the results collected so far.
struct FoldFrame<'a, B> {
    siblings: &'a [OrgNode],
    depth: usize,
    results: Vec<B>,
}

impl<'a, B> FoldFrame<'a, B> {
    fn new(siblings: &'a [OrgNode], depth: usize) -> Self {
        Self {
            siblings,
            depth,
            results: Vec::with_capacity(siblings.len()),
        }
    }
}

/// Fold every node in `nodes` bottom-up with an explicit stack, so chart
/// depth is bounded by memory rather than by the thread stack.
fn fold_nodes<'a, B, F>(nodes: &'a [OrgNode], depth: usize, f: &F) -> Vec<B>
where
    F: Fn(&'a OrgNode, usize, Vec<B>) -> B,
{
    let mut frames = vec![FoldFrame::new(nodes, depth)];
    while let Some(frame) = frames.pop() {
        let siblings = frame.siblings;
        if let Some(next) = siblings.get(frame.results.len()) {
            let below = FoldFrame::new(&next.children, frame.depth + 1);
            frames.push(frame);
            frames.push(below);
            continue;
        }
        match frames.last_mut() {
            Some(parent) => {
                let siblings = parent.siblings;
                let node = &siblings[parent.results.len()];
                parent.results.push(f(node, parent.depth, frame.results));
            }
            None => return frame.results,
        }
    }
    Vec::new()
}

impl Drop for Forest {
    // The derived drop would recurse once per level.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.roots);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Pre-order iterator over a [`Forest`].
pub struct PreOrder<'a> {
    stack: Vec<&'a OrgNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a OrgNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Index-level linkage of a flat list against a root sid.
///
/// Shared by [`build_tree`] and the hierarchy analysis so both agree on
/// which employee hangs where.
#[derive(Debug)]
pub(crate) struct Linkage<'a> {
    /// Index of the first record for each sid.
    pub index_of: HashMap<&'a str, usize>,
    /// Direct reports of the root, input order.
    pub roots: Vec<usize>,
    /// Children per record index, input order.
    pub children: Vec<Vec<usize>>,
    /// Records whose manager is missing or outside the list.
    pub orphans: Vec<usize>,
    /// Records repeating an earlier sid.
    pub duplicates: Vec<usize>,
}

impl<'a> Linkage<'a> {
    pub fn resolve(employees: &'a [Employee], root: &Sid) -> Self {
        let mut index_of: HashMap<&'a str, usize> = HashMap::with_capacity(employees.len());
        let mut duplicates = Vec::new();
        for (index, employee) in employees.iter().enumerate() {
            match index_of.entry(employee.sid.as_str()) {
                Entry::Vacant(slot) => {
                    slot.insert(index);
                }
                Entry::Occupied(_) => duplicates.push(index),
            }
        }

        let mut roots = Vec::new();
        let mut children = vec![Vec::new(); employees.len()];
        let mut orphans = Vec::new();
        for (index, employee) in employees.iter().enumerate() {
            // Duplicates and the root manager's own record are never placed.
            if index_of.get(employee.sid.as_str()) != Some(&index) || employee.sid == *root {
                continue;
            }
            match &employee.line_manager_sid {
                Some(manager) if manager == root => roots.push(index),
                Some(manager) => match index_of.get(manager.as_str()) {
                    Some(&parent) => children[parent].push(index),
                    None => orphans.push(index),
                },
                None => orphans.push(index),
            }
        }

        Self {
            index_of,
            roots,
            children,
            orphans,
            duplicates,
        }
    }

    /// Manager index of a record, ignoring links to the root sid.
    pub fn parent_of(&self, employees: &[Employee], index: usize, root: &Sid) -> Option<usize> {
        let manager = employees[index].line_manager_sid.as_ref()?;
        if manager == root {
            return None;
        }
        self.index_of.get(manager.as_str()).copied()
    }

    /// Whether `index` is the first record carrying its sid.
    pub fn is_first(&self, employees: &[Employee], index: usize) -> bool {
        self.index_of.get(employees[index].sid.as_str()) == Some(&index)
    }

    /// Materialize the forest by walking down from the roots.
    ///
    /// Every record has at most one parent, so a manager cycle can never be
    /// reached from a root and is simply left out. Nodes are assembled
    /// bottom-up in reverse pre-order, without recursion.
    pub fn materialize(&self, employees: &[Employee]) -> Forest {
        let mut order = Vec::new();
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();
        while let Some(index) = stack.pop() {
            order.push(index);
            stack.extend(self.children[index].iter().rev().copied());
        }

        let mut built: Vec<Option<OrgNode>> = vec![None; employees.len()];
        for &index in order.iter().rev() {
            let children = self.children[index]
                .iter()
                .filter_map(|&child| built[child].take())
                .collect();
            built[index] = Some(OrgNode {
                employee: employees[index].clone(),
                children,
            });
        }

        Forest {
            roots: self
                .roots
                .iter()
                .filter_map(|&index| built[index].take())
                .collect(),
        }
    }
}

/// Build the org chart under `root` from a flat employee list.
///
/// Employees reporting to `root` become the forest roots; everyone else is
/// attached to their manager when the manager is in the list, and left out
/// otherwise. Children keep input order. The first record wins when a sid
/// repeats. Use [`analyze_hierarchy`](crate::analyze_hierarchy) to find out
/// who was left out and why.
pub fn build_tree(employees: &[Employee], root: &Sid) -> Forest {
    let forest = Linkage::resolve(employees, root).materialize(employees);
    tracing::debug!(
        root = %root,
        input = employees.len(),
        roots = forest.roots.len(),
        "Built org forest"
    );
    forest
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

    fn emp(id: &str, manager: Option<&str>) -> Employee {
        let employee = Employee::new(sid(id), id, "");
        match manager {
            Some(m) => employee.with_manager(sid(m)),
            None => employee,
        }
    }

    fn sids(nodes: &[OrgNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.sid().as_str()).collect()
    }

    #[test]
    fn test_canonical_example() {
        let list = vec![
            emp("A", None),
            emp("B", Some("A")),
            emp("C", Some("B")),
            emp("D", Some("X")),
        ];
        let forest = build_tree(&list, &sid("A"));
        assert_eq!(sids(&forest.roots), vec!["B"]);
        assert_eq!(sids(&forest.roots[0].children), vec!["C"]);
        assert!(forest.roots[0].children[0].children.is_empty());
        assert!(!forest.contains("A"));
        assert!(!forest.contains("D"));
        assert_eq!(forest.len(), 2);
    }

    #[test]
    fn test_empty_list_gives_empty_forest() {
        let forest = build_tree(&[], &sid("A"));
        assert!(forest.is_empty());
        assert_eq!(forest.len(), 0);
        assert_eq!(forest.max_depth(), None);
    }

    #[test]
    fn test_children_follow_input_order() {
        let list = vec![
            emp("M", Some("R")),
            emp("Z", Some("M")),
            emp("A", Some("M")),
            emp("K", Some("M")),
        ];
        let forest = build_tree(&list, &sid("R"));
        assert_eq!(sids(&forest.roots[0].children), vec!["Z", "A", "K"]);
    }

    #[test]
    fn test_child_listed_before_manager_still_attached() {
        let list = vec![emp("C", Some("B")), emp("B", Some("A"))];
        let forest = build_tree(&list, &sid("A"));
        assert_eq!(sids(&forest.roots), vec!["B"]);
        assert_eq!(sids(&forest.roots[0].children), vec!["C"]);
    }

    #[test]
    fn test_cycle_is_left_out_and_terminates() {
        let list = vec![
            emp("B", Some("A")),
            emp("P", Some("Q")),
            emp("Q", Some("P")),
            emp("S", Some("S")),
        ];
        let forest = build_tree(&list, &sid("A"));
        assert_eq!(sids(&forest.roots), vec!["B"]);
        assert_eq!(forest.len(), 1);
    }

    #[test]
    fn test_duplicate_sid_first_wins() {
        let mut second = emp("B", Some("A"));
        second.first_name = "Second".to_string();
        let list = vec![emp("B", Some("A")), second];
        let forest = build_tree(&list, &sid("A"));
        assert_eq!(forest.len(), 1);
        assert_eq!(forest.roots[0].employee.first_name, "B");
    }

    #[test]
    fn test_preorder_iter_and_depths() {
        let list = vec![
            emp("B", Some("A")),
            emp("C", Some("B")),
            emp("D", Some("A")),
            emp("E", Some("C")),
        ];
        let forest = build_tree(&list, &sid("A"));
        let order: Vec<&str> = forest.iter().map(|n| n.sid().as_str()).collect();
        assert_eq!(order, vec!["B", "C", "E", "D"]);
        assert_eq!(forest.depth_of("E"), Some(2));
        assert_eq!(forest.depth_of("D"), Some(0));
        assert_eq!(forest.depth_of("nobody"), None);
        assert_eq!(forest.max_depth(), Some(2));
        assert_eq!(
            forest.path_to("E").unwrap(),
            vec![sid("B"), sid("C"), sid("E")]
        );
    }

    #[test]
    fn test_root_record_never_becomes_a_node() {
        // A reports to B while B reports to A: A is still only the context.
        let list = vec![emp("A", Some("B")), emp("B", Some("A"))];
        let forest = build_tree(&list, &sid("A"));
        assert_eq!(sids(&forest.roots), vec!["B"]);
        assert!(forest.roots[0].children.is_empty());
    }

    #[test]
    fn test_very_deep_chain_does_not_overflow() {
        let depth = 100_000;
        let list: Vec<Employee> = (0..depth)
            .map(|i| {
                let manager = if i == 0 { "ROOT".to_string() } else { format!("E{}", i - 1) };
                emp(&format!("E{i}"), Some(&manager))
            })
            .collect();
        let forest = build_tree(&list, &sid("ROOT"));
        let last = format!("E{}", depth - 1);

        assert_eq!(forest.max_depth(), Some(depth - 1));
        assert_eq!(forest.depth_of(&last), Some(depth - 1));
        assert_eq!(forest.roots[0].descendant_count(), depth - 1);
        assert_eq!(forest.path_to(&last).map(|path| path.len()), Some(depth));
        assert_eq!(forest.iter().count(), depth);
    }

    #[test]
    fn test_fold_with_depth_sees_every_level() {
        let list = vec![
            emp("B", Some("A")),
            emp("C", Some("B")),
            emp("D", Some("B")),
            emp("E", Some("D")),
        ];
        let forest = build_tree(&list, &sid("A"));
        let labels = forest.roots[0].fold_with_depth(0, &|node, depth, children: Vec<String>| {
            let mut out = format!("{}{}", node.sid(), depth);
            for child in children {
                out.push_str(&child);
            }
            out
        });
        assert_eq!(labels, "B0C1D1E2");
    }

    #[test]
    fn test_descendant_count() {
        let list = vec![
            emp("B", Some("A")),
            emp("C", Some("B")),
            emp("D", Some("B")),
            emp("E", Some("D")),
        ];
        let forest = build_tree(&list, &sid("A"));
        assert_eq!(forest.roots[0].descendant_count(), 3);
        assert_eq!(forest.find("D").unwrap().descendant_count(), 1);
    }
}
