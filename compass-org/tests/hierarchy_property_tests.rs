use compass_org::{
    analyze_hierarchy, build_tree, load_hierarchy, render_walk, EmployeeFilter, ExpansionState,
    LoadOutcome, LoadState, TeamLoader,
};
use compass_test_utils::generators::{arb_messy_list, arb_org, org_sid};
use compass_test_utils::{
    assertions, fixtures, sid, DirectoryError, Employee, EmployeeDirectory, MockDirectory,
};
use proptest::prelude::*;
use std::borrow::Cow;
use std::time::Duration;

#[test]
fn canonical_example_builds_expected_forest() {
    let list = fixtures::canonical_list();
    let forest = build_tree(&list, &sid("A"));
    assertions::assert_roots(&forest, &["B"]);
    let b = &forest.roots[0];
    let children: Vec<&str> = b.children.iter().map(|n| n.sid().as_str()).collect();
    assert_eq!(children, vec!["C"]);
    assert!(!forest.contains("D"));
    assert!(!forest.contains("A"));
}

#[test]
fn filtering_canonical_by_c_disconnects() {
    let list = fixtures::canonical_list();
    // "chen" only matches C; B (C's manager) is filtered away.
    let filtered = EmployeeFilter::new().with_search("Chen").apply(&list);
    let sids: Vec<&str> = filtered.iter().map(|e| e.sid.as_str()).collect();
    assert_eq!(sids, vec!["C"]);
    assert!(build_tree(&filtered, &sid("A")).is_empty());
}

#[test]
fn department_walk_after_expand_all() {
    let list = fixtures::department();
    let forest = build_tree(&list, &sid("CEO1"));
    let mut expansion = ExpansionState::new();
    expansion.expand_all(&forest);
    let rows = render_walk(&forest, &expansion);
    let order: Vec<&str> = rows.iter().map(|r| r.sid.as_str()).collect();
    assert_eq!(order, vec!["M001", "M002", "E101", "E102", "M003", "E201"]);
    assert_eq!(rows[3].prefix(), "   │  └─ ");
}

#[tokio::test]
async fn load_hierarchy_applies_filter_before_build() {
    let directory = MockDirectory::new(fixtures::department());
    let filter = EmployeeFilter::new().with_division("Operations");
    let report = load_hierarchy(&directory, &sid("M001"), &filter).await.unwrap();
    // M003 is Finance, so E201 below it is cut off too.
    assertions::assert_roots(&report.forest, &["M002"]);
    assert_eq!(report.forest.len(), 3);
}

#[tokio::test]
async fn load_hierarchy_propagates_directory_errors() {
    let directory = MockDirectory::new(vec![]).failing(DirectoryError::Rejected {
        status: 403,
        message: "forbidden".to_string(),
    });
    let result = load_hierarchy(&directory, &sid("A"), &EmployeeFilter::new()).await;
    assert!(matches!(result, Err(DirectoryError::Rejected { status: 403, .. })));
}

#[tokio::test]
async fn out_of_order_responses_keep_latest_root() {
    let directory = MockDirectory::new(fixtures::department())
        .with_delay_for(sid("M002"), Duration::from_millis(50));
    let mut loader: TeamLoader<Vec<Employee>> = TeamLoader::new();

    let slow = loader.begin(sid("M002"));
    let fast = loader.begin(sid("M003"));

    let (slow_result, fast_result) = tokio::join!(
        directory.team(slow.root()),
        directory.team(fast.root()),
    );

    // The fast response lands first, then the slow one for the old root.
    assert_eq!(loader.complete(&fast, fast_result), LoadOutcome::Applied);
    assert_eq!(loader.complete(&slow, slow_result), LoadOutcome::Stale);

    assert_eq!(loader.loaded_root(), Some(&sid("M003")));
    match loader.state() {
        LoadState::Loaded(team) => {
            let sids: Vec<&str> = team.iter().map(|e| e.sid.as_str()).collect();
            assert_eq!(sids, vec!["E201"]);
        }
        other => panic!("expected loaded state, got {other:?}"),
    }
}

proptest! {
    #[test]
    fn every_direct_report_is_a_root_once((root, employees) in arb_org(40)) {
        let forest = build_tree(&employees, &root);
        let direct: Vec<&str> = employees
            .iter()
            .filter(|e| e.reports_to(&root))
            .map(|e| e.sid.as_str())
            .collect();
        let roots: Vec<&str> = forest.roots.iter().map(|n| n.sid().as_str()).collect();
        prop_assert_eq!(roots, direct);
    }

    #[test]
    fn every_resolvable_employee_sits_under_their_manager((root, employees) in arb_org(40)) {
        let forest = build_tree(&employees, &root);
        prop_assert_eq!(forest.len(), employees.len());
        assertions::assert_unique_nodes(&forest);
        assertions::assert_links_consistent(&forest, &root);
    }

    #[test]
    fn build_is_deterministic(list in arb_messy_list(24)) {
        let root = sid("P0");
        prop_assert_eq!(build_tree(&list, &root), build_tree(&list, &root));
    }

    #[test]
    fn messy_lists_terminate_and_stay_consistent(list in arb_messy_list(24)) {
        let root = sid("P0");
        let report = analyze_hierarchy(&list, &root);
        assertions::assert_unique_nodes(&report.forest);
        assertions::assert_links_consistent(&report.forest, &root);

        // Every distinct non-root sid is either placed or detached.
        let mut distinct: Vec<&str> = list
            .iter()
            .map(|e| e.sid.as_str())
            .filter(|s| *s != "P0")
            .collect();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(report.forest.len() + report.detached.len(), distinct.len());

        for cycle in &report.cycles {
            for member in cycle {
                prop_assert!(!report.forest.contains(member.as_str()));
            }
        }
        if let Some(chain) = &report.root_cycle {
            prop_assert_eq!(chain[0].as_str(), "P0");
            for member in &chain[1..] {
                prop_assert!(report.forest.contains(member.as_str()));
            }
        }
    }

    #[test]
    fn analysis_is_deterministic(list in arb_messy_list(24)) {
        let root = sid("P0");
        prop_assert_eq!(analyze_hierarchy(&list, &root), analyze_hierarchy(&list, &root));
    }

    #[test]
    fn expand_all_then_collapse_all_is_empty((root, employees) in arb_org(30)) {
        let forest = build_tree(&employees, &root);
        let mut expansion = ExpansionState::new();
        expansion.expand_all(&forest);
        prop_assert_eq!(expansion.len(), forest.len());
        expansion.collapse_all();
        prop_assert!(expansion.is_empty());
    }

    #[test]
    fn double_toggle_is_noop(
        (root, employees) in arb_org(20),
        picks in prop::collection::vec(0usize..20, 0..6),
    ) {
        let forest = build_tree(&employees, &root);
        let mut expansion = ExpansionState::new();
        for &i in &picks {
            expansion.toggle(&org_sid(i));
        }
        let before = expansion.clone();
        let target = org_sid(picks.first().copied().unwrap_or(0));
        expansion.toggle(&target);
        expansion.toggle(&target);
        prop_assert_eq!(&expansion, &before);
        // Rows only depend on expansion state.
        prop_assert_eq!(render_walk(&forest, &expansion), render_walk(&forest, &before));
    }

    #[test]
    fn blank_filter_returns_input((_, employees) in arb_org(30), pad in " {0,4}") {
        let filtered = EmployeeFilter::new().with_search(pad).apply(&employees);
        prop_assert!(matches!(filtered, Cow::Borrowed(_)));
        prop_assert_eq!(filtered.as_ref(), employees.as_slice());
    }

    #[test]
    fn unmatched_filter_yields_empty_tree((root, employees) in arb_org(30)) {
        let filtered = EmployeeFilter::new().with_search("#no-such-person#").apply(&employees);
        prop_assert!(filtered.is_empty());
        prop_assert!(build_tree(&filtered, &root).is_empty());
    }

    #[test]
    fn fully_expanded_walk_visits_every_node((root, employees) in arb_org(30)) {
        let forest = build_tree(&employees, &root);
        let mut expansion = ExpansionState::new();
        expansion.expand_all(&forest);
        let rows = render_walk(&forest, &expansion);
        prop_assert_eq!(rows.len(), forest.len());
        for row in &rows {
            prop_assert_eq!(row.ancestors_last.len(), row.depth);
            prop_assert_eq!(Some(row.depth), forest.depth_of(row.sid.as_str()));
        }
    }
}
