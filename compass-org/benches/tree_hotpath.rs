use compass_core::{Employee, Sid};
use compass_org::{build_tree, render_walk, EmployeeFilter, ExpansionState};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn sid(raw: &str) -> Sid {
    Sid::new(raw).expect("bench sid")
}

/// A wide, moderately deep org: each manager has `span` reports.
fn bench_org(size: usize, span: usize) -> Vec<Employee> {
    (0..size)
        .map(|i| {
            let manager = if i < span {
                sid("ROOT")
            } else {
                sid(&format!("E{:05}", i / span - 1))
            };
            Employee::new(sid(&format!("E{i:05}")), format!("First{i}"), format!("Last{i}"))
                .with_job("J-01", "Analyst")
                .with_division(if i % 3 == 0 { "Finance" } else { "Operations" })
                .with_manager(manager)
        })
        .collect()
}

fn bench_build_tree(c: &mut Criterion) {
    let employees = bench_org(5_000, 6);
    let root = sid("ROOT");

    c.bench_function("org/build_tree_5k", |b| {
        b.iter(|| {
            let forest = build_tree(black_box(&employees), &root);
            black_box(forest.roots.len());
        });
    });

    c.bench_function("org/filter_then_build_5k", |b| {
        let filter = EmployeeFilter::new().with_search("first4");
        b.iter(|| {
            let filtered = filter.apply(black_box(&employees));
            black_box(build_tree(&filtered, &root).len());
        });
    });

    let forest = build_tree(&employees, &root);
    let mut expansion = ExpansionState::new();
    expansion.expand_all(&forest);
    c.bench_function("org/render_walk_expanded_5k", |b| {
        b.iter(|| black_box(render_walk(black_box(&forest), &expansion).len()));
    });
}

criterion_group!(benches, bench_build_tree);
criterion_main!(benches);
