//! # Index Benchmarks
//!
//! Run with: `cargo bench -p civic-core`

use chrono::{Duration, TimeZone, Utc};
use civic_core::{
    AvlTree, Category, CreationIndex, EdgeKind, Graph, HashTable, Issue, IssueId, LocationMap,
    StatusIndex, oldest_open, open_issues_mst,
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const PLACES: [&str; 6] = ["CBD", "Hatfield", "Menlyn", "Arcadia", "Lynnwood", "Garsfontein"];

fn make_issues(count: usize) -> Vec<Issue> {
    let base = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("date");
    (0..count)
        .map(|i| {
            // a small stride keeps some timestamps colliding
            let at = base + Duration::minutes(((i * 7919) % (count / 2 + 1)) as i64);
            Issue::new(Category::ALL[i % Category::ALL.len()], PLACES[i % PLACES.len()], "", at)
                .with_id(IssueId::from_u128(i as u128))
        })
        .collect()
}

/// Grid graph `side x side` with unit weights.
fn grid_graph(side: usize) -> Graph<usize> {
    let mut graph = Graph::new();
    for row in 0..side {
        for col in 0..side {
            let v = row * side + col;
            if col + 1 < side {
                graph.add_edge(v, v + 1, 1.0, EdgeKind::Undirected).expect("edge");
            }
            if row + 1 < side {
                graph.add_edge(v, v + side, 1.5, EdgeKind::Undirected).expect("edge");
            }
        }
    }
    graph
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_hash_table_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash_table_insert");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut table = HashTable::new();
                for i in 0..size {
                    table.insert(i, i);
                }
                black_box(table)
            });
        });
    }

    group.finish();
}

fn bench_avl_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("avl_insert");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut tree = AvlTree::new();
                for i in 0..size {
                    tree.add_or_update(i, i, |_, new| new);
                }
                black_box(tree)
            });
        });
    }

    group.finish();
}

fn bench_creation_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("creation_index_rebuild");

    for size in [100, 1000, 5000].iter() {
        let issues = make_issues(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &issues, |b, issues| {
            b.iter(|| {
                let mut index = CreationIndex::new();
                index.rebuild(issues);
                black_box(index.earliest(10))
            });
        });
    }

    group.finish();
}

fn bench_oldest_open(c: &mut Criterion) {
    let mut group = c.benchmark_group("oldest_open");

    for size in [100, 1000, 5000].iter() {
        let issues = make_issues(*size);
        let statuses = StatusIndex::new();
        group.bench_with_input(BenchmarkId::from_parameter(size), &issues, |b, issues| {
            b.iter(|| black_box(oldest_open(issues, &statuses, 5, true)));
        });
    }

    group.finish();
}

fn bench_bfs(c: &mut Criterion) {
    let mut group = c.benchmark_group("bfs_path");

    for side in [10, 30, 60].iter() {
        let graph = grid_graph(*side);
        let target = side * side - 1;
        group.bench_with_input(BenchmarkId::from_parameter(side), &target, |b, target| {
            b.iter(|| black_box(graph.bfs_path(&0, target)));
        });
    }

    group.finish();
}

fn bench_prim(c: &mut Criterion) {
    let mut group = c.benchmark_group("prim_mst");

    for side in [10, 30, 60].iter() {
        let graph = grid_graph(*side);
        group.bench_with_input(BenchmarkId::from_parameter(side), side, |b, _| {
            b.iter(|| black_box(graph.prim_mst(&0)));
        });
    }

    group.finish();
}

fn bench_open_issues_mst(c: &mut Criterion) {
    let mut group = c.benchmark_group("open_issues_mst");
    let locations = LocationMap::new();

    for size in [10, 50, 150].iter() {
        let issues = make_issues(*size);
        let statuses = StatusIndex::new();
        group.bench_with_input(BenchmarkId::from_parameter(size), &issues, |b, issues| {
            b.iter(|| black_box(open_issues_mst(issues, &statuses, &locations)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_hash_table_insert,
    bench_avl_insert,
    bench_creation_index,
    bench_oldest_open,
    bench_bfs,
    bench_prim,
    bench_open_issues_mst,
);
criterion_main!(benches);
