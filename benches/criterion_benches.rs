#[macro_use]
extern crate criterion;

extern crate sokosolve;

use criterion::{Benchmark, Criterion};

use sokosolve::config::{HeuristicKind, Method};
use sokosolve::{LoadLevel, Solve};

// allowing unused so i can bench just one or few
// and still notice other warnings if there are any
#[allow(unused)]
fn bench_two_boxes_astar(c: &mut Criterion) {
    bench_level(
        c,
        Method::AStar(HeuristicKind::Manhattan),
        "levels/custom/03-two-boxes.txt",
        100,
    );
}

#[allow(unused)]
fn bench_two_boxes_astar_improved(c: &mut Criterion) {
    bench_level(
        c,
        Method::AStar(HeuristicKind::ManhattanImproved),
        "levels/custom/03-two-boxes.txt",
        100,
    );
}

#[allow(unused)]
fn bench_two_boxes_greedy_deadlock(c: &mut Criterion) {
    bench_level(
        c,
        Method::Greedy(HeuristicKind::CombinedDeadlock),
        "levels/custom/03-two-boxes.txt",
        100,
    );
}

#[allow(unused)]
fn bench_two_boxes_bfs(c: &mut Criterion) {
    bench_level(c, Method::Bfs { prune: false }, "levels/custom/03-two-boxes.txt", 100);
}

#[allow(unused)]
fn bench_two_boxes_bfs_pruned(c: &mut Criterion) {
    bench_level(c, Method::Bfs { prune: true }, "levels/custom/03-two-boxes.txt", 100);
}

fn bench_level(c: &mut Criterion, method: Method, level_path: &str, samples: usize) {
    let level = level_path.load_level().unwrap();

    c.bench(
        &format!("{}", method),
        Benchmark::new(level_path, move |b| {
            b.iter(|| criterion::black_box(level.solve(criterion::black_box(method), &mut ())))
        })
        .sample_size(samples),
    );
}

criterion_group!(
    benches,
    bench_two_boxes_astar,
    bench_two_boxes_astar_improved,
    //bench_two_boxes_greedy_deadlock,
    //bench_two_boxes_bfs,
    //bench_two_boxes_bfs_pruned,
);
criterion_main!(benches);
