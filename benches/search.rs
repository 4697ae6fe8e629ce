use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sable::chess::Position;
use sable::rules::Rules;
use sable::search::{Engine, Limits, MoveOrderer};
use std::hint::black_box;

const POSITIONS: &[(&str, &str)] = &[
    ("start", "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
    ("kiwipete", "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"),
    ("endgame", "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"),
];

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    for &(name, fen) in POSITIONS {
        let Ok(pos) = fen.parse::<Position>() else {
            continue;
        };

        group.bench_with_input(BenchmarkId::new(name, 4), &pos, |b, pos| {
            b.iter_batched_ref(
                || (Engine::new(), pos.clone()),
                |(engine, pos)| engine.find_best_move(pos, &Limits::depth(4)),
                criterion::BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

fn bench_ordering(c: &mut Criterion) {
    let mut group = c.benchmark_group("ordering");

    for &(name, fen) in POSITIONS {
        let Ok(pos) = fen.parse::<Position>() else {
            continue;
        };

        group.bench_with_input(BenchmarkId::from_parameter(name), &pos, |b, pos| {
            b.iter_batched_ref(
                || pos.moves(),
                |moves| MoveOrderer::order(black_box(pos), moves, None, [None, None]),
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_search, bench_ordering);
criterion_main!(benches);
