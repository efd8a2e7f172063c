//! Benchmarks for graph construction: id-indexed vs pairwise matching.
//!
//! Run with: cargo bench -p ontograph-graph

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ontograph_graph::GraphAdapter;
use ontograph_types::{Person, Work};

/// `persons` people and `works` works; each work has two creators, films
/// carry a cast of four and every third work relates to its predecessor.
fn build_dataset(persons: u32, works: u32) -> (Vec<Person>, Vec<Work>) {
    let people = (0..persons)
        .map(|id| Person::new(id, format!("Person {}", id)))
        .collect();
    let works = (0..works)
        .map(|id| {
            let creators = [id % persons, (id * 7 + 3) % persons];
            let work = match id % 3 {
                0 => Work::film(id, format!("Film {}", id))
                    .with_actors((0..4).map(|k| (id * 13 + k * 31) % persons)),
                1 => Work::book(id, format!("Book {}", id)),
                _ => Work::painting(id, format!("Painting {}", id)),
            };
            let work = work.with_creators(creators);
            if id % 3 == 0 && id > 0 {
                work.with_related([id - 1])
            } else {
                work
            }
        })
        .collect();
    (people, works)
}

fn bench_build_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_graph");
    let adapter = GraphAdapter::default();

    for size in [100u32, 500, 2_000] {
        let (persons, works) = build_dataset(size, size * 3 / 2);

        group.bench_with_input(BenchmarkId::new("indexed", size), &size, |b, _| {
            b.iter(|| black_box(adapter.build_graph(black_box(&persons), black_box(&works))))
        });

        group.bench_with_input(BenchmarkId::new("pairwise", size), &size, |b, _| {
            b.iter(|| {
                black_box(adapter.build_graph_pairwise(black_box(&persons), black_box(&works)))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build_graph);
criterion_main!(benches);
