//! Benchmarks for the farm parser
//!
//! Measures performance of:
//! - Parsing synthetic farms (rooms, links, moves)
//! - Fitting room coordinates into the viewport

use colony_graph::{parse, Point, Viewport};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::fmt::Write;

/// A chain of `rooms` rooms with `ants` ants walking it end to end.
fn synthetic_farm(rooms: usize, ants: usize) -> String {
    let mut out = String::new();
    writeln!(out, "{ants}").unwrap();
    writeln!(out, "##start").unwrap();
    for i in 0..rooms {
        if i == rooms - 1 {
            writeln!(out, "##end").unwrap();
        }
        writeln!(out, "r{i} {} {}", i * 3, (i * 7) % 50).unwrap();
    }
    for i in 1..rooms {
        writeln!(out, "r{}-r{i}", i - 1).unwrap();
    }

    // Ant k enters the chain on turn k and advances one room per turn.
    for turn in 0..(rooms + ants - 1) {
        let mut line = Vec::new();
        for ant in 0..ants {
            if turn >= ant && turn - ant + 1 < rooms {
                line.push(format!("L{}-r{}", ant + 1, turn - ant + 1));
            }
        }
        if !line.is_empty() {
            writeln!(out, "{}", line.join(" ")).unwrap();
        }
    }
    out
}

/// Benchmark end-to-end parsing
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for &(rooms, ants) in &[(10usize, 5usize), (100, 20), (1000, 100)] {
        let input = synthetic_farm(rooms, ants);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("rooms", rooms),
            &input,
            |b, text| b.iter(|| parse(black_box(text)).unwrap()),
        );
    }
    group.finish();
}

/// Benchmark viewport fitting
fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit");
    let viewport = Viewport::default();

    for &count in &[10usize, 1000, 100_000] {
        let raw: Vec<Point> = (0..count as i64)
            .map(|i| Point::new(i * 13 % 997, i * 31 % 499))
            .collect();
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &raw, |b, pts| {
            b.iter(|| viewport.fit(black_box(pts)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_fit);
criterion_main!(benches);
