//! Criterion benchmarks for timestamp parsing and SLDB lookups.
//!
//! Run: cargo bench --bench hvsc_parse

use std::fmt::Write as _;
use std::fs;
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use hvsc_core::{Md5Digest, SongLengths, parse_timestamp};
use tempfile::TempDir;

fn build_sldb(entries: u32) -> (TempDir, Md5Digest) {
    let tmp = TempDir::new().unwrap();
    let mut text = String::from("[Database]\n");
    let mut last = Md5Digest::of_bytes(b"");
    for n in 0..entries {
        last = Md5Digest::of_bytes(&n.to_le_bytes());
        writeln!(text, "; /MUSICIANS/X/Composer_{n:05}/Tune_{n}.sid").unwrap();
        writeln!(text, "{last}=3:{:02} 0:45.5 1:02(G)", n % 60).unwrap();
    }
    fs::write(tmp.path().join("Songlengths.md5"), text).unwrap();
    (tmp, last)
}

fn bench_timestamps(c: &mut Criterion) {
    c.bench_function("parse_timestamp", |b| {
        b.iter(|| {
            parse_timestamp(black_box("12:34.567")).unwrap();
            parse_timestamp(black_box("0:05")).unwrap();
        });
    });
}

fn bench_sldb_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("sldb_find_last");
    for entries in [1_000u32, 10_000] {
        let (tmp, last) = build_sldb(entries);
        let sldb = tmp.path().join("Songlengths.md5");
        group.bench_with_input(BenchmarkId::from_parameter(entries), &entries, |b, _| {
            b.iter(|| SongLengths::find_by_digest(black_box(&sldb), &last).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_timestamps, bench_sldb_scan);
criterion_main!(benches);
