//! Benchmark tests for hashing and the duplicate scan

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dupe_sweeper::dedup::{DedupOptions, DedupScanner};
use dupe_sweeper::scanner::hash_file;
use std::fs::{self, File};
use std::io::Write;
use tempfile::TempDir;

/// Create a benchmark directory where every `dup_every`-th file repeats the
/// content of the first one.
fn create_benchmark_dir(file_count: usize, dir_count: usize, dup_every: usize) -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    let files_per_dir = file_count / dir_count.max(1);

    for d in 0..dir_count {
        let subdir = root.join(format!("dir{}", d));
        fs::create_dir(&subdir).unwrap();

        for f in 0..files_per_dir {
            let n = d * files_per_dir + f;
            let mut file = File::create(subdir.join(format!("file{}.txt", f))).unwrap();
            if n % dup_every == 0 {
                file.write_all(&vec![b'x'; 1024]).unwrap();
            } else {
                file.write_all(format!("unique {}", n).as_bytes()).unwrap();
            }
        }
    }

    dir
}

fn benchmark_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash_file");

    let dir = TempDir::new().unwrap();
    for size in [4 * 1024, 256 * 1024, 4 * 1024 * 1024].iter() {
        let path = dir.path().join(format!("blob{}", size));
        fs::write(&path, vec![b'h'; *size]).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| hash_file(black_box(&path)))
        });
    }

    group.finish();
}

fn benchmark_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("dedup_scan");

    for size in [100, 500, 1000].iter() {
        let dir = create_benchmark_dir(*size, 10, 5);
        let scanner = DedupScanner::new(DedupOptions::default());

        group.bench_with_input(BenchmarkId::new("collect_batches", size), size, |b, _| {
            b.iter(|| {
                let mut batches = 0;
                scanner
                    .scan(black_box(dir.path()), |_| {
                        batches += 1;
                        Ok(())
                    })
                    .map(|_| batches)
            })
        });
    }

    group.finish();
}

fn benchmark_size_floor(c: &mut Criterion) {
    let mut group = c.benchmark_group("size_floor");

    let dir = create_benchmark_dir(500, 5, 3);

    let hash_all = DedupScanner::new(DedupOptions::default());
    let skip_small = DedupScanner::new(DedupOptions {
        min_size: 1024,
        ..Default::default()
    });

    group.bench_function("no_floor", |b| {
        b.iter(|| hash_all.scan(black_box(dir.path()), |_| Ok(())))
    });

    group.bench_function("one_kb_floor", |b| {
        b.iter(|| skip_small.scan(black_box(dir.path()), |_| Ok(())))
    });

    group.finish();
}

criterion_group!(benches, benchmark_hash, benchmark_scan, benchmark_size_floor);
criterion_main!(benches);
