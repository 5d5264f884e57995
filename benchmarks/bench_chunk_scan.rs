use std::hint::black_box;
use std::io::Cursor;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use logtally::generator::generate;
use logtally::{AnalysisRun, AnalyzerConfig, Chunk, ChunkSplitter, LineParser, MemorySink};

const LINES: usize = 100_000;
const SEED: u64 = 0x5EED;

fn bench_parse_chunk(c: &mut Criterion) {
    let text = generate(SEED, 10_000);
    let parser = LineParser::new().unwrap();
    let chunk = Chunk::new(0, 0, text.clone());

    let mut group = c.benchmark_group("parse_chunk");
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("10k_lines", |b| {
        b.iter(|| black_box(parser.parse_chunk(black_box(&chunk))));
    });
    group.finish();
}

fn bench_split(c: &mut Criterion) {
    let text = generate(SEED, LINES);

    let mut group = c.benchmark_group("split");
    group.throughput(Throughput::Bytes(text.len() as u64));
    for chunk_bytes in [4 << 10, 256 << 10, 4 << 20] {
        group.bench_with_input(
            BenchmarkId::from_parameter(chunk_bytes),
            &chunk_bytes,
            |b, &chunk_bytes| {
                b.iter(|| {
                    let splitter =
                        ChunkSplitter::new(Cursor::new(text.as_bytes()), chunk_bytes).unwrap();
                    black_box(splitter.map(|chunk| chunk.unwrap().text().len()).sum::<usize>())
                });
            },
        );
    }
    group.finish();
}

fn bench_full_run(c: &mut Criterion) {
    let text = generate(SEED, LINES);

    let mut group = c.benchmark_group("analyze");
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.sample_size(20);
    for workers in [1, 2, 4] {
        let config = AnalyzerConfig::default()
            .with_workers(workers)
            .with_chunk_bytes(256 << 10);
        let run = AnalysisRun::new(config).with_sink(Arc::new(MemorySink::new()));
        group.bench_with_input(BenchmarkId::new("workers", workers), &run, |b, run| {
            b.iter(|| black_box(run.run_reader(Cursor::new(text.as_bytes())).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse_chunk, bench_split, bench_full_run);
criterion_main!(benches);
