/// Performance benchmarks for the document store
///
/// Run with: cargo bench -p snote-tests

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use snote_api::{DocumentStore, IdScheme, MemoryStore, StoreConfig};
use snote_test_utils::{memory_store, share_batch, MockNoteGenerator};
use tempfile::TempDir;

fn bench_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("create");

    for size in [100, 1000, 10_000] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("memory", size), &size, |b, &size| {
            let docs = memory_store();
            let (title, content) = MockNoteGenerator::new().sized_note(size);
            b.iter(|| docs.create(black_box(&title), black_box(&content)).unwrap());
        });
    }

    group.bench_function("file", |b| {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::default().unlimited();
        let docs = DocumentStore::open_file(dir.path().join("store.json"), config).unwrap();
        let mut gen = MockNoteGenerator::new();
        b.iter(|| {
            let (title, content) = gen.next_note();
            docs.create(black_box(&title), black_box(&content)).unwrap()
        });
    });

    group.finish();
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");
    group.throughput(Throughput::Elements(1));

    group.bench_function("memory", |b| {
        let docs = memory_store();
        let ids = share_batch(&docs, 1000);
        let mut i = 0;
        b.iter(|| {
            let id = &ids[i % ids.len()];
            i += 1;
            docs.load(black_box(id)).unwrap()
        });
    });

    group.finish();
}

fn bench_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("list");

    for count in [100, 1000] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("documents", count), &count, |b, &count| {
            let docs = memory_store();
            share_batch(&docs, count);
            b.iter(|| black_box(docs.list().unwrap()));
        });
    }

    group.finish();
}

fn bench_id_schemes(c: &mut Criterion) {
    let mut group = c.benchmark_group("id_scheme");

    let schemes = [
        ("random", IdScheme::default()),
        ("random_suffix", IdScheme::Random { length: 12, timestamp_suffix: true }),
        ("encoded", IdScheme::Encoded { length: 32 }),
    ];

    for (name, scheme) in schemes {
        group.bench_function(name, |b| {
            let config = StoreConfig::new().with_id_scheme(scheme).unlimited();
            let docs = DocumentStore::new(MemoryStore::new(), config).unwrap();
            let mut gen = MockNoteGenerator::new();
            b.iter(|| {
                let (title, content) = gen.next_note();
                docs.create(&title, &content).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_create, bench_load, bench_list, bench_id_schemes);
criterion_main!(benches);
