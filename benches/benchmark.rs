// Index build, search and recommendation benchmarks
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use prodex_core::{AttributeFilter, Catalog, CatalogConfig, InvertedIndex, RecordStore};
use prodex_similarity::Recommender;
use rand::prelude::*;
use serde_json::{json, Value};

const TYPES: &[&str] = &[
    "Car Vacuum Cleaner",
    "Bluetooth Speaker",
    "LED Desk Lamp",
    "Waterproof Watch",
    "Portable Charger",
];
const BRANDS: &[&str] = &["Acme", "Globex", "Initech", "Umbrella", "Hooli", "Soylent"];

fn generate_record(rng: &mut impl Rng, id: usize) -> Value {
    json!({
        "id": id.to_string(),
        "Type": TYPES[rng.random_range(0..TYPES.len())],
        "Brand": BRANDS[rng.random_range(0..BRANDS.len())],
        "Model Name": format!("Series {}", rng.random_range(0..200)),
        "Weight": format!("{:.1} kg", rng.random_range(0.1f64..12.0)),
        "Warranty": format!("{} Year", rng.random_range(1..4))
    })
}

fn generate_store(size: usize) -> RecordStore {
    let mut rng = rand::rng();
    let records = (0..size).map(|i| generate_record(&mut rng, i)).collect();
    RecordStore::from_json(Value::Array(records)).unwrap()
}

fn benchmark_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");

    for size in [1_000, 10_000, 50_000].iter() {
        let store = generate_store(*size);
        group.bench_with_input(BenchmarkId::new("sequential", size), &store, |b, store| {
            b.iter(|| black_box(InvertedIndex::build(store)));
        });
        group.bench_with_input(BenchmarkId::new("parallel", size), &store, |b, store| {
            b.iter(|| black_box(InvertedIndex::build_parallel(store, 4096)));
        });
    }

    group.finish();
}

fn benchmark_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let catalog = Catalog::with_config(generate_store(10_000), &CatalogConfig::default());

    for query in ["vacuum", "bluetooth speaker", "series 42 kg"].iter() {
        group.bench_with_input(BenchmarkId::new("query", query), query, |b, query| {
            b.iter(|| black_box(catalog.search(query, 20)));
        });
    }

    group.finish();
}

fn benchmark_filter(c: &mut Criterion) {
    let catalog = Catalog::with_config(generate_store(10_000), &CatalogConfig::default());
    let filter = AttributeFilter::from_json(&json!({
        "Brand": "acme",
        "Weight": {"min": 1.0, "max": 5.0}
    }))
    .unwrap();

    c.bench_function("filter_10k", |b| {
        b.iter(|| black_box(catalog.filter(&filter)));
    });
}

fn benchmark_recommend(c: &mut Criterion) {
    let store = generate_store(10_000);
    let recommender = Recommender::new(&store);
    let mut rng = rand::rng();

    c.bench_function("recommend_10k", |b| {
        b.iter(|| {
            let id = rng.random_range(0..10_000usize).to_string();
            black_box(recommender.recommend(&id, 5))
        });
    });
}

criterion_group!(
    benches,
    benchmark_index_build,
    benchmark_search,
    benchmark_filter,
    benchmark_recommend
);
criterion_main!(benches);
