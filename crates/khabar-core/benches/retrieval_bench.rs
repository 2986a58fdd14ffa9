use criterion::{black_box, criterion_group, criterion_main, Criterion};
use khabar_core::extract::{EntityExtractor, Lexicon};
use khabar_core::rerank::HybridReRanker;
use khabar_core::search::CosineSearch;
use khabar_core::types::VectorRecord;

const DIM: usize = 384;

fn synthetic_records(n: usize) -> Vec<VectorRecord> {
    let texts = [
        "Ziyech arrive au Wydad pour deux saisons",
        "Conférence de presse du coach avant le derby",
        "Raja beat AS FAR in the league",
        "Rahimi a marqué un but contre les FAR",
        "Wydad signs a new goalkeeper",
    ];
    (0..n)
        .map(|i| {
            let embedding = (0..DIM)
                .map(|d| (((i * 31 + d * 7) % 97) as f32 / 97.0) - 0.5)
                .collect();
            VectorRecord::new(
                format!("r{i}"),
                format!("https://news/{i}"),
                if i % 2 == 0 { "fr" } else { "en" },
                texts[i % texts.len()],
                embedding,
            )
        })
        .collect()
}

fn bench_cosine_search(c: &mut Criterion) {
    let search = CosineSearch::new();
    let records = synthetic_records(5_000);
    let query: Vec<f32> = (0..DIM).map(|d| ((d % 13) as f32 / 13.0) - 0.5).collect();

    c.bench_function("cosine_search_5000x384_top20", |b| {
        b.iter(|| search.search(black_box(&query), black_box(&records), 20, -1.0));
    });
}

fn bench_rerank(c: &mut Criterion) {
    let lexicon = Lexicon::default();
    let extractor = EntityExtractor::new(&lexicon).unwrap();
    let reranker = HybridReRanker::from_lexicon(&lexicon).unwrap();
    let search = CosineSearch::new();
    let records = synthetic_records(200);
    let query: Vec<f32> = (0..DIM).map(|d| ((d % 11) as f32 / 11.0) - 0.5).collect();
    let query_text = "Ziyech a signé au Wydad";
    let query_entities = extractor.extract(query_text, "fr");
    let candidates = search.search(&query, &records, 20, -1.0);

    c.bench_function("entity_extract_single", |b| {
        b.iter(|| extractor.extract(black_box(query_text), "fr"));
    });

    c.bench_function("hybrid_rerank_top20", |b| {
        b.iter(|| {
            reranker.rerank(
                black_box(candidates.clone()),
                query_text,
                &query_entities,
                "fr",
            )
        });
    });
}

criterion_group!(benches, bench_cosine_search, bench_rerank);
criterion_main!(benches);
