use std::sync::Arc;

use khabar_core::{
    ArticleMetadata, Embedder, Embedding, KhabarError, RetrievalContext, Retriever,
    VectorRecord, Verdict,
};
use khabar_store::{MemoryStore, SqliteStore};

/// Maps known query texts to fixed vectors.
struct TableEmbedder;

impl Embedder for TableEmbedder {
    fn embed(&self, text: &str) -> khabar_core::Result<Embedding> {
        Ok(match text {
            "Ziyech contrat officiel Wydad" => vec![0.9487, 0.3162],
            "Ziyech signs a contract with Wydad" => vec![0.9, 0.1],
            _ => vec![0.0, 1.0],
        })
    }
}

fn seed(store: &SqliteStore, language: &str) {
    store
        .insert_records(&[
            VectorRecord::new(
                "a",
                "https://news/a",
                language,
                "Ziyech arrive au Wydad",
                vec![1.0, 0.0],
            ),
            VectorRecord::new(
                "b",
                "https://news/b",
                language,
                "Conférence de presse du coach",
                vec![0.0, 1.0],
            ),
        ])
        .unwrap();
    store
        .insert_article(
            "https://news/a",
            &ArticleMetadata {
                title_fr: Some("Ziyech arrive au Wydad".into()),
                title_en: Some("Ziyech joins Wydad".into()),
                title_ar: None,
                image: Some("https://img/a.jpg".into()),
            },
        )
        .unwrap();
}

fn retriever(store: Arc<SqliteStore>) -> Retriever {
    let context = RetrievalContext::new(Arc::new(TableEmbedder), store.clone())
        .unwrap()
        .with_articles(store);
    Retriever::new(context).unwrap()
}

#[test]
fn retrieves_from_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("khabar.db");
    seed(&SqliteStore::open(&path).unwrap(), "fr");

    // Reopen to read what was persisted.
    let store = Arc::new(SqliteStore::open(&path).unwrap());
    let best = retriever(store)
        .retrieve("Ziyech contrat officiel Wydad", Some("fr"))
        .unwrap();

    assert_eq!(best.result.result.id, "a");
    assert!((best.final_score - 0.92).abs() < 0.01);
    assert_eq!(best.verdict(), Verdict::LikelyTrue);
    let article = best.result.result.article.unwrap();
    assert_eq!(article.title("en"), Some("Ziyech joins Wydad"));
}

#[test]
fn english_query_falls_back_to_french_records() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    seed(&store, "fr");

    let ranking = retriever(store)
        .rank("Ziyech signs a contract with Wydad", Some("en"))
        .unwrap();

    assert!(ranking.unfiltered);
    assert_eq!(ranking.language, "en");
    assert_eq!(ranking.results[0].result.id, "a");
}

#[test]
fn empty_database_reports_not_found() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let err = retriever(store)
        .retrieve("Ziyech contrat officiel Wydad", None)
        .unwrap_err();
    assert!(matches!(err, KhabarError::NotFound { .. }));
}

#[test]
fn memory_store_swap_is_visible_to_next_query() {
    let store = Arc::new(MemoryStore::new());
    let context = RetrievalContext::new(Arc::new(TableEmbedder), store.clone()).unwrap();
    let retriever = Retriever::new(context).unwrap();

    assert!(retriever.retrieve("Ziyech contrat officiel Wydad", Some("fr")).is_err());

    store.replace_all(vec![VectorRecord::new(
        "a",
        "https://news/a",
        "fr",
        "Ziyech arrive au Wydad",
        vec![1.0, 0.0],
    )]);
    let best = retriever
        .retrieve("Ziyech contrat officiel Wydad", Some("fr"))
        .unwrap();
    assert_eq!(best.result.result.id, "a");
}

#[test]
fn corrupt_row_does_not_block_retrieval() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("khabar.db");
    let store = SqliteStore::open(&path).unwrap();
    store
        .insert_record(&VectorRecord::new(
            "good",
            "https://news/good",
            "fr",
            "Ziyech arrive au Wydad",
            vec![1.0, 0.0],
        ))
        .unwrap();
    drop(store);

    // A row written by another tool with a truncated BLOB.
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute(
        "INSERT INTO vectors (id, url, language, text, embedding) VALUES ('bad', 'u', 'fr', 't', ?1)",
        [vec![0u8, 0, 128]],
    )
    .unwrap();
    drop(conn);

    let store = Arc::new(SqliteStore::open(&path).unwrap());
    let best = retriever(store)
        .retrieve("Ziyech contrat officiel Wydad", Some("fr"))
        .unwrap();
    assert_eq!(best.result.result.id, "good");
}
