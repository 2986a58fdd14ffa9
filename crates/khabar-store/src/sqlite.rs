use std::path::Path;

use chrono::{DateTime, Utc};
use khabar_core::{ArticleMetadata, ArticleStore, VectorRecord, VectorStore};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info, warn};

use crate::error::Result;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS vectors (
    id         TEXT PRIMARY KEY,
    url        TEXT NOT NULL,
    language   TEXT NOT NULL,
    text       TEXT NOT NULL,
    embedding  BLOB NOT NULL,
    created_at TEXT
);
CREATE INDEX IF NOT EXISTS idx_vectors_language ON vectors(language);

CREATE TABLE IF NOT EXISTS articles (
    url      TEXT PRIMARY KEY,
    title_fr TEXT,
    title_en TEXT,
    title_ar TEXT,
    image    TEXT
);
";

/// Records and articles in a SQLite database.
///
/// Embeddings are stored as little-endian `f32` BLOBs. Every
/// [`fetch_all`](VectorStore::fetch_all) is one `SELECT`; the connection
/// lock is held only while rows are read.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) a database file and ensures the schema exists.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Sqlite` if the file cannot be opened or the
    /// schema cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        info!(path = %path.as_ref().display(), "opened sqlite store");
        Self::with_connection(conn)
    }

    /// Opens a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Sqlite` if the schema cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Inserts or replaces a record by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Sqlite` on write failure.
    pub fn insert_record(&self, record: &VectorRecord) -> Result<()> {
        self.conn.lock().execute(
            "INSERT OR REPLACE INTO vectors (id, url, language, text, embedding, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.id,
                record.url,
                record.language,
                record.text,
                f32_vec_to_bytes(&record.embedding),
                record.created_at.map(|t| t.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    /// Inserts several records in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Sqlite`; nothing is written on failure.
    pub fn insert_records(&self, records: &[VectorRecord]) -> Result<usize> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO vectors (id, url, language, text, embedding, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for record in records {
                stmt.execute(params![
                    record.id,
                    record.url,
                    record.language,
                    record.text,
                    f32_vec_to_bytes(&record.embedding),
                    record.created_at.map(|t| t.to_rfc3339()),
                ])?;
            }
        }
        tx.commit()?;
        debug!(count = records.len(), "inserted records");
        Ok(records.len())
    }

    /// Inserts or replaces the article for `url`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Sqlite` on write failure.
    pub fn insert_article(&self, url: &str, article: &ArticleMetadata) -> Result<()> {
        self.conn.lock().execute(
            "INSERT OR REPLACE INTO articles (url, title_fr, title_en, title_ar, image)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                url,
                article.title_fr,
                article.title_en,
                article.title_ar,
                article.image
            ],
        )?;
        Ok(())
    }

    /// Number of stored records.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Sqlite` on read failure.
    pub fn count(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .lock()
            .query_row("SELECT COUNT(*) FROM vectors", [], |row| row.get(0))?;
        Ok(usize::try_from(n).unwrap_or(0))
    }

    fn load_records(&self, language: Option<&str>) -> Result<Vec<VectorRecord>> {
        let conn = self.conn.lock();
        let rows = match language {
            Some(tag) => {
                let mut stmt = conn.prepare(
                    "SELECT id, url, language, text, embedding, created_at
                     FROM vectors WHERE language = ?1 ORDER BY rowid",
                )?;
                let rows = stmt.query_map([tag], read_row)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT id, url, language, text, embedding, created_at
                     FROM vectors ORDER BY rowid",
                )?;
                let rows = stmt.query_map([], read_row)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()?
            }
        };
        drop(conn);

        Ok(rows.into_iter().map(RawRecord::into_record).collect())
    }

    fn load_article(&self, url: &str) -> Result<Option<ArticleMetadata>> {
        let article = self
            .conn
            .lock()
            .query_row(
                "SELECT title_fr, title_en, title_ar, image FROM articles WHERE url = ?1",
                [url],
                |row| {
                    Ok(ArticleMetadata {
                        title_fr: row.get(0)?,
                        title_en: row.get(1)?,
                        title_ar: row.get(2)?,
                        image: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(article)
    }
}

impl VectorStore for SqliteStore {
    fn fetch_all(&self, language: Option<&str>) -> khabar_core::Result<Vec<VectorRecord>> {
        let records = self.load_records(language)?;
        debug!(
            language = language.unwrap_or("*"),
            count = records.len(),
            "loaded records from sqlite"
        );
        Ok(records)
    }
}

impl ArticleStore for SqliteStore {
    fn lookup(&self, url: &str) -> khabar_core::Result<Option<ArticleMetadata>> {
        Ok(self.load_article(url)?)
    }
}

/// A row as read, before the BLOB and timestamp are decoded.
struct RawRecord {
    id: String,
    url: String,
    language: String,
    text: String,
    embedding: Option<Vec<u8>>,
    created_at: Option<String>,
}

impl RawRecord {
    /// Decodes the row. A NULL or truncated BLOB becomes an empty embedding,
    /// which the cosine search skips as a dimension mismatch.
    fn into_record(self) -> VectorRecord {
        let embedding = match self.embedding.as_deref().map(bytes_to_f32_vec) {
            Some(Some(embedding)) => embedding,
            Some(None) => {
                warn!(
                    id = %self.id,
                    len = self.embedding.as_ref().map_or(0, Vec::len),
                    "corrupt embedding blob, record will be skipped"
                );
                Vec::new()
            }
            None => {
                debug!(id = %self.id, "record has no embedding");
                Vec::new()
            }
        };
        // An unparsable timestamp is dropped rather than failing the read.
        let created_at = self
            .created_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc));

        VectorRecord {
            id: self.id,
            url: self.url,
            language: self.language,
            text: self.text,
            embedding,
            created_at,
        }
    }
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawRecord> {
    Ok(RawRecord {
        id: row.get(0)?,
        url: row.get(1)?,
        language: row.get(2)?,
        text: row.get(3)?,
        embedding: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

fn bytes_to_f32_vec(bytes: &[u8]) -> Option<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return None;
    }
    Some(
        bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(id: &str, language: &str, embedding: Vec<f32>) -> VectorRecord {
        VectorRecord::new(id, format!("https://news/{id}"), language, "texte", embedding)
    }

    #[test]
    fn embedding_blob_roundtrip() {
        let v = vec![0.25_f32, -1.5, 3.0e-7, 42.0];
        assert_eq!(bytes_to_f32_vec(&f32_vec_to_bytes(&v)).unwrap(), v);
        assert!(bytes_to_f32_vec(&[0, 1, 2]).is_none());
    }

    #[test]
    fn fetch_filters_by_language_in_insertion_order() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .insert_records(&[
                record("b", "fr", vec![0.0, 1.0]),
                record("a", "fr", vec![1.0, 0.0]),
                record("c", "en", vec![1.0, 1.0]),
            ])
            .unwrap();

        let fr: Vec<String> = store
            .fetch_all(Some("fr"))
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(fr, ["b", "a"]);
        assert_eq!(store.fetch_all(None).unwrap().len(), 3);
        assert_eq!(store.count().unwrap(), 3);
    }

    #[test]
    fn keeps_timestamps_and_embeddings() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut rec = record("a", "fr", vec![0.5, -0.5, 2.0]);
        rec.created_at = Some(Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap());
        store.insert_record(&rec).unwrap();

        let loaded = store.fetch_all(Some("fr")).unwrap();
        assert_eq!(loaded, vec![rec]);
    }

    #[test]
    fn unreadable_embeddings_do_not_hide_good_rows() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.insert_record(&record("good", "fr", vec![1.0, 0.0])).unwrap();
        store
            .conn
            .lock()
            .execute(
                "INSERT INTO vectors (id, url, language, text, embedding) VALUES ('bad', 'u', 'fr', 't', ?1)",
                [vec![1u8, 2, 3]],
            )
            .unwrap();

        let loaded = store.fetch_all(Some("fr")).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].embedding, vec![1.0, 0.0]);
        assert_eq!(loaded[1].id, "bad");
        assert!(loaded[1].embedding.is_empty());

        let nulled = RawRecord {
            id: "null".into(),
            url: "u".into(),
            language: "fr".into(),
            text: "t".into(),
            embedding: None,
            created_at: Some("not a date".into()),
        }
        .into_record();
        assert!(nulled.embedding.is_empty());
        assert!(nulled.created_at.is_none());
    }

    #[test]
    fn article_lookup() {
        let store = SqliteStore::open_in_memory().unwrap();
        let article = ArticleMetadata {
            title_fr: Some("Ziyech arrive au Wydad".into()),
            title_en: None,
            title_ar: Some("زياش في الوداد".into()),
            image: None,
        };
        store.insert_article("https://news/a", &article).unwrap();

        assert_eq!(store.lookup("https://news/a").unwrap(), Some(article));
        assert_eq!(store.lookup("https://news/b").unwrap(), None);
    }
}
