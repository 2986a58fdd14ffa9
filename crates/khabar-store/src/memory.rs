use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use khabar_core::{ArticleMetadata, ArticleStore, VectorRecord, VectorStore};
use parking_lot::RwLock;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Result, StoreError};

/// One line of an articles JSON Lines file.
#[derive(Debug, Deserialize)]
struct ArticleLine {
    url: String,
    #[serde(flatten)]
    metadata: ArticleMetadata,
}

/// Records and articles held in process memory.
///
/// Readers take a snapshot of the record list under a short read lock;
/// [`replace_all`](Self::replace_all) swaps the whole list at once, so a
/// concurrent search sees either the old or the new records, never a mix.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Arc<Vec<VectorRecord>>>,
    articles: RwLock<HashMap<String, ArticleMetadata>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store over `records`.
    pub fn with_records(records: Vec<VectorRecord>) -> Self {
        Self {
            records: RwLock::new(Arc::new(records)),
            articles: RwLock::default(),
        }
    }

    /// Loads records from a JSON Lines file, one [`VectorRecord`] per line.
    /// Blank lines are ignored.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors or on the first malformed line.
    pub fn from_jsonl(path: impl AsRef<Path>) -> Result<Self> {
        let records = read_jsonl::<VectorRecord>(path.as_ref())?;
        info!(count = records.len(), path = %path.as_ref().display(), "loaded records");
        Ok(Self::with_records(records))
    }

    /// Loads article metadata from a JSON Lines file of
    /// `{ "url", "title_fr", "title_en", "title_ar", "image" }` objects.
    /// Later lines win for a repeated URL.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors or on the first malformed line.
    pub fn load_articles_jsonl(&self, path: impl AsRef<Path>) -> Result<usize> {
        let lines = read_jsonl::<ArticleLine>(path.as_ref())?;
        let count = lines.len();
        let mut articles = self.articles.write();
        for line in lines {
            articles.insert(line.url, line.metadata);
        }
        info!(count, path = %path.as_ref().display(), "loaded articles");
        Ok(count)
    }

    /// Appends one record.
    pub fn insert(&self, record: VectorRecord) {
        let mut guard = self.records.write();
        Arc::make_mut(&mut *guard).push(record);
    }

    /// Replaces every record in one step.
    pub fn replace_all(&self, records: Vec<VectorRecord>) {
        debug!(count = records.len(), "replacing record snapshot");
        *self.records.write() = Arc::new(records);
    }

    /// Stores or replaces the article for `url`.
    pub fn insert_article(&self, url: impl Into<String>, metadata: ArticleMetadata) {
        self.articles.write().insert(url.into(), metadata);
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    fn snapshot(&self) -> Arc<Vec<VectorRecord>> {
        Arc::clone(&*self.records.read())
    }
}

impl VectorStore for MemoryStore {
    fn fetch_all(&self, language: Option<&str>) -> khabar_core::Result<Vec<VectorRecord>> {
        let snapshot = self.snapshot();
        Ok(match language {
            Some(tag) => snapshot
                .iter()
                .filter(|r| r.language == tag)
                .cloned()
                .collect(),
            None => snapshot.as_ref().clone(),
        })
    }
}

impl ArticleStore for MemoryStore {
    fn lookup(&self, url: &str) -> khabar_core::Result<Option<ArticleMetadata>> {
        Ok(self.articles.read().get(url).cloned())
    }
}

fn read_jsonl<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    let reader = BufReader::new(File::open(path)?);
    let mut items = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let item = serde_json::from_str(&line).map_err(|source| StoreError::Json {
            line: index + 1,
            source,
        })?;
        items.push(item);
    }
    Ok(items)
}
