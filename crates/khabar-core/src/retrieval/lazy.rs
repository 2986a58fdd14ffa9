use once_cell::sync::OnceCell;
use tracing::info;

use crate::error::Result;
use crate::retrieval::Embedder;
use crate::types::Embedding;

type Factory = Box<dyn Fn() -> Result<Box<dyn Embedder>> + Send + Sync>;

/// An embedder whose model is loaded on first use.
///
/// Loading happens at most once: concurrent first callers wait for a single
/// initialization, and a failed load is retried by the next caller. After
/// that, `embed` goes straight to the model without any lock.
pub struct LazyEmbedder {
    cell: OnceCell<Box<dyn Embedder>>,
    factory: Factory,
}

impl LazyEmbedder {
    /// Wraps a loader that builds the real embedder.
    pub fn new<F, E>(factory: F) -> Self
    where
        F: Fn() -> Result<E> + Send + Sync + 'static,
        E: Embedder + 'static,
    {
        Self {
            cell: OnceCell::new(),
            factory: Box::new(move || factory().map(|e| Box::new(e) as Box<dyn Embedder>)),
        }
    }

    /// Loads the model now instead of on the first query.
    ///
    /// # Errors
    ///
    /// Returns the loader's error; a later call will try again.
    pub fn warm_up(&self) -> Result<()> {
        self.get().map(|_| ())
    }

    /// Returns `true` once the model has been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    fn get(&self) -> Result<&dyn Embedder> {
        self.cell
            .get_or_try_init(|| {
                info!("loading embedding model");
                (self.factory)()
            })
            .map(|boxed| &**boxed)
    }
}

impl Embedder for LazyEmbedder {
    fn embed(&self, text: &str) -> Result<Embedding> {
        self.get()?.embed(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KhabarError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Constant(Vec<f32>);

    impl Embedder for Constant {
        fn embed(&self, _text: &str) -> Result<Embedding> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn loads_once_across_threads() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loads);
        let lazy = Arc::new(LazyEmbedder::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Constant(vec![1.0, 2.0]))
        }));
        assert!(!lazy.is_loaded());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lazy = Arc::clone(&lazy);
                std::thread::spawn(move || lazy.embed("q").unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), vec![1.0, 2.0]);
        }

        assert!(lazy.is_loaded());
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_load_is_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let lazy = LazyEmbedder::new(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(KhabarError::Embedding("model file missing".into()))
            } else {
                Ok(Constant(vec![0.5]))
            }
        });

        assert!(matches!(lazy.warm_up(), Err(KhabarError::Embedding(_))));
        assert!(!lazy.is_loaded());
        assert_eq!(lazy.embed("q").unwrap(), vec![0.5]);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}
