//! Time-boxed cache over a static JSON document.
//!
//! A snapshot is served for at most `ttl` after it was loaded; a zero `ttl`
//! re-reads the source on every lookup. When the source can signal changes,
//! [`CachedDocument::spawn_invalidation`] drops the snapshot as soon as a
//! change is observed, so the staleness window shrinks to the watcher's
//! reporting delay.
use std::{
    sync::{Arc, Weak},
    time::{Duration, Instant},
};

use arc_swap::ArcSwapOption;

use crate::ports::{DocumentSource, FaultReporter};

struct Snapshot {
    loaded_at: Instant,
    document: Arc<serde_json::Value>,
}

pub struct CachedDocument {
    source: Arc<dyn DocumentSource>,
    ttl: Duration,
    snapshot: ArcSwapOption<Snapshot>,
    reporter: Arc<dyn FaultReporter>,
}

impl CachedDocument {
    pub fn new(
        source: Arc<dyn DocumentSource>,
        ttl: Duration,
        reporter: Arc<dyn FaultReporter>,
    ) -> Self {
        Self {
            source,
            ttl,
            snapshot: ArcSwapOption::empty(),
            reporter,
        }
    }

    /// The current document, or `None` when it cannot be loaded.
    pub async fn current(&self) -> Option<Arc<serde_json::Value>> {
        if !self.ttl.is_zero() {
            if let Some(snapshot) = self.snapshot.load_full() {
                if snapshot.loaded_at.elapsed() < self.ttl {
                    return Some(snapshot.document.clone());
                }
            }
        }

        match self.source.load().await {
            Ok(document) => {
                let document = Arc::new(document);
                self.snapshot.store(Some(Arc::new(Snapshot {
                    loaded_at: Instant::now(),
                    document: document.clone(),
                })));
                Some(document)
            }
            Err(e) => {
                tracing::error!(
                    source = %self.source.describe(),
                    error = %e,
                    "failed to load document"
                );
                self.reporter.capture_error("documents.load", &e);
                self.snapshot.store(None);
                None
            }
        }
    }

    /// Forget the cached snapshot; the next lookup reloads.
    pub fn invalidate(&self) {
        self.snapshot.store(None);
    }

    /// Invalidate the cache whenever the source reports a change.
    ///
    /// Returns `None` when the source cannot be watched. The task ends when
    /// the cache is dropped or the source stops signalling.
    pub fn spawn_invalidation(self: &Arc<Self>) -> Option<tokio::task::JoinHandle<()>> {
        let mut changes = self.source.watch()?;
        let cache: Weak<Self> = Arc::downgrade(self);
        let origin = self.source.describe();

        Some(tokio::spawn(async move {
            while changes.recv().await.is_some() {
                let Some(cache) = cache.upgrade() else {
                    break;
                };
                tracing::info!(source = %origin, "document changed, invalidating cache");
                cache.invalidate();
            }
            tracing::debug!(source = %origin, "document watcher stopped");
        }))
    }
}
