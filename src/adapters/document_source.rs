use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use async_trait::async_trait;
use eyre::{Context, Result};
use notify::{RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::ports::{DocumentError, DocumentSource};

/// JSON document read from a local file, optionally watched for changes.
pub struct FileDocumentSource {
    path: PathBuf,
    // Dropping the watcher stops the notifications
    _watcher: Option<notify::RecommendedWatcher>,
    update_rx: Mutex<Option<mpsc::Receiver<()>>>,
}

impl FileDocumentSource {
    /// A source that is re-read on demand and never signals changes.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _watcher: None,
            update_rx: Mutex::new(None),
        }
    }

    /// A source whose parent directory is watched for changes to the file.
    ///
    /// The file itself does not need to exist yet.
    pub fn watched(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let (tx, rx) = mpsc::channel(1);
        let file_name = path
            .file_name()
            .ok_or_else(|| eyre::eyre!("Invalid document path: {}", path.display()))?
            .to_owned();

        let mut watcher =
            notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
                match res {
                    Ok(event) => {
                        if (event.kind.is_modify()
                            || event.kind.is_create()
                            || event.kind.is_remove())
                            && event
                                .paths
                                .iter()
                                .any(|p| p.file_name() == Some(&file_name))
                        {
                            tracing::debug!("Document changed: {:?}", event.kind);
                            // A pending signal already covers this change
                            let _ = tx.try_send(());
                        }
                    }
                    Err(e) => tracing::error!("Document watch error: {:?}", e),
                }
            })?;

        let watch_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        watcher
            .watch(watch_dir, RecursiveMode::NonRecursive)
            .wrap_err_with(|| format!("Failed to watch {}", watch_dir.display()))?;

        Ok(Self {
            path,
            _watcher: Some(watcher),
            update_rx: Mutex::new(Some(rx)),
        })
    }
}

#[async_trait]
impl DocumentSource for FileDocumentSource {
    async fn load(&self) -> Result<serde_json::Value, DocumentError> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|source| DocumentError::Io {
                path: self.describe(),
                source,
            })?;
        serde_json::from_slice(&raw).map_err(|source| DocumentError::Parse {
            path: self.describe(),
            source,
        })
    }

    fn watch(&self) -> Option<mpsc::Receiver<()>> {
        self.update_rx.lock().ok().and_then(|mut rx| rx.take())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
