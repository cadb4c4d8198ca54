use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Error type for static document loading
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DocumentError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// DocumentSource defines the port for the static JSON documents the gateway
/// consults (action mapping table, provider service catalog).
#[async_trait]
pub trait DocumentSource: Send + Sync + 'static {
    /// Load the current document.
    async fn load(&self) -> Result<serde_json::Value, DocumentError>;

    /// Return a channel that signals when the document has changed.
    ///
    /// `None` when the source cannot observe changes. Only the first call may
    /// return a receiver.
    fn watch(&self) -> Option<mpsc::Receiver<()>>;

    /// Human readable origin, used in logs.
    fn describe(&self) -> String;
}
