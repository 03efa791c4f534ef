//! Open-document text store.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tower_lsp::lsp_types::Url;
use tracing::debug;

/// Latest full text of every open document, keyed by URI.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: Arc<RwLock<HashMap<Url, String>>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open(&self, uri: Url, text: String) {
        debug!(%uri, bytes = text.len(), "document opened");
        self.documents.write().await.insert(uri, text);
    }

    /// Replace the text of a document. Unknown documents are added.
    pub async fn update(&self, uri: Url, text: String) {
        debug!(%uri, bytes = text.len(), "document updated");
        self.documents.write().await.insert(uri, text);
    }

    pub async fn get(&self, uri: &Url) -> Option<String> {
        self.documents.read().await.get(uri).cloned()
    }

    /// Forget a document. Returns whether it was open.
    pub async fn close(&self, uri: &Url) -> bool {
        debug!(%uri, "document closed");
        self.documents.write().await.remove(uri).is_some()
    }
}
