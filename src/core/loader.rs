use crate::domain::model::{ContentDocument, LoadOutcome, TenantSlug};
use crate::domain::ports::ContentStore;
use std::sync::Arc;

/// Fetches tenant content documents.
///
/// Every failure (missing key, unreadable store, malformed JSON) collapses into
/// [`LoadOutcome::NotFound`]; visitors see a 404, operators see the log line.
#[derive(Clone)]
pub struct ContentLoader {
    store: Arc<dyn ContentStore>,
    document_name: String,
}

impl ContentLoader {
    pub fn new(store: Arc<dyn ContentStore>, document_name: impl Into<String>) -> Self {
        Self {
            store,
            document_name: document_name.into(),
        }
    }

    pub fn document_key(&self, slug: &TenantSlug) -> String {
        format!("{}/{}", slug, self.document_name)
    }

    pub async fn load(&self, slug: &TenantSlug) -> LoadOutcome {
        let key = self.document_key(slug);

        let bytes = match self.store.read_document(&key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::info!(
                    "No content found for tenant '{}' at {} ({})",
                    slug,
                    key,
                    self.store.describe()
                );
                return LoadOutcome::NotFound;
            }
            Err(e) => {
                tracing::error!(
                    "❌ Failed to read content for tenant '{}' at {}: {}",
                    slug,
                    key,
                    e
                );
                return LoadOutcome::NotFound;
            }
        };

        match serde_json::from_slice::<ContentDocument>(&bytes) {
            Ok(document) => {
                tracing::debug!("Loaded content document for tenant '{}'", slug);
                LoadOutcome::Found(document)
            }
            Err(e) => {
                tracing::warn!("⚠️ Malformed content document for tenant '{}' at {}: {}", slug, key, e);
                LoadOutcome::NotFound
            }
        }
    }
}

impl std::fmt::Debug for ContentLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentLoader")
            .field("store", &self.store.describe())
            .field("document_name", &self.document_name)
            .finish()
    }
}
