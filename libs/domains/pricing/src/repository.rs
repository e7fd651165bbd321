use async_trait::async_trait;
use std::path::Path;
use std::sync::RwLock;

use crate::error::{PricingError, PricingResult};
use crate::models::{PricingDocument, PricingKey};

/// Durable store of pricing documents
///
/// The calculation core only reads from it; documents are written out-of-band
/// by the seeding command.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PricingStore: Send + Sync {
    /// Latest document (by effective date) matching the key, if any
    async fn latest(&self, key: &PricingKey) -> PricingResult<Option<PricingDocument>>;

    /// Store a new document version
    async fn insert(&self, document: PricingDocument) -> PricingResult<()>;
}

/// Process-local store, used for sample data, file-backed data and tests
#[derive(Default)]
pub struct InMemoryPricingStore {
    documents: RwLock<Vec<PricingDocument>>,
}

impl InMemoryPricingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_documents(documents: Vec<PricingDocument>) -> Self {
        Self {
            documents: RwLock::new(documents),
        }
    }

    /// Load a JSON array of pricing documents
    pub fn from_json_file(path: impl AsRef<Path>) -> PricingResult<Self> {
        load_documents(path).map(Self::from_documents)
    }

    pub fn len(&self) -> usize {
        self.documents.read().map(|docs| docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read a JSON array of pricing documents from disk
pub fn load_documents(path: impl AsRef<Path>) -> PricingResult<Vec<PricingDocument>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| {
        PricingError::Internal(format!("failed to read {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        PricingError::Internal(format!("failed to parse {}: {}", path.display(), e))
    })
}

fn lock_poisoned() -> PricingError {
    PricingError::Internal("pricing store lock poisoned".to_string())
}

#[async_trait]
impl PricingStore for InMemoryPricingStore {
    async fn latest(&self, key: &PricingKey) -> PricingResult<Option<PricingDocument>> {
        let documents = self.documents.read().map_err(|_| lock_poisoned())?;
        Ok(documents
            .iter()
            .filter(|doc| doc.matches(key))
            .max_by_key(|doc| doc.effective_date)
            .cloned())
    }

    async fn insert(&self, document: PricingDocument) -> PricingResult<()> {
        self.documents
            .write()
            .map_err(|_| lock_poisoned())?
            .push(document);
        Ok(())
    }
}
