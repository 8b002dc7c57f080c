//! In-memory raw document archive.

use crate::domain::{ArchiveError, ArchiveReference};
use crate::ports::ArchiveStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::IncomingDocumentType;
use std::collections::HashMap;

/// An archived document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedDocument {
    pub category: IncomingDocumentType,
    pub raw: Vec<u8>,
}

/// Archive keyed by [`ArchiveReference`]. Storing under an existing key fails.
#[derive(Default)]
pub struct InMemoryArchive {
    documents: RwLock<HashMap<ArchiveReference, ArchivedDocument>>,
}

impl InMemoryArchive {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, reference: &ArchiveReference) -> Option<ArchivedDocument> {
        self.documents.read().get(reference).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

#[async_trait]
impl ArchiveStore for InMemoryArchive {
    async fn store(
        &self,
        category: &IncomingDocumentType,
        reference: &ArchiveReference,
        raw: Vec<u8>,
    ) -> Result<(), ArchiveError> {
        let mut documents = self.documents.write();
        if documents.contains_key(reference) {
            return Err(ArchiveError(format!("{reference} already archived")));
        }
        documents.insert(
            reference.clone(),
            ArchivedDocument {
                category: category.clone(),
                raw,
            },
        );
        Ok(())
    }
}
