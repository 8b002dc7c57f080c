//! In-memory grant store.

use crate::domain::{DelegationError, DelegationGrant};
use crate::ports::outbound::DelegationRepository;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{ActorNumber, ProcessType};
use tracing::debug;

/// Grants kept in insertion order behind a lock.
#[derive(Default)]
pub struct InMemoryDelegationRepository {
    grants: RwLock<Vec<DelegationGrant>>,
}

impl InMemoryDelegationRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.grants.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grants.read().is_empty()
    }
}

#[async_trait]
impl DelegationRepository for InMemoryDelegationRepository {
    async fn insert(&self, grant: DelegationGrant) -> Result<(), DelegationError> {
        let mut grants = self.grants.write();
        let key = grant.key();
        if grants
            .iter()
            .any(|g| g.sequence_number == grant.sequence_number && g.key() == key)
        {
            return Err(DelegationError::DuplicateSequence {
                delegator: grant.delegator,
                delegate: grant.delegate,
                grid_area: grant.grid_area,
                sequence_number: grant.sequence_number,
            });
        }
        debug!(
            "[eh-01] Stored grant {} -> {} in {} (seq {})",
            grant.delegator, grant.delegate, grant.grid_area, grant.sequence_number
        );
        grants.push(grant);
        Ok(())
    }

    async fn find_for_delegate(
        &self,
        delegate: &ActorNumber,
        process_type: &ProcessType,
    ) -> Result<Vec<DelegationGrant>, DelegationError> {
        Ok(self
            .grants
            .read()
            .iter()
            .filter(|g| &g.delegate == delegate && &g.process_type == process_type)
            .cloned()
            .collect())
    }

    async fn find_all_for_delegate(
        &self,
        delegate: &ActorNumber,
    ) -> Result<Vec<DelegationGrant>, DelegationError> {
        Ok(self
            .grants
            .read()
            .iter()
            .filter(|g| &g.delegate == delegate)
            .cloned()
            .collect())
    }
}
