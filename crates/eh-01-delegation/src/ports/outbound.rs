//! # Outbound Ports
//!
//! Grant persistence.

use crate::domain::{DelegationError, DelegationGrant};
use async_trait::async_trait;
use shared_types::{ActorNumber, ProcessType};

/// Grant storage - outbound port.
#[async_trait]
pub trait DelegationRepository: Send + Sync {
    /// Inserts a grant.
    ///
    /// Fails with `DuplicateSequence` when a grant with the same key and
    /// sequence number exists.
    async fn insert(&self, grant: DelegationGrant) -> Result<(), DelegationError>;

    /// Grants naming `delegate` for `process_type`.
    async fn find_for_delegate(
        &self,
        delegate: &ActorNumber,
        process_type: &ProcessType,
    ) -> Result<Vec<DelegationGrant>, DelegationError>;

    /// Every grant naming `delegate`.
    async fn find_all_for_delegate(
        &self,
        delegate: &ActorNumber,
    ) -> Result<Vec<DelegationGrant>, DelegationError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Repository whose every call fails, for error-path tests.
#[derive(Clone, Default)]
pub struct UnavailableDelegationRepository;

#[async_trait]
impl DelegationRepository for UnavailableDelegationRepository {
    async fn insert(&self, _grant: DelegationGrant) -> Result<(), DelegationError> {
        Err(DelegationError::Repository("unavailable".to_string()))
    }

    async fn find_for_delegate(
        &self,
        _delegate: &ActorNumber,
        _process_type: &ProcessType,
    ) -> Result<Vec<DelegationGrant>, DelegationError> {
        Err(DelegationError::Repository("unavailable".to_string()))
    }

    async fn find_all_for_delegate(
        &self,
        _delegate: &ActorNumber,
    ) -> Result<Vec<DelegationGrant>, DelegationError> {
        Err(DelegationError::Repository("unavailable".to_string()))
    }
}
