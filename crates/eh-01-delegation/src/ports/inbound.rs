//! # Inbound Ports
//!
//! API trait defining what the Delegation subsystem can do.

use crate::domain::{DelegationError, DelegationGrant, DelegationQuery, OriginalActor};
use async_trait::async_trait;
use shared_types::ActorNumber;

/// Delegation API - inbound port.
#[async_trait]
pub trait DelegationApi: Send + Sync {
    /// Stores a grant after validating it.
    async fn register_grant(&self, grant: DelegationGrant) -> Result<(), DelegationError>;

    /// Resolves who the requesting actor acts for.
    ///
    /// A denial is returned as `DelegationError::Denied`.
    async fn resolve_effective_actor(
        &self,
        query: DelegationQuery,
    ) -> Result<OriginalActor, DelegationError>;

    /// All grants naming `delegate`, in storage order.
    async fn grants_for(&self, delegate: &ActorNumber)
        -> Result<Vec<DelegationGrant>, DelegationError>;
}
