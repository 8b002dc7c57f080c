//! # Delegation Service
//!
//! Wires grant validation and resolution to the repository port.

use crate::domain::{
    resolve_effective_actor, validate_grant, DelegationError, DelegationGrant, DelegationQuery,
    OriginalActor,
};
use crate::ports::inbound::DelegationApi;
use crate::ports::outbound::DelegationRepository;
use async_trait::async_trait;
use shared_types::ActorNumber;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct DelegationService<R: DelegationRepository> {
    repository: Arc<R>,
}

impl<R: DelegationRepository> DelegationService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: DelegationRepository + 'static> DelegationApi for DelegationService<R> {
    async fn register_grant(&self, grant: DelegationGrant) -> Result<(), DelegationError> {
        validate_grant(&grant)?;
        info!(
            "[eh-01] Registering {} {} -> {} in {} (seq {})",
            if grant.is_cancellation() { "cancellation" } else { "grant" },
            grant.delegator,
            grant.delegate,
            grant.grid_area,
            grant.sequence_number
        );
        self.repository.insert(grant).await
    }

    async fn resolve_effective_actor(
        &self,
        query: DelegationQuery,
    ) -> Result<OriginalActor, DelegationError> {
        let grants = self
            .repository
            .find_for_delegate(&query.requesting_actor, &query.process_type)
            .await?;

        match resolve_effective_actor(&grants, &query) {
            Ok(actor) => {
                debug!(
                    delegate = %query.requesting_actor,
                    original = %actor.actor_number,
                    grid_areas = actor.grid_areas.len(),
                    "[eh-01] Delegation resolved"
                );
                Ok(actor)
            }
            Err(denied) => {
                warn!(
                    delegate = %query.requesting_actor,
                    candidates = grants.len(),
                    "[eh-01] Delegation denied: {denied}"
                );
                Err(denied.into())
            }
        }
    }

    async fn grants_for(
        &self,
        delegate: &ActorNumber,
    ) -> Result<Vec<DelegationGrant>, DelegationError> {
        self.repository.find_all_for_delegate(delegate).await
    }
}
