//! Sender and role checks.
//!
//! # Authorization Rules
//!
//! | Document Type | Permitted sender roles |
//! |---------------|------------------------|
//! | `RequestAggregatedMeasureData` | EnergySupplier, BalanceResponsibleParty, GridOperator, MeteredDataResponsible |
//! | `RequestWholesaleSettlement` | EnergySupplier, GridOperator, SystemOperator |
//! | `NotifyValidatedMeasureData` | GridOperator |
//!
//! A caller authenticated with the `Delegated` role may send on behalf of any
//! permitted role, subject to delegation resolution.

use super::entities::IncomingMessage;
use super::errors::RejectReason;
use shared_types::{ActorRole, AuthenticatedActor, IncomingDocumentType};

/// Authorization rules for incoming documents.
#[derive(Debug, Clone)]
pub struct AuthorizationRules;

impl AuthorizationRules {
    /// Roles allowed to send `document_type`.
    #[must_use]
    pub fn permitted_roles(document_type: &IncomingDocumentType) -> Vec<ActorRole> {
        if *document_type == IncomingDocumentType::REQUEST_AGGREGATED_MEASURE_DATA {
            vec![
                ActorRole::ENERGY_SUPPLIER,
                ActorRole::BALANCE_RESPONSIBLE_PARTY,
                ActorRole::GRID_OPERATOR,
                ActorRole::METERED_DATA_RESPONSIBLE,
            ]
        } else if *document_type == IncomingDocumentType::REQUEST_WHOLESALE_SETTLEMENT {
            vec![
                ActorRole::ENERGY_SUPPLIER,
                ActorRole::GRID_OPERATOR,
                ActorRole::SYSTEM_OPERATOR,
            ]
        } else if *document_type == IncomingDocumentType::NOTIFY_VALIDATED_MEASURE_DATA {
            vec![ActorRole::GRID_OPERATOR]
        } else {
            Vec::new()
        }
    }

    /// The authenticated caller must be the declared sender, in the declared
    /// role unless it authenticated as a delegate.
    pub fn validate_sender(
        caller: &AuthenticatedActor,
        message: &IncomingMessage,
    ) -> Result<(), RejectReason> {
        if !caller.is_sender(&message.sender_number) {
            return Err(RejectReason::SenderMismatch {
                detail: format!(
                    "authenticated as {}, document sender is {}",
                    caller.actor_number, message.sender_number
                ),
            });
        }
        if caller.role != message.sender_role && !caller.role.is_delegated() {
            return Err(RejectReason::SenderMismatch {
                detail: format!(
                    "authenticated role {}, document sender role is {}",
                    caller.role, message.sender_role
                ),
            });
        }
        Ok(())
    }

    /// The declared sender role must be permitted for the document type.
    pub fn validate_role(message: &IncomingMessage) -> Result<(), RejectReason> {
        if Self::permitted_roles(&message.document_type).contains(&message.sender_role) {
            Ok(())
        } else {
            Err(RejectReason::RoleNotPermitted {
                role: message.sender_role.to_string(),
                document_type: message.document_type.clone(),
            })
        }
    }
}
