//! # Incoming Message Service
//!
//! The intake pipeline. Each stage either continues or ends the request with
//! a rejection:
//!
//! ```text
//! parse → authenticate → authorize (+ delegation) → validate
//!       → register ids → archive → initiate processes
//! ```
//!
//! Nothing is written before registration, so every rejection is free of
//! side effects. Failures after registration are returned as errors and the
//! registration stays in place.

use crate::adapters::DocumentParserRegistry;
use crate::domain::{
    validate_structure, ArchiveReference, AuthorizationRules, EffectiveActor,
    IncomingMessage, IncomingMessageError, IncomingTransaction, InitiateProcessRequest,
    ReceiveResponse, RejectReason, Rejection,
};
use crate::ports::inbound::IncomingMessageApi;
use crate::ports::outbound::{
    ArchiveStore, IdempotencyRegistry, ProcessInitiator, RegistrationOutcome, TimeSource,
};
use async_trait::async_trait;
use eh_01_delegation::{DelegationApi, DelegationError, DelegationQuery};
use shared_types::{ActorRole, AuthenticatedActor, DocumentFormat, IncomingDocumentType};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Intake settings.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// Store raw documents before starting processes.
    pub archive_enabled: bool,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            archive_enabled: true,
        }
    }
}

/// Collaborators of the intake pipeline.
pub struct IntakeDependencies {
    pub parsers: DocumentParserRegistry,
    pub delegation: Arc<dyn DelegationApi>,
    pub registry: Arc<dyn IdempotencyRegistry>,
    pub archive: Arc<dyn ArchiveStore>,
    pub initiator: Arc<dyn ProcessInitiator>,
    pub time_source: Arc<dyn TimeSource>,
}

pub struct IncomingMessageService {
    deps: IntakeDependencies,
    config: IntakeConfig,
}

/// Control flow of one stage: a rejection or a hard failure.
enum Halt {
    Reject(RejectReason),
    Fail(IncomingMessageError),
}

impl From<RejectReason> for Halt {
    fn from(reason: RejectReason) -> Self {
        Self::Reject(reason)
    }
}

impl From<IncomingMessageError> for Halt {
    fn from(err: IncomingMessageError) -> Self {
        Self::Fail(err)
    }
}

impl IncomingMessageService {
    #[must_use]
    pub fn new(deps: IntakeDependencies, config: IntakeConfig) -> Self {
        Self { deps, config }
    }

    fn parse(
        &self,
        raw: &[u8],
        format: &DocumentFormat,
        document_type: &IncomingDocumentType,
    ) -> Result<IncomingMessage, RejectReason> {
        let parser = self.deps.parsers.get(format, document_type).ok_or_else(|| {
            RejectReason::UnsupportedDocumentFormat {
                format: format.clone(),
                document_type: document_type.clone(),
            }
        })?;
        let mut message = parser.parse(raw).map_err(|e| RejectReason::InvalidStructure {
            detail: e.detail,
        })?;
        // The declared format decides the rejection code table.
        message.format = format.clone();
        Ok(message)
    }

    /// Resolves who each transaction is for, in transaction order.
    async fn authorize(
        &self,
        caller: &AuthenticatedActor,
        message: &IncomingMessage,
    ) -> Result<Vec<EffectiveActor>, Halt> {
        AuthorizationRules::validate_sender(caller, message)?;
        AuthorizationRules::validate_role(message)?;

        let mut effective = Vec::with_capacity(message.transactions.len());
        for transaction in &message.transactions {
            let actor = self.effective_actor(caller, message, transaction).await?;
            if actor.role == ActorRole::ENERGY_SUPPLIER {
                if let Some(supplier) = &transaction.energy_supplier_id {
                    if *supplier != actor.actor_number {
                        return Err(RejectReason::EnergySupplierMismatch {
                            energy_supplier: supplier.to_string(),
                        }
                        .into());
                    }
                }
            }
            effective.push(actor);
        }
        Ok(effective)
    }

    async fn effective_actor(
        &self,
        caller: &AuthenticatedActor,
        message: &IncomingMessage,
        transaction: &IncomingTransaction,
    ) -> Result<EffectiveActor, Halt> {
        // Acting for anyone else always goes through the resolver.
        let acts_for_other = transaction
            .original_actor
            .as_ref()
            .is_some_and(|original| caller.needs_delegation_for(original));
        let needs_delegation = caller.role.is_delegated() || acts_for_other;

        if !needs_delegation {
            return Ok(EffectiveActor {
                actor_number: transaction
                    .original_actor
                    .clone()
                    .unwrap_or_else(|| caller.actor_number.clone()),
                role: message.sender_role.clone(),
                grid_areas: transaction.grid_area.iter().cloned().collect(),
                delegated: false,
            });
        }

        let query = DelegationQuery {
            requesting_actor: caller.actor_number.clone(),
            claimed_original_actor: transaction.original_actor.clone(),
            role: message.sender_role.clone(),
            grid_area: transaction.grid_area.clone(),
            process_type: message.document_type.process_type(),
            as_of: self.deps.time_source.now(),
        };
        match self.deps.delegation.resolve_effective_actor(query).await {
            Ok(original) => Ok(EffectiveActor {
                grid_areas: match &transaction.grid_area {
                    Some(grid_area) => vec![grid_area.clone()],
                    None => original.grid_areas,
                },
                actor_number: original.actor_number,
                role: original.role,
                delegated: true,
            }),
            Err(DelegationError::Denied(denied)) => Err(RejectReason::DelegationDenied {
                detail: denied.to_string(),
            }
            .into()),
            Err(err) => {
                error!("[eh-02] Delegation lookup failed: {err}");
                Err(IncomingMessageError::Delegation(err.to_string()).into())
            }
        }
    }

    async fn run(
        &self,
        raw: &[u8],
        format: &DocumentFormat,
        document_type: &IncomingDocumentType,
        caller: &AuthenticatedActor,
    ) -> Result<ReceiveResponse, Halt> {
        let message = self.parse(raw, format, document_type)?;
        let effective = self.authorize(caller, &message).await?;
        let validated = validate_structure(&message)?;

        match self
            .deps
            .registry
            .try_register(
                &message.sender_number,
                &validated.message_id,
                &validated.transaction_ids,
            )
            .await
            .map_err(IncomingMessageError::from)?
        {
            RegistrationOutcome::Registered => {}
            RegistrationOutcome::DuplicateMessageId => {
                return Err(RejectReason::DuplicateMessageId {
                    message_id: validated.message_id,
                }
                .into());
            }
            RegistrationOutcome::DuplicateTransactionId(transaction_id) => {
                return Err(RejectReason::DuplicateTransactionId { transaction_id }.into());
            }
        }

        let received_at = self.deps.time_source.now();
        if self.config.archive_enabled
            && message.document_type != IncomingDocumentType::NOTIFY_VALIDATED_MEASURE_DATA
        {
            let reference =
                ArchiveReference::new(&message.sender_number, received_at, &validated.message_id);
            self.deps
                .archive
                .store(&message.document_type, &reference, raw.to_vec())
                .await
                .map_err(IncomingMessageError::from)?;
            debug!(reference = %reference, "[eh-02] Document archived");
        }

        // Every registered transaction gets its process; the first failure is
        // reported once all have been tried.
        let mut process_ids = Vec::with_capacity(message.transactions.len());
        let mut first_failure = None;
        for ((transaction, transaction_id), actor) in message
            .transactions
            .iter()
            .zip(validated.transaction_ids.iter())
            .zip(effective.iter())
        {
            let request = InitiateProcessRequest::build(
                &message,
                &validated.message_id,
                transaction,
                transaction_id.clone(),
                actor,
            );
            match self.deps.initiator.initiate(request).await {
                Ok(process_id) => process_ids.push(process_id),
                Err(source) => {
                    error!(
                        message_id = %validated.message_id,
                        transaction_id = %transaction_id,
                        "[eh-02] Process initiation failed after registration: {source}"
                    );
                    first_failure.get_or_insert(IncomingMessageError::ProcessInitiation {
                        message_id: validated.message_id.clone(),
                        transaction_id: transaction_id.clone(),
                        source,
                    });
                }
            }
        }
        if let Some(err) = first_failure {
            return Err(Halt::Fail(err));
        }

        info!(
            message_id = %validated.message_id,
            sender = %message.sender_number,
            processes = process_ids.len(),
            "[eh-02] Message accepted"
        );
        Ok(ReceiveResponse::Accepted {
            message_id: validated.message_id,
            process_ids,
        })
    }
}

#[async_trait]
impl IncomingMessageApi for IncomingMessageService {
    async fn receive(
        &self,
        raw: &[u8],
        format: DocumentFormat,
        document_type: IncomingDocumentType,
        response_format: DocumentFormat,
        caller: &AuthenticatedActor,
    ) -> Result<ReceiveResponse, IncomingMessageError> {
        match self.run(raw, &format, &document_type, caller).await {
            Ok(response) => Ok(response),
            Err(Halt::Reject(reason)) => {
                let rejection = Rejection::new(reason, &format, response_format);
                warn!(
                    caller = %caller.actor_number,
                    document_type = %document_type,
                    code = rejection.code,
                    "[eh-02] Message rejected: {}",
                    rejection.message
                );
                Ok(ReceiveResponse::Rejected(rejection))
            }
            Err(Halt::Fail(err)) => Err(err),
        }
    }
}
