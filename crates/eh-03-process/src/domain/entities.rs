//! # Process Aggregate
//!
//! ```text
//! Initialized ──mark_sent──→ Sent ──accepted (all grid areas)──→ Accepted
//!      │                       │
//!      └───────────────────────┴──rejected──────────────────────→ Rejected
//! ```
//!
//! `Accepted` and `Rejected` are sticky. The outgoing message for an outcome
//! is produced once, tracked by `outcome_emitted` rather than by the state
//! label, so a redelivered event is a no-op.
//!
//! Outcome events are accepted in `Initialized` as well as `Sent`: the
//! response can overtake the bookkeeping of the dispatch.
//!
//! Two claims are stored on the aggregate and taken with a versioned save:
//! the dispatch claim (one sender per request) and the outbox claim (one
//! deliverer per batch of outgoing messages). Outgoing messages stay in the
//! outbox until the scheduler has taken them.

use super::errors::ProcessError;
use serde::{Deserialize, Serialize};
use shared_types::{
    AcceptedSeries, ActorNumber, ActorRole, BusinessReason, DownstreamRequest, GridAreaCode,
    InboxEvent, MessageId, MeteringPointType, OutcomeKind, OutgoingMessage, OutgoingPayload,
    Period, ProcessId, ProcessType, RejectedReason, SettlementMethod, SettlementVersion,
    Timestamp, TransactionId,
};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessState {
    Initialized,
    Sent,
    Accepted,
    Rejected,
}

impl ProcessState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }
}

/// Command creating a process for one accepted business transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitiateProcess {
    pub message_id: MessageId,
    pub business_transaction_id: TransactionId,
    pub process_type: ProcessType,
    pub business_reason: BusinessReason,
    pub requested_by: ActorNumber,
    pub original_actor: ActorNumber,
    pub original_actor_role: ActorRole,
    pub period: Period,
    /// Grid areas a response is expected for. Empty means any.
    pub grid_areas: Vec<GridAreaCode>,
    pub metering_point_type: Option<MeteringPointType>,
    pub settlement_method: Option<SettlementMethod>,
    pub settlement_version: Option<SettlementVersion>,
    pub energy_supplier_id: Option<ActorNumber>,
    pub balance_responsible_id: Option<ActorNumber>,
}

/// Side effects produced by the aggregate. Kept in the outbox until delivered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProcessDomainEvent {
    OutgoingMessageRequested(OutgoingMessage),
}

/// Result of applying an inbox event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The process reached this terminal state.
    Transitioned(ProcessState),
    /// Event buffered; the response is not complete yet.
    Awaiting,
    /// The outcome was already produced. Nothing changed.
    AlreadyApplied,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    id: ProcessId,
    version: u64,
    request: InitiateProcess,
    state: ProcessState,
    outcome_emitted: bool,
    created_at: Timestamp,
    /// Series received through `Accepted` events, not yet complete.
    received_series: Vec<AcceptedSeries>,
    /// Partial responses by part id.
    parts: BTreeMap<Uuid, Vec<AcceptedSeries>>,
    /// Part ids referenced by receipts so far.
    receipted_parts: BTreeSet<Uuid>,
    /// A sender has claimed the downstream dispatch.
    #[serde(default)]
    dispatch_claimed: bool,
    /// Outgoing messages not yet accepted by the scheduler.
    domain_events: Vec<ProcessDomainEvent>,
    /// A deliverer has claimed the outbox.
    #[serde(default)]
    outbox_claimed: bool,
}

impl Process {
    #[must_use]
    pub fn new(id: ProcessId, request: InitiateProcess, created_at: Timestamp) -> Self {
        Self {
            id,
            version: 0,
            request,
            state: ProcessState::Initialized,
            outcome_emitted: false,
            created_at,
            received_series: Vec::new(),
            parts: BTreeMap::new(),
            receipted_parts: BTreeSet::new(),
            dispatch_claimed: false,
            domain_events: Vec::new(),
            outbox_claimed: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> ProcessId {
        self.id
    }

    /// Storage version for optimistic concurrency.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    #[must_use]
    pub fn state(&self) -> ProcessState {
        self.state
    }

    #[must_use]
    pub fn outcome_emitted(&self) -> bool {
        self.outcome_emitted
    }

    #[must_use]
    pub fn request(&self) -> &InitiateProcess {
        &self.request
    }

    #[must_use]
    pub fn business_transaction_id(&self) -> &TransactionId {
        &self.request.business_transaction_id
    }

    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    #[must_use]
    pub fn expected_grid_areas(&self) -> BTreeSet<GridAreaCode> {
        self.request.grid_areas.iter().cloned().collect()
    }

    /// Undelivered side effects, oldest first.
    #[must_use]
    pub fn domain_events(&self) -> &[ProcessDomainEvent] {
        &self.domain_events
    }

    #[must_use]
    pub fn dispatch_claimed(&self) -> bool {
        self.dispatch_claimed
    }

    #[must_use]
    pub fn outbox_claimed(&self) -> bool {
        self.outbox_claimed
    }

    /// Reserves the downstream dispatch for the caller.
    ///
    /// # Errors
    /// `AlreadySent` once the process left `Initialized` or another caller
    /// holds the claim.
    pub fn claim_dispatch(&mut self) -> Result<DownstreamRequest, ProcessError> {
        if self.state != ProcessState::Initialized || self.dispatch_claimed {
            return Err(ProcessError::AlreadySent {
                process_id: self.id,
                state: self.state,
            });
        }
        self.dispatch_claimed = true;
        Ok(self.downstream_request())
    }

    /// Gives the dispatch claim back after a failed send.
    pub fn release_dispatch(&mut self) {
        self.dispatch_claimed = false;
    }

    /// Reserves every undelivered event. `None` when the outbox is empty or
    /// already claimed.
    pub fn claim_outbox(&mut self) -> Option<Vec<ProcessDomainEvent>> {
        if self.outbox_claimed || self.domain_events.is_empty() {
            return None;
        }
        self.outbox_claimed = true;
        Some(self.domain_events.clone())
    }

    /// Drops `delivered` from the outbox and releases the claim.
    pub fn settle_outbox(&mut self, delivered: &[ProcessDomainEvent]) {
        for event in delivered {
            if let Some(position) = self.domain_events.iter().position(|e| e == event) {
                self.domain_events.remove(position);
            }
        }
        self.outbox_claimed = false;
    }

    /// The request handed to the calculation engine.
    #[must_use]
    pub fn downstream_request(&self) -> DownstreamRequest {
        let r = &self.request;
        DownstreamRequest {
            process_id: self.id,
            process_type: r.process_type.clone(),
            business_reason: r.business_reason.clone(),
            period: r.period,
            grid_areas: r.grid_areas.clone(),
            metering_point_type: r.metering_point_type.clone(),
            settlement_method: r.settlement_method.clone(),
            settlement_version: r.settlement_version.clone(),
            energy_supplier_id: r.energy_supplier_id.clone(),
            balance_responsible_id: r.balance_responsible_id.clone(),
            requested_for_actor: r.original_actor.clone(),
            requested_for_role: r.original_actor_role.clone(),
        }
    }

    /// `Initialized -> Sent`. Allowed once.
    pub fn mark_sent(&mut self) -> Result<(), ProcessError> {
        if self.state != ProcessState::Initialized {
            return Err(ProcessError::AlreadySent {
                process_id: self.id,
                state: self.state,
            });
        }
        self.state = ProcessState::Sent;
        self.dispatch_claimed = false;
        Ok(())
    }

    /// Applies one inbox event. The caller has already matched the process id.
    ///
    /// On error the response buffers are left as they were before the call.
    pub fn apply(&mut self, event: &InboxEvent) -> Result<ApplyOutcome, ProcessError> {
        let snapshot = (
            self.received_series.clone(),
            self.parts.clone(),
            self.receipted_parts.clone(),
        );
        let result = self.apply_event(event);
        if result.is_err() {
            (self.received_series, self.parts, self.receipted_parts) = snapshot;
        }
        result
    }

    fn apply_event(&mut self, event: &InboxEvent) -> Result<ApplyOutcome, ProcessError> {
        match event {
            InboxEvent::Accepted { series, .. } => {
                if let Some(done) = self.guard_outcome(OutcomeKind::Accepted)? {
                    return Ok(done);
                }
                for s in series {
                    if !self.received_series.contains(s) {
                        self.received_series.push(s.clone());
                    }
                }
                self.evaluate_acceptance()
            }
            InboxEvent::Rejected { reasons, .. } => {
                if let Some(done) = self.guard_outcome(OutcomeKind::Rejected)? {
                    return Ok(done);
                }
                self.reject(reasons);
                Ok(ApplyOutcome::Transitioned(ProcessState::Rejected))
            }
            InboxEvent::PartialResponse {
                part_id, series, ..
            } => {
                if let Some(done) = self.guard_outcome(OutcomeKind::Accepted)? {
                    return Ok(done);
                }
                self.parts.entry(*part_id).or_insert_with(|| series.clone());
                if self.receipted_parts.is_empty() {
                    Ok(ApplyOutcome::Awaiting)
                } else {
                    self.evaluate_acceptance()
                }
            }
            InboxEvent::Receipt { part_ids, .. } => {
                if let Some(done) = self.guard_outcome(OutcomeKind::Accepted)? {
                    return Ok(done);
                }
                self.receipted_parts.extend(part_ids.iter().copied());
                self.evaluate_acceptance()
            }
        }
    }

    /// `Some` when the outcome is already settled for `attempted`.
    fn guard_outcome(
        &self,
        attempted: OutcomeKind,
    ) -> Result<Option<ApplyOutcome>, ProcessError> {
        let same = match attempted {
            OutcomeKind::Accepted => ProcessState::Accepted,
            OutcomeKind::Rejected => ProcessState::Rejected,
        };
        if self.state == same && self.outcome_emitted {
            return Ok(Some(ApplyOutcome::AlreadyApplied));
        }
        if self.state.is_terminal() && self.state != same {
            return Err(ProcessError::ConflictingOutcome {
                process_id: self.id,
                current: self.state,
                attempted,
            });
        }
        Ok(None)
    }

    /// Series that count towards completeness: `Accepted` events plus every
    /// receipted part that has arrived. `None` while a receipted part is missing.
    fn complete_series(&self) -> Option<Vec<AcceptedSeries>> {
        let mut all = self.received_series.clone();
        for part_id in &self.receipted_parts {
            let part = self.parts.get(part_id)?;
            for s in part {
                if !all.contains(s) {
                    all.push(s.clone());
                }
            }
        }
        Some(all)
    }

    fn evaluate_acceptance(&mut self) -> Result<ApplyOutcome, ProcessError> {
        let Some(series) = self.complete_series() else {
            return Ok(ApplyOutcome::Awaiting);
        };
        if series.is_empty() {
            return Ok(ApplyOutcome::Awaiting);
        }

        let expected = self.expected_grid_areas();
        let received: BTreeSet<GridAreaCode> =
            series.iter().map(|s| s.grid_area.clone()).collect();

        if !expected.is_empty() {
            let unexpected: Vec<GridAreaCode> =
                received.difference(&expected).cloned().collect();
            if !unexpected.is_empty() {
                return Err(ProcessError::UnexpectedGridAreas {
                    process_id: self.id,
                    unexpected,
                });
            }
            if received.len() < expected.len() {
                return Ok(ApplyOutcome::Awaiting);
            }
        }

        self.state = ProcessState::Accepted;
        self.outcome_emitted = true;
        self.dispatch_claimed = false;
        for s in series {
            let message = self.outgoing(OutgoingPayload::Accepted(s));
            self.domain_events
                .push(ProcessDomainEvent::OutgoingMessageRequested(message));
        }
        self.received_series.clear();
        self.parts.clear();
        self.receipted_parts.clear();
        Ok(ApplyOutcome::Transitioned(ProcessState::Accepted))
    }

    fn reject(&mut self, reasons: &[RejectedReason]) {
        let mut union: Vec<RejectedReason> = Vec::with_capacity(reasons.len());
        for reason in reasons {
            if !union.contains(reason) {
                union.push(reason.clone());
            }
        }
        self.state = ProcessState::Rejected;
        self.outcome_emitted = true;
        self.dispatch_claimed = false;
        let message = self.outgoing(OutgoingPayload::Rejected(union));
        self.domain_events
            .push(ProcessDomainEvent::OutgoingMessageRequested(message));
    }

    /// Outgoing messages go to the original actor's mailbox.
    fn outgoing(&self, payload: OutgoingPayload) -> OutgoingMessage {
        OutgoingMessage {
            process_id: self.id,
            business_transaction_id: self.request.business_transaction_id.clone(),
            business_reason: self.request.business_reason.clone(),
            receiver: self.request.original_actor.clone(),
            document_receiver_role: self.request.original_actor_role.clone(),
            queue_role: self.request.original_actor_role.for_actor_message_queue(),
            payload,
        }
    }
}
