//! # Process Service
//!
//! Loads the aggregate, applies a command or event and saves it with an
//! optimistic version check. A version conflict reloads and re-applies; the
//! aggregate's idempotence makes the retry safe.
//!
//! ```text
//! send_request:  claim dispatch (save) → dispatch → mark Sent (save)
//!                                           └─ failure → release claim (save)
//! inbox event:   apply + claim outbox (save) → enqueue each → settle (save)
//! ```
//!
//! Messages the scheduler did not take stay in the outbox. Redelivered
//! events and the pending sweep pick them up again.

use crate::domain::{
    ApplyOutcome, InitiateProcess, Process, ProcessDomainEvent, ProcessError, ProcessState,
};
use crate::ports::inbound::ProcessApi;
use crate::ports::outbound::{
    DownstreamDispatcher, OutgoingMessageScheduler, ProcessRepository, TimeSource,
};
use async_trait::async_trait;
use shared_types::{DownstreamRequest, InboxEvent, ProcessId};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub struct ProcessConfig {
    /// Attempts per operation before giving up on concurrent updates.
    pub max_retries: u32,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self { max_retries: 8 }
    }
}

pub struct ProcessService {
    repository: Arc<dyn ProcessRepository>,
    dispatcher: Arc<dyn DownstreamDispatcher>,
    scheduler: Arc<dyn OutgoingMessageScheduler>,
    time_source: Arc<dyn TimeSource>,
    config: ProcessConfig,
}

impl ProcessService {
    #[must_use]
    pub fn new(
        repository: Arc<dyn ProcessRepository>,
        dispatcher: Arc<dyn DownstreamDispatcher>,
        scheduler: Arc<dyn OutgoingMessageScheduler>,
        time_source: Arc<dyn TimeSource>,
        config: ProcessConfig,
    ) -> Self {
        Self {
            repository,
            dispatcher,
            scheduler,
            time_source,
            config,
        }
    }

    async fn load(&self, id: ProcessId) -> Result<Process, ProcessError> {
        self.repository
            .get(id)
            .await?
            .ok_or(ProcessError::NotFound { process_id: id })
    }

    fn exhausted(&self, id: ProcessId) -> ProcessError {
        ProcessError::RetriesExhausted {
            process_id: id,
            attempts: self.config.max_retries,
        }
    }

    /// Load, mutate, save; reloads on version conflict. `change` returning
    /// `Ok(None)` means nothing to save.
    async fn update<T, F>(&self, id: ProcessId, mut change: F) -> Result<Option<T>, ProcessError>
    where
        T: Send,
        F: FnMut(&mut Process) -> Result<Option<T>, ProcessError> + Send,
    {
        for attempt in 0..self.config.max_retries {
            let mut process = self.load(id).await?;
            let Some(value) = change(&mut process)? else {
                return Ok(None);
            };
            match self.repository.save(&process).await {
                Ok(()) => return Ok(Some(value)),
                Err(ProcessError::VersionConflict { .. }) => {
                    debug!(process_id = %id, attempt, "[eh-03] Concurrent update, reloading");
                }
                Err(e) => return Err(e),
            }
        }
        Err(self.exhausted(id))
    }

    async fn claim_dispatch(&self, id: ProcessId) -> Result<DownstreamRequest, ProcessError> {
        self.update(id, |process| process.claim_dispatch().map(Some))
            .await?
            .ok_or_else(|| self.exhausted(id))
    }

    async fn release_dispatch(&self, id: ProcessId) -> Result<(), ProcessError> {
        self.update(id, |process| {
            if !process.dispatch_claimed() {
                return Ok(None);
            }
            process.release_dispatch();
            Ok(Some(()))
        })
        .await?;
        Ok(())
    }

    async fn mark_sent(&self, id: ProcessId) -> Result<(), ProcessError> {
        self.update(id, |process| {
            if process.state() != ProcessState::Initialized {
                debug!(process_id = %id, state = ?process.state(), "[eh-03] Response arrived before send was recorded");
                return Ok(None);
            }
            process.mark_sent()?;
            Ok(Some(()))
        })
        .await?;
        Ok(())
    }

    /// Hands claimed events to the scheduler in order, stopping at the first
    /// failure, then settles the outbox with what was delivered.
    async fn deliver(
        &self,
        id: ProcessId,
        events: Vec<ProcessDomainEvent>,
    ) -> Result<usize, ProcessError> {
        let mut delivered = 0;
        let mut failure = None;
        for event in &events {
            let ProcessDomainEvent::OutgoingMessageRequested(message) = event;
            debug!(
                process_id = %message.process_id,
                receiver = %message.receiver,
                outcome = ?message.outcome(),
                "[eh-03] Scheduling outgoing message"
            );
            if let Err(e) = self.scheduler.enqueue(message.clone()).await {
                warn!(process_id = %id, pending = events.len() - delivered, "[eh-03] Outgoing message kept in outbox: {e}");
                failure = Some(e);
                break;
            }
            delivered += 1;
        }

        let settled = &events[..delivered];
        self.update(id, |process| {
            process.settle_outbox(settled);
            Ok(Some(()))
        })
        .await?;

        match failure {
            Some(e) => Err(e),
            None => Ok(delivered),
        }
    }

    /// Delivers whatever is left in the outbox, unless someone else is.
    async fn deliver_outbox(&self, id: ProcessId) -> Result<usize, ProcessError> {
        match self.update(id, |process| Ok(process.claim_outbox())).await? {
            Some(events) => self.deliver(id, events).await,
            None => Ok(0),
        }
    }
}

#[async_trait]
impl ProcessApi for ProcessService {
    async fn initiate(&self, command: InitiateProcess) -> Result<ProcessId, ProcessError> {
        let id = ProcessId::new();
        info!(
            process_id = %id,
            transaction_id = %command.business_transaction_id,
            process_type = %command.process_type,
            "[eh-03] Process initiated"
        );
        let process = Process::new(id, command, self.time_source.now());
        self.repository.insert(process).await?;
        Ok(id)
    }

    async fn send_request(&self, id: ProcessId) -> Result<(), ProcessError> {
        let request = self.claim_dispatch(id).await?;

        if let Err(e) = self.dispatcher.dispatch(request).await {
            warn!(process_id = %id, "[eh-03] Dispatch failed, process stays Initialized: {e}");
            if let Err(release) = self.release_dispatch(id).await {
                error!(process_id = %id, "[eh-03] Dispatch claim not released: {release}");
            }
            return Err(e);
        }
        self.mark_sent(id).await?;
        info!(process_id = %id, "[eh-03] Request sent");
        Ok(())
    }

    async fn apply_inbox_event(&self, event: InboxEvent) -> Result<ApplyOutcome, ProcessError> {
        let id = event.process_id();
        for attempt in 0..self.config.max_retries {
            let mut process = match self.load(id).await {
                Ok(process) => process,
                Err(e @ ProcessError::NotFound { .. }) => {
                    error!(process_id = %id, kind = event.kind(), "[eh-03] Inbox event for unknown process");
                    return Err(e);
                }
                Err(e) => return Err(e),
            };

            let outcome = match process.apply(&event) {
                Ok(outcome) => outcome,
                Err(e) => {
                    if e.is_fatal() {
                        error!(process_id = %id, kind = event.kind(), "[eh-03] Protocol violation: {e}");
                    }
                    return Err(e);
                }
            };
            if outcome == ApplyOutcome::AlreadyApplied {
                debug!(process_id = %id, kind = event.kind(), "[eh-03] Duplicate event ignored");
                self.deliver_outbox(id).await?;
                return Ok(outcome);
            }

            // Claimed in the same save that records the outcome.
            let claimed = process.claim_outbox();
            match self.repository.save(&process).await {
                Ok(()) => {}
                Err(ProcessError::VersionConflict { .. }) => {
                    debug!(process_id = %id, attempt, "[eh-03] Concurrent update, reloading");
                    continue;
                }
                Err(e) => return Err(e),
            }

            if let ApplyOutcome::Transitioned(state) = outcome {
                info!(process_id = %id, state = ?state, "[eh-03] Process completed");
            }
            if let Some(events) = claimed {
                self.deliver(id, events).await?;
            }
            return Ok(outcome);
        }
        Err(self.exhausted(id))
    }

    async fn send_pending_requests(&self) -> Result<usize, ProcessError> {
        let pending = self
            .repository
            .find_by_state(ProcessState::Initialized)
            .await?;
        let mut sent = 0;
        for process in pending.iter().filter(|p| !p.dispatch_claimed()) {
            match self.send_request(process.id()).await {
                Ok(()) => sent += 1,
                Err(e) => warn!(process_id = %process.id(), "[eh-03] Pending request not sent: {e}"),
            }
        }
        if sent > 0 {
            info!(sent, "[eh-03] Pending requests re-dispatched");
        }

        for process in self.repository.find_with_undelivered_outbox().await? {
            match self.deliver_outbox(process.id()).await {
                Ok(0) => {}
                Ok(delivered) => info!(process_id = %process.id(), delivered, "[eh-03] Outbox redelivered"),
                Err(e) => warn!(process_id = %process.id(), "[eh-03] Outbox still undelivered: {e}"),
            }
        }
        Ok(sent)
    }

    async fn get(&self, id: ProcessId) -> Result<Option<Process>, ProcessError> {
        self.repository.get(id).await
    }
}
