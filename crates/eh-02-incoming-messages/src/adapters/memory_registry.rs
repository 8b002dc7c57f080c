//! In-memory idempotency registry.

use crate::domain::RegistryError;
use crate::ports::{IdempotencyRegistry, RegistrationOutcome};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{ActorNumber, MessageId, TransactionId};
use std::collections::HashSet;

#[derive(Default)]
struct Registered {
    messages: HashSet<(ActorNumber, MessageId)>,
    transactions: HashSet<(ActorNumber, TransactionId)>,
}

/// Both id spaces behind one lock, so a registration is all-or-nothing.
#[derive(Default)]
pub struct InMemoryIdempotencyRegistry {
    inner: Mutex<Registered>,
}

impl InMemoryIdempotencyRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn message_count(&self) -> usize {
        self.inner.lock().messages.len()
    }

    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.inner.lock().transactions.len()
    }
}

#[async_trait]
impl IdempotencyRegistry for InMemoryIdempotencyRegistry {
    async fn try_register(
        &self,
        sender: &ActorNumber,
        message_id: &MessageId,
        transaction_ids: &[TransactionId],
    ) -> Result<RegistrationOutcome, RegistryError> {
        let mut inner = self.inner.lock();

        if inner
            .messages
            .contains(&(sender.clone(), message_id.clone()))
        {
            return Ok(RegistrationOutcome::DuplicateMessageId);
        }
        if let Some(existing) = transaction_ids
            .iter()
            .find(|id| inner.transactions.contains(&(sender.clone(), (*id).clone())))
        {
            return Ok(RegistrationOutcome::DuplicateTransactionId(existing.clone()));
        }

        inner.messages.insert((sender.clone(), message_id.clone()));
        for id in transaction_ids {
            inner.transactions.insert((sender.clone(), id.clone()));
        }
        Ok(RegistrationOutcome::Registered)
    }

    async fn contains_transaction(
        &self,
        sender: &ActorNumber,
        transaction_id: &TransactionId,
    ) -> Result<bool, RegistryError> {
        Ok(self
            .inner
            .lock()
            .transactions
            .contains(&(sender.clone(), transaction_id.clone())))
    }
}
