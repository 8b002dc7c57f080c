//! In-memory process repository.

use crate::domain::{Process, ProcessError, ProcessState};
use crate::ports::ProcessRepository;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::ProcessId;
use std::collections::HashMap;

#[derive(Default)]
pub struct InMemoryProcessRepository {
    processes: RwLock<HashMap<ProcessId, Process>>,
}

impl InMemoryProcessRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.processes.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processes.read().is_empty()
    }
}

#[async_trait]
impl ProcessRepository for InMemoryProcessRepository {
    async fn insert(&self, mut process: Process) -> Result<(), ProcessError> {
        let mut processes = self.processes.write();
        if processes.contains_key(&process.id()) {
            return Err(ProcessError::AlreadyExists {
                process_id: process.id(),
            });
        }
        process.set_version(1);
        processes.insert(process.id(), process);
        Ok(())
    }

    async fn get(&self, id: ProcessId) -> Result<Option<Process>, ProcessError> {
        Ok(self.processes.read().get(&id).cloned())
    }

    async fn save(&self, process: &Process) -> Result<(), ProcessError> {
        let mut processes = self.processes.write();
        let stored = processes
            .get_mut(&process.id())
            .ok_or(ProcessError::NotFound {
                process_id: process.id(),
            })?;
        if stored.version() != process.version() {
            return Err(ProcessError::VersionConflict {
                process_id: process.id(),
                expected: process.version(),
                actual: stored.version(),
            });
        }
        let mut next = process.clone();
        next.set_version(process.version() + 1);
        *stored = next;
        Ok(())
    }

    async fn find_by_state(&self, state: ProcessState) -> Result<Vec<Process>, ProcessError> {
        let mut found: Vec<Process> = self
            .processes
            .read()
            .values()
            .filter(|p| p.state() == state)
            .cloned()
            .collect();
        found.sort_by_key(Process::created_at);
        Ok(found)
    }

    async fn find_with_undelivered_outbox(&self) -> Result<Vec<Process>, ProcessError> {
        let mut found: Vec<Process> = self
            .processes
            .read()
            .values()
            .filter(|p| !p.domain_events().is_empty() && !p.outbox_claimed())
            .cloned()
            .collect();
        found.sort_by_key(Process::created_at);
        Ok(found)
    }
}
