//! # Process Initiator Adapter
//!
//! Bridges eh-02 intake to the eh-03 orchestrator: creates the process for an
//! accepted transaction and sends its downstream request.
//!
//! A failed send is reported to the caller. The process is already stored
//! `Initialized`, so the pending sweep still sends it.

use std::sync::Arc;

use async_trait::async_trait;
use eh_02_incoming_messages::{InitiateProcessRequest, InitiationError, ProcessInitiator};
use eh_03_process::{InitiateProcess, ProcessApi};
use shared_types::ProcessId;
use tracing::error;

pub struct ProcessInitiatorAdapter {
    processes: Arc<dyn ProcessApi>,
}

impl ProcessInitiatorAdapter {
    pub fn new(processes: Arc<dyn ProcessApi>) -> Self {
        Self { processes }
    }
}

fn to_command(request: InitiateProcessRequest) -> InitiateProcess {
    InitiateProcess {
        message_id: request.message_id,
        business_transaction_id: request.business_transaction_id,
        process_type: request.process_type,
        business_reason: request.business_reason,
        requested_by: request.requested_by,
        original_actor: request.original_actor,
        original_actor_role: request.original_actor_role,
        period: request.period,
        grid_areas: request.grid_areas,
        metering_point_type: request.metering_point_type,
        settlement_method: request.settlement_method,
        settlement_version: request.settlement_version,
        energy_supplier_id: request.energy_supplier_id,
        balance_responsible_id: request.balance_responsible_id,
    }
}

#[async_trait]
impl ProcessInitiator for ProcessInitiatorAdapter {
    async fn initiate(
        &self,
        request: InitiateProcessRequest,
    ) -> Result<ProcessId, InitiationError> {
        let process_id = self
            .processes
            .initiate(to_command(request))
            .await
            .map_err(|e| InitiationError(e.to_string()))?;

        if let Err(e) = self.processes.send_request(process_id).await {
            error!(process_id = %process_id, "[hub] Request not sent, left for pending sweep: {e}");
            return Err(InitiationError(format!(
                "process {process_id} created but request not sent: {e}"
            )));
        }
        Ok(process_id)
    }
}
