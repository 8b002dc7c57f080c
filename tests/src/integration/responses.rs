//! # Response Handling Tests
//!
//! Calculation responses arrive at least once and in parts; the requester
//! still gets exactly one answer per series.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use eh_02_incoming_messages::ReceiveResponse;
    use eh_03_process::{ProcessApi, ProcessState};
    use shared_bus::{EventPublisher, HubEvent};
    use shared_types::{ActorRole, InboxEvent, OutgoingPayload, ProcessId};

    use crate::integration::fixtures::*;

    fn accepted_process(response: ReceiveResponse) -> ProcessId {
        match response {
            ReceiveResponse::Accepted { process_ids, .. } => process_ids[0],
            ReceiveResponse::Rejected(rejection) => panic!("rejected: {}", rejection.message),
        }
    }

    #[tokio::test]
    async fn test_duplicate_response_produces_one_message() {
        let runtime = memory_runtime();
        let container = runtime.container();
        let _engine = CalculationEngineStub::spawn(Arc::clone(&container.event_bus), accept_twice);
        let mut mailbox = BusRecorder::outgoing(&container.event_bus);
        let mut dead_letters = BusRecorder::dead_letters(&container.event_bus);

        let response = submit(
            &runtime,
            &supplier_request("msg-1", "tx-1", "512"),
            &caller(SUPPLIER, ActorRole::ENERGY_SUPPLIER),
        )
        .await;
        assert!(response.is_accepted());

        mailbox.messages(1).await;
        mailbox.assert_quiet().await;
        dead_letters.assert_quiet().await;

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_partial_responses_complete_on_receipt() {
        let runtime = memory_runtime();
        let container = runtime.container();
        let _engine = CalculationEngineStub::spawn(
            Arc::clone(&container.event_bus),
            respond_in_parts(&["512", "543"]),
        );
        let mut mailbox = BusRecorder::outgoing(&container.event_bus);

        // No grid area: the supplier asks for every area it supplies.
        let raw = request_document(
            "msg-1",
            SUPPLIER,
            &ActorRole::ENERGY_SUPPLIER,
            &[SeriesSpec::new("tx-1").energy_supplier(SUPPLIER)],
        );
        let response = submit(&runtime, &raw, &caller(SUPPLIER, ActorRole::ENERGY_SUPPLIER)).await;
        let process_id = accepted_process(response);

        let messages = mailbox.messages(2).await;
        let areas: BTreeSet<String> = messages
            .iter()
            .map(|m| match &m.payload {
                OutgoingPayload::Accepted(series) => series.grid_area.to_string(),
                OutgoingPayload::Rejected(_) => panic!("expected accepted payload"),
            })
            .collect();
        assert_eq!(areas, BTreeSet::from(["512".to_string(), "543".to_string()]));
        assert!(messages.iter().all(|m| m.process_id == process_id));
        assert_eq!(
            container.processes.get(process_id).await.unwrap().unwrap().state(),
            ProcessState::Accepted
        );

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_conflicting_outcome_is_dead_lettered() {
        let runtime = memory_runtime();
        let container = runtime.container();
        let _engine = CalculationEngineStub::spawn(Arc::clone(&container.event_bus), accept_all);
        let mut mailbox = BusRecorder::outgoing(&container.event_bus);
        let mut dead_letters = BusRecorder::dead_letters(&container.event_bus);

        let response = submit(
            &runtime,
            &supplier_request("msg-1", "tx-1", "512"),
            &caller(SUPPLIER, ActorRole::ENERGY_SUPPLIER),
        )
        .await;
        let process_id = accepted_process(response);
        mailbox.messages(1).await;

        let late = InboxEvent::Rejected {
            process_id,
            reasons: Vec::new(),
        };
        container
            .event_bus
            .publish(HubEvent::InboxEventReceived(late))
            .await;

        match dead_letters.next().await {
            Some(HubEvent::DeadLettered {
                process_id: parked, ..
            }) => assert_eq!(parked, process_id),
            other => panic!("expected dead letter, got {other:?}"),
        }
        mailbox.assert_quiet().await;
        assert_eq!(
            container.processes.get(process_id).await.unwrap().unwrap().state(),
            ProcessState::Accepted
        );

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_response_for_unknown_process_is_dead_lettered() {
        let runtime = memory_runtime();
        let container = runtime.container();
        let mut dead_letters = BusRecorder::dead_letters(&container.event_bus);

        let unknown = ProcessId::new();
        container
            .event_bus
            .publish(HubEvent::InboxEventReceived(InboxEvent::Receipt {
                process_id: unknown,
                part_ids: Vec::new(),
            }))
            .await;

        match dead_letters.next().await {
            Some(HubEvent::DeadLettered {
                process_id, reason, ..
            }) => {
                assert_eq!(process_id, unknown);
                assert!(reason.contains(&unknown.to_string()));
            }
            other => panic!("expected dead letter, got {other:?}"),
        }

        runtime.shutdown().await;
    }
}
