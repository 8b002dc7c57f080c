//! # Request Flow Tests
//!
//! A request travels through the whole hub:
//!
//! ```text
//! [Actor] ──receive──→ [eh-02 intake] ──initiate──→ [eh-03 process]
//!                                                        │
//!                                       DownstreamRequestDispatched
//!                                                        ↓
//!                                            [Calculation engine]
//!                                                        │
//!                                            InboxEventReceived
//!                                                        ↓
//! [Document writer] ←──OutgoingMessageEnqueued── [eh-03 process]
//! ```

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use eh_02_incoming_messages::{IncomingMessageError, ReceiveResponse};
    use eh_03_process::{ProcessApi, ProcessState};
    use shared_bus::EventPublisher;
    use shared_types::{
        ActorRole, DocumentFormat, IncomingDocumentType, OutcomeKind, OutgoingPayload,
    };

    use crate::integration::fixtures::*;

    #[tokio::test]
    async fn test_supplier_request_is_answered_in_its_mailbox() {
        let runtime = memory_runtime();
        let container = runtime.container();
        let engine = CalculationEngineStub::spawn(Arc::clone(&container.event_bus), accept_all);
        let mut mailbox = BusRecorder::outgoing(&container.event_bus);

        let response = submit(
            &runtime,
            &supplier_request("msg-1", "tx-1", "512"),
            &caller(SUPPLIER, ActorRole::ENERGY_SUPPLIER),
        )
        .await;

        let process_ids = match response {
            ReceiveResponse::Accepted { process_ids, .. } => process_ids,
            ReceiveResponse::Rejected(rejection) => panic!("rejected: {}", rejection.message),
        };
        assert_eq!(process_ids.len(), 1);

        let messages = mailbox.messages(1).await;
        let message = &messages[0];
        assert_eq!(message.process_id, process_ids[0]);
        assert_eq!(message.business_transaction_id.as_str(), "tx-1");
        assert_eq!(message.receiver.as_str(), SUPPLIER);
        assert_eq!(message.queue_role, ActorRole::ENERGY_SUPPLIER);
        match &message.payload {
            OutgoingPayload::Accepted(series) => assert_eq!(series.grid_area.as_str(), "512"),
            OutgoingPayload::Rejected(_) => panic!("expected accepted payload"),
        }

        let requests = engine.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].grid_areas, vec![grid("512")]);
        assert_eq!(requests[0].requested_for_actor.as_str(), SUPPLIER);

        let process = container.processes.get(process_ids[0]).await.unwrap().unwrap();
        assert_eq!(process.state(), ProcessState::Accepted);
        assert_eq!(container.archive.len(), 1);

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_engine_rejection_reaches_requester() {
        let runtime = memory_runtime();
        let container = runtime.container();
        let _engine = CalculationEngineStub::spawn(Arc::clone(&container.event_bus), reject_no_data);
        let mut mailbox = BusRecorder::outgoing(&container.event_bus);

        let response = submit(
            &runtime,
            &supplier_request("msg-1", "tx-1", "512"),
            &caller(SUPPLIER, ActorRole::ENERGY_SUPPLIER),
        )
        .await;
        assert!(response.is_accepted());

        let messages = mailbox.messages(1).await;
        assert_eq!(messages[0].outcome(), OutcomeKind::Rejected);
        match &messages[0].payload {
            OutgoingPayload::Rejected(reasons) => assert_eq!(reasons[0].error_code, "E0H"),
            OutgoingPayload::Accepted(_) => panic!("expected rejected payload"),
        }
        mailbox.assert_quiet().await;

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_metered_data_responsible_is_queued_for_grid_operator() {
        let runtime = memory_runtime();
        let container = runtime.container();
        let _engine = CalculationEngineStub::spawn(Arc::clone(&container.event_bus), accept_all);
        let mut mailbox = BusRecorder::outgoing(&container.event_bus);

        let raw = request_document(
            "msg-1",
            GRID_OPERATOR,
            &ActorRole::METERED_DATA_RESPONSIBLE,
            &[SeriesSpec::new("tx-1").grid_area("512")],
        );
        let response = submit(
            &runtime,
            &raw,
            &caller(GRID_OPERATOR, ActorRole::METERED_DATA_RESPONSIBLE),
        )
        .await;
        assert!(response.is_accepted());

        let messages = mailbox.messages(1).await;
        assert_eq!(messages[0].receiver.as_str(), GRID_OPERATOR);
        assert_eq!(
            messages[0].document_receiver_role,
            ActorRole::METERED_DATA_RESPONSIBLE
        );
        assert_eq!(messages[0].queue_role, ActorRole::GRID_OPERATOR);

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_rejected_document_has_no_side_effects() {
        let runtime = memory_runtime();
        let container = runtime.container();
        let engine = CalculationEngineStub::spawn(Arc::clone(&container.event_bus), accept_all);

        let response = submit(
            &runtime,
            b"{ \"RequestAggregatedMeasureData_MarketDocument\": ",
            &caller(SUPPLIER, ActorRole::ENERGY_SUPPLIER),
        )
        .await;
        assert_eq!(response.rejection().unwrap().code, "00001");

        // Sender authenticated as somebody else.
        let response = submit(
            &runtime,
            &supplier_request("msg-2", "tx-2", "512"),
            &caller(OTHER_SUPPLIER, ActorRole::ENERGY_SUPPLIER),
        )
        .await;
        assert_eq!(response.rejection().unwrap().code, "00003");

        assert!(engine.requests().is_empty());
        assert!(container.archive.is_empty());
        assert_eq!(container.event_bus.events_published(), 0);

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_request_without_engine_reports_failure_and_is_recovered_by_sweep() {
        let runtime = memory_runtime();
        let container = runtime.container();

        let result = runtime
            .receive(
                &supplier_request("msg-1", "tx-1", "512"),
                DocumentFormat::JSON,
                IncomingDocumentType::REQUEST_AGGREGATED_MEASURE_DATA,
                DocumentFormat::JSON,
                &caller(SUPPLIER, ActorRole::ENERGY_SUPPLIER),
            )
            .await;
        match result {
            Err(IncomingMessageError::ProcessInitiation { transaction_id, source, .. }) => {
                assert_eq!(transaction_id.as_str(), "tx-1");
                assert!(source.0.contains("request not sent"));
            }
            other => panic!("expected initiation failure, got {other:?}"),
        }

        let engine = CalculationEngineStub::spawn(Arc::clone(&container.event_bus), accept_all);
        let mut mailbox = BusRecorder::outgoing(&container.event_bus);
        assert_eq!(container.processes.send_pending_requests().await.unwrap(), 1);

        let messages = mailbox.messages(1).await;
        assert_eq!(messages[0].business_transaction_id.as_str(), "tx-1");
        let requests = engine.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(messages[0].process_id, requests[0].process_id);

        // The request is already registered, so resubmitting cannot start a second process.
        let retry = submit(
            &runtime,
            &supplier_request("msg-1", "tx-1", "512"),
            &caller(SUPPLIER, ActorRole::ENERGY_SUPPLIER),
        )
        .await;
        assert!(matches!(retry, ReceiveResponse::Rejected(_)));
        assert_eq!(engine.requests().len(), 1);

        runtime.shutdown().await;
    }
}
