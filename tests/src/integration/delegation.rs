//! # Delegation Tests
//!
//! A delegate submits on behalf of an energy supplier; the answer goes to
//! the supplier's mailbox while the request stays attributed to the delegate.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use eh_01_delegation::DelegationApi;
    use eh_02_incoming_messages::ReceiveResponse;
    use eh_03_process::ProcessApi;
    use shared_types::ActorRole;

    use crate::integration::fixtures::*;

    fn delegated_request(message_id: &str, transaction_id: &str) -> Vec<u8> {
        request_document(
            message_id,
            DELEGATE,
            &ActorRole::ENERGY_SUPPLIER,
            &[SeriesSpec::new(transaction_id)
                .grid_area("512")
                .energy_supplier(SUPPLIER)
                .original_actor(SUPPLIER)],
        )
    }

    #[tokio::test]
    async fn test_delegated_request_answered_to_delegator() {
        let runtime = memory_runtime();
        let container = runtime.container();
        container
            .delegation
            .register_grant(supplier_grant("512", 1))
            .await
            .unwrap();
        let engine = CalculationEngineStub::spawn(Arc::clone(&container.event_bus), accept_all);
        let mut mailbox = BusRecorder::outgoing(&container.event_bus);

        let response = submit(&runtime, &delegated_request("msg-1", "tx-1"), &delegate_caller()).await;
        let process_id = match response {
            ReceiveResponse::Accepted { process_ids, .. } => process_ids[0],
            ReceiveResponse::Rejected(rejection) => panic!("rejected: {}", rejection.message),
        };

        let messages = mailbox.messages(1).await;
        assert_eq!(messages[0].receiver.as_str(), SUPPLIER);
        assert_eq!(messages[0].queue_role, ActorRole::ENERGY_SUPPLIER);

        let request = &engine.requests()[0];
        assert_eq!(request.requested_for_actor.as_str(), SUPPLIER);
        assert_eq!(request.requested_for_role, ActorRole::ENERGY_SUPPLIER);

        let process = container.processes.get(process_id).await.unwrap().unwrap();
        assert_eq!(process.request().requested_by.as_str(), DELEGATE);
        assert_eq!(process.request().original_actor.as_str(), SUPPLIER);

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_delegate_without_grant_rejected() {
        let runtime = memory_runtime();
        let container = runtime.container();
        let engine = CalculationEngineStub::spawn(Arc::clone(&container.event_bus), accept_all);

        let response = submit(&runtime, &delegated_request("msg-1", "tx-1"), &delegate_caller()).await;

        assert_eq!(response.rejection().unwrap().code, "00005");
        assert!(engine.requests().is_empty());

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_grant_for_other_grid_area_rejected() {
        let runtime = memory_runtime();
        let container = runtime.container();
        container
            .delegation
            .register_grant(supplier_grant("543", 1))
            .await
            .unwrap();

        let response = submit(&runtime, &delegated_request("msg-1", "tx-1"), &delegate_caller()).await;

        assert_eq!(response.rejection().unwrap().code, "00005");

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_cancelled_grant_rejected() {
        let runtime = memory_runtime();
        let container = runtime.container();
        container
            .delegation
            .register_grant(supplier_grant("512", 1))
            .await
            .unwrap();

        let mut cancellation = supplier_grant("512", 2);
        cancellation.start = Utc::now() - chrono::Duration::hours(1);
        cancellation.end = cancellation.start;
        container.delegation.register_grant(cancellation).await.unwrap();

        let response = submit(&runtime, &delegated_request("msg-1", "tx-1"), &delegate_caller()).await;

        assert_eq!(response.rejection().unwrap().code, "00005");

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_unrestricted_caller_claiming_other_actor_without_grant_rejected() {
        let runtime = memory_runtime();
        let container = runtime.container();
        let engine = CalculationEngineStub::spawn(Arc::clone(&container.event_bus), accept_all);

        let response = submit(
            &runtime,
            &delegated_request("msg-1", "tx-1"),
            &caller(DELEGATE, ActorRole::ENERGY_SUPPLIER),
        )
        .await;

        assert_eq!(response.rejection().unwrap().code, "00005");
        assert!(engine.requests().is_empty());

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_unrestricted_caller_claiming_other_actor_with_grant_accepted() {
        let runtime = memory_runtime();
        let container = runtime.container();
        container
            .delegation
            .register_grant(supplier_grant("512", 1))
            .await
            .unwrap();
        let engine = CalculationEngineStub::spawn(Arc::clone(&container.event_bus), accept_all);
        let mut mailbox = BusRecorder::outgoing(&container.event_bus);

        let response = submit(
            &runtime,
            &delegated_request("msg-1", "tx-1"),
            &caller(DELEGATE, ActorRole::ENERGY_SUPPLIER),
        )
        .await;
        assert!(response.is_accepted());

        let messages = mailbox.messages(1).await;
        assert_eq!(messages[0].receiver.as_str(), SUPPLIER);
        assert_eq!(engine.requests()[0].requested_for_actor.as_str(), SUPPLIER);

        runtime.shutdown().await;
    }
}
