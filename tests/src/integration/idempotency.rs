//! # Idempotency Tests
//!
//! Duplicate submissions must start exactly one process, whichever registry
//! backs the hub and however the submissions race.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use eh_02_incoming_messages::{IdempotencyRegistry, ReceiveResponse};
    use hub_runtime::HubRuntime;
    use shared_types::{ActorNumber, ActorRole, TransactionId};

    use crate::integration::fixtures::*;

    const SUBMISSIONS: usize = 16;

    /// Submits the same document concurrently; returns accepted count and
    /// the rejection codes.
    async fn race_duplicates(runtime: Arc<HubRuntime>) -> (usize, Vec<&'static str>) {
        let raw = Arc::new(supplier_request("msg-1", "tx-1", "512"));
        let handles: Vec<_> = (0..SUBMISSIONS)
            .map(|_| {
                let runtime = Arc::clone(&runtime);
                let raw = Arc::clone(&raw);
                tokio::spawn(async move {
                    submit(&runtime, &raw, &caller(SUPPLIER, ActorRole::ENERGY_SUPPLIER)).await
                })
            })
            .collect();

        let mut accepted = 0;
        let mut codes = Vec::new();
        for handle in handles {
            match handle.await.unwrap() {
                ReceiveResponse::Accepted { .. } => accepted += 1,
                ReceiveResponse::Rejected(rejection) => codes.push(rejection.code),
            }
        }
        (accepted, codes)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_duplicates_start_one_process_in_memory() {
        let runtime = Arc::new(memory_runtime());
        let container = runtime.container();
        let engine = CalculationEngineStub::spawn(Arc::clone(&container.event_bus), accept_all);
        let mut mailbox = BusRecorder::outgoing(&container.event_bus);

        let (accepted, codes) = race_duplicates(Arc::clone(&runtime)).await;

        assert_eq!(accepted, 1);
        assert_eq!(codes.len(), SUBMISSIONS - 1);
        assert!(codes.iter().all(|code| *code == "00101"));

        mailbox.messages(1).await;
        mailbox.assert_quiet().await;
        assert_eq!(engine.requests().len(), 1);

        runtime.shutdown().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_duplicates_start_one_process_in_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = Arc::new(sqlite_runtime(&dir.path().join("registry.db")));
        let container = runtime.container();
        let engine = CalculationEngineStub::spawn(Arc::clone(&container.event_bus), accept_all);
        let mut mailbox = BusRecorder::outgoing(&container.event_bus);

        let (accepted, codes) = race_duplicates(Arc::clone(&runtime)).await;

        assert_eq!(accepted, 1);
        assert!(codes.iter().all(|code| *code == "00101"));

        mailbox.messages(1).await;
        mailbox.assert_quiet().await;
        assert_eq!(engine.requests().len(), 1);

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_reused_transaction_id_rejected_without_registering_message() {
        let runtime = memory_runtime();
        let container = runtime.container();
        let _engine = CalculationEngineStub::spawn(Arc::clone(&container.event_bus), accept_all);
        let supplier = caller(SUPPLIER, ActorRole::ENERGY_SUPPLIER);

        assert!(submit(&runtime, &supplier_request("msg-1", "tx-1", "512"), &supplier)
            .await
            .is_accepted());

        let response = submit(&runtime, &supplier_request("msg-2", "tx-1", "512"), &supplier).await;
        assert_eq!(response.rejection().unwrap().code, "00102");

        // msg-2 was not registered, so it can be reused with a fresh transaction.
        let response = submit(&runtime, &supplier_request("msg-2", "tx-2", "512"), &supplier).await;
        assert!(response.is_accepted());

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_ids_are_scoped_per_sender() {
        let runtime = memory_runtime();
        let container = runtime.container();
        let _engine = CalculationEngineStub::spawn(Arc::clone(&container.event_bus), accept_all);

        assert!(submit(
            &runtime,
            &supplier_request("msg-1", "tx-1", "512"),
            &caller(SUPPLIER, ActorRole::ENERGY_SUPPLIER),
        )
        .await
        .is_accepted());

        let other = request_document(
            "msg-1",
            OTHER_SUPPLIER,
            &ActorRole::ENERGY_SUPPLIER,
            &[SeriesSpec::new("tx-1")
                .grid_area("512")
                .energy_supplier(OTHER_SUPPLIER)],
        );
        assert!(submit(
            &runtime,
            &other,
            &caller(OTHER_SUPPLIER, ActorRole::ENERGY_SUPPLIER),
        )
        .await
        .is_accepted());

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_sqlite_registry_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.db");
        let supplier = caller(SUPPLIER, ActorRole::ENERGY_SUPPLIER);

        {
            let runtime = sqlite_runtime(&path);
            let _engine =
                CalculationEngineStub::spawn(Arc::clone(&runtime.container().event_bus), accept_all);
            assert!(submit(&runtime, &supplier_request("msg-1", "tx-1", "512"), &supplier)
                .await
                .is_accepted());
            runtime.shutdown().await;
        }

        let runtime = sqlite_runtime(&path);
        let response = submit(&runtime, &supplier_request("msg-1", "tx-1", "512"), &supplier).await;
        assert_eq!(response.rejection().unwrap().code, "00101");

        let registered = runtime
            .container()
            .registry
            .contains_transaction(
                &ActorNumber::create(SUPPLIER).unwrap(),
                &TransactionId::from_string("tx-1").unwrap(),
            )
            .await
            .unwrap();
        assert!(registered);

        runtime.shutdown().await;
    }
}
