//! Shared fixtures: actors, CIM JSON documents, a calculation engine stub
//! and a mailbox recorder on the bus.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use uuid::Uuid;

use eh_01_delegation::DelegationGrant;
use eh_02_incoming_messages::ReceiveResponse;
use hub_runtime::{HubConfig, HubRuntime, RegistryBackend};
use shared_bus::{EventFilter, EventPublisher, EventTopic, HubEvent, InMemoryEventBus, Subscription};
use shared_types::{
    AcceptedSeries, ActorNumber, ActorRole, AuthenticatedActor, CodedEnumeration, DocumentFormat,
    DownstreamRequest, EnergyPoint, GridAreaCode, InboxEvent, IncomingDocumentType,
    MeasurementUnit, MeteringPointType, OutgoingMessage, ProcessType, RejectedReason, Resolution,
    Restriction,
};

pub const SUPPLIER: &str = "5790001330583";
pub const OTHER_SUPPLIER: &str = "5790001330590";
pub const DELEGATE: &str = "5790001330613";
pub const GRID_OPERATOR: &str = "5790001330606";
pub const DATAHUB: &str = "5790001330552";

const WAIT: Duration = Duration::from_secs(2);

pub fn actor(number: &str) -> ActorNumber {
    ActorNumber::create(number).unwrap()
}

pub fn grid(code: &str) -> GridAreaCode {
    GridAreaCode::create(code).unwrap()
}

/// Caller authenticated in its own name.
pub fn caller(number: &str, role: ActorRole) -> AuthenticatedActor {
    AuthenticatedActor::new(actor(number), role, Restriction::None)
}

pub fn delegate_caller() -> AuthenticatedActor {
    AuthenticatedActor::new(actor(DELEGATE), ActorRole::DELEGATED, Restriction::Owned)
}

// =============================================================================
// DOCUMENTS
// =============================================================================

/// One `Series` entry of a request.
#[derive(Clone, Default)]
pub struct SeriesSpec {
    pub transaction_id: String,
    pub grid_area: Option<String>,
    pub energy_supplier: Option<String>,
    pub original_actor: Option<String>,
}

impl SeriesSpec {
    pub fn new(transaction_id: &str) -> Self {
        Self {
            transaction_id: transaction_id.to_string(),
            ..Self::default()
        }
    }

    pub fn grid_area(mut self, code: &str) -> Self {
        self.grid_area = Some(code.to_string());
        self
    }

    pub fn energy_supplier(mut self, number: &str) -> Self {
        self.energy_supplier = Some(number.to_string());
        self
    }

    pub fn original_actor(mut self, number: &str) -> Self {
        self.original_actor = Some(number.to_string());
        self
    }

    fn to_json(&self) -> Value {
        let mut series = json!({
            "mRID": self.transaction_id,
            "marketEvaluationPoint.type": { "value": MeteringPointType::CONSUMPTION.code() },
            "start_DateAndOrTime.dateTime": "2024-01-01T00:00:00Z",
            "end_DateAndOrTime.dateTime": "2024-02-01T00:00:00Z",
        });
        let fields = [
            ("meteringGridArea_Domain.mRID", &self.grid_area),
            ("energySupplier_MarketParticipant.mRID", &self.energy_supplier),
            ("originalActor_MarketParticipant.mRID", &self.original_actor),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                series[key] = json!({ "value": value });
            }
        }
        series
    }
}

/// A `RequestAggregatedMeasureData` (E74) document in CIM JSON.
pub fn request_document(
    message_id: &str,
    sender: &str,
    sender_role: &ActorRole,
    series: &[SeriesSpec],
) -> Vec<u8> {
    let series: Vec<Value> = series.iter().map(SeriesSpec::to_json).collect();
    json!({
        "RequestAggregatedMeasureData_MarketDocument": {
            "mRID": message_id,
            "type": { "value": "E74" },
            "process.processType": { "value": "D04" },
            "sender_MarketParticipant.mRID": { "value": sender },
            "sender_MarketParticipant.marketRole.type": { "value": sender_role.code() },
            "receiver_MarketParticipant.mRID": { "value": DATAHUB },
            "receiver_MarketParticipant.marketRole.type": { "value": "DGL" },
            "createdDateTime": "2024-03-01T12:00:00Z",
            "Series": series
        }
    })
    .to_string()
    .into_bytes()
}

/// Energy supplier asking for its own data in one grid area.
pub fn supplier_request(message_id: &str, transaction_id: &str, grid_area: &str) -> Vec<u8> {
    request_document(
        message_id,
        SUPPLIER,
        &ActorRole::ENERGY_SUPPLIER,
        &[SeriesSpec::new(transaction_id)
            .grid_area(grid_area)
            .energy_supplier(SUPPLIER)],
    )
}

pub async fn submit(
    runtime: &HubRuntime,
    raw: &[u8],
    caller: &AuthenticatedActor,
) -> ReceiveResponse {
    runtime
        .receive(
            raw,
            DocumentFormat::JSON,
            IncomingDocumentType::REQUEST_AGGREGATED_MEASURE_DATA,
            DocumentFormat::JSON,
            caller,
        )
        .await
        .unwrap()
}

// =============================================================================
// RUNTIME
// =============================================================================

pub fn memory_runtime() -> HubRuntime {
    let runtime = HubRuntime::new(HubConfig::default()).unwrap();
    runtime.start();
    runtime
}

pub fn sqlite_runtime(path: &Path) -> HubRuntime {
    let mut config = HubConfig::default();
    config.storage.registry_backend = RegistryBackend::Sqlite;
    config.storage.registry_path = path.to_path_buf();
    let runtime = HubRuntime::new(config).unwrap();
    runtime.start();
    runtime
}

/// Grant from `SUPPLIER` to `DELEGATE` covering now.
pub fn supplier_grant(grid_area: &str, sequence_number: u64) -> DelegationGrant {
    let now = Utc::now();
    DelegationGrant {
        delegator: actor(SUPPLIER),
        delegator_role: ActorRole::ENERGY_SUPPLIER,
        delegate: actor(DELEGATE),
        process_type: ProcessType::REQUEST_ENERGY_RESULTS,
        grid_area: grid(grid_area),
        start: now - chrono::Duration::days(1),
        end: now + chrono::Duration::days(365),
        sequence_number,
    }
}

// =============================================================================
// CALCULATION ENGINE STUB
// =============================================================================

pub fn series_for(grid_area: &GridAreaCode, request: &DownstreamRequest) -> AcceptedSeries {
    AcceptedSeries {
        grid_area: grid_area.clone(),
        metering_point_type: request.metering_point_type.clone(),
        settlement_method: None,
        resolution: Resolution::QUARTER_HOURLY,
        unit: MeasurementUnit::KILOWATT_HOUR,
        period: request.period,
        calculation_version: 1,
        points: vec![EnergyPoint {
            position: 1,
            quantity: Some(42.0),
            quality: Some("A04".to_string()),
        }],
    }
}

/// Grid areas to answer for; `fallback` when the request names none.
fn answered_areas(request: &DownstreamRequest, fallback: &[&str]) -> Vec<GridAreaCode> {
    if request.grid_areas.is_empty() {
        fallback.iter().map(|g| grid(g)).collect()
    } else {
        request.grid_areas.clone()
    }
}

/// One accepted response covering every requested grid area.
pub fn accept_all(request: &DownstreamRequest) -> Vec<InboxEvent> {
    let series = answered_areas(request, &["512"])
        .iter()
        .map(|g| series_for(g, request))
        .collect();
    vec![InboxEvent::Accepted {
        process_id: request.process_id,
        series,
    }]
}

pub fn reject_no_data(request: &DownstreamRequest) -> Vec<InboxEvent> {
    vec![InboxEvent::Rejected {
        process_id: request.process_id,
        reasons: vec![RejectedReason {
            error_code: "E0H".to_string(),
            error_message: "No data available for the requested period".to_string(),
        }],
    }]
}

/// The same accepted response delivered twice.
pub fn accept_twice(request: &DownstreamRequest) -> Vec<InboxEvent> {
    let mut events = accept_all(request);
    events.extend(accept_all(request));
    events
}

/// One part per grid area, then the receipt naming every part.
pub fn respond_in_parts(grid_areas: &'static [&'static str]) -> impl Fn(&DownstreamRequest) -> Vec<InboxEvent> {
    move |request| {
        let parts: Vec<(Uuid, GridAreaCode)> = answered_areas(request, grid_areas)
            .into_iter()
            .map(|g| (Uuid::new_v4(), g))
            .collect();
        let mut events: Vec<InboxEvent> = parts
            .iter()
            .map(|(part_id, g)| InboxEvent::PartialResponse {
                process_id: request.process_id,
                part_id: *part_id,
                series: vec![series_for(g, request)],
            })
            .collect();
        events.push(InboxEvent::Receipt {
            process_id: request.process_id,
            part_ids: parts.iter().map(|(part_id, _)| *part_id).collect(),
        });
        events
    }
}

/// Answers every `DownstreamRequestDispatched` with the responder's events.
pub struct CalculationEngineStub {
    requests: Arc<Mutex<Vec<DownstreamRequest>>>,
    handle: JoinHandle<()>,
}

impl CalculationEngineStub {
    pub fn spawn<F>(bus: Arc<InMemoryEventBus>, responder: F) -> Self
    where
        F: Fn(&DownstreamRequest) -> Vec<InboxEvent> + Send + Sync + 'static,
    {
        let mut subscription = bus.subscribe(EventFilter::topics(vec![EventTopic::Downstream]));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        let handle = tokio::spawn(async move {
            while let Some(event) = subscription.recv().await {
                if let HubEvent::DownstreamRequestDispatched(request) = event {
                    seen.lock().push(request.clone());
                    for response in responder(&request) {
                        bus.publish(HubEvent::InboxEventReceived(response)).await;
                    }
                }
            }
        });
        Self { requests, handle }
    }

    pub fn requests(&self) -> Vec<DownstreamRequest> {
        self.requests.lock().clone()
    }
}

impl Drop for CalculationEngineStub {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// =============================================================================
// BUS PROBES
// =============================================================================

/// Collects events of one topic, standing in for the document writer.
pub struct BusRecorder {
    subscription: Subscription,
}

impl BusRecorder {
    pub fn outgoing(bus: &InMemoryEventBus) -> Self {
        Self {
            subscription: bus.subscribe(EventFilter::topics(vec![EventTopic::Outgoing])),
        }
    }

    pub fn dead_letters(bus: &InMemoryEventBus) -> Self {
        Self {
            subscription: bus.subscribe(EventFilter::topics(vec![EventTopic::DeadLetterQueue])),
        }
    }

    pub async fn next(&mut self) -> Option<HubEvent> {
        tokio::time::timeout(WAIT, self.subscription.recv())
            .await
            .ok()
            .flatten()
    }

    /// Waits for exactly `count` outgoing messages.
    pub async fn messages(&mut self, count: usize) -> Vec<OutgoingMessage> {
        let mut messages = Vec::with_capacity(count);
        while messages.len() < count {
            match self.next().await {
                Some(HubEvent::OutgoingMessageEnqueued(message)) => messages.push(message),
                Some(other) => panic!("unexpected event {other:?}"),
                None => panic!("expected {count} messages, got {}", messages.len()),
            }
        }
        messages
    }

    /// Asserts nothing more arrives within a short window.
    pub async fn assert_quiet(&mut self) {
        let extra = tokio::time::timeout(Duration::from_millis(200), self.subscription.recv()).await;
        if let Ok(Some(event)) = extra {
            panic!("unexpected extra event {event:?}");
        }
    }
}
