//! # CIM JSON Parser
//!
//! Reads `RequestAggregatedMeasureData` and `RequestWholesaleSettlement`
//! documents in the CIM JSON layout:
//!
//! ```text
//! { "<DocumentName>_MarketDocument": {
//!     "mRID": "...",
//!     "type": { "value": "E74" },
//!     "process.processType": { "value": "D04" },
//!     "sender_MarketParticipant.mRID": { "value": "..." },
//!     "sender_MarketParticipant.marketRole.type": { "value": "DDQ" },
//!     "receiver_MarketParticipant.mRID": { "value": "..." },
//!     "receiver_MarketParticipant.marketRole.type": { "value": "DGL" },
//!     "createdDateTime": "2024-03-01T12:00:00Z",
//!     "Series": [ { "mRID": "...", ... } ]
//! } }
//! ```

use crate::domain::{IncomingMessage, IncomingTransaction, ParseError};
use crate::ports::DocumentParser;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use shared_types::{
    ActorNumber, ActorRole, BusinessReason, CodedEnumeration, DocumentFormat, GridAreaCode,
    IncomingDocumentType, MeteringPointType, Period, SettlementMethod, SettlementVersion,
    Timestamp,
};

/// CIM JSON parser for one document type.
#[derive(Debug, Clone)]
pub struct CimJsonParser {
    document_type: IncomingDocumentType,
}

impl CimJsonParser {
    #[must_use]
    pub fn new(document_type: IncomingDocumentType) -> Self {
        Self { document_type }
    }

    fn root_key(&self) -> String {
        format!("{}_MarketDocument", self.document_type.name())
    }
}

impl DocumentParser for CimJsonParser {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::JSON
    }

    fn document_type(&self) -> IncomingDocumentType {
        self.document_type.clone()
    }

    fn parse(&self, raw: &[u8]) -> Result<IncomingMessage, ParseError> {
        let value: Value = serde_json::from_slice(raw)
            .map_err(|e| ParseError::new(format!("malformed JSON: {e}")))?;
        let root_key = self.root_key();
        let doc = value
            .get(&root_key)
            .and_then(Value::as_object)
            .ok_or_else(|| ParseError::new(format!("missing {root_key}")))?;

        let declared_type = coded::<IncomingDocumentType>(doc, "type")?;
        if declared_type != self.document_type {
            return Err(ParseError::new(format!(
                "document declares type {}, expected {}",
                declared_type.code(),
                self.document_type.code()
            )));
        }

        let series = match doc.get("Series") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_object()
                        .ok_or_else(|| ParseError::new("Series entry is not an object"))
                        .and_then(parse_series)
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(ParseError::new("Series is not an array")),
        };

        Ok(IncomingMessage {
            message_id: text(doc, "mRID")?.to_string(),
            document_type: declared_type,
            format: DocumentFormat::JSON,
            business_reason: coded::<BusinessReason>(doc, "process.processType")?,
            sender_number: actor(value_of(doc, "sender_MarketParticipant.mRID")?)?,
            sender_role: coded::<ActorRole>(doc, "sender_MarketParticipant.marketRole.type")?,
            receiver_number: actor(value_of(doc, "receiver_MarketParticipant.mRID")?)?,
            receiver_role: coded::<ActorRole>(doc, "receiver_MarketParticipant.marketRole.type")?,
            created_at: timestamp(text(doc, "createdDateTime")?)?,
            transactions: series,
        })
    }
}

fn parse_series(series: &Map<String, Value>) -> Result<IncomingTransaction, ParseError> {
    let start = timestamp(text(series, "start_DateAndOrTime.dateTime")?)?;
    let end = timestamp(text(series, "end_DateAndOrTime.dateTime")?)?;
    let period = Period::new(start, end).map_err(|e| ParseError::new(e.to_string()))?;

    Ok(IncomingTransaction {
        transaction_id: text(series, "mRID")?.to_string(),
        period,
        grid_area: optional(series, "meteringGridArea_Domain.mRID")
            .map(|v| GridAreaCode::create(v).map_err(|e| ParseError::new(e.to_string())))
            .transpose()?,
        metering_point_type: optional_coded::<MeteringPointType>(
            series,
            "marketEvaluationPoint.type",
        )?,
        settlement_method: optional_coded::<SettlementMethod>(
            series,
            "marketEvaluationPoint.settlementMethod",
        )?,
        settlement_version: optional_coded::<SettlementVersion>(
            series,
            "settlement_Series.version",
        )?,
        energy_supplier_id: optional(series, "energySupplier_MarketParticipant.mRID")
            .map(actor)
            .transpose()?,
        balance_responsible_id: optional(series, "balanceResponsibleParty_MarketParticipant.mRID")
            .map(actor)
            .transpose()?,
        original_actor: optional(series, "originalActor_MarketParticipant.mRID")
            .map(actor)
            .transpose()?,
    })
}

/// A plain string field.
fn text<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a str, ParseError> {
    obj.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ParseError::new(format!("missing {key}")))
}

/// A `{ "value": "..." }` wrapped field.
fn value_of<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a str, ParseError> {
    optional(obj, key).ok_or_else(|| ParseError::new(format!("missing {key}")))
}

fn optional<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    match obj.get(key)? {
        Value::String(s) => Some(s.as_str()),
        Value::Object(inner) => inner.get("value").and_then(Value::as_str),
        _ => None,
    }
}

fn coded<T: CodedEnumeration>(obj: &Map<String, Value>, key: &str) -> Result<T, ParseError> {
    T::from_code(value_of(obj, key)?).map_err(|e| ParseError::new(e.to_string()))
}

fn optional_coded<T: CodedEnumeration>(
    obj: &Map<String, Value>,
    key: &str,
) -> Result<Option<T>, ParseError> {
    optional(obj, key)
        .map(|code| T::from_code(code).map_err(|e| ParseError::new(e.to_string())))
        .transpose()
}

fn actor(value: &str) -> Result<ActorNumber, ParseError> {
    ActorNumber::create(value).map_err(|e| ParseError::new(e.to_string()))
}

fn timestamp(value: &str) -> Result<Timestamp, ParseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| ParseError::new(format!("invalid timestamp '{value}': {e}")))
}
