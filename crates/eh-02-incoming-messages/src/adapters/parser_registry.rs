//! Parser lookup by `(format, document type)`.

use crate::adapters::cim_json::CimJsonParser;
use crate::ports::DocumentParser;
use shared_types::{DocumentFormat, IncomingDocumentType};
use std::collections::HashMap;
use std::sync::Arc;

/// Registered document parsers.
#[derive(Default, Clone)]
pub struct DocumentParserRegistry {
    parsers: HashMap<(DocumentFormat, IncomingDocumentType), Arc<dyn DocumentParser>>,
}

impl DocumentParserRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the CIM JSON parsers for both request document types.
    #[must_use]
    pub fn with_cim_json() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(CimJsonParser::new(
            IncomingDocumentType::REQUEST_AGGREGATED_MEASURE_DATA,
        )));
        registry.register(Arc::new(CimJsonParser::new(
            IncomingDocumentType::REQUEST_WHOLESALE_SETTLEMENT,
        )));
        registry
    }

    /// Adds a parser, replacing any parser for the same pair.
    pub fn register(&mut self, parser: Arc<dyn DocumentParser>) {
        self.parsers
            .insert((parser.format(), parser.document_type()), parser);
    }

    #[must_use]
    pub fn get(
        &self,
        format: &DocumentFormat,
        document_type: &IncomingDocumentType,
    ) -> Option<Arc<dyn DocumentParser>> {
        self.parsers
            .get(&(format.clone(), document_type.clone()))
            .cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}
