//! # Adapters Module
//!
//! Parsers, idempotency registries and the archive.

pub mod archive;
pub mod cim_json;
pub mod memory_registry;
pub mod parser_registry;
pub mod sqlite_registry;

pub use archive::{ArchivedDocument, InMemoryArchive};
pub use cim_json::CimJsonParser;
pub use memory_registry::InMemoryIdempotencyRegistry;
pub use parser_registry::DocumentParserRegistry;
pub use sqlite_registry::SqliteIdempotencyRegistry;
