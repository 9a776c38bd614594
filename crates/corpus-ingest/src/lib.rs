//! # corpus-ingest
//!
//! Ingestion pipeline for corpus-index.
//!
//! Composes the text-extraction boundary, the segmentation adapter,
//! the embedding adapter, and the section store to turn one document's
//! raw bytes into persisted sections and vectors. A document is the
//! unit of durability: its sections are embedded up front and the
//! store is touched only once everything succeeded, so a failure
//! mid-document leaves the corpus exactly as it was.

pub mod error;
pub mod extract;
pub mod pipeline;

pub use error::IngestError;
pub use extract::{PlainTextExtractor, TextExtractor};
pub use pipeline::IngestPipeline;
