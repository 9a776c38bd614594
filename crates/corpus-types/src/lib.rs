//! # corpus-types
//!
//! Shared domain types for the corpus-index system.
//!
//! This crate defines the core data structures used throughout the system:
//! - Documents: immutable records of ingested files
//! - Sections: titled spans of document text, the atomic unit of search
//! - Settings: layered configuration
//!
//! ## Usage
//!
//! ```rust
//! use corpus_types::{Document, DocumentKind, Section};
//!
//! let doc = Document::new("handbook.txt", DocumentKind::Txt, 1024);
//! let section = Section::new(&doc.document_id, 0, "Introduction", "Scope of this handbook.");
//! assert_eq!(section.word_count, 4);
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod section;

pub use config::{EmbedderSettings, SegmenterSettings, Settings};
pub use document::{Document, DocumentKind};
pub use error::CorpusError;
pub use section::Section;
