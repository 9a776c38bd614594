//! # corpus-store
//!
//! Persistence layer for corpus-index.
//!
//! Owns the three corpus collections (documents, sections, embeddings)
//! and their durable representation under one data directory:
//!
//! - `documents.json`: ordered Document records
//! - `sections.json`:  ordered Section records, global insertion order
//! - `embeddings.bin`: dense f32 matrix, row order == section order
//!
//! Sections and their embeddings are held in memory as one composite
//! [`SectionRecord`], so the two can never drift apart at runtime; the
//! row-count alignment of the on-disk artifacts is validated once, at
//! load. A missing store (first run) or an unreadable/inconsistent one
//! both yield empty collections; a damaged index is preferable to a
//! crashed process.

pub mod error;
pub mod store;

pub use error::StoreError;
pub use store::{SectionRecord, SectionStore};
