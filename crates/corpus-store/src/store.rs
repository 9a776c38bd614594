//! Section store: in-memory collections plus their durable artifacts.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use corpus_embeddings::Embedding;
use corpus_types::{Document, Section};

use crate::error::StoreError;

const DOCUMENTS_FILE: &str = "documents.json";
const SECTIONS_FILE: &str = "sections.json";
const EMBEDDINGS_FILE: &str = "embeddings.bin";

/// A section together with its embedding vector.
///
/// Stored as one unit so the section/embedding pairing is a fact of
/// the type, not an alignment invariant to maintain.
#[derive(Debug, Clone)]
pub struct SectionRecord {
    pub section: Section,
    pub embedding: Embedding,
}

impl SectionRecord {
    pub fn new(section: Section, embedding: Embedding) -> Self {
        Self { section, embedding }
    }
}

/// Owns the corpus collections and their persistence.
///
/// Append-only: documents and section records are never mutated or
/// removed once committed. One instance owns the collections
/// exclusively; readers borrow snapshots through the accessors.
pub struct SectionStore {
    data_dir: PathBuf,
    documents: Vec<Document>,
    records: Vec<SectionRecord>,
}

impl SectionStore {
    /// Open a store rooted at `data_dir`, creating the directory if
    /// needed and loading any existing artifacts.
    ///
    /// A missing store yields empty collections. An unreadable or
    /// inconsistent store is logged and also yields empty collections;
    /// it is never an error to the caller.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;

        let (documents, records) = match Self::try_load(&data_dir) {
            Ok(state) => state,
            Err(e) => {
                warn!(
                    data_dir = %data_dir.display(),
                    error = %e,
                    "Corpus store unreadable, starting with empty collections"
                );
                (Vec::new(), Vec::new())
            }
        };

        info!(
            data_dir = %data_dir.display(),
            documents = documents.len(),
            sections = records.len(),
            "Opened corpus store"
        );

        Ok(Self {
            data_dir,
            documents,
            records,
        })
    }

    fn try_load(dir: &Path) -> Result<(Vec<Document>, Vec<SectionRecord>), StoreError> {
        let documents: Vec<Document> = read_json_or_default(&dir.join(DOCUMENTS_FILE))?;
        let sections: Vec<Section> = read_json_or_default(&dir.join(SECTIONS_FILE))?;
        let rows: Vec<Vec<f32>> = read_matrix_or_default(&dir.join(EMBEDDINGS_FILE))?;

        if sections.len() != rows.len() {
            return Err(StoreError::Misaligned {
                sections: sections.len(),
                rows: rows.len(),
            });
        }

        for section in &sections {
            if !documents.iter().any(|d| d.document_id == section.document_id) {
                return Err(StoreError::DanglingSection(section.section_id.clone()));
            }
        }

        let records = sections
            .into_iter()
            .zip(rows)
            .map(|(section, row)| SectionRecord::new(section, Embedding::new(row)))
            .collect();

        Ok((documents, records))
    }

    /// Append a document record.
    pub fn append_document(&mut self, document: Document) {
        self.documents.push(document);
    }

    /// Append section records in order.
    pub fn append_sections(&mut self, records: Vec<SectionRecord>) {
        self.records.extend(records);
    }

    /// Append a document with its section records and persist once.
    ///
    /// If persistence fails, the in-memory appends are rolled back so
    /// memory and disk stay in agreement.
    pub fn commit_document(
        &mut self,
        document: Document,
        records: Vec<SectionRecord>,
    ) -> Result<(), StoreError> {
        let doc_mark = self.documents.len();
        let record_mark = self.records.len();

        self.append_document(document);
        self.append_sections(records);

        if let Err(e) = self.persist() {
            self.documents.truncate(doc_mark);
            self.records.truncate(record_mark);
            return Err(e);
        }
        Ok(())
    }

    /// Write all three artifacts, each via write-new-then-rename.
    pub fn persist(&self) -> Result<(), StoreError> {
        let sections: Vec<&Section> = self.records.iter().map(|r| &r.section).collect();
        let rows: Vec<&[f32]> = self
            .records
            .iter()
            .map(|r| r.embedding.values.as_slice())
            .collect();

        write_atomic(
            &self.data_dir,
            DOCUMENTS_FILE,
            &serde_json::to_vec(&self.documents)?,
        )?;
        write_atomic(
            &self.data_dir,
            SECTIONS_FILE,
            &serde_json::to_vec(&sections)?,
        )?;
        write_atomic(
            &self.data_dir,
            EMBEDDINGS_FILE,
            &bincode::serialize(&rows)?,
        )?;

        debug!(
            documents = self.documents.len(),
            sections = self.records.len(),
            "Persisted corpus store"
        );
        Ok(())
    }

    /// All documents in insertion order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// All section records in global insertion order.
    pub fn records(&self) -> &[SectionRecord] {
        &self.records
    }

    /// Number of ingested documents.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Number of sections across all documents.
    pub fn section_count(&self) -> usize {
        self.records.len()
    }

    /// Look up a document by id.
    pub fn document_by_id(&self, document_id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.document_id == document_id)
    }
}

fn read_json_or_default<T: serde::de::DeserializeOwned + Default>(
    path: &Path,
) -> Result<T, StoreError> {
    if !path.exists() {
        return Ok(T::default());
    }
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn read_matrix_or_default(path: &Path) -> Result<Vec<Vec<f32>>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let bytes = fs::read(path)?;
    Ok(bincode::deserialize(&bytes)?)
}

/// Write `bytes` to `dir/name` through a temp file in the same
/// directory followed by a rename, so readers never observe a
/// partially written artifact.
fn write_atomic(dir: &Path, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(dir.join(name)).map_err(|e| e.error)?;
    Ok(())
}
