//! # corpus-network
//!
//! Document relationship graph for corpus-index.
//!
//! Aggregates each document's section vectors into a centroid and
//! emits a similarity graph over documents: one node per document, one
//! edge per unordered pair whose centroid cosine similarity clears the
//! threshold.

use serde::Serialize;
use tracing::debug;

use corpus_embeddings::{centroid, cosine_similarity};
use corpus_store::SectionStore;

/// Minimum centroid similarity, exclusive, for an edge between two documents.
pub const EDGE_THRESHOLD: f32 = 0.8;

/// Constant display size assigned to every node.
pub const NODE_SIZE: u32 = 10;

/// A document node in the network.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkNode {
    /// Document id
    pub id: String,
    /// Basename of the document's filename
    pub label: String,
    /// Display size
    pub size: u32,
}

/// A similarity edge between two documents.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkEdge {
    /// Source document id
    pub source: String,
    /// Target document id
    pub target: String,
    /// Centroid cosine similarity
    pub weight: f32,
}

/// The document relationship graph.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentNetwork {
    pub nodes: Vec<NetworkNode>,
    pub edges: Vec<NetworkEdge>,
}

/// Build the document network from the stored corpus.
///
/// Fewer than 2 stored sections yield an empty graph. Documents
/// without sections get no centroid and thus no edges. Each unordered
/// pair is considered once, in document insertion order, so the result
/// is deterministic given deterministic embeddings.
pub fn build_network(store: &SectionStore) -> DocumentNetwork {
    if store.section_count() < 2 {
        return DocumentNetwork::default();
    }

    let nodes: Vec<NetworkNode> = store
        .documents()
        .iter()
        .map(|doc| NetworkNode {
            id: doc.document_id.clone(),
            label: doc.basename(),
            size: NODE_SIZE,
        })
        .collect();

    let centroids: Vec<Option<Vec<f32>>> = store
        .documents()
        .iter()
        .map(|doc| {
            let rows: Vec<&[f32]> = store
                .records()
                .iter()
                .filter(|r| r.section.document_id == doc.document_id)
                .map(|r| r.embedding.values.as_slice())
                .collect();
            centroid(&rows)
        })
        .collect();

    let mut edges = Vec::new();
    for i in 0..nodes.len() {
        let Some(a) = &centroids[i] else { continue };
        for j in (i + 1)..nodes.len() {
            let Some(b) = &centroids[j] else { continue };

            let similarity = cosine_similarity(a, b);
            if similarity > EDGE_THRESHOLD {
                edges.push(NetworkEdge {
                    source: nodes[i].id.clone(),
                    target: nodes[j].id.clone(),
                    weight: similarity,
                });
            }
        }
    }

    debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        "Built document network"
    );

    DocumentNetwork { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpus_embeddings::Embedding;
    use corpus_store::SectionRecord;
    use corpus_types::{Document, DocumentKind, Section};

    /// Store with one document per entry, each holding the given
    /// section vectors.
    fn store_with_documents(docs: Vec<Vec<Vec<f32>>>) -> (tempfile::TempDir, SectionStore) {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SectionStore::open(dir.path()).unwrap();

        for (d, vectors) in docs.into_iter().enumerate() {
            let doc = Document::new(format!("doc{d}.txt"), DocumentKind::Txt, 1);
            let records = vectors
                .into_iter()
                .enumerate()
                .map(|(i, v)| {
                    SectionRecord::new(
                        Section::new(&doc.document_id, i, format!("S{i}"), "body"),
                        Embedding::new(v),
                    )
                })
                .collect();
            store.commit_document(doc, records).unwrap();
        }
        (dir, store)
    }

    #[test]
    fn test_fewer_than_two_sections_is_empty() {
        let (_dir, store) = store_with_documents(vec![vec![vec![1.0, 0.0]]]);
        let network = build_network(&store);
        assert!(network.nodes.is_empty());
        assert!(network.edges.is_empty());
    }

    #[test]
    fn test_identical_documents_get_one_edge() {
        let (_dir, store) = store_with_documents(vec![
            vec![vec![1.0, 0.0]],
            vec![vec![1.0, 0.0]],
        ]);
        let network = build_network(&store);

        assert_eq!(network.nodes.len(), 2);
        assert_eq!(network.edges.len(), 1);
        assert!((network.edges[0].weight - 1.0).abs() < 1e-6);
        assert_eq!(network.edges[0].source, network.nodes[0].id);
        assert_eq!(network.edges[0].target, network.nodes[1].id);
    }

    #[test]
    fn test_similarity_at_threshold_is_no_edge() {
        // cos = 0.8 exactly: [1,0] vs [0.8, 0.6]
        let (_dir, store) = store_with_documents(vec![
            vec![vec![1.0, 0.0]],
            vec![vec![0.8, 0.6]],
        ]);
        let network = build_network(&store);
        assert!(network.edges.is_empty());
    }

    #[test]
    fn test_similarity_above_threshold_edge_weight_matches() {
        // cos([1,0],[0.9,0.1]) ~ 0.9939
        let (_dir, store) = store_with_documents(vec![
            vec![vec![1.0, 0.0]],
            vec![vec![0.9, 0.1]],
        ]);
        let network = build_network(&store);

        assert_eq!(network.edges.len(), 1);
        let expected = cosine_similarity(&[1.0, 0.0], &[0.9, 0.1]);
        assert!((network.edges[0].weight - expected).abs() < 1e-6);
    }

    #[test]
    fn test_orthogonal_documents_no_edge() {
        let (_dir, store) = store_with_documents(vec![
            vec![vec![1.0, 0.0]],
            vec![vec![0.0, 1.0]],
        ]);
        let network = build_network(&store);
        assert_eq!(network.nodes.len(), 2);
        assert!(network.edges.is_empty());
    }

    #[test]
    fn test_centroid_is_section_mean() {
        // doc0 sections average to [0.5, 0.5]; doc1 sits on [1,1]:
        // same direction, cosine 1.0.
        let (_dir, store) = store_with_documents(vec![
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            vec![vec![1.0, 1.0]],
        ]);
        let network = build_network(&store);

        assert_eq!(network.edges.len(), 1);
        assert!((network.edges[0].weight - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_document_without_sections_forms_no_edges() {
        let (_dir, store) = store_with_documents(vec![
            vec![vec![1.0, 0.0]],
            vec![],
            vec![vec![1.0, 0.0]],
        ]);
        let network = build_network(&store);

        // Empty document still appears as a node, but only the two
        // populated documents connect.
        assert_eq!(network.nodes.len(), 3);
        assert_eq!(network.edges.len(), 1);
        assert_eq!(network.edges[0].source, network.nodes[0].id);
        assert_eq!(network.edges[0].target, network.nodes[2].id);
    }

    #[test]
    fn test_no_self_edges_and_each_pair_once() {
        let (_dir, store) = store_with_documents(vec![
            vec![vec![1.0, 0.0]],
            vec![vec![1.0, 0.0]],
            vec![vec![1.0, 0.0]],
        ]);
        let network = build_network(&store);

        // Three identical documents: exactly C(3,2) = 3 edges.
        assert_eq!(network.edges.len(), 3);
        for edge in &network.edges {
            assert_ne!(edge.source, edge.target);
        }
    }

    #[test]
    fn test_node_labels_are_basenames() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SectionStore::open(dir.path()).unwrap();

        let doc = Document::new("uploads/deep/path/std-42.txt", DocumentKind::Txt, 1);
        let records = vec![
            SectionRecord::new(
                Section::new(&doc.document_id, 0, "S0", "body"),
                Embedding::new(vec![1.0]),
            ),
            SectionRecord::new(
                Section::new(&doc.document_id, 1, "S1", "body"),
                Embedding::new(vec![1.0]),
            ),
        ];
        store.commit_document(doc, records).unwrap();

        let network = build_network(&store);
        assert_eq!(network.nodes[0].label, "std-42.txt");
        assert_eq!(network.nodes[0].size, NODE_SIZE);
    }
}
