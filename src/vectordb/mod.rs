//! Vector store - Qdrant over its REST API
//!
//! Embedding dimension depends on the backend (384 for all-MiniLM-L6-v2,
//! 1536 for ada-002), while a Qdrant collection's vector size is fixed at
//! creation. Data is therefore partitioned by dimension: vectors of length
//! `d` live in `<base>_<d>`, created on first use. Switching backends never
//! writes into a collection of the wrong size.
//!
//! ```ignore
//! use debugmate::vectordb::QdrantClient;
//!
//! let client = QdrantClient::new(&config.vector_store)?;
//! client.store_embedding(&embedder, "Error: disk full", metadata)?;
//! let docs = client.search_similar(&query_vector, 3)?;
//! ```

mod error;
mod internal;
mod types;

pub use error::StoreError;
pub use internal::QdrantClient;
pub use types::{
    CollectionStats, PartitionStats, Payload, PointId, SearchResult, StatsStatus, StoredPoint,
};

/// Returned by `search_similar` in place of an empty result list
pub const NO_RESULTS: &str = "No similar errors found in the database.";

const UNKNOWN_CONTENT: &str = "Unknown content";
const UNKNOWN_TIME: &str = "Unknown time";

/// Partition name for a base collection and vector dimension
pub fn collection_name(base: &str, dimension: usize) -> String {
    format!("{}_{}", base, dimension)
}

/// Dimension of `name` if it is a partition of `base`
pub fn parse_partition(base: &str, name: &str) -> Option<usize> {
    let suffix = name.strip_prefix(base)?.strip_prefix('_')?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// Render a hit as score, content and timestamp (in that order)
pub fn format_result(hit: &SearchResult) -> String {
    format!(
        "Similarity: {:.2}\nContent: {}\nTimestamp: {}\n",
        hit.score,
        hit.payload_str("text").unwrap_or(UNKNOWN_CONTENT),
        hit.payload_str("timestamp").unwrap_or(UNKNOWN_TIME),
    )
}

/// True when `docs` is the no-results sentinel rather than real matches
pub fn is_no_results(docs: &[String]) -> bool {
    matches!(docs, [only] if only == NO_RESULTS)
}
