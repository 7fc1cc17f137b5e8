//! Qdrant REST wire types

use crate::embeddings::EmbeddingVector;
use serde::{Deserialize, Serialize};

/// Arbitrary metadata stored alongside a vector
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Point identifier (time-based, unique within the process)
pub type PointId = u64;

/// One stored (vector, payload) pair
#[derive(Debug, Clone, Serialize)]
pub struct StoredPoint {
    pub id: PointId,
    pub vector: EmbeddingVector,
    pub payload: Payload,
}

/// One hit from a similarity search
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    pub id: PointId,
    pub score: f32,
    #[serde(default)]
    pub payload: Option<Payload>,
}

impl SearchResult {
    /// String payload field, if present and actually a string
    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload.as_ref()?.get(key)?.as_str()
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) enum Distance {
    Cosine,
}

#[derive(Debug, Serialize)]
pub(crate) struct VectorParams {
    pub size: usize,
    pub distance: Distance,
}

/// Body of `PUT /collections/{name}`
#[derive(Debug, Serialize)]
pub(crate) struct CreateCollectionRequest {
    pub vectors: VectorParams,
}

/// Body of `PUT /collections/{name}/points`
#[derive(Debug, Serialize)]
pub(crate) struct UpsertRequest<'a> {
    pub points: &'a [StoredPoint],
}

/// Body of `POST /collections/{name}/points/search`
#[derive(Debug, Serialize)]
pub(crate) struct SearchRequest<'a> {
    pub vector: &'a [f32],
    pub limit: usize,
    pub with_payload: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub result: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CollectionInfoResponse {
    pub result: CollectionInfo,
}

/// Subset of `GET /collections/{name}` this client reads
#[derive(Debug, Default, Deserialize)]
pub(crate) struct CollectionInfo {
    #[serde(default)]
    pub points_count: Option<u64>,
    #[serde(default)]
    pub config: Option<CollectionConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CollectionConfig {
    #[serde(default)]
    pub params: CollectionParams,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CollectionParams {
    /// Current servers: `{"size": 384, "distance": "Cosine"}`
    #[serde(default)]
    pub vectors: Option<serde_json::Value>,
    /// Older servers report the size directly
    #[serde(default)]
    pub vector_size: Option<u64>,
}

impl CollectionInfo {
    pub fn vector_size(&self) -> Option<u64> {
        let params = &self.config.as_ref()?.params;
        params
            .vectors
            .as_ref()
            .and_then(|v| v.get("size"))
            .and_then(|s| s.as_u64())
            .or(params.vector_size)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListCollectionsResponse {
    pub result: CollectionList,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CollectionList {
    #[serde(default)]
    pub collections: Vec<CollectionDescription>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CollectionDescription {
    pub name: String,
}

/// Whether a stats lookup found its collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsStatus {
    Ok,
    CollectionNotFound,
}

/// Point count and vector size of one partition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionStats {
    pub collection: String,
    pub total_embeddings: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_size: Option<u64>,
    pub status: StatsStatus,
}

/// Stats across every `<base>_<dimension>` partition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionStats {
    pub total_embeddings: u64,
    pub partitions: Vec<CollectionStats>,
}
