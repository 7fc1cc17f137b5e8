//! Internal HTTP client implementation for Qdrant

use super::types::{
    CollectionInfo, CollectionInfoResponse, CollectionStats, CreateCollectionRequest, Distance,
    ListCollectionsResponse, PartitionStats, Payload, PointId, SearchRequest, SearchResponse,
    SearchResult, StatsStatus, StoredPoint, UpsertRequest, VectorParams,
};
use super::{collection_name, format_result, parse_partition, StoreError, NO_RESULTS};
use crate::config::VectorStoreConfig;
use crate::embeddings::Embedder;
use chrono::{SecondsFormat, Utc};
use reqwest::blocking::{Client as HttpClient, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Last point id handed out by this process
static LAST_POINT_ID: AtomicU64 = AtomicU64::new(0);

/// Qdrant REST client
///
/// Holds no state besides the address and collection naming, so every
/// operation is a fresh round-trip to the store.
pub struct QdrantClient {
    base_url: String,
    collection: String,
    default_dimension: usize,
    http: HttpClient,
}

impl QdrantClient {
    pub fn new(config: &VectorStoreConfig) -> Result<Self, StoreError> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|source| StoreError::Transport {
                action: "build http client",
                source,
            })?;

        Ok(Self {
            base_url: normalize_url(&config.address),
            collection: config.collection.clone(),
            default_dimension: config.default_dimension,
            http,
        })
    }

    /// Point the client at a different store address
    pub fn connect(&mut self, address: &str) {
        self.base_url = normalize_url(address);
        tracing::debug!(base_url = %self.base_url, "vector store address set");
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Partition name for vectors of `dimension`
    pub fn collection_for(&self, dimension: usize) -> String {
        collection_name(&self.collection, dimension)
    }

    /// Make sure `name` exists, creating it for `dimension`-sized cosine vectors
    ///
    /// An existing collection is left untouched, even if it was created with
    /// another size.
    pub fn ensure_collection(&self, name: &str, dimension: usize) -> Result<(), StoreError> {
        let url = format!("{}/collections/{}", self.base_url, name);
        let response = self.send("check collection", self.http.get(&url))?;

        match response.status() {
            status if status.is_success() => return Ok(()),
            StatusCode::NOT_FOUND => {}
            _ => return Err(status_error("check collection", response)),
        }

        tracing::info!(collection = name, dimension, "creating collection");
        let body = CreateCollectionRequest {
            vectors: VectorParams {
                size: dimension,
                distance: Distance::Cosine,
            },
        };
        let response = self.send("create collection", self.http.put(&url).json(&body))?;
        expect_success("create collection", response)?;
        Ok(())
    }

    /// Embed `text` and store it with `metadata` in the matching partition
    ///
    /// The payload always carries `text` and `timestamp`; metadata keys are
    /// merged afterwards and win on collision. Returns the new point id.
    pub fn store_embedding(
        &self,
        embedder: &dyn Embedder,
        text: &str,
        metadata: Payload,
    ) -> Result<PointId, StoreError> {
        let vector = embedder
            .embed(text)?
            .filter(|v| !v.is_empty())
            .ok_or(StoreError::EmptyEmbedding)?;

        let collection = self.collection_for(vector.len());
        self.ensure_collection(&collection, vector.len())?;

        let point = StoredPoint {
            id: next_point_id(),
            vector,
            payload: build_payload(text, metadata),
        };

        let url = format!("{}/collections/{}/points", self.base_url, collection);
        let body = UpsertRequest {
            points: std::slice::from_ref(&point),
        };
        let response = self.send("store embedding", self.http.put(&url).json(&body))?;
        expect_success("store embedding", response)?;

        tracing::info!(%collection, id = point.id, "stored embedding");
        Ok(point.id)
    }

    /// Top-`k` cosine search in the partition matching the vector's length
    pub fn search(&self, vector: &[f32], k: usize) -> Result<Vec<SearchResult>, StoreError> {
        if vector.is_empty() {
            return Err(StoreError::EmptyEmbedding);
        }

        let collection = self.collection_for(vector.len());
        self.ensure_collection(&collection, vector.len())?;

        let url = format!("{}/collections/{}/points/search", self.base_url, collection);
        let body = SearchRequest {
            vector,
            limit: k,
            with_payload: true,
        };
        let response = self.send("search", self.http.post(&url).json(&body))?;
        let response = expect_success("search", response)?;
        let parsed: SearchResponse = read_json("search", response)?;

        tracing::debug!(%collection, hits = parsed.result.len(), "search complete");
        Ok(parsed.result)
    }

    /// Search and render each hit for display
    ///
    /// Zero hits yields the single-element `[NO_RESULTS]` sequence, never an
    /// empty one.
    pub fn search_similar(&self, vector: &[f32], k: usize) -> Result<Vec<String>, StoreError> {
        let hits = self.search(vector, k)?;
        if hits.is_empty() {
            return Ok(vec![NO_RESULTS.to_string()]);
        }
        Ok(hits.iter().map(format_result).collect())
    }

    /// Stats for the default-dimension partition only
    ///
    /// A missing collection reports zero points rather than an error.
    /// Partitions of other dimensions are not counted; see
    /// [`QdrantClient::partition_stats`] for the aggregate.
    pub fn get_stats(&self) -> Result<CollectionStats, StoreError> {
        let collection = self.collection_for(self.default_dimension);
        Ok(match self.collection_info(&collection)? {
            Some(info) => stats_from_info(collection, &info),
            None => CollectionStats {
                collection,
                total_embeddings: 0,
                vector_size: None,
                status: StatsStatus::CollectionNotFound,
            },
        })
    }

    /// Stats summed over every `<base>_<dimension>` partition in the store
    pub fn partition_stats(&self) -> Result<PartitionStats, StoreError> {
        let url = format!("{}/collections", self.base_url);
        let response = self.send("list collections", self.http.get(&url))?;
        let response = expect_success("list collections", response)?;
        let listing: ListCollectionsResponse = read_json("list collections", response)?;

        let mut names: Vec<(usize, String)> = listing
            .result
            .collections
            .into_iter()
            .filter_map(|c| parse_partition(&self.collection, &c.name).map(|d| (d, c.name)))
            .collect();
        names.sort();

        let mut partitions = Vec::with_capacity(names.len());
        for (_, name) in names {
            // Listed a moment ago; a 404 now means it vanished in between
            if let Some(info) = self.collection_info(&name)? {
                partitions.push(stats_from_info(name, &info));
            }
        }

        Ok(PartitionStats {
            total_embeddings: partitions.iter().map(|p| p.total_embeddings).sum(),
            partitions,
        })
    }

    /// `GET /collections/{name}`; `None` on 404
    fn collection_info(&self, name: &str) -> Result<Option<CollectionInfo>, StoreError> {
        let url = format!("{}/collections/{}", self.base_url, name);
        let response = self.send("get stats", self.http.get(&url))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = expect_success("get stats", response)?;
        let parsed: CollectionInfoResponse = read_json("get stats", response)?;
        Ok(Some(parsed.result))
    }

    fn send(&self, action: &'static str, request: RequestBuilder) -> Result<Response, StoreError> {
        request
            .send()
            .map_err(|source| StoreError::Transport { action, source })
    }
}

/// Accept `host:port` or a full URL
fn normalize_url(address: &str) -> String {
    let address = address.trim().trim_end_matches('/');
    if address.starts_with("http://") || address.starts_with("https://") {
        address.to_string()
    } else {
        format!("http://{}", address)
    }
}

fn expect_success(action: &'static str, response: Response) -> Result<Response, StoreError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(status_error(action, response))
    }
}

fn status_error(action: &'static str, response: Response) -> StoreError {
    let status = response.status().as_u16();
    let body = response.text().unwrap_or_default();
    tracing::warn!(action, status, "vector store rejected request");
    StoreError::Status {
        action,
        status,
        body,
    }
}

fn read_json<T: DeserializeOwned>(action: &'static str, response: Response) -> Result<T, StoreError> {
    let body = response
        .text()
        .map_err(|source| StoreError::Transport { action, source })?;
    serde_json::from_str(&body).map_err(|source| StoreError::Protocol { action, source })
}

fn stats_from_info(collection: String, info: &CollectionInfo) -> CollectionStats {
    CollectionStats {
        collection,
        total_embeddings: info.points_count.unwrap_or(0),
        vector_size: info.vector_size(),
        status: StatsStatus::Ok,
    }
}

/// `text` and `timestamp` first, then caller metadata (last writer wins)
fn build_payload(text: &str, metadata: Payload) -> Payload {
    let mut payload = Payload::new();
    payload.insert("text".to_string(), Value::String(text.to_string()));
    payload.insert(
        "timestamp".to_string(),
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
    );
    payload.extend(metadata);
    payload
}

/// Nanosecond timestamp, bumped past the previous id when the clock stalls
fn next_point_id() -> PointId {
    let now = Utc::now()
        .timestamp_nanos_opt()
        .and_then(|n| u64::try_from(n).ok())
        .unwrap_or_default();

    let mut last = LAST_POINT_ID.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last + 1);
        match LAST_POINT_ID.compare_exchange_weak(last, candidate, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return candidate,
            Err(actual) => last = actual,
        }
    }
}
