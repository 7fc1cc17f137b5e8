//! Integration tests for the Qdrant client against a mock REST server

use debugmate::config::VectorStoreConfig;
use debugmate::embeddings::{EmbedError, Embedder, EmbeddingVector};
use debugmate::vectordb::{Payload, QdrantClient, StatsStatus, StoreError, NO_RESULTS};
use mockito::{Matcher, Server};
use serde_json::json;

/// Embedder returning a fixed answer
struct FixedEmbedder(Option<EmbeddingVector>);

impl Embedder for FixedEmbedder {
    fn embed(&self, _text: &str) -> Result<Option<EmbeddingVector>, EmbedError> {
        Ok(self.0.clone())
    }
}

fn client_for(server: &Server) -> QdrantClient {
    let config = VectorStoreConfig {
        address: server.url(),
        ..Default::default()
    };
    QdrantClient::new(&config).unwrap()
}

#[test]
fn test_ensure_collection_creates_once() {
    let mut server = Server::new();
    let missing = server
        .mock("GET", "/collections/debug_errors_384")
        .with_status(404)
        .expect(1)
        .create();
    let present = server
        .mock("GET", "/collections/debug_errors_384")
        .with_status(200)
        .with_body(r#"{"result":{"points_count":0}}"#)
        .expect(1)
        .create();
    let create = server
        .mock("PUT", "/collections/debug_errors_384")
        .match_body(Matcher::Json(json!({"vectors": {"size": 384, "distance": "Cosine"}})))
        .with_status(200)
        .with_body(r#"{"result":true,"status":"ok"}"#)
        .expect(1)
        .create();

    let client = client_for(&server);
    client.ensure_collection("debug_errors_384", 384).unwrap();
    client.ensure_collection("debug_errors_384", 384).unwrap();

    missing.assert();
    present.assert();
    create.assert();
}

#[test]
fn test_ensure_existing_collection_is_noop() {
    let mut server = Server::new();
    server
        .mock("GET", "/collections/debug_errors_384")
        .with_status(200)
        .with_body(r#"{"result":{"points_count":12}}"#)
        .create();
    let create = server
        .mock("PUT", "/collections/debug_errors_384")
        .expect(0)
        .create();

    let client = client_for(&server);
    client.ensure_collection("debug_errors_384", 384).unwrap();
    client.ensure_collection("debug_errors_384", 384).unwrap();

    create.assert();
}

#[test]
fn test_ensure_collection_unexpected_status() {
    let mut server = Server::new();
    server
        .mock("GET", "/collections/debug_errors_384")
        .with_status(500)
        .with_body("storage error")
        .create();

    let client = client_for(&server);
    let err = client.ensure_collection("debug_errors_384", 384).unwrap_err();

    match &err {
        StoreError::Status { status, body, .. } => {
            assert_eq!(*status, 500);
            assert_eq!(body, "storage error");
        }
        other => panic!("expected status error, got {:?}", other),
    }
    // The store answered, so it is not reported as unreachable
    assert!(!err.is_transport());
}

#[test]
fn test_store_embedding_upserts_into_dimension_partition() {
    let mut server = Server::new();
    server
        .mock("GET", "/collections/debug_errors_3")
        .with_status(404)
        .create();
    let create = server
        .mock("PUT", "/collections/debug_errors_3")
        .match_body(Matcher::PartialJson(json!({"vectors": {"size": 3}})))
        .with_status(200)
        .with_body(r#"{"result":true}"#)
        .create();
    let upsert = server
        .mock("PUT", "/collections/debug_errors_3/points")
        .match_body(Matcher::PartialJson(json!({
            "points": [{
                "vector": [0.5, 0.25, 0.125],
                "payload": {
                    "text": "Error: disk full\nSolution: rotate logs",
                    "error_type": "user_logged"
                }
            }]
        })))
        .with_status(200)
        .with_body(r#"{"result":{"operation_id":1,"status":"completed"}}"#)
        .expect(1)
        .create();

    let mut metadata = Payload::new();
    metadata.insert("error_type".to_string(), json!("user_logged"));

    let client = client_for(&server);
    let embedder = FixedEmbedder(Some(vec![0.5, 0.25, 0.125]));
    let id = client
        .store_embedding(&embedder, "Error: disk full\nSolution: rotate logs", metadata)
        .unwrap();

    assert!(id > 0);
    create.assert();
    upsert.assert();
}

#[test]
fn test_store_payload_carries_timestamp() {
    let mut server = Server::new();
    server
        .mock("GET", "/collections/debug_errors_2")
        .with_status(200)
        .with_body(r#"{"result":{}}"#)
        .create();
    let upsert = server
        .mock("PUT", "/collections/debug_errors_2/points")
        .match_body(Matcher::Regex(r#""timestamp":"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}Z""#.to_string()))
        .with_status(200)
        .with_body(r#"{"result":{}}"#)
        .create();

    let client = client_for(&server);
    client
        .store_embedding(&FixedEmbedder(Some(vec![1.0, 0.0])), "oom", Payload::new())
        .unwrap();

    upsert.assert();
}

#[test]
fn test_store_without_embedding_fails_before_any_request() {
    let mut server = Server::new();
    let any_get = server.mock("GET", Matcher::Any).expect(0).create();
    let any_put = server.mock("PUT", Matcher::Any).expect(0).create();

    let client = client_for(&server);
    let err = client
        .store_embedding(&FixedEmbedder(None), "disk full", Payload::new())
        .unwrap_err();
    assert!(matches!(err, StoreError::EmptyEmbedding));

    let err = client
        .store_embedding(&FixedEmbedder(Some(vec![])), "disk full", Payload::new())
        .unwrap_err();
    assert!(matches!(err, StoreError::EmptyEmbedding));

    any_get.assert();
    any_put.assert();
}

#[test]
fn test_upsert_rejection_is_reported() {
    let mut server = Server::new();
    server
        .mock("GET", "/collections/debug_errors_2")
        .with_status(200)
        .with_body(r#"{"result":{}}"#)
        .create();
    server
        .mock("PUT", "/collections/debug_errors_2/points")
        .with_status(400)
        .with_body(r#"{"status":{"error":"Wrong input: Vector dimension error"}}"#)
        .create();

    let client = client_for(&server);
    let err = client
        .store_embedding(&FixedEmbedder(Some(vec![1.0, 0.0])), "oom", Payload::new())
        .unwrap_err();

    match err {
        StoreError::Status { action, status, body } => {
            assert_eq!(action, "store embedding");
            assert_eq!(status, 400);
            assert!(body.contains("Vector dimension error"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[test]
fn test_search_only_touches_matching_partition() {
    let mut server = Server::new();
    server
        .mock("GET", "/collections/debug_errors_3")
        .with_status(200)
        .with_body(r#"{"result":{}}"#)
        .create();
    let other_check = server
        .mock("GET", "/collections/debug_errors_5")
        .expect(0)
        .create();
    let other_search = server
        .mock("POST", "/collections/debug_errors_5/points/search")
        .expect(0)
        .create();
    let search = server
        .mock("POST", "/collections/debug_errors_3/points/search")
        .match_body(Matcher::PartialJson(json!({"limit": 2, "with_payload": true})))
        .with_status(200)
        .with_body(
            json!({
                "result": [
                    {"id": 11, "score": 0.8734, "payload": {"text": "disk full", "timestamp": "2024-01-01T00:00:00Z"}},
                    {"id": 12, "score": 0.5, "payload": {"timestamp": "2024-02-01T00:00:00Z"}}
                ]
            })
            .to_string(),
        )
        .expect(1)
        .create();

    let client = client_for(&server);
    let docs = client.search_similar(&[0.1, 0.2, 0.3], 2).unwrap();

    assert_eq!(
        docs,
        vec![
            "Similarity: 0.87\nContent: disk full\nTimestamp: 2024-01-01T00:00:00Z\n".to_string(),
            "Similarity: 0.50\nContent: Unknown content\nTimestamp: 2024-02-01T00:00:00Z\n".to_string(),
        ]
    );
    search.assert();
    other_check.assert();
    other_search.assert();
}

#[test]
fn test_search_fresh_collection_returns_sentinel() {
    let mut server = Server::new();
    server
        .mock("GET", "/collections/debug_errors_4")
        .with_status(404)
        .create();
    let create = server
        .mock("PUT", "/collections/debug_errors_4")
        .with_status(200)
        .with_body(r#"{"result":true}"#)
        .create();
    server
        .mock("POST", "/collections/debug_errors_4/points/search")
        .with_status(200)
        .with_body(r#"{"result":[],"status":"ok"}"#)
        .create();

    let client = client_for(&server);
    let docs = client.search_similar(&[0.0, 0.1, 0.2, 0.3], 3).unwrap();

    assert_eq!(docs, vec![NO_RESULTS.to_string()]);
    create.assert();
}

#[test]
fn test_search_with_empty_vector_is_rejected() {
    let server = Server::new();
    let client = client_for(&server);
    assert!(matches!(
        client.search_similar(&[], 3).unwrap_err(),
        StoreError::EmptyEmbedding
    ));
}

#[test]
fn test_malformed_search_reply_is_protocol_error() {
    let mut server = Server::new();
    server
        .mock("GET", "/collections/debug_errors_2")
        .with_status(200)
        .with_body(r#"{"result":{}}"#)
        .create();
    server
        .mock("POST", "/collections/debug_errors_2/points/search")
        .with_status(200)
        .with_body(r#"{"result":[{"id":"not-a-number","score":"high"}]}"#)
        .create();

    let client = client_for(&server);
    let err = client.search_similar(&[1.0, 0.0], 3).unwrap_err();

    assert!(matches!(err, StoreError::Protocol { action: "search", .. }));
    assert!(!err.is_transport());
}

#[test]
fn test_unreachable_store_is_transport_error() {
    let config = VectorStoreConfig {
        address: "127.0.0.1:1".to_string(),
        timeout_secs: 2,
        ..Default::default()
    };
    let client = QdrantClient::new(&config).unwrap();

    let err = client.get_stats().unwrap_err();
    assert!(matches!(err, StoreError::Transport { .. }));
    assert!(err.is_transport());
}

#[test]
fn test_stats_missing_default_collection_reports_zero() {
    let mut server = Server::new();
    server
        .mock("GET", "/collections/debug_errors_384")
        .with_status(404)
        .with_body(r#"{"status":{"error":"Not found"}}"#)
        .create();

    let client = client_for(&server);
    let stats = client.get_stats().unwrap();

    assert_eq!(stats.collection, "debug_errors_384");
    assert_eq!(stats.total_embeddings, 0);
    assert_eq!(stats.vector_size, None);
    assert_eq!(stats.status, StatsStatus::CollectionNotFound);
}

#[test]
fn test_stats_reads_count_and_size() {
    let mut server = Server::new();
    server
        .mock("GET", "/collections/debug_errors_384")
        .with_status(200)
        .with_body(
            json!({"result": {"points_count": 42, "config": {"params": {"vectors": {"size": 384, "distance": "Cosine"}}}}})
                .to_string(),
        )
        .create();

    let client = client_for(&server);
    let stats = client.get_stats().unwrap();

    assert_eq!(stats.total_embeddings, 42);
    assert_eq!(stats.vector_size, Some(384));
    assert_eq!(stats.status, StatsStatus::Ok);
}

#[test]
fn test_partition_stats_sums_dimension_partitions() {
    let mut server = Server::new();
    server
        .mock("GET", "/collections")
        .with_status(200)
        .with_body(
            json!({"result": {"collections": [
                {"name": "debug_errors_1536"},
                {"name": "unrelated"},
                {"name": "debug_errors_384"},
                {"name": "debug_errors_archive"}
            ]}})
            .to_string(),
        )
        .create();
    server
        .mock("GET", "/collections/debug_errors_384")
        .with_status(200)
        .with_body(json!({"result": {"points_count": 5, "config": {"params": {"vectors": {"size": 384}}}}}).to_string())
        .create();
    server
        .mock("GET", "/collections/debug_errors_1536")
        .with_status(200)
        .with_body(json!({"result": {"points_count": 2, "config": {"params": {"vector_size": 1536}}}}).to_string())
        .create();
    let unrelated = server
        .mock("GET", "/collections/unrelated")
        .expect(0)
        .create();

    let client = client_for(&server);
    let stats = client.partition_stats().unwrap();

    assert_eq!(stats.total_embeddings, 7);
    let names: Vec<&str> = stats.partitions.iter().map(|p| p.collection.as_str()).collect();
    assert_eq!(names, vec!["debug_errors_384", "debug_errors_1536"]);
    assert_eq!(stats.partitions[1].vector_size, Some(1536));
    unrelated.assert();
}
