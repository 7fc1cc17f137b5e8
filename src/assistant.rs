//! Assistant - the two user-facing operations
//!
//! - **log**: embed an error + its fix and store it
//! - **ask**: embed a question, find similar logged errors, optionally have a
//!   chat model write a diagnosis from them
//!
//! Each operation picks its embedding backend independently, so a session can
//! log with local embeddings and ask with remote ones if local availability
//! changes in between. Because partitions are per-dimension, such a question
//! only sees errors logged with the same backend.

use crate::config::Config;
use crate::diagnosis::{Diagnoser, OpenAiDiagnoser};
use crate::embeddings::{create_embedder, BackendKind, Embedder, SelectedEmbedder};
use crate::vectordb::{is_no_results, CollectionStats, Payload, PointId, QdrantClient};
use anyhow::{Context, Result};
use serde_json::json;

/// Receipt for a logged error
#[derive(Debug)]
pub struct LoggedError {
    pub id: PointId,
    pub backend: BackendKind,
    /// Why local embeddings were skipped, if they were preferred
    pub fallback_reason: Option<String>,
}

/// Similar errors retrieved for a question
#[derive(Debug)]
pub struct SimilarErrors {
    pub backend: BackendKind,
    pub fallback_reason: Option<String>,
    /// Formatted hits, or the single no-results sentinel
    pub documents: Vec<String>,
}

impl SimilarErrors {
    /// Real matches only; empty when the store had nothing
    pub fn matches(&self) -> &[String] {
        if is_no_results(&self.documents) {
            &[]
        } else {
            &self.documents[..]
        }
    }
}

/// Full answer to a question
#[derive(Debug)]
pub struct Answer {
    pub similar: SimilarErrors,
    /// `None` when no diagnoser was supplied
    pub diagnosis: Option<String>,
}

pub struct Assistant {
    config: Config,
    store: QdrantClient,
}

impl Assistant {
    pub fn new(config: Config) -> Result<Self> {
        let store =
            QdrantClient::new(&config.vector_store).context("Failed to create vector store client")?;
        Ok(Self { config, store })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &QdrantClient {
        &self.store
    }

    /// Stats for the default partition, used as a reachability probe
    pub fn stats(&self) -> Result<CollectionStats> {
        self.store
            .get_stats()
            .with_context(|| format!("Could not reach vector store at {}", self.store.base_url()))
    }

    /// Choose an embedding backend for one operation
    pub fn select_embedder(&self) -> Result<SelectedEmbedder> {
        create_embedder(
            self.config.embeddings.prefer_local,
            self.config.api_key(),
            &self.config.embeddings,
        )
        .context("Error creating embedder")
    }

    /// Store an error and the fix that resolved it
    pub fn log_error(&self, error_text: &str, solution_text: &str) -> Result<LoggedError> {
        let selected = self.select_embedder()?;
        let combined = format!("Error: {}\nSolution: {}", error_text, solution_text);

        let mut metadata = Payload::new();
        metadata.insert("error_type".to_string(), json!("user_logged"));
        metadata.insert("has_solution".to_string(), json!(true));
        metadata.insert("original_error".to_string(), json!(error_text));
        metadata.insert("solution".to_string(), json!(solution_text));

        let id = self
            .store
            .store_embedding(&selected, &combined, metadata)
            .context("Error storing embedding")?;

        Ok(LoggedError {
            id,
            backend: selected.kind,
            fallback_reason: selected.fallback_reason,
        })
    }

    /// Embed `query` and retrieve up to `limit` similar logged errors
    pub fn find_similar(&self, query: &str, limit: usize) -> Result<SimilarErrors> {
        let selected = self.select_embedder()?;

        let vector = selected
            .embed(query)
            .context("Error generating embedding")?
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow::anyhow!("Embedding backend produced no vector for the query"))?;

        let documents = self
            .store
            .search_similar(&vector, limit)
            .context("Error searching database")?;

        Ok(SimilarErrors {
            backend: selected.kind,
            fallback_reason: selected.fallback_reason,
            documents,
        })
    }

    /// Chat-model diagnoser, if an API key is configured
    pub fn default_diagnoser(&self) -> Result<Option<OpenAiDiagnoser>> {
        match self.config.openai_api_key.as_deref() {
            Some(key) => Ok(Some(OpenAiDiagnoser::new(&self.config.diagnosis, key)?)),
            None => Ok(None),
        }
    }

    /// Ask `diagnoser` about `query`, given what retrieval found
    ///
    /// The no-results sentinel is never passed along as context.
    pub fn diagnose(
        &self,
        diagnoser: &dyn Diagnoser,
        query: &str,
        similar: &SimilarErrors,
    ) -> Result<String> {
        diagnoser
            .diagnose(query, similar.matches())
            .context("Error generating solution")
    }

    /// Retrieval followed by an optional diagnosis
    pub fn ask(&self, query: &str, diagnoser: Option<&dyn Diagnoser>) -> Result<Answer> {
        let similar = self.find_similar(query, self.config.vector_store.search_limit)?;
        let diagnosis = match diagnoser {
            Some(d) => Some(self.diagnose(d, query, &similar)?),
            None => None,
        };
        Ok(Answer { similar, diagnosis })
    }
}
