//! Embeddings module - Turn text into fixed-length vectors
//!
//! Provides a trait-based abstraction with two backends:
//! - **Local**: sentence-transformers in a Python subprocess (free)
//! - **Remote**: hosted embeddings API (costs money)
//!
//! Callers never care which one they got: both are just a call that may
//! block and may fail.

mod error;
mod local;
mod remote;

pub use error::EmbedError;
pub use local::LocalEmbedder;
pub use remote::RemoteEmbedder;

use crate::config::EmbeddingsConfig;
use std::fmt;

/// Ordered vector of floats; its length is fixed by the producing model
pub type EmbeddingVector = Vec<f32>;

/// Trait for embedding generation backends
pub trait Embedder {
    /// Generate an embedding for `text`
    ///
    /// `Ok(None)` means the backend answered but produced no vector. Callers
    /// must treat that as "no embedding" and fail their next step explicitly.
    fn embed(&self, text: &str) -> Result<Option<EmbeddingVector>, EmbedError>;
}

/// Which backend the selector settled on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Local,
    Remote,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Local => write!(f, "local"),
            BackendKind::Remote => write!(f, "remote"),
        }
    }
}

/// Result of backend selection
pub struct SelectedEmbedder {
    pub kind: BackendKind,
    pub embedder: Box<dyn Embedder>,
    /// Why the local backend was skipped, when it was preferred but unusable
    pub fallback_reason: Option<String>,
}

impl Embedder for SelectedEmbedder {
    fn embed(&self, text: &str) -> Result<Option<EmbeddingVector>, EmbedError> {
        self.embedder.embed(text)
    }
}

/// Factory function choosing an embedding backend
///
/// With `prefer_local`, the local backend is used if its dependency check
/// passes; otherwise the remote backend is constructed instead. The remote
/// backend is not validated eagerly. One choice is made per call, so two
/// operations in one session may end up on different backends.
pub fn create_embedder(
    prefer_local: bool,
    remote_api_key: &str,
    config: &EmbeddingsConfig,
) -> Result<SelectedEmbedder, EmbedError> {
    let mut fallback_reason = None;

    if prefer_local {
        let local = LocalEmbedder::new(config);
        match local.check_dependencies() {
            Ok(()) => {
                tracing::info!(model = local.model_name(), "using local embeddings");
                return Ok(SelectedEmbedder {
                    kind: BackendKind::Local,
                    embedder: Box::new(local),
                    fallback_reason: None,
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "local embedder not available, falling back to remote");
                fallback_reason = Some(e.to_string());
            }
        }
    }

    let remote = RemoteEmbedder::new(config, remote_api_key)?;
    tracing::info!(model = remote.model_name(), "using remote embeddings");
    Ok(SelectedEmbedder {
        kind: BackendKind::Remote,
        embedder: Box::new(remote),
        fallback_reason,
    })
}
