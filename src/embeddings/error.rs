//! Error type shared by the embedding backends

use thiserror::Error;

/// Failure while producing an embedding.
///
/// `DependencyMissing` is the only recoverable variant: the selector answers
/// it by falling back to the remote backend. Everything else is reported to
/// the caller as-is.
#[derive(Debug, Error)]
pub enum EmbedError {
    /// Local runtime (python or sentence-transformers) is not installed
    #[error("{reason}. Run: {remediation}")]
    DependencyMissing { reason: String, remediation: String },

    /// The embedding subprocess could not be started or waited on
    #[error("failed to run embedding process `{program}`")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The embedding library itself reported an error
    #[error("embedding runtime error: {0}")]
    Runtime(String),

    /// The embeddings endpoint could not be reached
    #[error("embedding request failed")]
    Transport(#[from] reqwest::Error),

    /// The embeddings endpoint answered with a non-success status
    #[error("embedding API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The backend replied with something that is not an embedding response
    #[error("malformed embedding response")]
    Protocol(#[from] serde_json::Error),
}

impl EmbedError {
    pub fn is_dependency_missing(&self) -> bool {
        matches!(self, EmbedError::DependencyMissing { .. })
    }
}
