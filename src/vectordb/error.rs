//! Vector store errors

use crate::embeddings::EmbedError;
use thiserror::Error;

/// Failure talking to the vector store
///
/// `Transport` means the store could not be reached at all. `Status` means it
/// answered but refused the request. `Protocol` means it replied with
/// something this client does not understand.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to generate embedding")]
    Embedding(#[from] EmbedError),

    /// The embedder produced no vector (or an empty one)
    #[error("no embedding was produced for the given text")]
    EmptyEmbedding,

    #[error("{action}: vector store unreachable")]
    Transport {
        action: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{action}: unexpected status {status}: {body}")]
    Status {
        action: &'static str,
        status: u16,
        body: String,
    },

    #[error("{action}: unexpected response from vector store")]
    Protocol {
        action: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// True when the store could not be reached; a refused request is not
    pub fn is_transport(&self) -> bool {
        matches!(self, StoreError::Transport { .. })
    }
}
