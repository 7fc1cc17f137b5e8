pub mod assistant;
pub mod config;
pub mod diagnosis;
pub mod embeddings;
pub mod logging;
pub mod vectordb;

// Re-export commonly used types
pub use assistant::Assistant;
pub use config::Config;
pub use embeddings::{create_embedder, Embedder};
pub use vectordb::QdrantClient;
