pub mod ask;
pub mod log;
pub mod menu;
pub mod stats;

use anyhow::Result;
use debugmate::vectordb::StoreError;
use std::io::{self, BufRead, Write};

/// Hint printed whenever the vector store cannot be reached
pub const QDRANT_HINT: &str =
    "💡 Make sure Qdrant is running: docker run -p 6333:6333 qdrant/qdrant";

/// Print `label` and read one trimmed line from stdin
pub fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// True when `err` was caused by the vector store being unreachable
pub fn store_unreachable(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<StoreError>())
        .any(StoreError::is_transport)
}
