//! Log command - store an error together with the fix that resolved it

use super::{store_unreachable, QDRANT_HINT};
use anyhow::Result;
use debugmate::embeddings::BackendKind;
use debugmate::Assistant;

pub fn execute(assistant: &Assistant, error_text: &str, solution_text: &str) -> Result<()> {
    if error_text.is_empty() {
        anyhow::bail!("Nothing to log: the error description is empty");
    }

    println!("\n📝 Logging error and generating embedding...");

    let logged = match assistant.log_error(error_text, solution_text) {
        Ok(logged) => logged,
        Err(e) => {
            if store_unreachable(&e) {
                println!("{}", QDRANT_HINT);
            }
            return Err(e);
        }
    };

    match logged.backend {
        BackendKind::Local => println!("✅ Used local embeddings (free!)"),
        BackendKind::Remote => {
            if let Some(reason) = &logged.fallback_reason {
                println!("⚠️  Local embeddings not available ({})", reason);
            }
            println!("💸 Used OpenAI embeddings (costs money)");
        }
    }

    println!("✅ Error and solution stored successfully! (id {})", logged.id);
    println!("📊 The error has been indexed and will be available for future searches.");
    println!("📋 Summary:");
    println!("   Problem: {}", error_text);
    println!("   Solution: {}", solution_text);

    Ok(())
}
