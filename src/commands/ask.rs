//! Ask command - find similar logged errors and ask for a diagnosis

use super::{store_unreachable, QDRANT_HINT};
use anyhow::Result;
use debugmate::embeddings::BackendKind;
use debugmate::Assistant;

pub struct AskOptions {
    /// Number of similar errors to retrieve (config default when `None`)
    pub limit: Option<usize>,
    /// Skip the chat-model diagnosis even when an API key is available
    pub no_diagnosis: bool,
}

pub fn execute(assistant: &Assistant, query: &str, options: &AskOptions) -> Result<()> {
    if query.is_empty() {
        anyhow::bail!("Nothing to ask: the error description is empty");
    }

    println!("\n🔍 Searching for similar errors...");

    let limit = options
        .limit
        .unwrap_or(assistant.config().vector_store.search_limit);

    let similar = match assistant.find_similar(query, limit) {
        Ok(similar) => similar,
        Err(e) => {
            if store_unreachable(&e) {
                println!("{}", QDRANT_HINT);
            }
            return Err(e);
        }
    };

    match similar.backend {
        BackendKind::Local => println!("✅ Used local embeddings for search (free!)"),
        BackendKind::Remote => {
            if let Some(reason) = &similar.fallback_reason {
                println!("⚠️  Local embeddings not available ({})", reason);
            }
            println!("💸 Used OpenAI embeddings for search (costs money)");
        }
    }

    let matches = similar.matches();
    if matches.is_empty() {
        println!("\n📋 {}", debugmate::vectordb::NO_RESULTS);
    } else {
        println!("\n📋 Found {} similar error(s):", matches.len());
        for (i, doc) in matches.iter().enumerate() {
            println!("\n--- Similar Error {} ---\n{}", i + 1, doc);
        }
    }

    if options.no_diagnosis {
        return Ok(());
    }

    let diagnoser = match assistant.default_diagnoser()? {
        Some(d) => d,
        None => {
            println!("\n❌ OPENAI_API_KEY not found for generating AI solutions");
            println!("Refer to the similar errors above!");
            return Ok(());
        }
    };

    println!("\n🤖 Generating AI solution (costs money)...");
    let diagnosis = assistant.diagnose(&diagnoser, query, &similar)?;

    println!("\n🔥 AI Diagnosis:");
    println!("================");
    println!("{}", diagnosis);

    Ok(())
}
