//! Stats command - how many errors are stored

use super::{store_unreachable, QDRANT_HINT};
use anyhow::{Context, Result};
use debugmate::vectordb::StatsStatus;
use debugmate::Assistant;

pub fn execute(assistant: &Assistant, all: bool, json: bool) -> Result<()> {
    let result = if all {
        show_partitions(assistant, json)
    } else {
        show_default(assistant, json)
    };

    if let Err(e) = &result {
        if store_unreachable(e) {
            println!("{}", QDRANT_HINT);
        }
    }
    result
}

fn show_default(assistant: &Assistant, json: bool) -> Result<()> {
    let stats = assistant.stats()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("📊 Collection: {}", stats.collection);
    match stats.status {
        StatsStatus::Ok => {
            println!("   Stored errors: {}", stats.total_embeddings);
            if let Some(size) = stats.vector_size {
                println!("   Vector size: {}", size);
            }
        }
        StatsStatus::CollectionNotFound => {
            println!("   Not created yet (nothing logged with this embedding size)");
        }
    }
    println!("   (other embedding sizes: run with --all)");
    Ok(())
}

fn show_partitions(assistant: &Assistant, json: bool) -> Result<()> {
    let stats = assistant
        .store()
        .partition_stats()
        .context("Failed to list collections")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    if stats.partitions.is_empty() {
        println!("📊 No errors logged yet");
        return Ok(());
    }

    println!("📊 {} stored errors across {} collection(s):", stats.total_embeddings, stats.partitions.len());
    for partition in &stats.partitions {
        println!(
            "   {:<24} {:>8} points  (dim {})",
            partition.collection,
            partition.total_embeddings,
            partition
                .vector_size
                .map(|s| s.to_string())
                .unwrap_or_else(|| "?".to_string())
        );
    }
    Ok(())
}
