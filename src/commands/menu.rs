//! Interactive menu - used when no subcommand is given

use super::{ask, log, prompt, QDRANT_HINT};
use anyhow::Result;
use debugmate::Assistant;

pub fn execute(assistant: &Assistant) -> Result<()> {
    println!("🔧 debugmate - AI-Powered Error Analysis");
    println!("=====================================");

    match assistant.stats() {
        Ok(stats) => println!("📊 Database: {} stored errors", stats.total_embeddings),
        Err(e) => {
            println!("⚠️ Warning: Could not connect to Qdrant ({:#})", e);
            println!("{}", QDRANT_HINT);
        }
    }

    println!("1. Log new error");
    println!("2. Ask for solution");

    match prompt("\nChoose an option (1 or 2): ")?.as_str() {
        "1" => {
            let error_text = prompt("\nEnter the error you want to log: ")?;
            let solution_text = prompt("\nHow did you fix this error? (Describe the solution): ")?;
            log::execute(assistant, &error_text, &solution_text)
        }
        "2" => {
            let query = prompt("\nDescribe the error you need help with: ")?;
            let options = ask::AskOptions {
                limit: None,
                no_diagnosis: false,
            };
            ask::execute(assistant, &query, &options)
        }
        _ => {
            println!("Invalid choice. Please run the program again and select 1 or 2.");
            Ok(())
        }
    }
}
