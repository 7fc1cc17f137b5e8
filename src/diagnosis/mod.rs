//! Diagnosis - Ask a chat model to explain an error given similar past ones
//!
//! The retrieval core treats this as an opaque collaborator: a query plus
//! retrieved snippets go in, a diagnosis string (or an error) comes out.

mod openai;

pub use openai::OpenAiDiagnoser;

use anyhow::Result;

/// System message framing the assistant
pub const SYSTEM_PROMPT: &str = "You are a senior DevOps engineer. Help troubleshoot infra issues like logs, Kubernetes configs, and Terraform plans.";

/// Produces a diagnosis for an error description
pub trait Diagnoser {
    fn diagnose(&self, query: &str, similar_documents: &[String]) -> Result<String>;
}

/// User message: the new issue, numbered similar issues, requested sections
pub fn build_prompt(query: &str, similar_documents: &[String]) -> String {
    let mut prompt = String::new();

    prompt.push_str("You are an infrastructure assistant. A user has pasted a log/config snippet and you must help debug it.\n\n");
    prompt.push_str("New issue:\n");
    prompt.push_str(query);
    prompt.push_str("\n\n");

    if !similar_documents.is_empty() {
        prompt.push_str("Similar past issues:\n");
        for (i, doc) in similar_documents.iter().enumerate() {
            prompt.push_str(&format!("{}. {}\n", i + 1, doc));
        }
    }

    prompt.push_str("\n---\nPlease respond with:\n- Likely Root Cause\n- Suggested Fix\n");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_numbers_similar_issues() {
        let docs = vec!["first match".to_string(), "second match".to_string()];
        let prompt = build_prompt("pod CrashLoopBackOff", &docs);

        assert!(prompt.contains("New issue:\npod CrashLoopBackOff\n"));
        assert!(prompt.contains("Similar past issues:\n1. first match\n2. second match\n"));
        assert!(prompt.ends_with("- Likely Root Cause\n- Suggested Fix\n"));
    }

    #[test]
    fn test_prompt_without_context_omits_section() {
        let prompt = build_prompt("terraform plan fails", &[]);
        assert!(!prompt.contains("Similar past issues"));
        assert!(prompt.contains("terraform plan fails"));
    }
}
