//! Local embedding backend - sentence-transformers in a Python subprocess
//!
//! Free after setup. Each call spawns `python -c <script> <model>`, writes the
//! text to the child's stdin and reads one JSON object from its stdout:
//! `{"embedding": [...]}` or `{"error": "..."}`.

use super::{EmbedError, Embedder, EmbeddingVector};
use crate::config::EmbeddingsConfig;
use serde::Deserialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

/// Interpreter inside the project virtualenv, preferred when present
const VENV_PYTHON: &str = ".venv/bin/python";

/// Sentinel printed by the probe script when the library imports
const READY_SENTINEL: &str = "OK";

const EMBED_SCRIPT: &str = r#"
import json
import sys
try:
    from sentence_transformers import SentenceTransformer
    model = SentenceTransformer(sys.argv[1])
    text = sys.stdin.read()
    print(json.dumps({"embedding": model.encode(text).tolist()}))
except Exception as e:
    print(json.dumps({"error": str(e)}))
"#;

const PROBE_SCRIPT: &str = r#"
try:
    import sentence_transformers
    print("OK")
except ImportError:
    print("MISSING")
"#;

/// Reply from the embedding subprocess
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProcessReply {
    Embedding { embedding: EmbeddingVector },
    Failure { error: String },
}

/// Embedder backed by a local sentence-transformers model
#[derive(Debug, Clone)]
pub struct LocalEmbedder {
    model: String,
    python: Option<PathBuf>,
    remediation: String,
}

impl LocalEmbedder {
    pub fn new(config: &EmbeddingsConfig) -> Self {
        Self {
            model: config.local_model.clone(),
            python: config.python.clone(),
            remediation: config.remediation_script.clone(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    /// Verify python and sentence-transformers are usable before embedding
    pub fn check_dependencies(&self) -> Result<(), EmbedError> {
        let python = self.resolve_python()?;

        let output = Command::new(&python)
            .arg("-c")
            .arg(PROBE_SCRIPT)
            .stderr(Stdio::null())
            .output()
            .map_err(|e| self.missing(format!("python not available ({}): {}", python.display(), e)))?;

        if !probe_succeeded(&output.stdout) {
            return Err(self.missing("sentence-transformers not installed".to_string()));
        }

        tracing::debug!(python = %python.display(), model = %self.model, "local embeddings available");
        Ok(())
    }

    /// Interpreter to run: configured path, project venv, or python3 on PATH
    fn resolve_python(&self) -> Result<PathBuf, EmbedError> {
        if let Some(python) = &self.python {
            return Ok(python.clone());
        }

        if Path::new(VENV_PYTHON).exists() {
            return Ok(PathBuf::from(VENV_PYTHON));
        }

        which::which("python3").map_err(|e| self.missing(format!("python3 not found on PATH: {}", e)))
    }

    fn missing(&self, reason: String) -> EmbedError {
        EmbedError::DependencyMissing {
            reason,
            remediation: self.remediation.clone(),
        }
    }
}

impl Embedder for LocalEmbedder {
    fn embed(&self, text: &str) -> Result<Option<EmbeddingVector>, EmbedError> {
        let python = self.resolve_python()?;
        let program = python.display().to_string();
        let launch_err = |source| EmbedError::Launch {
            program: program.clone(),
            source,
        };

        tracing::debug!(python = %program, model = %self.model, chars = text.len(), "spawning local embedder");

        let mut child = Command::new(&python)
            .arg("-c")
            .arg(EMBED_SCRIPT)
            .arg(&self.model)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(launch_err)?;

        // Fed from a thread so stdout and stderr drain while large input is
        // still being written
        let writer = child.stdin.take().map(|mut stdin| {
            let text = text.to_owned();
            thread::spawn(move || stdin.write_all(text.as_bytes()))
        });

        let output = child.wait_with_output().map_err(launch_err)?;

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                // The script quit before reading its input; its reply says why
                Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {
                    tracing::debug!(python = %program, "embedder exited before reading input");
                }
                Ok(Err(e)) => return Err(launch_err(e)),
                Err(_) => return Err(EmbedError::Runtime("stdin writer thread panicked".to_string())),
            }
        }

        if !output.status.success() {
            return Err(EmbedError::Runtime(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        parse_reply(&output.stdout).map(Some)
    }
}

/// True when the probe printed exactly the ready sentinel
fn probe_succeeded(stdout: &[u8]) -> bool {
    String::from_utf8_lossy(stdout).trim() == READY_SENTINEL
}

/// Decode the subprocess reply; the JSON object is the last non-empty line
fn parse_reply(stdout: &[u8]) -> Result<EmbeddingVector, EmbedError> {
    let text = String::from_utf8_lossy(stdout);
    let line = text
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or_default();

    match serde_json::from_str::<ProcessReply>(line)? {
        ProcessReply::Embedding { embedding } => Ok(embedding),
        ProcessReply::Failure { error } => Err(EmbedError::Runtime(error)),
    }
}
