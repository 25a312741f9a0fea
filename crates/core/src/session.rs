//! History of generations made during one interactive session.

use std::path::{Path, PathBuf};

use crate::error::CoreError;
use crate::naming::session_log_filename;
use crate::types::GenerationResult;

/// Prompt length shown in history lines before truncation.
const SUMMARY_PROMPT_CHARS: usize = 50;

#[derive(Debug, Default, Clone)]
pub struct SessionLog {
    results: Vec<GenerationResult>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: GenerationResult) {
        self.results.push(result);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn results(&self) -> &[GenerationResult] {
        &self.results
    }

    /// One numbered line per generation, e.g. `1. ✅ 'a cat' (2 images)`.
    pub fn summary_lines(&self) -> Vec<String> {
        self.results
            .iter()
            .enumerate()
            .map(|(i, result)| {
                let status = if result.success { "✅" } else { "❌" };
                let count = if result.success { result.count } else { 0 };
                format!(
                    "{}. {status} '{}' ({count} images)",
                    i + 1,
                    shorten(&result.original_prompt)
                )
            })
            .collect()
    }

    /// Write the session as pretty-printed JSON into `dir`.
    ///
    /// Uses `file_name` when given, otherwise `session_log_{timestamp}.json`.
    pub async fn save(&self, dir: &Path, file_name: Option<&str>) -> Result<PathBuf, CoreError> {
        let name = match file_name {
            Some(name) => name.to_string(),
            None => session_log_filename(&chrono::Local::now()),
        };
        let path = dir.join(name);

        let json = serde_json::to_string_pretty(&self.results)
            .map_err(|e| CoreError::Internal(format!("Failed to serialize session log: {e}")))?;
        tokio::fs::write(&path, json).await?;

        tracing::info!(path = %path.display(), generations = self.results.len(), "Session log saved");
        Ok(path)
    }
}

fn shorten(prompt: &str) -> String {
    if prompt.chars().count() > SUMMARY_PROMPT_CHARS {
        let head: String = prompt.chars().take(SUMMARY_PROMPT_CHARS).collect();
        format!("{head}...")
    } else {
        prompt.to_string()
    }
}
