// Whole-file JSON stores: user memory, chat history and form-submission
// logs. Loads fall back to an empty value when the file is missing; invalid
// JSON is a hard error surfaced to the caller. Saves overwrite the file in
// place with no locking and no atomicity guarantee.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Named facts about the user, persisted as a single JSON object.
/// Currently only `name` is ever written.
pub type Memory = serde_json::Map<String, serde_json::Value>;

/// One chat turn: what the user typed and what the assistant replied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub user: String,
    pub ai: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Owns the paths of the three JSON stores under one data directory.
pub struct Store {
    memory_path: PathBuf,
    history_path: PathBuf,
    form_logs_path: PathBuf,
}

impl Store {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            memory_path: data_dir.join("memory.json"),
            history_path: data_dir.join("chat_history.json"),
            form_logs_path: data_dir.join("form_logs.json"),
        }
    }

    pub fn load_memory(&self) -> Result<Memory, StoreError> {
        load_or_default(&self.memory_path)
    }

    pub fn save_memory(&self, memory: &Memory) -> Result<(), StoreError> {
        save_value(&self.memory_path, memory)
    }

    pub fn load_history(&self) -> Result<Vec<ChatTurn>, StoreError> {
        load_or_default(&self.history_path)
    }

    pub fn save_history(&self, history: &[ChatTurn]) -> Result<(), StoreError> {
        save_value(&self.history_path, &history)
    }

    // Present for symmetry with the other stores; no code path writes
    // submissions yet (see DESIGN.md).
    pub fn load_form_logs(&self) -> Result<Vec<serde_json::Value>, StoreError> {
        load_or_default(&self.form_logs_path)
    }

    pub fn save_form_logs(&self, logs: &[serde_json::Value]) -> Result<(), StoreError> {
        save_value(&self.form_logs_path, &logs)
    }
}

fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
    if !path.exists() {
        return Ok(T::default());
    }
    let raw = fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn save_value<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let rendered = serde_json::to_string_pretty(value).map_err(|source| StoreError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, rendered).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}
