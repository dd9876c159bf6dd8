// Mirrors the task list into a slot

use crate::slot::{Slot, validate_key};
use crate::task::Task;
use eyre::{Context, Result};
use serde_json::Value;
use tracing::{debug, error, info, warn};

/// Key used when none is configured
pub const DEFAULT_KEY: &str = "tasks";

/// Loads the task list once at startup and saves it after each mutation
pub struct Persistence<S: Slot> {
    slot: S,
    key: String,
}

impl<S: Slot> Persistence<S> {
    /// Bridge `slot` under the default key
    pub fn new(slot: S) -> Self {
        Self {
            slot,
            key: DEFAULT_KEY.to_string(),
        }
    }

    /// Bridge `slot` under a custom key
    pub fn with_key(slot: S, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        validate_key(&key)?;
        Ok(Self { slot, key })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Read the stored list
    ///
    /// Never fails: a missing, unreadable or malformed slot yields an empty
    /// list, and individual records that do not parse are skipped.
    pub fn load(&self) -> Vec<Task> {
        let raw = match self.slot.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "Slot is empty, starting with no tasks");
                return Vec::new();
            }
            Err(e) => {
                warn!(key = %self.key, error = ?e, "Failed to read slot, starting with no tasks");
                return Vec::new();
            }
        };

        let tasks = decode(&raw);
        info!(key = %self.key, count = tasks.len(), "Loaded tasks");
        tasks
    }

    /// Overwrite the slot with the full list
    pub fn try_save(&mut self, tasks: &[Task]) -> Result<()> {
        let json = serde_json::to_string(tasks).context("Failed to serialize tasks")?;
        self.slot
            .write(&self.key, &json)
            .with_context(|| format!("Failed to write slot {}", self.key))?;
        debug!(key = %self.key, count = tasks.len(), "Saved tasks");
        Ok(())
    }

    /// Overwrite the slot, logging instead of returning a failure
    pub fn save(&mut self, tasks: &[Task]) {
        if let Err(e) = self.try_save(tasks) {
            error!(key = %self.key, error = ?e, "Failed to save tasks");
        }
    }
}

/// Parse a stored JSON array of tasks, skipping what does not parse
pub fn decode(raw: &str) -> Vec<Task> {
    let records: Vec<Value> = match serde_json::from_str::<Option<Vec<Value>>>(raw) {
        Ok(Some(records)) => records,
        Ok(None) => {
            debug!("Stored tasks are null, starting with no tasks");
            return Vec::new();
        }
        Err(e) => {
            warn!(error = ?e, "Stored tasks are not a JSON array, ignoring");
            return Vec::new();
        }
    };

    records
        .into_iter()
        .enumerate()
        .filter_map(|(position, record)| match serde_json::from_value::<Task>(record) {
            Ok(task) => Some(task),
            Err(e) => {
                warn!(position, error = ?e, "Failed to parse stored task, skipping");
                None
            }
        })
        .collect()
}
