use super::storage::KeyValueStore;
use crate::domain::Task;
use std::rc::Rc;
use tracing::{info, warn};

/// Slot holding the JSON task tree
pub const TASKS_KEY: &str = "tasks";
/// Slot holding the dark-mode flag as `"true"`/`"false"`
pub const DARK_MODE_KEY: &str = "darkMode";

/// Best-effort persistence of the task tree and the dark-mode flag.
/// Reads degrade to defaults and writes never fail the caller; problems are
/// logged and in-memory state stays authoritative.
#[derive(Clone)]
pub struct PersistenceAdapter {
    store: Rc<dyn KeyValueStore>,
}

impl PersistenceAdapter {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Rc::new(store),
        }
    }

    /// Load the saved tree; empty on absence or malformed data
    pub fn load_tasks(&self) -> Vec<Task> {
        let raw = match self.store.get(TASKS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(error = %err, "could not read saved tasks, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(tasks) => {
                info!(count = tasks.len(), "loaded tasks");
                tasks
            }
            Err(err) => {
                warn!(error = %err, "saved tasks are malformed, starting empty");
                Vec::new()
            }
        }
    }

    pub fn save_tasks(&self, tasks: &[Task]) {
        let json = match serde_json::to_string(tasks) {
            Ok(json) => json,
            Err(err) => {
                warn!(error = %err, "could not serialize tasks");
                return;
            }
        };

        if let Err(err) = self.store.set(TASKS_KEY, &json) {
            warn!(error = %err, "could not save tasks");
        }
    }

    pub fn load_dark_mode(&self) -> bool {
        match self.store.get(DARK_MODE_KEY) {
            Ok(value) => value.as_deref().map(str::trim) == Some("true"),
            Err(err) => {
                warn!(error = %err, "could not read dark mode preference");
                false
            }
        }
    }

    pub fn save_dark_mode(&self, enabled: bool) {
        let value = if enabled { "true" } else { "false" };
        if let Err(err) = self.store.set(DARK_MODE_KEY, value) {
            warn!(error = %err, "could not save dark mode preference");
        }
    }
}
