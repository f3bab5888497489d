use super::timestamp;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a top-level task
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

/// Identifier of a subtask (unique across all tasks)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubtaskId(String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            /// Generate a fresh random identifier
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(TaskId);
string_id!(SubtaskId);

/// A to-do entry owning an ordered list of subtasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

impl Task {
    pub fn new(name: String) -> Self {
        Self {
            id: TaskId::generate(),
            name,
            subtasks: Vec::new(),
        }
    }

    pub fn subtask(&self, id: &SubtaskId) -> Option<&Subtask> {
        self.subtasks.iter().find(|st| &st.id == id)
    }

    pub fn subtask_mut(&mut self, id: &SubtaskId) -> Option<&mut Subtask> {
        self.subtasks.iter_mut().find(|st| &st.id == id)
    }

    /// Number of subtasks marked completed
    pub fn completed_count(&self) -> usize {
        self.subtasks.iter().filter(|st| st.completed).count()
    }
}

/// A subtask with an optional time window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: SubtaskId,
    pub name: String,
    #[serde(default, with = "timestamp")]
    pub start_time: Option<NaiveDateTime>,
    #[serde(default, with = "timestamp")]
    pub end_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub completed: bool,
}

impl Subtask {
    pub fn new(
        name: String,
        start_time: Option<NaiveDateTime>,
        end_time: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            id: SubtaskId::generate(),
            name,
            start_time,
            end_time,
            completed: false,
        }
    }

    /// Both ends of the time window, when fully set
    pub fn window(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.start_time.zip(self.end_time)
    }
}

/// Fields supplied when creating a subtask
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSubtask {
    pub name: String,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
}

impl NewSubtask {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn between(mut self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }
}

/// Partial update for a task
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub name: Option<String>,
}

/// Partial update for a subtask. `Some(None)` clears a time field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtaskPatch {
    pub name: Option<String>,
    pub start_time: Option<Option<NaiveDateTime>>,
    pub end_time: Option<Option<NaiveDateTime>>,
    pub completed: Option<bool>,
}

impl SubtaskPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn times(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        Self {
            start_time: Some(start),
            end_time: Some(end),
            ..Self::default()
        }
    }

    /// Apply the patch in place
    pub fn apply(self, subtask: &mut Subtask) {
        if let Some(name) = self.name {
            subtask.name = name;
        }
        if let Some(start) = self.start_time {
            subtask.start_time = start;
        }
        if let Some(end) = self.end_time {
            subtask.end_time = end;
        }
        if let Some(completed) = self.completed {
            subtask.completed = completed;
        }
    }
}

/// Names are rejected when empty after trimming
pub fn is_blank(name: &str) -> bool {
    name.trim().is_empty()
}
