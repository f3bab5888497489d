use super::task::Subtask;
use chrono::NaiveDateTime;

/// The fields of a subtask that drive its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleInputs {
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub completed: bool,
}

impl From<&Subtask> for LifecycleInputs {
    fn from(subtask: &Subtask) -> Self {
        Self {
            start_time: subtask.start_time,
            end_time: subtask.end_time,
            completed: subtask.completed,
        }
    }
}

/// Derived display state of a subtask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtaskState {
    /// Not started yet. `starts_at` is `None` for the neutral state
    /// (no window set), which never changes on its own.
    Upcoming { starts_at: Option<NaiveDateTime> },
    /// Inside its window, with the countdown to the end
    Active { remaining_secs: u64 },
    Ended,
    Completed,
}

impl SubtaskState {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    /// Neutral means no start time to wait for
    #[cfg(test)]
    pub fn is_neutral(&self) -> bool {
        matches!(self, Self::Upcoming { starts_at: None })
    }

    pub fn remaining_secs(&self) -> Option<u64> {
        match self {
            Self::Active { remaining_secs } => Some(*remaining_secs),
            _ => None,
        }
    }

    /// Short label for list badges
    pub fn label(&self) -> &'static str {
        match self {
            Self::Upcoming { starts_at: Some(_) } => "UPCOMING",
            Self::Upcoming { starts_at: None } => "",
            Self::Active { .. } => "ACTIVE",
            Self::Ended => "ENDED",
            Self::Completed => "DONE",
        }
    }
}

/// Seconds left until `end`, rounded half-up and floored at zero
pub fn remaining_secs(end: NaiveDateTime, now: NaiveDateTime) -> u64 {
    let millis = (end - now).num_milliseconds();
    if millis <= 0 {
        0
    } else {
        ((millis + 500) / 1000) as u64
    }
}

/// Derive the state of a subtask at `now`. Pure: depends only on its inputs.
pub fn derive_state(inputs: &LifecycleInputs, now: NaiveDateTime) -> SubtaskState {
    if inputs.completed {
        return SubtaskState::Completed;
    }

    if let (Some(start), Some(end)) = (inputs.start_time, inputs.end_time) {
        if start <= now && now < end {
            return SubtaskState::Active {
                remaining_secs: remaining_secs(end, now),
            };
        }
        if now < start {
            return SubtaskState::Upcoming {
                starts_at: Some(start),
            };
        }
    }

    match inputs.end_time {
        Some(end) if now >= end => SubtaskState::Ended,
        _ => SubtaskState::Upcoming { starts_at: None },
    }
}

/// Like [`derive_state`], but a countdown that has rounded down to zero
/// counts as ended.
pub fn evaluate(inputs: &LifecycleInputs, now: NaiveDateTime) -> SubtaskState {
    match derive_state(inputs, now) {
        SubtaskState::Active { remaining_secs: 0 } => SubtaskState::Ended,
        state => state,
    }
}
