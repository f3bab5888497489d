use super::scheduler::{SubtaskScheduler, Wake};
use crate::domain::{evaluate, LifecycleInputs, SubtaskId, SubtaskState, Task};
use crate::notifications::{Notification, Notifier};
use chrono::NaiveDateTime;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug)]
struct Entry {
    id: SubtaskId,
    name: String,
    inputs: LifecycleInputs,
    state: SubtaskState,
    scheduler: SubtaskScheduler,
}

impl Entry {
    fn new(id: SubtaskId, name: String, inputs: LifecycleInputs, now: NaiveDateTime) -> Self {
        let mut entry = Self {
            id,
            name,
            inputs,
            state: SubtaskState::Upcoming { starts_at: None },
            scheduler: SubtaskScheduler::new(),
        };
        entry.rederive(now);
        entry
    }

    /// Recompute from the current inputs and re-arm wake-ups
    fn rederive(&mut self, now: NaiveDateTime) {
        self.state = evaluate(&self.inputs, now);
        self.scheduler.reschedule(&self.state, &self.inputs, now);
    }
}

/// Tracks the lifecycle state of every subtask in the tree and fires their
/// wake-ups as time passes.
#[derive(Debug, Default)]
pub struct SubtaskStateEngine {
    entries: Vec<Entry>,
}

impl SubtaskStateEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile with the current tree. Subtasks whose time window or
    /// completion changed are re-derived from scratch; removed subtasks
    /// are dropped with their wake-ups.
    pub fn sync(&mut self, tasks: &[Task], now: NaiveDateTime) {
        let mut previous: HashMap<SubtaskId, Entry> = self
            .entries
            .drain(..)
            .map(|entry| (entry.id.clone(), entry))
            .collect();

        for subtask in tasks.iter().flat_map(|t| t.subtasks.iter()) {
            let inputs = LifecycleInputs::from(subtask);
            let entry = match previous.remove(&subtask.id) {
                Some(mut entry) => {
                    entry.name.clone_from(&subtask.name);
                    if entry.inputs != inputs {
                        entry.scheduler.cancel_all();
                        entry.inputs = inputs;
                        entry.rederive(now);
                        debug!(subtask = %entry.id, state = ?entry.state, "re-derived after edit");
                    }
                    entry
                }
                None => {
                    let entry = Entry::new(subtask.id.clone(), subtask.name.clone(), inputs, now);
                    debug!(subtask = %entry.id, state = ?entry.state, "tracking subtask");
                    entry
                }
            };
            self.entries.push(entry);
        }

        for (id, mut stale) in previous {
            stale.scheduler.cancel_all();
            debug!(subtask = %id, "stopped tracking subtask");
        }
    }

    /// Fire every wake-up due at `now`
    pub fn tick(&mut self, now: NaiveDateTime, notifier: &mut dyn Notifier) {
        for entry in &mut self.entries {
            let Some(wake) = entry.scheduler.due(now) else {
                continue;
            };

            let before = entry.state;
            entry.rederive(now);

            if wake == Wake::Start && entry.state.is_active() {
                notifier.notify(Notification::SubtaskStarted {
                    name: entry.name.clone(),
                });
            }
            if std::mem::discriminant(&before) != std::mem::discriminant(&entry.state) {
                debug!(
                    subtask = %entry.id,
                    ?wake,
                    from = ?before,
                    to = ?entry.state,
                    "subtask transition"
                );
            }
        }
    }

    pub fn state(&self, id: &SubtaskId) -> Option<SubtaskState> {
        self.entries.iter().find(|e| &e.id == id).map(|e| e.state)
    }

    /// Earliest pending wake-up across all subtasks
    pub fn next_deadline(&self) -> Option<NaiveDateTime> {
        self.entries
            .iter()
            .filter_map(|e| e.scheduler.next_deadline())
            .min()
    }

    /// Cancel every pending wake-up
    pub fn shutdown(&mut self) {
        for entry in &mut self.entries {
            entry.scheduler.cancel_all();
        }
        self.entries.clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
