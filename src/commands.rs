//! Non-interactive subcommands that operate on the stored task tree.

use crate::domain::{
    evaluate, format_clock, format_time_range, parse_timestamp_input, LifecycleInputs, NewSubtask,
    Subtask, SubtaskId, SubtaskState, Task, TaskId,
};
use crate::store::TaskStore;
use anyhow::{anyhow, bail, Result};
use chrono::NaiveDateTime;

/// Print the tree with each subtask's derived state
pub fn render_tree(tasks: &[Task], now: NaiveDateTime) -> String {
    if tasks.is_empty() {
        return "No tasks.\n".to_string();
    }

    let mut out = String::new();
    for (index, task) in tasks.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", index + 1, task.name));
        for (st_index, subtask) in task.subtasks.iter().enumerate() {
            out.push_str(&subtask_line(st_index + 1, subtask, now));
            out.push('\n');
        }
    }
    out
}

/// Format:    2. [ ] Milk  <start> - <end>  ACTIVE 00:12:04
fn subtask_line(number: usize, subtask: &Subtask, now: NaiveDateTime) -> String {
    let state = evaluate(&LifecycleInputs::from(subtask), now);
    let checkbox = if subtask.completed { "[x]" } else { "[ ]" };
    let mut line = format!("   {}. {} {}", number, checkbox, subtask.name);

    if let Some((start, end)) = subtask.window() {
        line.push_str("  ");
        line.push_str(&format_time_range(&start, &end));
    }
    if !state.label().is_empty() {
        line.push_str("  ");
        line.push_str(state.label());
    }
    if let SubtaskState::Active { remaining_secs } = state {
        line.push(' ');
        line.push_str(&format_clock(remaining_secs));
    }
    line
}

/// Resolve a 1-based task number
fn task_id_at(store: &TaskStore, task_number: usize) -> Result<TaskId> {
    task_number
        .checked_sub(1)
        .and_then(|idx| store.tasks().get(idx))
        .map(|task| task.id.clone())
        .ok_or_else(|| anyhow!("No task number {}", task_number))
}

pub fn add_task(store: &mut TaskStore, name: &str) -> Result<TaskId> {
    store
        .add_task(name)
        .ok_or_else(|| anyhow!("Task name must not be blank"))
}

pub fn add_subtask(
    store: &mut TaskStore,
    task_number: usize,
    name: &str,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<SubtaskId> {
    let task_id = task_id_at(store, task_number)?;
    let start_time = parse_timestamp_input(start.unwrap_or_default())?;
    let end_time = parse_timestamp_input(end.unwrap_or_default())?;

    let subtask = NewSubtask {
        name: name.to_string(),
        start_time,
        end_time,
    };
    store
        .add_subtask(&task_id, subtask)
        .ok_or_else(|| anyhow!("Subtask name must not be blank"))
}

/// Flip completion of a subtask; returns the new value
pub fn toggle(store: &mut TaskStore, task_number: usize, subtask_number: usize) -> Result<bool> {
    let task_id = task_id_at(store, task_number)?;
    let Some(subtask_id) = subtask_number
        .checked_sub(1)
        .and_then(|idx| store.task(&task_id)?.subtasks.get(idx))
        .map(|subtask| subtask.id.clone())
    else {
        bail!("Task {} has no subtask number {}", task_number, subtask_number);
    };

    store
        .toggle_subtask_completed(&task_id, &subtask_id)
        .ok_or_else(|| anyhow!("Subtask disappeared while toggling"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn sample_store() -> TaskStore {
        let mut store = TaskStore::new();
        add_task(&mut store, "Groceries").unwrap();
        add_subtask(
            &mut store,
            1,
            "Milk",
            Some("2024-03-05 10:00"),
            Some("2024-03-05 10:30"),
        )
        .unwrap();
        add_subtask(&mut store, 1, "Eggs", None, None).unwrap();
        store
    }

    #[test]
    fn test_render_tree() {
        let store = sample_store();
        let out = render_tree(store.tasks(), at(10, 10));

        assert_eq!(
            out,
            "1. Groceries\n   \
             1. [ ] Milk  05/03/2024, 10:00:00 - 05/03/2024, 10:30:00  ACTIVE 00:20:00\n   \
             2. [ ] Eggs\n"
        );
    }

    #[test]
    fn test_subtask_line_states() {
        let mut milk = Subtask::new("Milk".to_string(), Some(at(10, 0)), Some(at(10, 30)));
        assert_eq!(
            subtask_line(1, &milk, at(11, 0)),
            "   1. [ ] Milk  05/03/2024, 10:00:00 - 05/03/2024, 10:30:00  ENDED"
        );

        milk.completed = true;
        assert!(subtask_line(3, &milk, at(10, 5)).starts_with("   3. [x] Milk"));
        assert!(subtask_line(3, &milk, at(10, 5)).ends_with("  DONE"));
    }

    #[test]
    fn test_render_empty_tree() {
        assert_eq!(render_tree(&[], at(9, 0)), "No tasks.\n");
    }

    #[test]
    fn test_add_rejects_blank_and_unknown() {
        let mut store = sample_store();
        assert!(add_task(&mut store, "   ").is_err());
        assert!(add_subtask(&mut store, 2, "Bread", None, None).is_err());
        assert!(add_subtask(&mut store, 0, "Bread", None, None).is_err());
        assert!(add_subtask(&mut store, 1, "Bread", Some("soon"), None).is_err());
        assert_eq!(store.tasks()[0].subtasks.len(), 2);
    }

    #[test]
    fn test_toggle_by_number() {
        let mut store = sample_store();
        assert!(toggle(&mut store, 1, 2).unwrap());
        assert!(store.tasks()[0].subtasks[1].completed);
        assert!(!toggle(&mut store, 1, 2).unwrap());
        assert!(toggle(&mut store, 1, 3).is_err());
    }
}
