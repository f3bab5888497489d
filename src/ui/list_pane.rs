use crate::app::AppState;
use crate::domain::{
    evaluate, format_clock, format_time_range, format_timestamp, LifecycleInputs, Subtask,
    SubtaskState, Task,
};
use crate::ui::styles::Palette;
use chrono::Local;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Tree connector for a subtask row
fn tree_connector(is_last: bool) -> &'static str {
    if is_last {
        "└─"
    } else {
        "├─"
    }
}

/// Render the task list
pub fn render_list_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let palette = Palette::new(app.dark_mode);
    let now = Local::now().naive_local();

    let items: Vec<ListItem> = app
        .visible_rows()
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let task = &app.tasks()[row.task_index];
            let (line, style) = match row.subtask_index {
                Some(st_idx) => {
                    let subtask = &task.subtasks[st_idx];
                    let state = app
                        .subtask_state(&subtask.id)
                        .unwrap_or_else(|| evaluate(&LifecycleInputs::from(subtask), now));
                    (
                        create_subtask_line(subtask, &state, row.is_last, &palette),
                        palette.subtask_style(&state),
                    )
                }
                None => (
                    create_task_line(row.task_index, task),
                    palette.default_style(),
                ),
            };

            let style = if idx == app.selected_index {
                palette.selected_style()
            } else {
                style
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let title = if items.is_empty() {
        " Tasks (press a to add one) ".to_string()
    } else {
        format!(" Tasks ({}) ", app.tasks().len())
    };

    let list = List::new(items).style(palette.default_style()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border_style())
            .title(Span::styled(title, palette.title_style())),
    );

    f.render_widget(list, area);
}

/// Format: 1. Groceries  (1/3)
fn create_task_line(index: usize, task: &Task) -> Line<'static> {
    let mut spans = vec![Span::raw(format!("{}. {}", index + 1, task.name))];
    if !task.subtasks.is_empty() {
        spans.push(Span::raw(format!(
            "  ({}/{})",
            task.completed_count(),
            task.subtasks.len()
        )));
    }
    Line::from(spans)
}

/// Format:      ├─ [ ] Milk  <start> - <end>  ACTIVE  00:12:04
fn create_subtask_line(
    subtask: &Subtask,
    state: &SubtaskState,
    is_last: bool,
    palette: &Palette,
) -> Line<'static> {
    let mut spans = vec![
        Span::styled("     ".to_string(), palette.tree_style()),
        Span::styled(tree_connector(is_last).to_string(), palette.tree_style()),
        Span::raw(" ".to_string()),
    ];

    let checkbox = if subtask.completed { "[x] " } else { "[ ] " };
    spans.push(Span::raw(checkbox.to_string()));
    spans.push(Span::raw(subtask.name.clone()));

    let window = match (&subtask.start_time, &subtask.end_time) {
        (Some(start), Some(end)) => Some(format_time_range(start, end)),
        (Some(start), None) => Some(format!("from {}", format_timestamp(start))),
        (None, Some(end)) => Some(format!("until {}", format_timestamp(end))),
        (None, None) => None,
    };
    if let Some(window) = window {
        spans.push(Span::raw(format!("  {}", window)));
    }

    let label = state.label();
    if !label.is_empty() {
        spans.push(Span::raw(format!("  {}", label)));
    }

    if let Some(remaining) = state.remaining_secs() {
        spans.push(Span::raw("  ".to_string()));
        spans.push(Span::styled(
            format!(" {} ", format_clock(remaining)),
            palette.timer_style(),
        ));
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    fn at(h: u32, m: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_create_task_line() {
        let mut task = Task::new("Groceries".to_string());
        assert_eq!(line_text(&create_task_line(0, &task)), "1. Groceries");

        task.subtasks.push(Subtask::new("Milk".to_string(), None, None));
        let mut eggs = Subtask::new("Eggs".to_string(), None, None);
        eggs.completed = true;
        task.subtasks.push(eggs);
        assert_eq!(
            line_text(&create_task_line(2, &task)),
            "3. Groceries  (1/2)"
        );
    }

    #[test]
    fn test_active_subtask_line_shows_countdown() {
        let subtask = Subtask::new("Milk".to_string(), Some(at(10, 0)), Some(at(10, 30)));
        let state = SubtaskState::Active { remaining_secs: 65 };
        let text = line_text(&create_subtask_line(
            &subtask,
            &state,
            true,
            &Palette::new(false),
        ));

        assert!(text.contains("└─ [ ] Milk"));
        assert!(text.contains("05/03/2024, 10:00:00 - 05/03/2024, 10:30:00"));
        assert!(text.contains("ACTIVE"));
        assert!(text.ends_with(" 00:01:05 "));
    }

    #[test]
    fn test_neutral_subtask_line_has_no_badge() {
        let subtask = Subtask::new("Eggs".to_string(), None, None);
        let state = SubtaskState::Upcoming { starts_at: None };
        let text = line_text(&create_subtask_line(
            &subtask,
            &state,
            false,
            &Palette::new(true),
        ));

        assert_eq!(text.trim_start(), "├─ [ ] Eggs");
    }

    #[test]
    fn test_completed_subtask_line() {
        let mut subtask = Subtask::new("Bread".to_string(), Some(at(9, 0)), None);
        subtask.completed = true;
        let text = line_text(&create_subtask_line(
            &subtask,
            &SubtaskState::Completed,
            true,
            &Palette::new(false),
        ));

        assert!(text.contains("[x] Bread  from 05/03/2024, 09:00:00  DONE"));
    }
}
