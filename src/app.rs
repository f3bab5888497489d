use crate::config::Config;
use crate::domain::{
    format_timestamp_input, is_blank, parse_timestamp_input, NewSubtask, SubtaskId, SubtaskPatch,
    SubtaskState, Task, TaskId, TaskPatch,
};
use crate::engine::SubtaskStateEngine;
use crate::notifications::NotificationCenter;
use crate::persistence::PersistenceAdapter;
use crate::pomodoro::PomodoroTimer;
use crate::store::TaskStore;
use chrono::{DateTime, Local, NaiveDateTime};
use std::collections::HashSet;
use std::time::Instant;

/// What the key handler is currently driving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    Form,
    Notice,
}

/// What submitting the input form will do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
    AddTask,
    EditTask(TaskId),
    AddSubtask(TaskId),
    EditSubtask(TaskId, SubtaskId),
}

impl FormKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::AddTask => " Add Task ",
            Self::EditTask(_) => " Edit Task ",
            Self::AddSubtask(_) => " Add Subtask ",
            Self::EditSubtask(..) => " Edit Subtask ",
        }
    }

    pub fn has_times(&self) -> bool {
        matches!(self, Self::AddSubtask(_) | Self::EditSubtask(..))
    }
}

/// Input form state for adding and editing
#[derive(Debug, Clone)]
pub struct InputFormState {
    pub kind: FormKind,
    pub name: String,
    pub start: String,
    pub end: String,
    pub editing_field: usize, // 0 = name, 1 = start, 2 = end
    pub error: Option<String>,
}

impl InputFormState {
    fn new(kind: FormKind) -> Self {
        Self {
            kind,
            name: String::new(),
            start: String::new(),
            end: String::new(),
            editing_field: 0,
            error: None,
        }
    }

    fn field_count(&self) -> usize {
        if self.kind.has_times() {
            3
        } else {
            1
        }
    }

    fn current_field_mut(&mut self) -> &mut String {
        match self.editing_field {
            1 => &mut self.start,
            2 => &mut self.end,
            _ => &mut self.name,
        }
    }
}

/// A row of the rendered list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRow {
    pub task_index: usize,
    /// None for the task row itself
    pub subtask_index: Option<usize>,
    /// Whether this is the last visible subtask of its parent
    pub is_last: bool,
}

/// The item a row points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Task(TaskId),
    Subtask(TaskId, SubtaskId),
}

impl Selection {
    pub fn task_id(&self) -> &TaskId {
        match self {
            Self::Task(id) | Self::Subtask(id, _) => id,
        }
    }
}

/// Main application state
pub struct AppState {
    pub store: TaskStore,
    pub engine: SubtaskStateEngine,
    pub pomodoro: PomodoroTimer,
    pub notifications: NotificationCenter,
    pub persistence: PersistenceAdapter,
    pub dark_mode: bool,
    pub selected_index: usize,
    pub input_form: Option<InputFormState>,
    /// Tasks whose completed subtasks are hidden from the list
    pub hidden_completed: HashSet<TaskId>,
}

impl AppState {
    pub fn new(persistence: PersistenceAdapter, config: &Config, now: DateTime<Local>) -> Self {
        let mut store = TaskStore::with_tasks(persistence.load_tasks());
        let saver = persistence.clone();
        store.subscribe(move |tasks| saver.save_tasks(tasks));

        let mut engine = SubtaskStateEngine::new();
        engine.sync(store.tasks(), now.naive_local());

        let dark_mode = persistence.load_dark_mode();

        Self {
            store,
            engine,
            pomodoro: PomodoroTimer::new(),
            notifications: NotificationCenter::new(config.desktop_notifications),
            persistence,
            dark_mode,
            selected_index: 0,
            input_form: None,
            hidden_completed: HashSet::new(),
        }
    }

    pub fn ui_mode(&self) -> UiMode {
        if self.notifications.current().is_some() {
            UiMode::Notice
        } else if self.input_form.is_some() {
            UiMode::Form
        } else {
            UiMode::Normal
        }
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    /// Derived state of a subtask as last computed by the engine
    pub fn subtask_state(&self, id: &SubtaskId) -> Option<SubtaskState> {
        self.engine.state(id)
    }

    /// Rows in display order, honouring "hide completed"
    pub fn visible_rows(&self) -> Vec<FlatRow> {
        let mut rows = Vec::new();

        for (task_index, task) in self.tasks().iter().enumerate() {
            rows.push(FlatRow {
                task_index,
                subtask_index: None,
                is_last: false,
            });

            let hide_completed = self.hidden_completed.contains(&task.id);
            let visible: Vec<usize> = task
                .subtasks
                .iter()
                .enumerate()
                .filter(|(_, st)| !(hide_completed && st.completed))
                .map(|(idx, _)| idx)
                .collect();

            let count = visible.len();
            for (pos, subtask_index) in visible.into_iter().enumerate() {
                rows.push(FlatRow {
                    task_index,
                    subtask_index: Some(subtask_index),
                    is_last: pos + 1 == count,
                });
            }
        }

        rows
    }

    pub fn selection(&self) -> Option<Selection> {
        let rows = self.visible_rows();
        let row = rows.get(self.selected_index)?;
        let task = &self.tasks()[row.task_index];

        Some(match row.subtask_index {
            Some(idx) => Selection::Subtask(task.id.clone(), task.subtasks[idx].id.clone()),
            None => Selection::Task(task.id.clone()),
        })
    }

    pub fn move_selection_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        let count = self.visible_rows().len();
        if self.selected_index + 1 < count {
            self.selected_index += 1;
        }
    }

    fn clamp_selection(&mut self) {
        let count = self.visible_rows().len();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
    }

    /// Re-derive subtask states after the tree changed
    fn after_mutation(&mut self) {
        self.engine.sync(self.store.tasks(), Local::now().naive_local());
        self.clamp_selection();
    }

    pub fn add_task(&mut self, name: &str) -> Option<TaskId> {
        let id = self.store.add_task(name)?;
        self.after_mutation();
        Some(id)
    }

    pub fn add_subtask(&mut self, task_id: &TaskId, subtask: NewSubtask) -> Option<SubtaskId> {
        let id = self.store.add_subtask(task_id, subtask)?;
        self.after_mutation();
        Some(id)
    }

    pub fn delete_selected(&mut self) {
        let deleted = match self.selection() {
            Some(Selection::Task(id)) => {
                self.hidden_completed.remove(&id);
                self.store.delete_task(&id)
            }
            Some(Selection::Subtask(task_id, subtask_id)) => {
                self.store.delete_subtask(&task_id, &subtask_id)
            }
            None => false,
        };
        if deleted {
            self.after_mutation();
        }
    }

    /// Toggle completion of the selected subtask. Completed subtasks of the
    /// parent are hidden afterwards.
    pub fn toggle_selected_completed(&mut self) {
        let Some(Selection::Subtask(task_id, subtask_id)) = self.selection() else {
            return;
        };
        if self
            .store
            .toggle_subtask_completed(&task_id, &subtask_id)
            .is_some()
        {
            self.hidden_completed.insert(task_id);
            self.after_mutation();
        }
    }

    /// Show or hide completed subtasks of the selected task
    pub fn toggle_hide_completed(&mut self) {
        let Some(selection) = self.selection() else {
            return;
        };
        let task_id = selection.task_id().clone();
        if !self.hidden_completed.remove(&task_id) {
            self.hidden_completed.insert(task_id);
        }
        self.clamp_selection();
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
        self.persistence.save_dark_mode(self.dark_mode);
    }

    pub fn start_pomodoro(&mut self) {
        self.pomodoro.start(Instant::now());
    }

    pub fn stop_pomodoro(&mut self) {
        self.pomodoro.stop();
    }

    pub fn reset_pomodoro(&mut self) {
        self.pomodoro.reset();
    }

    pub fn dismiss_notification(&mut self) {
        self.notifications.dismiss();
    }

    pub fn start_add_task(&mut self) {
        self.input_form = Some(InputFormState::new(FormKind::AddTask));
    }

    pub fn start_add_subtask(&mut self) {
        if let Some(selection) = self.selection() {
            let kind = FormKind::AddSubtask(selection.task_id().clone());
            self.input_form = Some(InputFormState::new(kind));
        }
    }

    /// Open the form pre-filled with the selected item
    pub fn start_edit_selected(&mut self) {
        let form = match self.selection() {
            Some(Selection::Task(id)) => self.store.task(&id).map(|task| InputFormState {
                name: task.name.clone(),
                ..InputFormState::new(FormKind::EditTask(id.clone()))
            }),
            Some(Selection::Subtask(task_id, subtask_id)) => self
                .store
                .subtask(&task_id, &subtask_id)
                .map(|st| InputFormState {
                    name: st.name.clone(),
                    start: st.start_time.as_ref().map(format_timestamp_input).unwrap_or_default(),
                    end: st.end_time.as_ref().map(format_timestamp_input).unwrap_or_default(),
                    ..InputFormState::new(FormKind::EditSubtask(task_id.clone(), subtask_id.clone()))
                }),
            None => None,
        };
        if form.is_some() {
            self.input_form = form;
        }
    }

    pub fn input_form_next_field(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.editing_field = (form.editing_field + 1) % form.field_count();
        }
    }

    pub fn input_form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.input_form {
            form.current_field_mut().push(c);
            form.error = None;
        }
    }

    pub fn input_form_backspace(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.current_field_mut().pop();
            form.error = None;
        }
    }

    pub fn cancel_input_form(&mut self) {
        self.input_form = None;
    }

    /// Apply the form. Blank names and unparseable times keep it open.
    pub fn submit_input_form(&mut self) {
        let Some(form) = self.input_form.take() else {
            return;
        };
        if is_blank(&form.name) {
            self.input_form = Some(form);
            return;
        }

        let times = if form.kind.has_times() {
            match parse_window(&form.start, &form.end) {
                Ok(times) => times,
                Err(message) => {
                    self.input_form = Some(InputFormState {
                        error: Some(message),
                        ..form
                    });
                    return;
                }
            }
        } else {
            (None, None)
        };

        let (start_time, end_time) = times;
        let applied = match &form.kind {
            FormKind::AddTask => self.store.add_task(form.name.clone()).is_some(),
            FormKind::EditTask(id) => self.store.update_task(
                id,
                TaskPatch {
                    name: Some(form.name.clone()),
                },
            ),
            FormKind::AddSubtask(task_id) => self
                .store
                .add_subtask(
                    task_id,
                    NewSubtask {
                        name: form.name.clone(),
                        start_time,
                        end_time,
                    },
                )
                .is_some(),
            FormKind::EditSubtask(task_id, subtask_id) => {
                // Only touch a time whose text was changed from the pre-filled value
                let (start_patch, end_patch) = match self.store.subtask(task_id, subtask_id) {
                    Some(current) => (
                        (!same_input(&form.start, current.start_time)).then_some(start_time),
                        (!same_input(&form.end, current.end_time)).then_some(end_time),
                    ),
                    None => (Some(start_time), Some(end_time)),
                };
                self.store.update_subtask(
                    task_id,
                    subtask_id,
                    SubtaskPatch {
                        name: Some(form.name.clone()),
                        start_time: start_patch,
                        end_time: end_patch,
                        completed: None,
                    },
                )
            }
        };

        if applied {
            self.after_mutation();
        }
    }

    /// Fire due wake-ups for subtasks and the pomodoro
    pub fn tick(&mut self) {
        self.tick_at(Local::now().naive_local(), Instant::now());
    }

    pub fn tick_at(&mut self, wall: NaiveDateTime, monotonic: Instant) {
        self.engine.tick(wall, &mut self.notifications);
        self.pomodoro.tick(monotonic, &mut self.notifications);
    }

    /// Time until the next subtask wake-up
    pub fn until_next_wake(&self) -> Option<chrono::Duration> {
        self.engine
            .next_deadline()
            .map(|deadline| deadline - Local::now().naive_local())
    }

    /// Cancel every timer before exit
    pub fn shutdown(&mut self) {
        self.engine.shutdown();
        self.pomodoro.stop();
    }
}

/// Whether a form field still holds the text it was pre-filled with
fn same_input(text: &str, current: Option<NaiveDateTime>) -> bool {
    text.trim() == current.as_ref().map(format_timestamp_input).unwrap_or_default()
}

fn parse_window(
    start: &str,
    end: &str,
) -> Result<(Option<NaiveDateTime>, Option<NaiveDateTime>), String> {
    let start = parse_timestamp_input(start).map_err(|e| e.to_string())?;
    let end = parse_timestamp_input(end).map_err(|e| e.to_string())?;
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::Notification;
    use crate::persistence::MemoryStore;
    use chrono::{Duration, Timelike};

    fn create_test_app() -> AppState {
        let config = Config {
            desktop_notifications: false,
            ..Config::default()
        };
        AppState::new(PersistenceAdapter::new(MemoryStore::new()), &config, Local::now())
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            app.input_form_add_char(c);
        }
    }

    #[test]
    fn test_app_state_new() {
        let app = create_test_app();
        assert!(app.tasks().is_empty());
        assert_eq!(app.ui_mode(), UiMode::Normal);
        assert!(!app.dark_mode);
        assert_eq!(app.pomodoro.remaining_secs(), 1500);
    }

    #[test]
    fn test_loads_saved_state() {
        let store = MemoryStore::new();
        let adapter = PersistenceAdapter::new(store.clone());
        {
            let mut app = AppState::new(adapter.clone(), &Config::default(), Local::now());
            app.add_task("Groceries");
            app.toggle_dark_mode();
        }

        let app = AppState::new(adapter, &Config::default(), Local::now());
        assert_eq!(app.tasks().len(), 1);
        assert_eq!(app.tasks()[0].name, "Groceries");
        assert!(app.dark_mode);
    }

    #[test]
    fn test_add_task_through_form() {
        let mut app = create_test_app();

        app.start_add_task();
        assert_eq!(app.ui_mode(), UiMode::Form);
        type_text(&mut app, "Groceries");
        app.submit_input_form();

        assert_eq!(app.ui_mode(), UiMode::Normal);
        assert_eq!(app.tasks()[0].name, "Groceries");
    }

    #[test]
    fn test_blank_name_keeps_form_open() {
        let mut app = create_test_app();

        app.start_add_task();
        type_text(&mut app, "   ");
        app.submit_input_form();

        assert_eq!(app.ui_mode(), UiMode::Form);
        assert!(app.tasks().is_empty());
        assert!(app.input_form.as_ref().unwrap().error.is_none());
    }

    #[test]
    fn test_add_subtask_with_window() {
        let mut app = create_test_app();
        app.add_task("Groceries");

        app.start_add_subtask();
        type_text(&mut app, "Milk");
        app.input_form_next_field();
        type_text(&mut app, "2024-05-01 09:30");
        app.input_form_next_field();
        type_text(&mut app, "2024-05-01 10:00");
        app.submit_input_form();

        let milk = &app.tasks()[0].subtasks[0];
        assert_eq!(milk.name, "Milk");
        assert!(milk.window().is_some());
        // Window is in the past
        assert_eq!(app.subtask_state(&milk.id), Some(SubtaskState::Ended));
    }

    #[test]
    fn test_bad_time_shows_form_error() {
        let mut app = create_test_app();
        app.add_task("Groceries");

        app.start_add_subtask();
        type_text(&mut app, "Milk");
        app.input_form_next_field();
        type_text(&mut app, "soon");
        app.submit_input_form();

        let form = app.input_form.as_ref().unwrap();
        assert!(form.error.as_deref().unwrap().contains("soon"));
        assert!(app.tasks()[0].subtasks.is_empty());
    }

    #[test]
    fn test_edit_selected_subtask_prefills() {
        let mut app = create_test_app();
        let task = app.add_task("Groceries").unwrap();
        let start = Local::now().naive_local() + Duration::hours(1);
        app.add_subtask(
            &task,
            NewSubtask::named("Milk").between(start, start + Duration::hours(1)),
        );

        app.move_selection_down();
        app.start_edit_selected();

        let form = app.input_form.as_ref().unwrap();
        assert_eq!(form.name, "Milk");
        assert_eq!(form.start, format_timestamp_input(&start));
        assert!(matches!(form.kind, FormKind::EditSubtask(..)));
    }

    /// Window with non-zero seconds around the current time
    fn active_window_with_seconds() -> (NaiveDateTime, NaiveDateTime) {
        let base = (Local::now().naive_local() - Duration::minutes(5))
            .with_second(30)
            .and_then(|ts| ts.with_nanosecond(0))
            .unwrap();
        (base, base + Duration::minutes(15))
    }

    #[test]
    fn test_rename_through_form_keeps_window() {
        let mut app = create_test_app();
        let task = app.add_task("Groceries").unwrap();
        let (start, end) = active_window_with_seconds();
        let milk = app
            .add_subtask(&task, NewSubtask::named("Milk").between(start, end))
            .unwrap();
        assert!(app.subtask_state(&milk).unwrap().is_active());

        app.move_selection_down();
        app.start_edit_selected();
        type_text(&mut app, "!");
        app.submit_input_form();

        let subtask = app.store.subtask(&task, &milk).unwrap();
        assert_eq!(subtask.name, "Milk!");
        assert_eq!(subtask.start_time, Some(start));
        assert_eq!(subtask.end_time, Some(end));
        assert!(app.subtask_state(&milk).unwrap().is_active());
    }

    #[test]
    fn test_edited_time_field_is_applied() {
        let mut app = create_test_app();
        let task = app.add_task("Groceries").unwrap();
        let (start, end) = active_window_with_seconds();
        let milk = app
            .add_subtask(&task, NewSubtask::named("Milk").between(start, end))
            .unwrap();

        app.move_selection_down();
        app.start_edit_selected();
        app.input_form_next_field();
        app.input_form_next_field();
        if let Some(form) = app.input_form.as_mut() {
            form.end.clear();
        }
        type_text(&mut app, "2000-01-01 00:00");
        app.submit_input_form();

        let subtask = app.store.subtask(&task, &milk).unwrap();
        assert_eq!(subtask.start_time, Some(start));
        assert_eq!(subtask.end_time, parse_timestamp_input("2000-01-01 00:00").unwrap());
        assert_eq!(app.subtask_state(&milk), Some(SubtaskState::Ended));
    }

    #[test]
    fn test_toggle_completed_hides_subtask() {
        let mut app = create_test_app();
        let task = app.add_task("Groceries").unwrap();
        app.add_subtask(&task, NewSubtask::named("Milk"));
        app.add_subtask(&task, NewSubtask::named("Eggs"));
        assert_eq!(app.visible_rows().len(), 3);

        app.move_selection_down();
        app.toggle_selected_completed();

        assert!(app.tasks()[0].subtasks[0].completed);
        assert_eq!(
            app.subtask_state(&app.tasks()[0].subtasks[0].id),
            Some(SubtaskState::Completed)
        );
        assert_eq!(app.visible_rows().len(), 2);

        app.toggle_hide_completed();
        assert_eq!(app.visible_rows().len(), 3);
    }

    #[test]
    fn test_delete_selected_clamps_selection() {
        let mut app = create_test_app();
        app.add_task("A");
        app.add_task("B");

        app.move_selection_down();
        app.delete_selected();

        assert_eq!(app.tasks().len(), 1);
        assert_eq!(app.selected_index, 0);

        app.delete_selected();
        assert!(app.tasks().is_empty());
        assert!(app.selection().is_none());
        app.delete_selected();
    }

    #[test]
    fn test_subtask_start_raises_notice() {
        let mut app = create_test_app();
        let task = app.add_task("Groceries").unwrap();
        let start = Local::now().naive_local() + Duration::minutes(5);
        app.add_subtask(
            &task,
            NewSubtask::named("Milk").between(start, start + Duration::minutes(30)),
        );

        app.tick_at(start, Instant::now());

        assert_eq!(app.ui_mode(), UiMode::Notice);
        assert_eq!(
            app.notifications.current(),
            Some(&Notification::SubtaskStarted {
                name: "Milk".to_string()
            })
        );
        app.dismiss_notification();
        assert_eq!(app.ui_mode(), UiMode::Normal);
    }

    #[test]
    fn test_pomodoro_controls() {
        let mut app = create_test_app();
        app.start_pomodoro();
        assert!(app.pomodoro.is_running());

        app.stop_pomodoro();
        assert!(!app.pomodoro.is_running());

        app.reset_pomodoro();
        assert_eq!(app.pomodoro.remaining_secs(), 1500);
    }

    #[test]
    fn test_shutdown_cancels_wakes() {
        let mut app = create_test_app();
        let task = app.add_task("Groceries").unwrap();
        let start = Local::now().naive_local() + Duration::minutes(5);
        app.add_subtask(
            &task,
            NewSubtask::named("Milk").between(start, start + Duration::minutes(30)),
        );
        app.start_pomodoro();
        assert!(app.until_next_wake().is_some());

        app.shutdown();
        assert!(app.until_next_wake().is_none());
        assert!(!app.pomodoro.is_running());
    }
}
