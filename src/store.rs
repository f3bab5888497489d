use crate::domain::{
    is_blank, NewSubtask, Subtask, SubtaskId, SubtaskPatch, Task, TaskId, TaskPatch,
};

type Subscriber = Box<dyn FnMut(&[Task])>;

/// In-memory task tree. Every successful mutation hands the whole tree to
/// each subscriber; no-ops (blank names, unknown ids) notify nobody.
#[derive(Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    subscribers: Vec<Subscriber>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a previously loaded tree
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            subscribers: Vec::new(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn subtask(&self, task_id: &TaskId, subtask_id: &SubtaskId) -> Option<&Subtask> {
        self.task(task_id)?.subtask(subtask_id)
    }

    /// Register a callback invoked after every mutation
    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: FnMut(&[Task]) + 'static,
    {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn add_task(&mut self, name: impl Into<String>) -> Option<TaskId> {
        let name = name.into();
        if is_blank(&name) {
            return None;
        }

        let task = Task::new(name);
        let id = task.id.clone();
        self.tasks.push(task);
        self.notify();
        Some(id)
    }

    pub fn update_task(&mut self, id: &TaskId, patch: TaskPatch) -> bool {
        if patch.name.as_deref().is_some_and(is_blank) {
            return false;
        }
        let Some(task) = self.task_mut(id) else {
            return false;
        };

        if let Some(name) = patch.name {
            task.name = name;
        }
        self.notify();
        true
    }

    /// Remove a task together with all of its subtasks
    pub fn delete_task(&mut self, id: &TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| &t.id != id);
        if self.tasks.len() == before {
            return false;
        }
        self.notify();
        true
    }

    pub fn add_subtask(&mut self, task_id: &TaskId, new: NewSubtask) -> Option<SubtaskId> {
        if is_blank(&new.name) {
            return None;
        }
        let task = self.task_mut(task_id)?;

        let subtask = Subtask::new(new.name, new.start_time, new.end_time);
        let id = subtask.id.clone();
        task.subtasks.push(subtask);
        self.notify();
        Some(id)
    }

    pub fn update_subtask(
        &mut self,
        task_id: &TaskId,
        subtask_id: &SubtaskId,
        patch: SubtaskPatch,
    ) -> bool {
        if patch.name.as_deref().is_some_and(is_blank) {
            return false;
        }
        let Some(subtask) = self.subtask_mut(task_id, subtask_id) else {
            return false;
        };

        patch.apply(subtask);
        self.notify();
        true
    }

    pub fn delete_subtask(&mut self, task_id: &TaskId, subtask_id: &SubtaskId) -> bool {
        let Some(task) = self.task_mut(task_id) else {
            return false;
        };

        let before = task.subtasks.len();
        task.subtasks.retain(|st| &st.id != subtask_id);
        if task.subtasks.len() == before {
            return false;
        }
        self.notify();
        true
    }

    /// Flip the completion flag, returning the new value
    pub fn toggle_subtask_completed(
        &mut self,
        task_id: &TaskId,
        subtask_id: &SubtaskId,
    ) -> Option<bool> {
        let subtask = self.subtask_mut(task_id, subtask_id)?;
        subtask.completed = !subtask.completed;
        let completed = subtask.completed;
        self.notify();
        Some(completed)
    }

    fn task_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| &t.id == id)
    }

    fn subtask_mut(&mut self, task_id: &TaskId, subtask_id: &SubtaskId) -> Option<&mut Subtask> {
        self.task_mut(task_id)?.subtask_mut(subtask_id)
    }

    fn notify(&mut self) {
        let tasks = &self.tasks;
        for subscriber in &mut self.subscribers {
            subscriber(tasks);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_store() -> (TaskStore, Rc<RefCell<Vec<Vec<Task>>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut store = TaskStore::new();
        store.subscribe(move |tasks| sink.borrow_mut().push(tasks.to_vec()));
        (store, seen)
    }

    #[test]
    fn test_add_task_assigns_id_and_notifies() {
        let (mut store, seen) = recording_store();

        let id = store.add_task("Groceries").unwrap();
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0].id, id);
        assert_eq!(store.tasks()[0].name, "Groceries");

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], store.tasks().to_vec());
    }

    #[test]
    fn test_blank_names_are_rejected_silently() {
        let (mut store, seen) = recording_store();

        assert!(store.add_task("   ").is_none());
        let id = store.add_task("Groceries").unwrap();
        assert!(store.add_subtask(&id, NewSubtask::named("")).is_none());
        assert!(!store.update_task(&id, TaskPatch { name: Some("\t".to_string()) }));

        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0].name, "Groceries");
        assert!(store.tasks()[0].subtasks.is_empty());
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_missing_ids_are_noops() {
        let (mut store, seen) = recording_store();
        let ghost_task = TaskId::from("ghost");
        let ghost_subtask = SubtaskId::from("ghost");

        assert!(!store.delete_task(&ghost_task));
        assert!(store.add_subtask(&ghost_task, NewSubtask::named("Milk")).is_none());
        assert!(store.toggle_subtask_completed(&ghost_task, &ghost_subtask).is_none());

        let id = store.add_task("Groceries").unwrap();
        assert!(!store.delete_subtask(&id, &ghost_subtask));
        assert!(!store.update_subtask(&id, &ghost_subtask, SubtaskPatch::rename("x")));

        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_sibling_order_is_preserved() {
        let mut store = TaskStore::new();
        let a = store.add_task("A").unwrap();
        let b = store.add_task("B").unwrap();
        store.add_task("C").unwrap();

        let milk = store.add_subtask(&a, NewSubtask::named("Milk")).unwrap();
        store.add_subtask(&a, NewSubtask::named("Eggs")).unwrap();
        store.add_subtask(&a, NewSubtask::named("Bread")).unwrap();

        store.delete_task(&b);
        store.update_subtask(&a, &milk, SubtaskPatch::rename("Oat milk"));

        let names: Vec<_> = store.tasks().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);

        let subtasks: Vec<_> = store.tasks()[0]
            .subtasks
            .iter()
            .map(|st| st.name.as_str())
            .collect();
        assert_eq!(subtasks, vec!["Oat milk", "Eggs", "Bread"]);
    }

    #[test]
    fn test_delete_task_removes_subtasks() {
        let mut store = TaskStore::new();
        let id = store.add_task("Groceries").unwrap();
        let milk = store.add_subtask(&id, NewSubtask::named("Milk")).unwrap();

        assert!(store.delete_task(&id));
        assert!(store.subtask(&id, &milk).is_none());
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn test_toggle_and_time_patch() {
        let (mut store, seen) = recording_store();
        let id = store.add_task("Groceries").unwrap();
        let milk = store.add_subtask(&id, NewSubtask::named("Milk")).unwrap();

        assert_eq!(store.toggle_subtask_completed(&id, &milk), Some(true));
        assert_eq!(store.toggle_subtask_completed(&id, &milk), Some(false));

        let start = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let end = start + chrono::Duration::hours(1);
        assert!(store.update_subtask(&id, &milk, SubtaskPatch::times(Some(start), Some(end))));

        let subtask = store.subtask(&id, &milk).unwrap();
        assert_eq!(subtask.window(), Some((start, end)));
        assert!(!subtask.completed);
        assert_eq!(seen.borrow().len(), 5);
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut store = TaskStore::new();
        let first = store.add_task("One").unwrap();
        store.delete_task(&first);
        let second = store.add_task("One").unwrap();
        assert_ne!(first, second);
    }
}
