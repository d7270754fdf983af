use tracing::{debug, instrument};

use crate::task::Task;

#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    editing: Option<u64>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            editing: None,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn editing(&self) -> Option<u64> {
        self.editing
    }

    fn next_id(&self) -> u64 {
        self.tasks.iter().map(|task| task.id).max().unwrap_or(0) + 1
    }

    #[instrument(skip(self, title))]
    pub fn add(&mut self, title: &str) -> Option<u64> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            debug!("empty title rejected");
            return None;
        }

        let id = self.next_id();
        self.tasks.push(Task::new(id, trimmed.to_string()));
        debug!(id, count = self.tasks.len(), "task added");
        Some(id)
    }

    #[instrument(skip(self))]
    pub fn remove(&mut self, index: usize) -> Option<Task> {
        if index >= self.tasks.len() {
            debug!(index, count = self.tasks.len(), "remove index out of range");
            return None;
        }

        let task = self.tasks.remove(index);
        if self.editing == Some(task.id) {
            self.editing = None;
        }
        debug!(id = task.id, count = self.tasks.len(), "task removed");
        Some(task)
    }

    #[instrument(skip(self))]
    pub fn set_done(&mut self, id: u64, done: bool) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!(id, "set_done on unknown id");
            return false;
        };

        task.done = done;
        true
    }

    pub fn all_done(&self) -> bool {
        self.tasks.iter().all(|task| task.done)
    }

    #[instrument(skip(self))]
    pub fn set_all_done(&mut self, done: bool) {
        for task in &mut self.tasks {
            task.done = done;
        }
        debug!(done, count = self.tasks.len(), "set completion on all tasks");
    }

    pub fn remaining_count(&self) -> usize {
        self.tasks.iter().filter(|task| !task.done).count()
    }

    #[instrument(skip(self))]
    pub fn begin_edit(&mut self, id: u64) {
        self.editing = Some(id);
    }

    #[instrument(skip(self, title))]
    pub fn commit_edit(&mut self, id: u64, title: &str) -> bool {
        self.editing = None;

        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!(id, "commit_edit on unknown id");
            return false;
        };

        task.title = title.to_string();
        true
    }

    #[instrument(skip(self, original_title))]
    pub fn cancel_edit(&mut self, original_title: &str) -> bool {
        let Some(id) = self.editing.take() else {
            return false;
        };

        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!(id, "cancel_edit for a task no longer in the list");
            return false;
        };

        task.title = original_title.to_string();
        true
    }

    #[instrument(skip(self))]
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.done);
        let removed = before - self.tasks.len();

        if let Some(id) = self.editing
            && self.task(id).is_none()
        {
            self.editing = None;
        }

        debug!(removed, count = self.tasks.len(), "cleared completed tasks");
        removed
    }
}
