use tracing::{debug, info, instrument};

use crate::navigation::Navigation;
use crate::storage::{self, Storage, TODOS_KEY};
use crate::store::TaskStore;
use crate::task::Task;
use crate::visibility::Visibility;

pub const ESCAPE_KEY_CODE: u32 = 27;

pub struct TodoWidget {
    store: TaskStore,
    visibility: Visibility,
    storage: Box<dyn Storage>,
    nav: Box<dyn Navigation>,
    edit_snapshot: String,
}

impl TodoWidget {
    #[instrument(skip(storage, nav))]
    pub fn mount(storage: Box<dyn Storage>, nav: Box<dyn Navigation>) -> Self {
        let tasks = storage::load_tasks(storage.as_ref(), TODOS_KEY);
        info!(count = tasks.len(), "widget mounted");

        let mut widget = Self {
            store: TaskStore::from_tasks(tasks),
            visibility: Visibility::default(),
            storage,
            nav,
            edit_snapshot: String::new(),
        };
        widget.handle_fragment_change();
        widget
    }

    #[instrument(skip(self, title))]
    pub fn add(&mut self, title: &str) -> Option<u64> {
        let id = self.store.add(title)?;
        self.persist();
        Some(id)
    }

    #[instrument(skip(self))]
    pub fn remove(&mut self, index: usize) {
        if self.store.remove(index).is_some() {
            self.persist();
        }
    }

    #[instrument(skip(self))]
    pub fn set_done(&mut self, id: u64, done: bool) {
        if self.store.set_done(id, done) {
            self.persist();
        }
    }

    #[instrument(skip(self))]
    pub fn toggle_all(&mut self, done: bool) {
        self.store.set_all_done(done);
        self.persist();
    }

    #[instrument(skip(self))]
    pub fn begin_edit(&mut self, id: u64) {
        self.edit_snapshot = self
            .store
            .task(id)
            .map(|task| task.title.clone())
            .unwrap_or_default();
        self.store.begin_edit(id);
    }

    #[instrument(skip(self, title))]
    pub fn commit_edit(&mut self, id: u64, title: &str) {
        if self.store.commit_edit(id, title) {
            self.persist();
        }
    }

    #[instrument(skip(self))]
    pub fn cancel_edit(&mut self) {
        if self.store.cancel_edit(&self.edit_snapshot) {
            self.persist();
        }
    }

    #[instrument(skip(self))]
    pub fn handle_edit_key(&mut self, key_code: u32) {
        if key_code == ESCAPE_KEY_CODE {
            self.cancel_edit();
        }
    }

    #[instrument(skip(self))]
    pub fn clear_completed(&mut self) {
        if self.store.clear_completed() > 0 {
            self.persist();
        }
    }

    #[instrument(skip(self))]
    pub fn handle_fragment_change(&mut self) {
        let fragment = self.nav.fragment();
        self.visibility = self.visibility.apply_fragment(&fragment);
        debug!(fragment = %fragment, visibility = ?self.visibility, "fragment change handled");
    }

    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.visibility.filtered(self.store.tasks())
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub fn remaining_count(&self) -> usize {
        self.store.remaining_count()
    }

    pub fn all_done(&self) -> bool {
        self.store.all_done()
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn editing(&self) -> Option<u64> {
        self.store.editing()
    }

    fn persist(&mut self) {
        storage::save_tasks(self.storage.as_mut(), TODOS_KEY, self.store.tasks());
    }
}
