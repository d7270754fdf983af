use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, anyhow};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::task::Task;

pub const TODOS_KEY: &str = "todos";

pub trait Storage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug)]
pub struct FileStorage {
    data_dir: PathBuf,
}

impl FileStorage {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let data_dir = data_dir.to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        info!(data_dir = %data_dir.display(), "opened file storage");
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Some(raw))
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let path = self.key_path(key);
        debug!(file = %path.display(), bytes = value.len(), "writing key atomically");

        let mut temp = NamedTempFile::new_in(&self.data_dir)?;
        temp.write_all(value.as_bytes())?;
        temp.flush()?;

        temp.persist(&path)
            .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;

        Ok(())
    }
}

#[tracing::instrument(skip(storage))]
pub fn load_tasks(storage: &dyn Storage, key: &str) -> Vec<Task> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(key, "no saved tasks");
            return Vec::new();
        }
        Err(err) => {
            warn!(key, error = %err, "storage read failed; starting with an empty list");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Task>>(&raw) {
        Ok(tasks) => {
            debug!(key, count = tasks.len(), "loaded tasks");
            tasks
        }
        Err(err) => {
            warn!(key, error = %err, "saved tasks unparsable; starting with an empty list");
            Vec::new()
        }
    }
}

#[tracing::instrument(skip(storage, tasks))]
pub fn save_tasks(storage: &mut dyn Storage, key: &str, tasks: &[Task]) {
    let blob = match serde_json::to_string(tasks) {
        Ok(blob) => blob,
        Err(err) => {
            warn!(key, error = %err, "failed to serialize tasks; skipping save");
            return;
        }
    };

    if let Err(err) = storage.set(key, &blob) {
        warn!(key, count = tasks.len(), error = %err, "storage write failed; keeping in-memory state");
        return;
    }

    debug!(key, count = tasks.len(), "saved tasks");
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::{FileStorage, MemoryStorage, Storage, TODOS_KEY, load_tasks, save_tasks};
    use crate::task::Task;

    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
            Err(anyhow::anyhow!("storage unavailable"))
        }

        fn set(&mut self, _key: &str, _value: &str) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("storage unavailable"))
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            Task {
                id: 1,
                title: "吃饭".to_string(),
                done: true,
            },
            Task {
                id: 2,
                title: "唱歌".to_string(),
                done: false,
            },
        ]
    }

    #[test]
    fn roundtrip_through_memory_storage() {
        let mut storage = MemoryStorage::new();
        let tasks = sample();

        save_tasks(&mut storage, TODOS_KEY, &tasks);
        assert_eq!(load_tasks(&storage, TODOS_KEY), tasks);
    }

    #[test]
    fn roundtrip_through_file_storage() {
        let temp = tempdir().expect("tempdir");
        let mut storage = FileStorage::open(temp.path()).expect("open file storage");
        let tasks = sample();

        save_tasks(&mut storage, TODOS_KEY, &tasks);

        let reopened = FileStorage::open(temp.path()).expect("reopen file storage");
        assert_eq!(load_tasks(&reopened, TODOS_KEY), tasks);
    }

    #[test]
    fn memory_storage_clones_share_their_entries() {
        let mut storage = MemoryStorage::new();
        let handle = storage.clone();

        storage.set(TODOS_KEY, "[]").expect("set");
        assert_eq!(handle.get(TODOS_KEY).expect("get"), Some("[]".to_string()));
    }

    #[test]
    fn missing_key_loads_as_empty() {
        let storage = MemoryStorage::new();
        assert!(load_tasks(&storage, TODOS_KEY).is_empty());
    }

    #[test]
    fn unparsable_blob_loads_as_empty() {
        let mut storage = MemoryStorage::new();
        storage.set(TODOS_KEY, "not json at all").expect("set");
        assert!(load_tasks(&storage, TODOS_KEY).is_empty());

        storage.set(TODOS_KEY, r#"{"id":1}"#).expect("set");
        assert!(load_tasks(&storage, TODOS_KEY).is_empty());
    }

    #[test]
    fn broken_storage_degrades_to_empty_and_swallows_writes() {
        let mut storage = BrokenStorage;
        assert!(load_tasks(&storage, TODOS_KEY).is_empty());
        save_tasks(&mut storage, TODOS_KEY, &sample());
    }

    #[test]
    fn saving_the_same_list_twice_writes_the_same_blob() {
        let mut storage = MemoryStorage::new();
        let tasks = sample();

        save_tasks(&mut storage, TODOS_KEY, &tasks);
        let first = storage.get(TODOS_KEY).expect("get").expect("blob");

        save_tasks(&mut storage, TODOS_KEY, &tasks);
        let second = storage.get(TODOS_KEY).expect("get").expect("blob");

        assert_eq!(first, second);
    }

    #[test]
    fn file_storage_keeps_one_file_per_key() {
        let temp = tempdir().expect("tempdir");
        let mut storage = FileStorage::open(temp.path()).expect("open file storage");

        storage.set(TODOS_KEY, "[]").expect("set");
        assert!(temp.path().join("todos.json").exists());
        assert_eq!(storage.data_dir(), temp.path());
    }
}
