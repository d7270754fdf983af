//! Headless core of a todo-list widget: an ordered task store, a visibility
//! filter driven by navigation fragments, and a persistence bridge over a
//! pluggable key-value storage port.

pub mod config;
pub mod logging;
pub mod navigation;
pub mod storage;
pub mod store;
pub mod task;
pub mod visibility;
pub mod widget;

pub use config::resolve_data_dir;
pub use logging::init_tracing;
pub use navigation::{FragmentCell, Navigation};
pub use storage::{FileStorage, MemoryStorage, Storage, TODOS_KEY, load_tasks, save_tasks};
pub use store::TaskStore;
pub use task::Task;
pub use visibility::Visibility;
pub use widget::{ESCAPE_KEY_CODE, TodoWidget};
