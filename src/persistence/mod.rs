pub mod adapter;
pub mod files;
pub mod storage;

pub use adapter::PersistenceAdapter;
pub use files::{atomic_write, ensure_data_dir, init_local_data_dir, read_optional};
pub use storage::{FileStore, MemoryStore};
