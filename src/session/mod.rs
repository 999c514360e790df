//! Editor Sessions
//!
//! One editor view shared by several files, with each file's edits
//! persisted under its own name.

pub mod buffer;
pub mod controller;
pub mod editor;
pub mod error;
pub mod file_list;
pub mod storage;

pub use buffer::{BufferEditor, BufferHost};
pub use controller::{FileRecord, FileSessionController};
pub use editor::{ChangeListener, EditorHost, EditorWidget, Subscription, TextModel};
pub use error::{Result, SessionError, StorageError};
pub use file_list::{element_id, ClickHandler, FileList, MemoryFileList};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
