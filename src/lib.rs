//! mdBook Monaco
//!
//! An mdBook preprocessor embedding multi-file Monaco editors in a book.
//!
//! This library provides:
//! - Parsing and rendering of `monaco` fenced code blocks
//! - The mdBook preprocessor protocol
//! - File sessions binding one editor to several files with per-file persistence
//! - Configuration management

pub mod assets;
pub mod block;
pub mod config;
pub mod preprocess;
pub mod session;

// Re-exports for clean public API
pub use block::{BlockError, MonacoBlock};
pub use config::{Config, MonacoOptions};
pub use preprocess::{add_monaco, MonacoPreprocessor};
pub use session::{FileRecord, FileSessionController, SessionError};
