//! Monaco Blocks
//!
//! Schema, validation and HTML rendering for `monaco` fenced code blocks.

pub mod render;
pub mod schema;

pub use render::render_block;
pub use schema::{Action, BlockError, MonacoBlock};
