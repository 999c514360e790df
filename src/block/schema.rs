//! Monaco block schema.
//!
//! A `monaco` fenced code block holds YAML like:
//!
//! ```yaml
//! id: editor1_chapter1
//! files:
//!   - name: "main.js"
//!     language: javascript
//!     editable: false
//!     content: |
//!       console.log("Hello World");
//! actions:
//!   - name: "run"
//!     function: runCode
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::FileRecord;

/// Errors from reading a monaco block.
#[derive(Error, Debug)]
pub enum BlockError {
    /// The block body is not valid YAML for a monaco block.
    #[error("Failed to parse monaco block: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The bootstrap script payload could not be encoded.
    #[error("Failed to encode editor script: {0}")]
    Script(#[from] serde_json::Error),

    /// The block parsed but cannot be rendered.
    #[error("Invalid monaco block '{id}': {reason}")]
    Invalid { id: String, reason: String },
}

/// A button calling a page-level JavaScript function with the editor state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    pub function: String,
}

/// One embedded editor: its mount id, files and toolbar actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonacoBlock {
    pub id: String,
    pub files: Vec<FileRecord>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl MonacoBlock {
    /// Parse and validate a block body.
    pub fn parse(yaml: &str) -> Result<Self, BlockError> {
        let block: MonacoBlock = serde_yaml::from_str(yaml)?;
        block.validate()?;
        Ok(block)
    }

    /// Check the block can be rendered into a working page.
    pub fn validate(&self) -> Result<(), BlockError> {
        if !is_html_id(&self.id) {
            return Err(self.invalid(format!("'{}' is not a valid element id", self.id)));
        }

        if self.files.is_empty() {
            return Err(self.invalid("no files".to_string()));
        }

        let mut names = HashSet::new();
        let mut element_ids = HashSet::new();
        for file in &self.files {
            if file.name.is_empty() {
                return Err(self.invalid("file with an empty name".to_string()));
            }
            if !names.insert(file.name.as_str()) {
                return Err(self.invalid(format!("duplicate file '{}'", file.name)));
            }
            // `a.b` and `a-b` share a list entry id
            if !element_ids.insert(file.element_id()) {
                return Err(self.invalid(format!(
                    "file '{}' collides with another file's list entry",
                    file.name
                )));
            }
        }

        let mut actions = HashSet::new();
        for action in &self.actions {
            if !is_js_identifier(&action.function) {
                return Err(self.invalid(format!(
                    "action '{}' calls '{}', which is not a function name",
                    action.name, action.function
                )));
            }
            if !actions.insert(action.name.as_str()) {
                return Err(self.invalid(format!("duplicate action '{}'", action.name)));
            }
        }

        Ok(())
    }

    fn invalid(&self, reason: String) -> BlockError {
        BlockError::Invalid {
            id: self.id.clone(),
            reason,
        }
    }
}

fn is_html_id(id: &str) -> bool {
    regex::Regex::new(r"^[A-Za-z][A-Za-z0-9_:.-]*$")
        .map(|re| re.is_match(id))
        .unwrap_or(false)
}

fn is_js_identifier(name: &str) -> bool {
    regex::Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$")
        .map(|re| re.is_match(name))
        .unwrap_or(false)
}
