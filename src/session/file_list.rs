//! File list entries and their click bindings.

use std::collections::BTreeMap;

use super::error::{Result, SessionError};

/// Callback run when a file list entry is clicked.
pub type ClickHandler = Box<dyn FnMut()>;

/// Element id of the list entry for a file: `monaco-file-` followed by the
/// name with every `.` replaced by `-`.
pub fn element_id(name: &str) -> String {
    format!("monaco-file-{}", name.replace('.', "-"))
}

/// The clickable list of files rendered next to an editor.
pub trait FileList {
    fn contains(&self, element_id: &str) -> bool;

    /// Bind `handler` to the element, replacing any handler bound before.
    fn set_click_handler(&mut self, element_id: &str, handler: ClickHandler) -> Result<()>;
}

/// File list kept in memory; `click` stands in for a user's click.
#[derive(Default)]
pub struct MemoryFileList {
    entries: BTreeMap<String, Option<ClickHandler>>,
}

impl MemoryFileList {
    pub fn new() -> Self {
        Self::default()
    }

    /// A list with one entry per file name.
    pub fn for_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let entries = names
            .into_iter()
            .map(|name| (element_id(name), None))
            .collect();
        Self { entries }
    }

    pub fn is_bound(&self, element_id: &str) -> bool {
        matches!(self.entries.get(element_id), Some(Some(_)))
    }

    /// Run the entry's handler. Returns false if nothing is bound there.
    pub fn click(&mut self, element_id: &str) -> bool {
        match self.entries.get_mut(element_id) {
            Some(Some(handler)) => {
                handler();
                true
            }
            _ => false,
        }
    }
}

impl FileList for MemoryFileList {
    fn contains(&self, element_id: &str) -> bool {
        self.entries.contains_key(element_id)
    }

    fn set_click_handler(&mut self, element_id: &str, handler: ClickHandler) -> Result<()> {
        let slot = self
            .entries
            .get_mut(element_id)
            .ok_or_else(|| SessionError::ListEntryNotFound(element_id.to_string()))?;
        *slot = Some(handler);
        Ok(())
    }
}

impl std::fmt::Debug for MemoryFileList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries.keys()).finish()
    }
}
