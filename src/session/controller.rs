//! File Session Controller
//!
//! Keeps one editor view bound to one of several files. Switching files
//! swaps the editor buffer and moves the persistence subscription, so every
//! edit is written through to the store under the active file's name.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::editor::{ChangeListener, EditorHost, EditorWidget, Subscription, TextModel};
use super::error::{Result, SessionError};
use super::file_list::{element_id, FileList};
use super::storage::KeyValueStore;

fn default_editable() -> bool {
    true
}

/// A file offered in the editor, with its default content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub name: String,
    pub content: String,
    pub language: String,
    #[serde(default = "default_editable")]
    pub editable: bool,
}

impl FileRecord {
    pub fn new(
        name: impl Into<String>,
        content: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            language: language.into(),
            editable: true,
        }
    }

    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    /// Id of this file's entry in the file list.
    pub fn element_id(&self) -> String {
        element_id(&self.name)
    }
}

pub struct FileSessionController<E, S> {
    files: Vec<FileRecord>,
    editor: E,
    store: Rc<RefCell<S>>,
    current: String,
    subscription: Option<Subscription>,
}

impl<E, S> FileSessionController<E, S>
where
    E: EditorWidget,
    S: KeyValueStore + 'static,
{
    /// Mount an editor showing the first file and bind persistence to it.
    pub fn initialize<H>(
        host: &mut H,
        files: Vec<FileRecord>,
        mount_id: &str,
        store: Rc<RefCell<S>>,
    ) -> Result<Self>
    where
        H: EditorHost<Editor = E>,
    {
        let first = files.first().ok_or(SessionError::EmptyFileList)?;
        let model = resolve_model(first, &store)?;
        let current = first.name.clone();
        let editor = host.create(mount_id, model)?;

        let mut controller = Self {
            files,
            editor,
            store,
            current: current.clone(),
            subscription: None,
        };
        controller.activate_file(&current)?;
        Ok(controller)
    }

    /// Make `name` the edited file.
    ///
    /// Fails with `FileNotFound` when no record carries `name`, leaving the
    /// session untouched.
    pub fn activate_file(&mut self, name: &str) -> Result<()> {
        let record = self
            .find(name)
            .cloned()
            .ok_or_else(|| SessionError::FileNotFound(name.to_string()))?;
        let model = resolve_model(&record, &self.store)?;

        self.editor.set_model(model);

        let subscription = self
            .editor
            .on_did_change_content(persist_to(&self.store, record.name.clone()));
        if let Some(mut previous) = self.subscription.replace(subscription) {
            previous.dispose();
        }

        log::debug!("activated {}", record.name);
        self.current = record.name;
        Ok(())
    }

    /// Bind each file's list entry so a click activates that file.
    ///
    /// Handlers replace earlier bindings on the same entries and hold only a
    /// weak reference to the controller. If any file lacks an entry, nothing
    /// is bound.
    pub fn bind_file_list_events<L>(this: &Rc<RefCell<Self>>, list: &mut L) -> Result<()>
    where
        L: FileList,
        E: 'static,
    {
        let names: Vec<String> = this
            .borrow()
            .files
            .iter()
            .map(|file| file.name.clone())
            .collect();

        if let Some(missing) = names
            .iter()
            .map(|name| element_id(name))
            .find(|id| !list.contains(id))
        {
            return Err(SessionError::ListEntryNotFound(missing));
        }

        for name in names {
            let controller = Rc::downgrade(this);
            let id = element_id(&name);
            list.set_click_handler(
                &id,
                Box::new(move || {
                    let Some(controller) = controller.upgrade() else {
                        return;
                    };
                    let Ok(mut controller) = controller.try_borrow_mut() else {
                        log::warn!("session busy, dropped click on {}", name);
                        return;
                    };
                    if let Err(e) = controller.activate_file(&name) {
                        log::warn!("failed to activate {}: {}", name, e);
                    }
                }),
            )?;
        }

        Ok(())
    }

    /// Text shown for `name`: its saved override if any, else its default.
    pub fn display_text(&self, name: &str) -> Result<String> {
        let record = self
            .find(name)
            .ok_or_else(|| SessionError::FileNotFound(name.to_string()))?;
        Ok(resolve_model(record, &self.store)?.text)
    }

    pub fn current_file(&self) -> &str {
        &self.current
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut E {
        &mut self.editor
    }

    pub fn store(&self) -> &Rc<RefCell<S>> {
        &self.store
    }

    fn find(&self, name: &str) -> Option<&FileRecord> {
        self.files.iter().find(|file| file.name == name)
    }
}

fn resolve_model<S: KeyValueStore>(
    record: &FileRecord,
    store: &Rc<RefCell<S>>,
) -> Result<TextModel> {
    let text = store
        .borrow()
        .get(&record.name)?
        .unwrap_or_else(|| record.content.clone());
    Ok(TextModel::new(text, record.language.clone()).read_only(!record.editable))
}

/// Listener writing the buffer's full text under `key` on every change.
fn persist_to<S>(store: &Rc<RefCell<S>>, key: String) -> ChangeListener
where
    S: KeyValueStore + 'static,
{
    let store = Rc::clone(store);
    Box::new(move |text: &str| {
        log::debug!("saving {} ({} bytes)", key, text.len());
        if let Err(e) = store.borrow_mut().set(&key, text) {
            log::warn!("failed to save {}: {}", key, e);
        }
    })
}

impl<E: std::fmt::Debug, S> std::fmt::Debug for FileSessionController<E, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSessionController")
            .field("current", &self.current)
            .field("files", &self.files.len())
            .field("editor", &self.editor)
            .field("subscription", &self.subscription)
            .finish()
    }
}
