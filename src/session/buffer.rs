//! In-memory editor widget.
//!
//! Holds one buffer and dispatches change notifications synchronously, the
//! way a UI-thread editor does. Used headless and in tests.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::editor::{ChangeListener, EditorHost, EditorWidget, Subscription, TextModel};
use super::error::{Result, SessionError};

type ListenerSlots = Rc<RefCell<Vec<(u64, ChangeListener)>>>;

#[derive(Debug, Default, Clone, Copy)]
pub struct BufferHost;

impl EditorHost for BufferHost {
    type Editor = BufferEditor;

    fn create(&mut self, mount_id: &str, model: TextModel) -> Result<BufferEditor> {
        Ok(BufferEditor::new(mount_id, model))
    }
}

pub struct BufferEditor {
    mount_id: String,
    model: TextModel,
    listeners: ListenerSlots,
    next_listener: u64,
}

impl BufferEditor {
    pub fn new(mount_id: &str, model: TextModel) -> Self {
        Self {
            mount_id: mount_id.to_string(),
            model,
            listeners: Rc::new(RefCell::new(Vec::new())),
            next_listener: 0,
        }
    }

    pub fn mount_id(&self) -> &str {
        &self.mount_id
    }

    pub fn model(&self) -> &TextModel {
        &self.model
    }

    /// Number of live change subscriptions.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Replace the buffer's text and notify subscribers.
    ///
    /// Listeners must not subscribe or dispose while being notified.
    pub fn apply_edit(&mut self, text: &str) -> Result<()> {
        if self.model.read_only {
            return Err(SessionError::ReadOnly(self.mount_id.clone()));
        }
        self.model.text = text.to_string();

        let mut listeners = self.listeners.borrow_mut();
        for (_, listener) in listeners.iter_mut() {
            listener(&self.model.text);
        }
        Ok(())
    }

    /// Append text at the end of the buffer, like typing.
    pub fn type_text(&mut self, text: &str) -> Result<()> {
        let edited = format!("{}{}", self.model.text, text);
        self.apply_edit(&edited)
    }
}

impl EditorWidget for BufferEditor {
    fn set_model(&mut self, model: TextModel) {
        log::debug!(
            "{}: new buffer ({} bytes, {})",
            self.mount_id,
            model.text.len(),
            model.language
        );
        self.model = model;
    }

    fn value(&self) -> String {
        self.model.text.clone()
    }

    fn language(&self) -> String {
        self.model.language.clone()
    }

    fn on_did_change_content(&mut self, listener: ChangeListener) -> Subscription {
        let id = self.next_listener;
        self.next_listener += 1;
        self.listeners.borrow_mut().push((id, listener));

        let slots: Weak<RefCell<Vec<(u64, ChangeListener)>>> = Rc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(slots) = slots.upgrade() {
                slots.borrow_mut().retain(|(slot_id, _)| *slot_id != id);
            }
        })
    }
}

impl std::fmt::Debug for BufferEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferEditor")
            .field("mount_id", &self.mount_id)
            .field("model", &self.model)
            .field("listeners", &self.listener_count())
            .finish()
    }
}
