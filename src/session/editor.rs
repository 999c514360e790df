//! Editor Widget Seam
//!
//! The slice of an embedded code editor's API a file session relies on:
//! mounting a view, swapping its buffer, and change notifications with
//! disposable handles.

use super::error::Result;

/// Text and syntax mode for one file, as handed to the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextModel {
    pub text: String,
    pub language: String,
    pub read_only: bool,
}

impl TextModel {
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: language.into(),
            read_only: false,
        }
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}

/// Callback invoked with the buffer's full text after every content change.
pub type ChangeListener = Box<dyn FnMut(&str)>;

/// Owned handle to a change subscription.
///
/// Disposing stops the notifications. Disposing twice, or dropping after an
/// explicit dispose, does nothing.
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn dispose(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }

    pub fn is_live(&self) -> bool {
        self.release.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("live", &self.is_live())
            .finish()
    }
}

/// A mounted editor view.
pub trait EditorWidget {
    /// Replace the active buffer.
    fn set_model(&mut self, model: TextModel);

    /// Full text of the active buffer.
    fn value(&self) -> String;

    /// Syntax mode of the active buffer.
    fn language(&self) -> String;

    /// Subscribe to content changes of whichever buffer is active.
    fn on_did_change_content(&mut self, listener: ChangeListener) -> Subscription;
}

/// Creates editor views at a mount point.
pub trait EditorHost {
    type Editor: EditorWidget;

    fn create(&mut self, mount_id: &str, model: TextModel) -> Result<Self::Editor>;
}
