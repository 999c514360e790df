//! Embedded page assets.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// File name of the session script inside a theme directory.
pub const SESSION_JS_NAME: &str = "monaco-session.js";

/// Browser glue binding rendered blocks to Monaco and local storage.
pub const SESSION_JS: &str = include_str!("../assets/monaco-session.js");

/// Write the session script into `theme_dir`.
///
/// An existing script is kept unless `force` is set, so local changes
/// survive reinstalling.
pub fn install(theme_dir: &Path, force: bool) -> Result<PathBuf> {
    fs::create_dir_all(theme_dir)
        .with_context(|| format!("failed to create {}", theme_dir.display()))?;

    let path = theme_dir.join(SESSION_JS_NAME);
    if path.exists() && !force {
        log::info!("Keeping existing {}", path.display());
        return Ok(path);
    }

    fs::write(&path, SESSION_JS).with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("Created session script: {}", path.display());
    Ok(path)
}
