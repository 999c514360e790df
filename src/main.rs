use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use std::rc::Rc;

use anyhow::{bail, Context, Result};

use mdbook_monaco::assets;
use mdbook_monaco::config::{Command, Config};
use mdbook_monaco::preprocess::{add_monaco, find_blocks, handle_preprocessing};
use mdbook_monaco::session::{
    element_id, BufferHost, EditorWidget, FileSessionController, JsonFileStore, MemoryFileList,
    SessionError,
};

fn main() -> Result<ExitCode> {
    // Parse configuration from command line and config files
    let config = Config::from_args_and_env()?;

    // stdout carries the book, so logs go to stderr
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .target(env_logger::Target::Stderr)
        .init();

    match config.command.clone() {
        None => {
            handle_preprocessing(&config, io::stdin().lock(), io::stdout().lock())?;
        }
        Some(Command::Supports { renderer }) => {
            if !config.options()?.supports_renderer(&renderer) {
                log::debug!("renderer {} not supported", renderer);
                return Ok(ExitCode::FAILURE);
            }
        }
        Some(Command::Render { path }) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let rendered = add_monaco(&content, &config.options()?)?;
            io::stdout().lock().write_all(rendered.as_bytes())?;
        }
        Some(Command::Install { theme_dir, force }) => {
            let path = assets::install(&theme_dir, force)?;
            println!("{}", path.display());
            println!("Add it to book.toml under [output.html] additional-js");
        }
        Some(Command::Session {
            path,
            store,
            activate,
            edit,
        }) => {
            run_session(&path, &store, activate.as_deref(), edit.as_deref())?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Drive the first monaco block of a chapter the way a page would: mount,
/// click a file entry, type, and report what the editor shows.
fn run_session(
    path: &Path,
    store_path: &Path,
    activate: Option<&str>,
    edit: Option<&str>,
) -> Result<()> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let Some(block) = find_blocks(&content)?.into_iter().next() else {
        bail!("no monaco block in {}", path.display());
    };

    let mut list = MemoryFileList::for_names(block.files.iter().map(|file| file.name.as_str()));
    let store = Rc::new(RefCell::new(JsonFileStore::open(store_path)?));
    let controller = Rc::new(RefCell::new(FileSessionController::initialize(
        &mut BufferHost,
        block.files,
        &block.id,
        store,
    )?));
    FileSessionController::bind_file_list_events(&controller, &mut list)?;

    if let Some(name) = activate {
        // Element ids are lossy, so resolve the name before clicking
        let known = controller.borrow().files().iter().any(|file| file.name == name);
        if !known || !list.click(&element_id(name)) {
            return Err(SessionError::FileNotFound(name.to_string()).into());
        }
    }
    if let Some(text) = edit {
        controller.borrow_mut().editor_mut().apply_edit(text)?;
    }

    let controller = controller.borrow();
    let editor = controller.editor();
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{} ({})", controller.current_file(), editor.language())?;
    stdout.write_all(editor.value().as_bytes())?;
    Ok(())
}
