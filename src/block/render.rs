//! HTML rendering of monaco blocks.

use serde::Serialize;

use super::schema::{BlockError, MonacoBlock};
use crate::config::MonacoOptions;

/// File entry as handed to the page's session glue.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScriptFile<'a> {
    name: &'a str,
    content: &'a str,
    language: &'a str,
    read_only: bool,
}

/// Render a block as file tree, editor mount point, optional toolbar and
/// bootstrap script.
pub fn render_block(block: &MonacoBlock, options: &MonacoOptions) -> Result<String, BlockError> {
    let mut html = String::new();

    html.push_str("<div class=\"monaco-file-tree\">\n<ul>\n");
    for file in &block.files {
        html.push_str(&format!(
            "<li id=\"{}\">{}</li>\n",
            escape_html(&file.element_id()),
            escape_html(&file.name)
        ));
    }
    html.push_str("</ul>\n</div>\n");

    html.push_str(&format!(
        "<div id=\"{}\" class=\"monaco-editor\" style=\"min-height: {}\"></div>\n\n",
        escape_html(&block.id),
        escape_html(&options.min_height)
    ));

    if !block.actions.is_empty() {
        html.push_str(&format!(
            "<div class=\"monaco-actions\" data-editor=\"{}\">\n",
            escape_html(&block.id)
        ));
        for action in &block.actions {
            html.push_str(&format!(
                "<button class=\"monaco-action\" data-action=\"{name}\">{name}</button>\n",
                name = escape_html(&action.name)
            ));
        }
        html.push_str("</div>\n\n");
    }

    html.push_str(&bootstrap_script(block)?);
    Ok(html)
}

fn bootstrap_script(block: &MonacoBlock) -> Result<String, BlockError> {
    let files: Vec<ScriptFile<'_>> = block
        .files
        .iter()
        .map(|file| ScriptFile {
            name: &file.name,
            content: &file.content,
            language: &file.language,
            read_only: !file.editable,
        })
        .collect();
    let id = script_json(&block.id)?;

    let mut script = String::from("<script>\nwindow.addEventListener(\"load\", function() {\n");
    script.push_str(&format!("    var files = {};\n", script_json(&files)?));
    if !block.actions.is_empty() {
        script.push_str(&format!("    var actions = {};\n", script_json(&block.actions)?));
    }
    script.push_str(&format!("    addFileTreeEventListeners(files, {});\n", id));
    script.push_str(&format!("    initializeEditor(files, {});\n", id));
    if !block.actions.is_empty() {
        script.push_str(&format!("    addActionListeners(actions, {});\n", id));
    }
    script.push_str("});\n</script>");
    Ok(script)
}

/// JSON safe to inline in a `<script>` element.
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String, BlockError> {
    // `<` can only appear inside string literals, where the escape decodes back
    Ok(serde_json::to_string(value)?.replace('<', "\\u003c"))
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
