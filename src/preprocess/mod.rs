//! mdBook Preprocessing
//!
//! Walks every chapter of a book and rewrites its monaco blocks. Speaks
//! mdBook's preprocessor protocol: `[context, book]` as JSON on stdin, the
//! rewritten book as JSON on stdout.

pub mod markdown;

use std::io::{Read, Write};

use anyhow::{bail, Context, Result};
use serde_json::Value;

use crate::config::{Config, MonacoOptions};

pub use markdown::{add_monaco, find_blocks};

/// The monaco preprocessor with its resolved options.
#[derive(Debug, Clone)]
pub struct MonacoPreprocessor {
    options: MonacoOptions,
}

impl MonacoPreprocessor {
    /// Name under `[preprocessor.*]` in book.toml.
    pub const NAME: &'static str = "monaco";

    pub fn new(options: MonacoOptions) -> Self {
        Self { options }
    }

    pub fn name(&self) -> &str {
        Self::NAME
    }

    pub fn supports_renderer(&self, renderer: &str) -> bool {
        self.options.supports_renderer(renderer)
    }

    /// Rewrite every chapter of a JSON-encoded book in place.
    pub fn run(&self, book: &mut Value) -> Result<()> {
        // `sections` up to mdBook 0.4, `items` after
        let key = if book.get("sections").is_some() {
            "sections"
        } else {
            "items"
        };

        match book.get_mut(key).and_then(Value::as_array_mut) {
            Some(items) => self.process_items(items),
            None => bail!("book has no sections"),
        }
    }

    fn process_items(&self, items: &mut [Value]) -> Result<()> {
        for item in items {
            let Some(chapter) = item.get_mut("Chapter").and_then(Value::as_object_mut) else {
                continue;
            };
            let name = chapter
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("<unnamed>")
                .to_string();

            if let Some(Value::String(content)) = chapter.get_mut("content") {
                log::debug!("processing chapter {}", name);
                *content = add_monaco(content, &self.options)
                    .with_context(|| format!("in chapter '{}'", name))?;
            }
            if let Some(Value::Array(sub_items)) = chapter.get_mut("sub_items") {
                self.process_items(sub_items)?;
            }
        }
        Ok(())
    }
}

/// Read `[context, book]` from `input`, write the processed book to `output`.
pub fn handle_preprocessing(config: &Config, input: impl Read, output: impl Write) -> Result<()> {
    let payload: Value =
        serde_json::from_reader(input).context("failed to parse preprocessor input")?;
    let Value::Array(mut parts) = payload else {
        bail!("preprocessor input must be a [context, book] array");
    };
    if parts.len() != 2 {
        bail!("preprocessor input must be a [context, book] array");
    }
    let mut book = parts.pop().unwrap_or(Value::Null);
    let context = parts.pop().unwrap_or(Value::Null);

    let table = context.pointer(&format!("/config/preprocessor/{}", MonacoPreprocessor::NAME));
    let preprocessor = MonacoPreprocessor::new(config.options_for_book(table)?);

    if let Some(renderer) = context.get("renderer").and_then(Value::as_str) {
        if !preprocessor.supports_renderer(renderer) {
            log::warn!("renderer '{}' is not supported, book left unchanged", renderer);
            serde_json::to_writer(output, &book)?;
            return Ok(());
        }
    }
    if let Some(version) = context.get("mdbook_version").and_then(Value::as_str) {
        log::debug!("invoked by mdbook {}", version);
    }

    preprocessor.run(&mut book)?;
    serde_json::to_writer(output, &book).context("failed to write book")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;

    const BLOCK: &str = "```monaco\nid: e\nfiles:\n  - {name: a.txt, language: plaintext, content: hi}\n```\n";

    fn chapter(name: &str, content: &str, sub_items: Vec<Value>) -> Value {
        json!({ "Chapter": {
            "name": name,
            "content": content,
            "number": null,
            "sub_items": sub_items,
            "path": format!("{}.md", name),
            "source_path": format!("{}.md", name),
            "parent_names": []
        }})
    }

    #[test]
    fn rewrites_nested_chapters() {
        let mut book = json!({
            "sections": [
                chapter("intro", "# Intro\n", vec![chapter("nested", BLOCK, vec![])]),
                "Separator",
                { "PartTitle": "Part" },
                chapter("outro", BLOCK, vec![])
            ],
            "__non_exhaustive": null
        });

        MonacoPreprocessor::new(MonacoOptions::default())
            .run(&mut book)
            .unwrap();

        let intro = &book["sections"][0]["Chapter"];
        assert_eq!(intro["content"], "# Intro\n");
        let nested = intro["sub_items"][0]["Chapter"]["content"].as_str().unwrap();
        assert!(nested.contains("<div id=\"e\" class=\"monaco-editor\""));
        let outro = book["sections"][3]["Chapter"]["content"].as_str().unwrap();
        assert!(outro.contains("initializeEditor(files, \"e\")"));
    }

    #[test]
    fn accepts_items_key() {
        let mut book = json!({ "items": [chapter("only", BLOCK, vec![])] });
        MonacoPreprocessor::new(MonacoOptions::default())
            .run(&mut book)
            .unwrap();
        assert!(book["items"][0]["Chapter"]["content"]
            .as_str()
            .unwrap()
            .contains("monaco-file-a-txt"));
    }

    #[test]
    fn rejects_book_without_sections() {
        let mut book = json!({});
        assert!(MonacoPreprocessor::new(MonacoOptions::default())
            .run(&mut book)
            .is_err());
    }

    #[test]
    fn strict_failure_names_the_chapter() {
        let options = MonacoOptions {
            fail_on_error: true,
            ..MonacoOptions::default()
        };
        let mut book = json!({ "sections": [chapter("broken", "```monaco\nid: e\n```\n", vec![])] });

        let err = MonacoPreprocessor::new(options).run(&mut book).unwrap_err();
        assert!(err.to_string().contains("in chapter 'broken'"));
    }

    #[test]
    fn protocol_round() {
        let config = Config::from_args(crate::config::Args::parse_from(["mdbook-monaco"])).unwrap();
        let input = json!([
            {
                "root": "/book",
                "renderer": "html",
                "mdbook_version": "0.4.40",
                "config": { "preprocessor": { "monaco": { "min-height": "5em" } } }
            },
            { "sections": [chapter("one", BLOCK, vec![])], "__non_exhaustive": null }
        ]);
        let mut output = Vec::new();

        handle_preprocessing(&config, input.to_string().as_bytes(), &mut output).unwrap();

        let book: Value = serde_json::from_slice(&output).unwrap();
        let content = book["sections"][0]["Chapter"]["content"].as_str().unwrap();
        assert!(content.contains("style=\"min-height: 5em\""));
        assert!(book.get("__non_exhaustive").is_some());
    }

    #[test]
    fn protocol_rejects_bare_book() {
        let config = Config::from_args(crate::config::Args::parse_from(["mdbook-monaco"])).unwrap();
        let input = json!({ "sections": [] }).to_string();
        let err = handle_preprocessing(&config, input.as_bytes(), Vec::new()).unwrap_err();
        assert!(err.to_string().contains("[context, book]"));
    }

    #[test]
    fn name_and_renderers() {
        let preprocessor = MonacoPreprocessor::new(MonacoOptions::default());
        assert_eq!(preprocessor.name(), "monaco");
        assert!(preprocessor.supports_renderer("html"));
        assert!(!preprocessor.supports_renderer("markdown"));
    }
}
