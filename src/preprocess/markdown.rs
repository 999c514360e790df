//! Markdown Rewriting
//!
//! Finds `monaco` fenced code blocks in a chapter and replaces each with the
//! rendered editor markup. Everything else is copied through untouched.

use std::ops::Range;

use anyhow::{Context, Result};
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::block::{render_block, BlockError, MonacoBlock};
use crate::config::MonacoOptions;

/// Info string marking an editor block.
pub const MONACO_INFO: &str = "monaco";

/// Replace every monaco block in `content` with its editor markup.
///
/// A malformed block is left in place with a warning, or aborts the whole
/// chapter when `fail_on_error` is set.
pub fn add_monaco(content: &str, options: &MonacoOptions) -> Result<String> {
    let mut replacements: Vec<(Range<usize>, String)> = Vec::new();

    for (span, body) in scan(content) {
        match render(&body, options) {
            Ok(html) => replacements.push((span, html)),
            Err(e) if options.fail_on_error => {
                let line = content[..span.start].matches('\n').count() + 1;
                return Err(e).with_context(|| format!("monaco block at line {}", line));
            }
            Err(e) => log::warn!("leaving monaco block unchanged: {}", e),
        }
    }

    let mut rewritten = content.to_string();
    for (span, html) in replacements.iter().rev() {
        rewritten.replace_range(span.clone(), &format!("\n{}", html));
    }
    Ok(rewritten)
}

/// Parse every monaco block in `content`, in document order.
pub fn find_blocks(content: &str) -> Result<Vec<MonacoBlock>, BlockError> {
    scan(content)
        .into_iter()
        .map(|(_, body)| MonacoBlock::parse(&body))
        .collect()
}

/// Source span and body of each monaco fenced block.
fn scan(content: &str) -> Vec<(Range<usize>, String)> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_FOOTNOTES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);

    let mut blocks = Vec::new();
    let mut open_block: Option<(Range<usize>, String)> = None;

    for (event, span) in Parser::new_ext(content, opts).into_offset_iter() {
        log::trace!("event={:?}, span={:?}", event, span);
        match event {
            // The start event's span covers the whole block, fences included
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) if is_monaco(&info) => {
                open_block = Some((span, String::new()));
            }
            // Code block bodies can arrive as several text events
            Event::Text(text) => {
                if let Some((_, body)) = open_block.as_mut() {
                    body.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(block) = open_block.take() {
                    blocks.push(block);
                }
            }
            _ => {}
        }
    }

    blocks
}

fn is_monaco(info: &str) -> bool {
    info.split(|c: char| c == ',' || c.is_whitespace()).next() == Some(MONACO_INFO)
}

fn render(body: &str, options: &MonacoOptions) -> Result<String, BlockError> {
    let block = MonacoBlock::parse(body)?;
    log::debug!("rendering monaco block {} ({} files)", block.id, block.files.len());
    render_block(&block, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CHAPTER: &str = r#"# Chapter

```monaco
id: editor1_chapter1
files:
  - name: "main.js"
    language: javascript
    editable: false
    content: |
      console.log("Hello World");
  - name: "index.html"
    language: html
    content: |
      <!-- HTML content here -->
```

Text
"#;

    #[test]
    fn replaces_monaco_block() {
        let result = add_monaco(CHAPTER, &MonacoOptions::default()).unwrap();

        assert!(result.starts_with(
            "# Chapter\n\n\n<div class=\"monaco-file-tree\">\n<ul>\n<li id=\"monaco-file-main-js\">main.js</li>\n<li id=\"monaco-file-index-html\">index.html</li>\n</ul>\n</div>\n<div id=\"editor1_chapter1\" class=\"monaco-editor\" style=\"min-height: 200px\"></div>\n\n<script>\n"
        ));
        assert!(result.contains(
            r#"    var files = [{"name":"main.js","content":"console.log(\"Hello World\");\n","language":"javascript","readOnly":true},{"name":"index.html","content":"\u003c!-- HTML content here -->\n","language":"html","readOnly":false}];"#
        ));
        assert!(result.contains("    initializeEditor(files, \"editor1_chapter1\");\n"));
        assert!(!result.contains("```"));
        let tail = result.trim_end();
        assert!(tail.ends_with("</script>\n\nText") || tail.ends_with("</script>\nText"));
    }

    #[test]
    fn leaves_other_code_blocks_alone() {
        let content = "# Title\n\n```rust\nfn main() {}\n```\n\n    indented\n";
        let result = add_monaco(content, &MonacoOptions::default()).unwrap();
        assert_eq!(content, result);
    }

    #[test]
    fn accepts_info_string_attributes() {
        let content = "```monaco,editable\nid: e\nfiles:\n  - {name: a.txt, language: plaintext, content: hi}\n```\n";
        let result = add_monaco(content, &MonacoOptions::default()).unwrap();
        assert!(result.contains("<div id=\"e\" class=\"monaco-editor\""));
    }

    #[test]
    fn does_not_match_prefixed_languages() {
        let content = "```monacoscript\nid: e\n```\n";
        let result = add_monaco(content, &MonacoOptions::default()).unwrap();
        assert_eq!(content, result);
    }

    #[test]
    fn replaces_several_blocks_in_order() {
        let content = "A\n\n```monaco\nid: first\nfiles:\n  - {name: a.txt, language: plaintext, content: one}\n```\n\nB\n\n```monaco\nid: second\nfiles:\n  - {name: b.txt, language: plaintext, content: two}\n```\n\nC\n";
        let result = add_monaco(content, &MonacoOptions::default()).unwrap();

        let first = result.find("<div id=\"first\"").unwrap();
        let middle = result.find("\nB\n").unwrap();
        let second = result.find("<div id=\"second\"").unwrap();
        assert!(first < middle && middle < second);
        assert!(result.starts_with("A\n\n"));
        assert!(result.trim_end().ends_with('C'));
    }

    #[test]
    fn finds_blocks_without_rendering() {
        let blocks = find_blocks(CHAPTER).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].id, "editor1_chapter1");
        assert_eq!(blocks[0].files[1].name, "index.html");

        assert!(find_blocks("```monaco\nid: e\n```\n").is_err());
        assert!(find_blocks("no blocks here\n").unwrap().is_empty());
    }

    #[test]
    fn malformed_block_is_kept_by_default() {
        let content = "```monaco\nid: e\nfiles: not-a-list\n```\n";
        let result = add_monaco(content, &MonacoOptions::default()).unwrap();
        assert_eq!(content, result);
    }

    #[test]
    fn malformed_block_fails_when_strict() {
        let options = MonacoOptions {
            fail_on_error: true,
            ..MonacoOptions::default()
        };
        let content = "Intro\n\n```monaco\nid: e\nfiles: []\n```\n";

        let err = add_monaco(content, &options).unwrap_err();
        assert!(err.to_string().contains("monaco block at line 3"));
        assert!(format!("{:#}", err).contains("no files"));
    }

    #[test]
    fn error_line_counts_fence_inside_list_item() {
        let options = MonacoOptions {
            fail_on_error: true,
            ..MonacoOptions::default()
        };
        let content = "- ```monaco\n  id: e\n  files: []\n  ```\n";

        let err = add_monaco(content, &options).unwrap_err();
        assert_eq!(err.to_string(), "monaco block at line 1");
    }
}
