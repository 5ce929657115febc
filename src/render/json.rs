//! JSON writers: structured output for template engines.

use crate::render::Renderer;
use crate::site::Page;
use anyhow::{Context, Result};

/// The whole page as one pretty-printed JSON document.
pub struct JsonRenderer;

/// One record per line, for streaming consumers.
pub struct JsonLinesRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, page: &Page) -> Result<String> {
        let mut out = serde_json::to_string_pretty(page)
            .with_context(|| format!("failed to serialize page {}", page.id))?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

impl Renderer for JsonLinesRenderer {
    fn render(&self, page: &Page) -> Result<String> {
        let mut out = String::new();
        for record in &page.items {
            let line = serde_json::to_string(record)
                .with_context(|| format!("failed to serialize a record of page {}", page.id))?;
            out.push_str(&line);
            out.push('\n');
        }
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "jsonl"
    }
}
