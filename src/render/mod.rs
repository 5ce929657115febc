//! Record writers: trait-based format dispatch.
//!
//! Turning records into Markdown or HTML is the template engine's job; this
//! module only serializes pages for it and provides the small text helpers
//! templates call.

pub mod helpers;
pub mod json;

use crate::site::Page;
use anyhow::{anyhow, Result};

/// Trait for serializing a page of records into a specific output format.
pub trait Renderer {
    fn render(&self, page: &Page) -> Result<String>;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "json" => Ok(Box::new(json::JsonRenderer)),
        "jsonl" | "ndjson" => Ok(Box::new(json::JsonLinesRenderer)),
        _ => Err(anyhow!("unknown format: {}. Use json or jsonl", format)),
    }
}
