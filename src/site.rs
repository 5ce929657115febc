//! Page assembly: which declarations get documented, and on which page.

use crate::accessors::{name, not_test};
use crate::decorate::{decorate, AugmentedRecord};
use crate::error::SiteError;
use crate::input::SourceAst;
use crate::model::Node;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Component, Path};
use std::str::FromStr;
use tracing::{debug, info};

/// How documented items are grouped into output pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageMode {
    /// Everything on one page, `index`.
    #[default]
    Single,
    /// One page per top-level item, named after it.
    Items,
    /// One page per source file, named after its path.
    Files,
}

impl FromStr for PageMode {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(PageMode::Single),
            "items" => Ok(PageMode::Items),
            "files" => Ok(PageMode::Files),
            _ => Err(SiteError::UnknownPageMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SiteConfig {
    pub pages: PageMode,
    /// Source paths matching any of these are skipped entirely.
    pub exclude: Vec<glob::Pattern>,
    /// Keep contracts named like test scaffolding (`*Test`, `Mock*`, ...).
    pub include_tests: bool,
}

/// A group of records the renderer turns into one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub id: String,
    pub items: Vec<AugmentedRecord>,
}

/// Decorate the top-level declarations of every source unit and group them
/// into pages, ordered by page id.
pub fn build_pages(units: &[SourceAst], config: &SiteConfig) -> Result<Vec<Page>, SiteError> {
    let mut pages: BTreeMap<String, Vec<AugmentedRecord>> = BTreeMap::new();

    for unit in units {
        if config.exclude.iter().any(|p| p.matches(&unit.path)) {
            debug!(path = %unit.path, "excluded");
            continue;
        }

        let root = Node::from_json(&unit.ast).map_err(|source| SiteError::Ast {
            path: unit.path.clone(),
            source,
        })?;

        for item in root.children().iter().filter(|c| c.decl_kind().is_some()) {
            if !config.include_tests && !not_test(item) {
                debug!(path = %unit.path, name = ?name(item), "skipping test scaffolding");
                continue;
            }
            let record = decorate(item).map_err(|source| SiteError::Decorate {
                path: unit.path.clone(),
                source,
            })?;
            pages
                .entry(page_id(config.pages, &unit.path, item))
                .or_default()
                .push(record);
        }
    }

    info!(pages = pages.len(), "assembled documentation pages");
    Ok(pages
        .into_iter()
        .map(|(id, items)| Page { id, items })
        .collect())
}

fn page_id(mode: PageMode, path: &str, item: &Node<'_>) -> String {
    match mode {
        PageMode::Single => "index".to_string(),
        PageMode::Items => contained_path(name(item).unwrap_or("unnamed")),
        PageMode::Files => contained_path(path.strip_suffix(".sol").unwrap_or(path)),
    }
}

/// Reduce `path` to its normal components so the page id always stays below
/// the output directory: roots, drive prefixes, `.` and `..` are dropped.
fn contained_path(path: &str) -> String {
    let parts: Vec<_> = Path::new(path)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        "index".to_string()
    } else {
        parts.join("/")
    }
}
