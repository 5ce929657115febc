//! Compiler output containers → per-file syntax trees.
//!
//! Accepts a bare `SourceUnit`, a standard-JSON compiler output
//! (`{"sources": {path: {"ast": ...}}}`) or a build-info file that wraps one
//! under `"output"`.

use serde_json::Value;

/// The syntax tree of one source file.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceAst {
    pub path: String,
    pub ast: Value,
}

/// Parse a JSON document and pull out every source unit in it.
///
/// Returns `Ok(None)` when the document is valid JSON but not a container
/// this tool understands.
pub fn parse_document(
    content: &str,
    fallback_path: &str,
) -> Result<Option<Vec<SourceAst>>, serde_json::Error> {
    let root: Value = serde_json::from_str(content)?;
    Ok(source_units(root, fallback_path))
}

/// Extract source units from an already-parsed document, sorted by path.
pub fn source_units(mut root: Value, fallback_path: &str) -> Option<Vec<SourceAst>> {
    if root.get("nodeType").and_then(Value::as_str) == Some("SourceUnit") {
        let path = root
            .get("absolutePath")
            .and_then(Value::as_str)
            .unwrap_or(fallback_path)
            .to_string();
        return Some(vec![SourceAst { path, ast: root }]);
    }

    if root.get("sources").is_none() {
        // build-info: the compiler output sits under "output"
        let output = root.get_mut("output")?.take();
        return source_units(output, fallback_path);
    }

    let sources = root.get_mut("sources")?.as_object_mut()?;
    let mut units: Vec<SourceAst> = sources
        .iter_mut()
        .filter_map(|(path, entry)| {
            let ast = entry.get_mut("ast")?.take();
            ast.is_object().then(|| SourceAst {
                path: path.clone(),
                ast,
            })
        })
        .collect();
    units.sort_by(|a, b| a.path.cmp(&b.path));
    Some(units)
}
