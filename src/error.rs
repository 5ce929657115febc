//! Error kinds for loading and decorating syntax trees.
//!
//! "Not applicable" is never an error: accessors return `Ok(None)` for node
//! variants they do not model. Only broken upstream guarantees end up here.

use thiserror::Error;

/// The compiler JSON does not match the syntax-tree schema.
#[derive(Debug, Error)]
pub enum AstError {
    #[error("expected a JSON object for an AST node, found {found}")]
    NotAnObject { found: &'static str },

    #[error("AST object has no string `nodeType` discriminant")]
    MissingNodeType,

    #[error("{node_type} is missing required field `{field}`")]
    MissingField {
        node_type: String,
        field: &'static str,
    },

    #[error("{node_type} has an invalid `{field}`")]
    InvalidField {
        node_type: String,
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A derived property could not be computed because the tree violates a
/// contract of the type checker.
#[derive(Debug, Error)]
pub enum DecorateError {
    #[error("parameter `{param}` of {owner} has no resolved type")]
    UnresolvedType { owner: String, param: String },

    #[error("failed to serialize derived value for `{key}`")]
    Serialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub type AstResult<T> = Result<T, AstError>;

/// Failure while turning loaded source units into pages.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("invalid syntax tree in {path}")]
    Ast {
        path: String,
        #[source]
        source: AstError,
    },

    #[error("cannot document {path}")]
    Decorate {
        path: String,
        #[source]
        source: DecorateError,
    },

    #[error("unknown page mode: {0}. Use single, items, or files")]
    UnknownPageMode(String),
}
