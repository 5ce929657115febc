//! Declaration-node model over the compiler's JSON syntax tree.
//!
//! A [`Node`] borrows the JSON it was built from. The discriminant lives in
//! [`NodeKind`]; structural nodes (blocks, parameter lists, expressions) are
//! kept as [`NodeKind::Other`] so descendant searches can walk through them.

use crate::error::{AstError, AstResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Byte offset where a node starts in its source file, from the
/// `start:length:file` range string.
fn source_start(src: &str) -> Option<usize> {
    src.split(':').next()?.parse().ok()
}

/// One node of the syntax tree.
#[derive(Debug, Clone)]
pub struct Node<'a> {
    node_type: &'a str,
    src_start: Option<usize>,
    fields: &'a Map<String, Value>,
    documentation: Option<&'a str>,
    children: Vec<Node<'a>>,
    pub kind: NodeKind<'a>,
}

#[derive(Debug, Clone)]
pub enum NodeKind<'a> {
    SourceUnit,
    Contract(ContractDefinition<'a>),
    Function(FunctionDefinition<'a>),
    Event(EventDefinition<'a>),
    Error(ErrorDefinition<'a>),
    Modifier(ModifierDefinition<'a>),
    Variable(VariableDeclaration<'a>),
    Other,
}

/// Declaration kinds the descendant collector can search for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Contract,
    Function,
    Event,
    Error,
    Modifier,
    Variable,
}

#[derive(Debug, Clone)]
pub struct ContractDefinition<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone)]
pub struct FunctionDefinition<'a> {
    pub name: &'a str,
    pub kind: FunctionKind,
    pub visibility: Option<Visibility>,
    pub state_mutability: Option<StateMutability>,
    pub is_virtual: bool,
    pub modifiers: Vec<&'a str>,
    pub parameters: Vec<Param<'a>>,
    pub return_parameters: Vec<Param<'a>>,
}

#[derive(Debug, Clone)]
pub struct EventDefinition<'a> {
    pub name: &'a str,
    pub parameters: Vec<Param<'a>>,
}

#[derive(Debug, Clone)]
pub struct ErrorDefinition<'a> {
    pub name: &'a str,
    pub parameters: Vec<Param<'a>>,
}

#[derive(Debug, Clone)]
pub struct ModifierDefinition<'a> {
    pub name: &'a str,
    pub parameters: Vec<Param<'a>>,
}

#[derive(Debug, Clone)]
pub struct VariableDeclaration<'a> {
    pub name: &'a str,
    pub visibility: Option<Visibility>,
    pub mutability: Option<Mutability>,
    pub state_variable: bool,
    pub type_name: Option<TypeName<'a>>,
    /// `typeDescriptions.typeString` of the declaration itself.
    pub type_string: Option<&'a str>,
}

/// The declared type annotation of a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeName<'a> {
    Elementary { name: &'a str },
    /// Mappings, arrays, user-defined types, function types.
    Composite { type_string: Option<&'a str> },
}

/// A formal parameter (function, event, error or modifier).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param<'a> {
    pub name: &'a str,
    pub type_string: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    External,
    Internal,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    Pure,
    View,
    Nonpayable,
    Payable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mutability {
    Mutable,
    Immutable,
    Constant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FunctionKind {
    Function,
    Constructor,
    Fallback,
    Receive,
    FreeFunction,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::External => "external",
            Visibility::Internal => "internal",
            Visibility::Private => "private",
        }
    }

    /// Callable or readable from outside the contract.
    pub fn is_public_api(self) -> bool {
        matches!(self, Visibility::Public | Visibility::External)
    }
}

impl StateMutability {
    pub fn as_str(self) -> &'static str {
        match self {
            StateMutability::Pure => "pure",
            StateMutability::View => "view",
            StateMutability::Nonpayable => "nonpayable",
            StateMutability::Payable => "payable",
        }
    }
}

impl Mutability {
    pub fn as_str(self) -> &'static str {
        match self {
            Mutability::Mutable => "mutable",
            Mutability::Immutable => "immutable",
            Mutability::Constant => "constant",
        }
    }
}

impl FunctionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FunctionKind::Function => "function",
            FunctionKind::Constructor => "constructor",
            FunctionKind::Fallback => "fallback",
            FunctionKind::Receive => "receive",
            FunctionKind::FreeFunction => "freeFunction",
        }
    }
}

impl<'a> Node<'a> {
    /// Build a node (and its whole subtree) from a JSON object with a
    /// `nodeType` discriminant.
    pub fn from_json(value: &'a Value) -> AstResult<Self> {
        let fields = value.as_object().ok_or(AstError::NotAnObject {
            found: json_kind(value),
        })?;
        let node_type = fields
            .get("nodeType")
            .and_then(Value::as_str)
            .ok_or(AstError::MissingNodeType)?;
        let obj = Obj { node_type, fields };

        let kind = match node_type {
            "SourceUnit" => NodeKind::SourceUnit,
            "ContractDefinition" => NodeKind::Contract(ContractDefinition {
                name: obj.required_str("name")?,
            }),
            "FunctionDefinition" => NodeKind::Function(FunctionDefinition {
                name: obj.required_str("name")?,
                kind: obj.parse("kind")?.unwrap_or(FunctionKind::Function),
                visibility: obj.parse("visibility")?,
                state_mutability: obj.parse("stateMutability")?,
                is_virtual: obj.flag("virtual"),
                modifiers: obj.modifier_names(),
                parameters: obj.param_list("parameters")?,
                return_parameters: obj.param_list("returnParameters")?,
            }),
            "EventDefinition" => NodeKind::Event(EventDefinition {
                name: obj.required_str("name")?,
                parameters: obj.param_list("parameters")?,
            }),
            "ErrorDefinition" => NodeKind::Error(ErrorDefinition {
                name: obj.required_str("name")?,
                parameters: obj.param_list("parameters")?,
            }),
            "ModifierDefinition" => NodeKind::Modifier(ModifierDefinition {
                name: obj.required_str("name")?,
                parameters: obj.param_list("parameters")?,
            }),
            "VariableDeclaration" => NodeKind::Variable(VariableDeclaration {
                name: obj.str("name").unwrap_or_default(),
                visibility: obj.parse("visibility")?,
                mutability: obj.parse("mutability")?,
                state_variable: obj.flag("stateVariable"),
                type_name: obj.type_name(),
                type_string: type_string(fields),
            }),
            _ => NodeKind::Other,
        };

        let mut children = Vec::new();
        for field in fields.values() {
            collect_children(field, &mut children)?;
        }
        // Compiler JSON sorts object keys alphabetically; source offsets
        // restore declaration order across fields.
        children.sort_by_key(|c| c.src_start.unwrap_or(usize::MAX));

        Ok(Node {
            node_type,
            src_start: obj.str("src").and_then(source_start),
            fields,
            documentation: documentation_text(fields),
            children,
            kind,
        })
    }

    /// The raw `nodeType` discriminant, e.g. `FunctionDefinition`.
    pub fn node_type(&self) -> &'a str {
        self.node_type
    }

    /// The node's own JSON fields, verbatim.
    pub fn fields(&self) -> &'a Map<String, Value> {
        self.fields
    }

    /// Raw attached doc-comment text, if any.
    pub fn documentation(&self) -> Option<&'a str> {
        self.documentation
    }

    /// Direct child nodes in source order.
    pub fn children(&self) -> &[Node<'a>] {
        &self.children
    }

    /// The declaration kind, or `None` for source units and structural nodes.
    pub fn decl_kind(&self) -> Option<DeclKind> {
        match self.kind {
            NodeKind::Contract(_) => Some(DeclKind::Contract),
            NodeKind::Function(_) => Some(DeclKind::Function),
            NodeKind::Event(_) => Some(DeclKind::Event),
            NodeKind::Error(_) => Some(DeclKind::Error),
            NodeKind::Modifier(_) => Some(DeclKind::Modifier),
            NodeKind::Variable(_) => Some(DeclKind::Variable),
            NodeKind::SourceUnit | NodeKind::Other => None,
        }
    }

    /// The declared name; structural nodes fall back to a raw `name` string.
    pub fn declared_name(&self) -> Option<&'a str> {
        match &self.kind {
            NodeKind::Contract(c) => Some(c.name),
            NodeKind::Function(f) => Some(f.name),
            NodeKind::Event(e) => Some(e.name),
            NodeKind::Error(e) => Some(e.name),
            NodeKind::Modifier(m) => Some(m.name),
            NodeKind::Variable(v) => Some(v.name),
            NodeKind::SourceUnit | NodeKind::Other => {
                self.fields.get("name").and_then(Value::as_str)
            }
        }
    }

    /// True for variables declared at contract (or file) scope.
    pub fn is_state_variable(&self) -> bool {
        matches!(&self.kind, NodeKind::Variable(v) if v.state_variable)
    }
}

fn collect_children<'a>(value: &'a Value, out: &mut Vec<Node<'a>>) -> AstResult<()> {
    match value {
        Value::Object(map) if map.get("nodeType").is_some_and(Value::is_string) => {
            out.push(Node::from_json(value)?);
        }
        Value::Object(map) => {
            for v in map.values() {
                collect_children(v, out)?;
            }
        }
        Value::Array(items) => {
            for v in items {
                collect_children(v, out)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// `documentation` is a plain string in older compilers and a
/// `StructuredDocumentation` node in newer ones.
fn documentation_text(fields: &Map<String, Value>) -> Option<&str> {
    match fields.get("documentation")? {
        Value::String(text) => Some(text),
        Value::Object(doc) => doc.get("text").and_then(Value::as_str),
        _ => None,
    }
}

fn type_string(fields: &Map<String, Value>) -> Option<&str> {
    fields
        .get("typeDescriptions")?
        .get("typeString")?
        .as_str()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Typed field access on one node's JSON object.
struct Obj<'a> {
    node_type: &'a str,
    fields: &'a Map<String, Value>,
}

impl<'a> Obj<'a> {
    fn str(&self, field: &str) -> Option<&'a str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    fn required_str(&self, field: &'static str) -> AstResult<&'a str> {
        self.str(field).ok_or_else(|| AstError::MissingField {
            node_type: self.node_type.to_string(),
            field,
        })
    }

    fn flag(&self, field: &str) -> bool {
        self.fields
            .get(field)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Deserialize an optional field; `null` and missing both mean unset.
    fn parse<T: Deserialize<'a>>(&self, field: &'static str) -> AstResult<Option<T>> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::deserialize(value)
                .map(Some)
                .map_err(|source| AstError::InvalidField {
                    node_type: self.node_type.to_string(),
                    field,
                    source,
                }),
        }
    }

    fn param_list(&self, field: &'static str) -> AstResult<Vec<Param<'a>>> {
        let Some(params) = self
            .fields
            .get(field)
            .and_then(|list| list.get("parameters"))
            .and_then(Value::as_array)
        else {
            return Ok(Vec::new());
        };
        params
            .iter()
            .map(|p| {
                let decl = p.as_object().ok_or(AstError::NotAnObject {
                    found: json_kind(p),
                })?;
                Ok(Param {
                    name: decl.get("name").and_then(Value::as_str).unwrap_or_default(),
                    type_string: type_string(decl).or_else(|| {
                        decl.get("typeName")
                            .and_then(Value::as_object)
                            .and_then(type_string)
                    }),
                })
            })
            .collect()
    }

    fn modifier_names(&self) -> Vec<&'a str> {
        self.fields
            .get("modifiers")
            .and_then(Value::as_array)
            .map(|mods| {
                mods.iter()
                    .filter_map(|m| m.get("modifierName")?.get("name")?.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn type_name(&self) -> Option<TypeName<'a>> {
        let type_name = self.fields.get("typeName")?.as_object()?;
        match type_name.get("nodeType").and_then(Value::as_str) {
            Some("ElementaryTypeName") => Some(TypeName::Elementary {
                name: type_name.get("name").and_then(Value::as_str)?,
            }),
            _ => Some(TypeName::Composite {
                type_string: type_string(type_name),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn source_start_reads_the_offset() {
        assert_eq!(source_start("12:34:0"), Some(12));
        assert_eq!(source_start("7:3"), Some(7));
        assert_eq!(source_start("garbage"), None);
    }

    #[test]
    fn function_fields_are_typed() {
        let ast = json!({
            "nodeType": "FunctionDefinition",
            "name": "transfer",
            "kind": "function",
            "visibility": "external",
            "stateMutability": "nonpayable",
            "virtual": true,
            "modifiers": [
                { "nodeType": "ModifierInvocation", "src": "50:9:0",
                  "modifierName": { "nodeType": "IdentifierPath", "name": "onlyOwner" } }
            ],
            "parameters": { "nodeType": "ParameterList", "src": "20:30:0", "parameters": [
                { "nodeType": "VariableDeclaration", "name": "to", "src": "21:10:0",
                  "typeDescriptions": { "typeString": "address" } },
                { "nodeType": "VariableDeclaration", "name": "amount", "src": "33:14:0",
                  "typeDescriptions": { "typeString": "uint256" } }
            ]},
            "returnParameters": { "nodeType": "ParameterList", "src": "60:0:0", "parameters": [] },
            "src": "0:100:0"
        });
        let node = Node::from_json(&ast).unwrap();
        let NodeKind::Function(f) = &node.kind else {
            panic!("expected a function, got {:?}", node.kind);
        };
        assert_eq!(f.name, "transfer");
        assert_eq!(f.visibility, Some(Visibility::External));
        assert_eq!(f.state_mutability, Some(StateMutability::Nonpayable));
        assert!(f.is_virtual);
        assert_eq!(f.modifiers, vec!["onlyOwner"]);
        assert_eq!(f.parameters.len(), 2);
        assert_eq!(f.parameters[1].type_string, Some("uint256"));
        assert!(f.return_parameters.is_empty());
    }

    #[test]
    fn children_follow_source_order_not_key_order() {
        // "body" sorts before "parameters" alphabetically but comes later in source.
        let ast = json!({
            "nodeType": "FunctionDefinition",
            "name": "f",
            "body": { "nodeType": "Block", "src": "40:10:0", "statements": [] },
            "parameters": { "nodeType": "ParameterList", "src": "10:2:0", "parameters": [] },
            "src": "0:60:0"
        });
        let node = Node::from_json(&ast).unwrap();
        let types: Vec<_> = node.children().iter().map(|c| c.node_type()).collect();
        assert_eq!(types, vec!["ParameterList", "Block"]);
    }

    #[test]
    fn structured_and_plain_documentation() {
        let structured = json!({
            "nodeType": "ContractDefinition", "name": "A",
            "documentation": { "nodeType": "StructuredDocumentation", "text": "@title A" }
        });
        let plain =
            json!({ "nodeType": "ContractDefinition", "name": "B", "documentation": "@title B" });
        assert_eq!(Node::from_json(&structured).unwrap().documentation(), Some("@title A"));
        assert_eq!(Node::from_json(&plain).unwrap().documentation(), Some("@title B"));
    }

    #[test]
    fn variable_type_name_variants() {
        let elementary = json!({
            "nodeType": "VariableDeclaration", "name": "x", "stateVariable": true,
            "mutability": "constant",
            "typeName": { "nodeType": "ElementaryTypeName", "name": "uint256",
                          "typeDescriptions": { "typeString": "uint256" } }
        });
        let node = Node::from_json(&elementary).unwrap();
        let NodeKind::Variable(v) = &node.kind else {
            panic!("expected a variable");
        };
        assert_eq!(v.mutability, Some(Mutability::Constant));
        assert_eq!(
            v.type_name,
            Some(TypeName::Elementary { name: "uint256" })
        );
        assert!(node.is_state_variable());

        let untyped = json!({ "nodeType": "VariableDeclaration", "name": "y" });
        let node = Node::from_json(&untyped).unwrap();
        let NodeKind::Variable(v) = &node.kind else {
            panic!("expected a variable");
        };
        assert_eq!(v.type_name, None);
        assert!(!node.is_state_variable());
    }

    #[test]
    fn missing_node_type_is_an_error() {
        let err = Node::from_json(&json!({ "name": "x" })).unwrap_err();
        assert!(matches!(err, AstError::MissingNodeType));
    }

    #[test]
    fn invalid_visibility_names_the_field() {
        let ast =
            json!({ "nodeType": "FunctionDefinition", "name": "f", "visibility": "everyone" });
        let err = Node::from_json(&ast).unwrap_err();
        assert!(matches!(err, AstError::InvalidField { field: "visibility", .. }));
    }

    #[test]
    fn unexpected_contract_kind_does_not_fail_the_load() {
        let ast =
            json!({ "nodeType": "ContractDefinition", "name": "C", "contractKind": "module" });
        let node = Node::from_json(&ast).unwrap();
        assert_eq!(node.declared_name(), Some("C"));
    }

    #[test]
    fn unknown_node_types_are_structural() {
        let ast = json!({ "nodeType": "StructDefinition", "name": "Point" });
        let node = Node::from_json(&ast).unwrap();
        assert!(matches!(node.kind, NodeKind::Other));
        assert_eq!(node.decl_kind(), None);
        assert_eq!(node.declared_name(), Some("Point"));
    }
}
