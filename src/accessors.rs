//! Derived properties of declaration nodes.
//!
//! Every accessor is total over [`NodeKind`]: variants it does not model get
//! `None`. [`REGISTRY`] is the closed table the decorator iterates; the typed
//! functions below are what it wraps.

use crate::anchor::item_anchor;
use crate::collect::{any_descendant, find_all, find_matching, state_variables};
use crate::decorate::{decorate, AugmentedRecord};
use crate::error::DecorateError;
use crate::model::{
    DeclKind, Mutability, Node, NodeKind, Param, StateMutability, TypeName, Visibility,
};
use crate::natspec::NatSpec;
use crate::params::{merge_params, merge_returns, resolved_type, ParamView};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::LazyLock;

/// Result of one accessor: `Ok(None)` means "not applicable".
pub type Derived = Result<Option<Value>, DecorateError>;

/// One entry of the registry.
pub struct Accessor {
    pub key: &'static str,
    pub derive: fn(&Node<'_>) -> Derived,
}

/// Every derived property, in the order it is added to a record.
pub static REGISTRY: &[Accessor] = &[
    Accessor { key: "type", derive: field_type },
    Accessor { key: "name", derive: field_name },
    Accessor { key: "visibility", derive: field_visibility },
    Accessor { key: "typeName", derive: field_type_name },
    Accessor { key: "stateMutability", derive: field_state_mutability },
    Accessor { key: "virtual", derive: field_virtual },
    Accessor { key: "modifierNames", derive: field_modifier_names },
    Accessor { key: "signature", derive: field_signature },
    Accessor { key: "params", derive: field_params },
    Accessor { key: "returns", derive: field_returns },
    Accessor { key: "natspec", derive: field_natspec },
    Accessor { key: "anchor", derive: field_anchor },
    Accessor { key: "functions", derive: field_functions },
    Accessor { key: "events", derive: field_events },
    Accessor { key: "modifiers", derive: field_modifiers },
    Accessor { key: "errors", derive: field_errors },
    Accessor { key: "variables", derive: field_variables },
    Accessor { key: "items", derive: field_items },
    Accessor { key: "publicExternalFunctions", derive: field_public_external_functions },
    Accessor { key: "publicVariables", derive: field_public_variables },
    Accessor { key: "hasPublicMembers", derive: field_has_public_members },
    Accessor { key: "notTest", derive: field_not_test },
];

static RE_KIND_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(Definition|Declaration)$").unwrap());

static RE_INNER_CAPITAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());

// -- Typed accessors ----------------------------------------------------------

/// `FunctionDefinition` → `Function`, `UserDefinedValueTypeDefinition` →
/// `User Defined Value Type`.
pub fn type_label(node: &Node<'_>) -> String {
    let stripped = RE_KIND_SUFFIX.replace(node.node_type(), "");
    RE_INNER_CAPITAL.replace_all(&stripped, "$1 $2").into_owned()
}

/// Display name. Constructors, fallbacks and receive functions have no
/// declared name and are shown by kind.
pub fn name<'a>(node: &Node<'a>) -> Option<&'a str> {
    match &node.kind {
        NodeKind::Function(f) if f.name.is_empty() => Some(f.kind.as_str()),
        _ => node.declared_name(),
    }
}

pub fn visibility(node: &Node<'_>) -> Option<Visibility> {
    match &node.kind {
        NodeKind::Function(f) => f.visibility,
        NodeKind::Variable(v) => v.visibility,
        _ => None,
    }
}

/// Bare elementary type name, else the resolved type string.
pub fn type_name<'a>(node: &Node<'a>) -> Option<&'a str> {
    let NodeKind::Variable(v) = &node.kind else {
        return None;
    };
    match v.type_name.as_ref()? {
        TypeName::Elementary { name } => Some(*name),
        TypeName::Composite { type_string } => type_string.or(v.type_string),
    }
}

/// Declared mutability, suppressed when it is the default.
pub fn state_mutability(node: &Node<'_>) -> Option<&'static str> {
    match &node.kind {
        NodeKind::Function(f) => f
            .state_mutability
            .filter(|m| *m != StateMutability::Nonpayable)
            .map(StateMutability::as_str),
        NodeKind::Variable(v) => v
            .mutability
            .filter(|m| *m != Mutability::Mutable)
            .map(Mutability::as_str),
        _ => None,
    }
}

pub fn virtual_flag(node: &Node<'_>) -> Option<&'static str> {
    match &node.kind {
        NodeKind::Function(f) if f.is_virtual => Some("virtual"),
        _ => None,
    }
}

pub fn modifier_names(node: &Node<'_>) -> Option<String> {
    match &node.kind {
        NodeKind::Function(f) if !f.modifiers.is_empty() => Some(f.modifiers.join(", ")),
        _ => None,
    }
}

/// `name(type1,type2,...)` for functions and events.
pub fn signature(node: &Node<'_>) -> Result<Option<String>, DecorateError> {
    let params = match &node.kind {
        NodeKind::Function(f) => &f.parameters,
        NodeKind::Event(e) => &e.parameters,
        _ => return Ok(None),
    };
    let name = name(node).unwrap_or_default();
    let types = params
        .iter()
        .map(|p| resolved_type(name, p))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(format!("{}({})", name, types.join(","))))
}

fn formal_params<'n, 'a>(node: &'n Node<'a>) -> Option<&'n [Param<'a>]> {
    match &node.kind {
        NodeKind::Function(f) => Some(f.parameters.as_slice()),
        NodeKind::Event(e) => Some(e.parameters.as_slice()),
        NodeKind::Error(e) => Some(e.parameters.as_slice()),
        NodeKind::Modifier(m) => Some(m.parameters.as_slice()),
        _ => None,
    }
}

/// Formal parameters with their `@param` descriptions.
pub fn params(node: &Node<'_>) -> Result<Option<Vec<ParamView>>, DecorateError> {
    let Some(list) = formal_params(node) else {
        return Ok(None);
    };
    let natspec = NatSpec::of(node);
    merge_params(name(node).unwrap_or_default(), list, &natspec.params).map(Some)
}

/// Return parameters with their `@return` descriptions.
pub fn returns(node: &Node<'_>) -> Result<Option<Vec<ParamView>>, DecorateError> {
    let NodeKind::Function(f) = &node.kind else {
        return Ok(None);
    };
    let natspec = NatSpec::of(node);
    let owner = name(node).unwrap_or_default();
    merge_returns(owner, &f.return_parameters, &natspec.returns).map(Some)
}

pub fn anchor(node: &Node<'_>) -> Result<Option<String>, DecorateError> {
    let ident = match signature(node)? {
        Some(sig) => sig,
        None => match name(node) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => return Ok(None),
        },
    };
    Ok(Some(item_anchor(&type_label(node), &ident)))
}

/// Functions, events, errors, modifiers and state variables below `node`.
pub fn documentable_items<'n, 'a>(node: &'n Node<'a>) -> Vec<&'n Node<'a>> {
    find_matching(node, |n| match n.decl_kind() {
        Some(DeclKind::Function | DeclKind::Event | DeclKind::Error | DeclKind::Modifier) => true,
        Some(DeclKind::Variable) => n.is_state_variable(),
        Some(DeclKind::Contract) | None => false,
    })
}

pub fn public_external_functions<'n, 'a>(node: &'n Node<'a>) -> Vec<&'n Node<'a>> {
    find_matching(node, is_public_function)
}

pub fn public_variables<'n, 'a>(node: &'n Node<'a>) -> Vec<&'n Node<'a>> {
    find_matching(node, is_public_state_variable)
}

/// Public state variable, then any event, then public/external function;
/// the first hit wins.
pub fn has_public_members(node: &Node<'_>) -> bool {
    any_descendant(node, is_public_state_variable)
        || any_descendant(node, |n| n.decl_kind() == Some(DeclKind::Event))
        || any_descendant(node, is_public_function)
}

/// False for contracts named like test scaffolding: `Test`/`Mock` as a
/// prefix or suffix. `TokenTestable` is not scaffolding.
pub fn not_test(node: &Node<'_>) -> bool {
    let NodeKind::Contract(c) = &node.kind else {
        return true;
    };
    !["Test", "Mock"]
        .iter()
        .any(|marker| c.name.starts_with(marker) || c.name.ends_with(marker))
}

fn is_public_function(node: &Node<'_>) -> bool {
    matches!(
        &node.kind,
        NodeKind::Function(f) if f.visibility.is_some_and(Visibility::is_public_api)
    )
}

fn is_public_state_variable(node: &Node<'_>) -> bool {
    matches!(
        &node.kind,
        NodeKind::Variable(v) if v.state_variable && v.visibility == Some(Visibility::Public)
    )
}

// -- Registry adapters --------------------------------------------------------

fn json<T: Serialize>(key: &'static str, value: Option<T>) -> Derived {
    value
        .map(|v| serde_json::to_value(v).map_err(|source| DecorateError::Serialize { key, source }))
        .transpose()
}

fn records(key: &'static str, nodes: Vec<&Node<'_>>) -> Derived {
    let records = nodes
        .into_iter()
        .map(decorate)
        .collect::<Result<Vec<AugmentedRecord>, _>>()?;
    json(key, Some(records))
}

fn field_type(node: &Node<'_>) -> Derived {
    json("type", Some(type_label(node)))
}

fn field_name(node: &Node<'_>) -> Derived {
    json("name", name(node))
}

fn field_visibility(node: &Node<'_>) -> Derived {
    json("visibility", visibility(node).map(Visibility::as_str))
}

fn field_type_name(node: &Node<'_>) -> Derived {
    json("typeName", type_name(node))
}

fn field_state_mutability(node: &Node<'_>) -> Derived {
    json("stateMutability", state_mutability(node))
}

fn field_virtual(node: &Node<'_>) -> Derived {
    json("virtual", virtual_flag(node))
}

fn field_modifier_names(node: &Node<'_>) -> Derived {
    json("modifierNames", modifier_names(node))
}

fn field_signature(node: &Node<'_>) -> Derived {
    json("signature", signature(node)?)
}

fn field_params(node: &Node<'_>) -> Derived {
    json("params", params(node)?)
}

fn field_returns(node: &Node<'_>) -> Derived {
    json("returns", returns(node)?)
}

fn field_natspec(node: &Node<'_>) -> Derived {
    json("natspec", Some(NatSpec::of(node)))
}

fn field_anchor(node: &Node<'_>) -> Derived {
    json("anchor", anchor(node)?)
}

fn field_functions(node: &Node<'_>) -> Derived {
    records("functions", find_all(node, DeclKind::Function))
}

fn field_events(node: &Node<'_>) -> Derived {
    records("events", find_all(node, DeclKind::Event))
}

fn field_modifiers(node: &Node<'_>) -> Derived {
    records("modifiers", find_all(node, DeclKind::Modifier))
}

fn field_errors(node: &Node<'_>) -> Derived {
    records("errors", find_all(node, DeclKind::Error))
}

fn field_variables(node: &Node<'_>) -> Derived {
    records("variables", state_variables(node))
}

fn field_items(node: &Node<'_>) -> Derived {
    records("items", documentable_items(node))
}

fn field_public_external_functions(node: &Node<'_>) -> Derived {
    records("publicExternalFunctions", public_external_functions(node))
}

fn field_public_variables(node: &Node<'_>) -> Derived {
    records("publicVariables", public_variables(node))
}

fn field_has_public_members(node: &Node<'_>) -> Derived {
    json("hasPublicMembers", Some(has_public_members(node)))
}

fn field_not_test(node: &Node<'_>) -> Derived {
    json("notTest", Some(not_test(node)))
}
