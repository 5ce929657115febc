//! Descendant search over a node's subtree.

use crate::model::{DeclKind, Node};

/// All descendants of `node` (not `node` itself) with the given declaration
/// kind, in source order. Nested scopes are searched too.
pub fn find_all<'n, 'a>(node: &'n Node<'a>, kind: DeclKind) -> Vec<&'n Node<'a>> {
    find_matching(node, |n| n.decl_kind() == Some(kind))
}

/// Pre-order search with an arbitrary predicate.
pub fn find_matching<'n, 'a, F>(node: &'n Node<'a>, pred: F) -> Vec<&'n Node<'a>>
where
    F: Fn(&Node<'a>) -> bool,
{
    let mut found = Vec::new();
    walk(node, &pred, &mut found);
    found
}

/// Variables declared at contract or file scope; locals and parameters are
/// skipped.
pub fn state_variables<'n, 'a>(node: &'n Node<'a>) -> Vec<&'n Node<'a>> {
    find_matching(node, Node::is_state_variable)
}

/// Whether any descendant matches, stopping at the first hit.
pub fn any_descendant<'a, F>(node: &Node<'a>, pred: F) -> bool
where
    F: Fn(&Node<'a>) -> bool,
{
    fn go<'a, F: Fn(&Node<'a>) -> bool>(node: &Node<'a>, pred: &F) -> bool {
        node.children().iter().any(|c| pred(c) || go(c, pred))
    }
    go(node, &pred)
}

fn walk<'n, 'a, F>(node: &'n Node<'a>, pred: &F, found: &mut Vec<&'n Node<'a>>)
where
    F: Fn(&Node<'a>) -> bool,
{
    for child in node.children() {
        if pred(child) {
            found.push(child);
        }
        walk(child, pred, found);
    }
}
