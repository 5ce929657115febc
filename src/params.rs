//! Join formal parameter lists with their NatSpec descriptions.

use crate::error::DecorateError;
use crate::model::Param;
use serde::Serialize;
use std::collections::BTreeMap;

/// One parameter as the renderer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamView {
    /// Empty for unnamed parameters.
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub natspec: Option<String>,
}

/// Merge `@param` descriptions into `params` by exact name.
pub fn merge_params(
    owner: &str,
    params: &[Param<'_>],
    docs: &BTreeMap<String, String>,
) -> Result<Vec<ParamView>, DecorateError> {
    merge_with(owner, params, |_, p| docs.get(p.name))
}

/// Merge `@return` descriptions into return parameters: by name first, then
/// by position for unnamed slots or docs that did not repeat the name.
pub fn merge_returns(
    owner: &str,
    params: &[Param<'_>],
    docs: &BTreeMap<String, String>,
) -> Result<Vec<ParamView>, DecorateError> {
    merge_with(owner, params, |i, p| {
        let by_name = if p.name.is_empty() {
            None
        } else {
            docs.get(p.name)
        };
        by_name.or_else(|| docs.get(&i.to_string()))
    })
}

/// The compiler-resolved type of a parameter; its absence breaks the
/// type-checked-tree contract.
pub fn resolved_type<'a>(owner: &str, param: &Param<'a>) -> Result<&'a str, DecorateError> {
    param
        .type_string
        .ok_or_else(|| DecorateError::UnresolvedType {
            owner: owner.to_string(),
            param: if param.name.is_empty() {
                "<unnamed>".to_string()
            } else {
                param.name.to_string()
            },
        })
}

fn merge_with<'d, F>(
    owner: &str,
    params: &[Param<'_>],
    lookup: F,
) -> Result<Vec<ParamView>, DecorateError>
where
    F: Fn(usize, &Param<'_>) -> Option<&'d String>,
{
    params
        .iter()
        .enumerate()
        .map(|(i, p)| {
            Ok(ParamView {
                name: p.name.to_string(),
                type_name: resolved_type(owner, p)?.to_string(),
                natspec: lookup(i, p).cloned(),
            })
        })
        .collect()
}
