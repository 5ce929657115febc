//! soldoc: documentation view-models from Solidity compiler syntax trees.
//!
//! Load the compiler's JSON AST ([`input`]), build the declaration tree
//! ([`model`]), and [`decorate`](decorate::decorate) nodes with the derived
//! properties in [`accessors::REGISTRY`]. The resulting records are what a
//! template engine renders; [`site`] groups them into pages.

pub mod accessors;
pub mod anchor;
pub mod collect;
pub mod decorate;
pub mod error;
pub mod input;
pub mod model;
pub mod natspec;
pub mod params;
pub mod render;
pub mod site;

pub use decorate::{decorate, AugmentedRecord};
pub use error::{AstError, DecorateError, SiteError};
pub use model::Node;
pub use natspec::NatSpec;
