//! Semantic construction of lattice definition units.
//!
//! A [`Unit`] is driven by an external parser: scopes are pushed and popped,
//! `create_*` factories build entities, and every semantic check accumulates
//! diagnostics instead of failing fast. A second pass, the metadata
//! validator, prunes invalid annotations from the finished tree.

mod diagnostics;
mod errors;
mod factories;
mod inheritance;
mod lookup;
mod ordinals;
mod unit;
mod validator;

pub use diagnostics::{Diagnostics, RecordedError, RecordedWarning};
pub use errors::{SemanticError, SemanticWarning};
pub use ordinals::{TagRef, SENTINEL_TAG};
pub use unit::Unit;
pub use validator::{
    AppliesTo, ArgKind, DirectiveRegistry, DirectiveSpec, ExtraCheck, MetadataValidator, Placement,
};
