//! First-class identity types for the lattice front end.
//!
//! These types provide type-safe identifiers for arena entities, definition
//! contexts, and source files, eliminating raw-index mix-ups between the
//! different tables that make up a compilation session.

mod entities;
mod span;

pub use entities::{ContextId, EntityId, FileId};
pub use span::{Location, Span};
