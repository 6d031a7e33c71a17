//! The lattice entity arena: node kinds, capability structs, builtin types,
//! metadata, and the visitor interface consumed by backend generators.
//!
//! The whole tree lives in one arena addressed by `EntityId`. Parent and
//! child links are plain ids, so teardown is dropping the arena; there is no
//! cycle-breaking pass.

mod arena;
mod builtin;
mod context;
mod metadata;
mod node;
mod types;
mod visitor;

pub use arena::Ast;
pub use builtin::BuiltinKind;
pub use context::{DefinitionContext, WarningCategory};
pub use metadata::{Metadata, LANGUAGE_PREFIXES};
pub use node::{
    ClassDecl, ClassDef, ConstDef, Contained, DataMember, Dictionary, EnumDef, Enumerator,
    ExceptionDef, InterfaceDecl, InterfaceDef, Literal, Node, NodeKind, Operation, OperationMode,
    Parameter, Scope, Sequence,
};
pub use types::{is_legal_dictionary_key, is_variable_length, min_wire_size, optional_format, uses_classes, OptionalFormat};
pub use visitor::Visitor;
