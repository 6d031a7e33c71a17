//! Type capability queries: minimum wire size, variable-length flag,
//! optional encoding format, class-ness, dictionary-key legality.
//!
//! These are pure functions over the arena; type nodes carry no mutable
//! state of their own.

use lattice_identity::EntityId;

use crate::arena::Ast;
use crate::node::NodeKind;

/// On-the-wire encoding selector for optional values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionalFormat {
    F1,
    F2,
    F4,
    F8,
    Size,
    VSize,
    FSize,
    Class,
}

/// Data members of a scope entity, in declaration order.
fn data_members(ast: &Ast, id: EntityId) -> impl Iterator<Item = EntityId> + '_ {
    ast.children(id)
        .iter()
        .copied()
        .filter(|&c| ast.node(c).as_data_member().is_some())
}

/// Minimum number of bytes a value of this type occupies on the wire.
pub fn min_wire_size(ast: &Ast, id: EntityId) -> u32 {
    match &ast.node(id).kind {
        NodeKind::Builtin(kind) => kind.min_wire_size(),
        // Encoded as a size.
        NodeKind::Enum(_) => 1,
        NodeKind::Struct => data_members(ast, id)
            .map(|m| {
                let member = ast.node(m).as_data_member().expect("filtered");
                min_wire_size(ast, member.ty)
            })
            .sum(),
        // Empty sequence or dictionary: one size byte.
        NodeKind::Sequence(_) | NodeKind::Dictionary(_) => 1,
        // Nil instance marker.
        NodeKind::ClassDecl(_) | NodeKind::ClassDef(_) => 1,
        // Nil proxy.
        NodeKind::InterfaceDecl(_) | NodeKind::InterfaceDef(_) => 2,
        _ => 0,
    }
}

pub fn is_variable_length(ast: &Ast, id: EntityId) -> bool {
    match &ast.node(id).kind {
        NodeKind::Builtin(kind) => kind.is_variable_length(),
        NodeKind::Enum(_)
        | NodeKind::Sequence(_)
        | NodeKind::Dictionary(_)
        | NodeKind::ClassDecl(_)
        | NodeKind::ClassDef(_)
        | NodeKind::InterfaceDecl(_)
        | NodeKind::InterfaceDef(_) => true,
        NodeKind::Struct => data_members(ast, id).any(|m| {
            let member = ast.node(m).as_data_member().expect("filtered");
            is_variable_length(ast, member.ty)
        }),
        _ => false,
    }
}

/// Whether values of this type are, or may transitively contain, class
/// instances.
pub fn uses_classes(ast: &Ast, id: EntityId) -> bool {
    let mut visiting = Vec::new();
    uses_classes_inner(ast, id, &mut visiting)
}

fn uses_classes_inner(ast: &Ast, id: EntityId, visiting: &mut Vec<EntityId>) -> bool {
    if visiting.contains(&id) {
        return false;
    }
    match &ast.node(id).kind {
        NodeKind::Builtin(kind) => kind.uses_classes(),
        NodeKind::ClassDecl(_) | NodeKind::ClassDef(_) => true,
        NodeKind::Sequence(seq) => {
            visiting.push(id);
            let r = uses_classes_inner(ast, seq.element, visiting);
            visiting.pop();
            r
        }
        NodeKind::Dictionary(dict) => {
            visiting.push(id);
            let r = uses_classes_inner(ast, dict.value, visiting);
            visiting.pop();
            r
        }
        NodeKind::Struct => {
            visiting.push(id);
            let r = data_members(ast, id).any(|m| {
                let member = ast.node(m).as_data_member().expect("filtered");
                uses_classes_inner(ast, member.ty, visiting)
            });
            visiting.pop();
            r
        }
        _ => false,
    }
}

pub fn optional_format(ast: &Ast, id: EntityId) -> OptionalFormat {
    match &ast.node(id).kind {
        NodeKind::Builtin(kind) => kind.optional_format(),
        NodeKind::Enum(_) => OptionalFormat::Size,
        NodeKind::Struct => {
            if is_variable_length(ast, id) {
                OptionalFormat::FSize
            } else {
                OptionalFormat::VSize
            }
        }
        // A sequence or dictionary of fixed-size content has a computable
        // byte count; variable content forces a fixed-size length prefix.
        NodeKind::Sequence(seq) => {
            if is_variable_length(ast, seq.element) {
                OptionalFormat::FSize
            } else {
                OptionalFormat::VSize
            }
        }
        NodeKind::Dictionary(dict) => {
            if is_variable_length(ast, dict.key) || is_variable_length(ast, dict.value) {
                OptionalFormat::FSize
            } else {
                OptionalFormat::VSize
            }
        }
        NodeKind::ClassDecl(_) | NodeKind::ClassDef(_) => OptionalFormat::Class,
        NodeKind::InterfaceDecl(_) | NodeKind::InterfaceDef(_) => OptionalFormat::FSize,
        _ => OptionalFormat::F1,
    }
}

/// Dictionary keys must be integral, boolean, string, enum, or a struct
/// composed recursively of legal key types.
pub fn is_legal_dictionary_key(ast: &Ast, id: EntityId) -> bool {
    match &ast.node(id).kind {
        NodeKind::Builtin(kind) => {
            kind.is_integral() || matches!(kind, crate::BuiltinKind::Bool | crate::BuiltinKind::String)
        }
        NodeKind::Enum(_) => true,
        NodeKind::Struct => data_members(ast, id).all(|m| {
            let member = ast.node(m).as_data_member().expect("filtered");
            is_legal_dictionary_key(ast, member.ty)
        }),
        _ => false,
    }
}
