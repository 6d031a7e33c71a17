//! Operation, parameter, data-member, and constant factories.

use lattice_ast::{
    BuiltinKind, ConstDef, DataMember, Literal, NodeKind, Operation, OperationMode, Parameter,
};
use lattice_identity::EntityId;

use crate::errors::SemanticError;
use crate::ordinals::TagRef;
use crate::unit::Unit;

impl Unit {
    // ===== Operations =====

    pub fn create_operation(
        &mut self,
        name: &str,
        return_type: Option<EntityId>,
        return_tag: Option<TagRef>,
        mode: OperationMode,
    ) -> EntityId {
        let parent = self.current_container();
        let return_tag = return_tag.map(|r| self.resolve_tag(&r));
        let kind = NodeKind::Operation(Operation {
            return_type,
            return_tag,
            mode,
        });
        if !self.check_fresh_name(name, "operation") {
            return self.placeholder_entity(parent, name, kind, true);
        }
        let id = self.new_entity(parent, name, kind, true);
        self.check_introduced(name, id);
        id
    }

    // ===== Parameters =====

    /// Create a parameter in the current (operation) container. Required
    /// parameters must all precede tagged ones in wire order.
    pub fn create_parameter(
        &mut self,
        name: &str,
        ty: EntityId,
        tag: Option<TagRef>,
        is_out: bool,
    ) -> EntityId {
        let parent = self.current_container();
        let tag = tag.map(|r| self.resolve_tag(&r));
        match tag {
            Some(t) => self.check_duplicate_tag(parent, t),
            None => self.check_parameter_order(parent, name),
        }
        let kind = NodeKind::Parameter(Parameter { ty, tag, is_out });
        if !self.check_fresh_name(name, "parameter") {
            return self.placeholder_entity(parent, name, kind, false);
        }
        let id = self.new_entity(parent, name, kind, false);
        self.check_introduced(name, id);
        id
    }

    // ===== Data members =====

    pub fn create_data_member(
        &mut self,
        name: &str,
        ty: EntityId,
        tag: Option<TagRef>,
        default: Option<Literal>,
    ) -> EntityId {
        let parent = self.current_container();
        let tag = tag.map(|r| self.resolve_tag(&r));
        if let Some(t) = tag {
            self.check_duplicate_tag(parent, t);
        }
        let kind = NodeKind::DataMember(DataMember { ty, tag, default });

        // A struct may not contain itself, directly or through members. The
        // offending member stays out of the tree so wire-size queries remain
        // well-founded.
        if matches!(self.ast.node(parent).kind, NodeKind::Struct)
            && self.struct_contains(ty, parent)
        {
            let name_owned = self.ast.node(parent).name().to_string();
            self.error(SemanticError::SelfContainingStruct {
                name: name_owned,
                span: self.current_location().span.into(),
            });
            return self.placeholder_entity(parent, name, kind, false);
        }

        if !self.check_fresh_name(name, "data member") {
            return self.placeholder_entity(parent, name, kind, false);
        }
        let id = self.new_entity(parent, name, kind, false);
        self.check_introduced(name, id);
        id
    }

    /// True when `ty` is `needle` or a struct that reaches `needle` through
    /// its members.
    fn struct_contains(&self, ty: EntityId, needle: EntityId) -> bool {
        if ty == needle {
            return true;
        }
        if !matches!(self.ast.node(ty).kind, NodeKind::Struct) {
            return false;
        }
        self.ast.children(ty).iter().any(|&m| {
            self.ast
                .node(m)
                .as_data_member()
                .is_some_and(|member| self.struct_contains(member.ty, needle))
        })
    }

    /// Tags must be unique among the sibling members/parameters of one scope.
    /// Sentinel tags from failed resolution (negative) are skipped.
    fn check_duplicate_tag(&mut self, parent: EntityId, tag: i32) {
        if tag < 0 {
            return;
        }
        let duplicate = self.ast.children(parent).iter().any(|&c| {
            let node = self.ast.node(c);
            node.as_parameter().and_then(|p| p.tag) == Some(tag)
                || node.as_data_member().and_then(|m| m.tag) == Some(tag)
        });
        if duplicate {
            self.error(SemanticError::DuplicateTag {
                tag,
                span: self.current_location().span.into(),
            });
        }
    }

    /// A required parameter may not follow a tagged one; tagged parameters
    /// are marshaled after all required ones.
    fn check_parameter_order(&mut self, parent: EntityId, name: &str) {
        let after_tagged = self.ast.children(parent).iter().any(|&c| {
            self.ast
                .node(c)
                .as_parameter()
                .is_some_and(|p| p.tag.is_some())
        });
        if after_tagged {
            self.error(SemanticError::RequiredAfterTagged {
                name: name.to_string(),
                span: self.current_location().span.into(),
            });
        }
    }

    // ===== Constants =====

    pub fn create_const(&mut self, name: &str, ty: EntityId, value: Literal) -> EntityId {
        let parent = self.current_container();
        self.check_module_scope("constant");

        if !self.const_value_compatible(ty, &value) {
            let type_name = self.type_display_name(ty);
            self.error(SemanticError::BadConstValue {
                name: name.to_string(),
                type_name,
                span: self.current_location().span.into(),
            });
        }

        let kind = NodeKind::Const(ConstDef { ty, value });
        if !self.check_fresh_name(name, "constant") {
            return self.placeholder_entity(parent, name, kind, false);
        }
        let id = self.new_entity(parent, name, kind, false);
        self.check_introduced(name, id);
        id
    }

    fn const_value_compatible(&self, ty: EntityId, value: &Literal) -> bool {
        match &self.ast.node(ty).kind {
            NodeKind::Builtin(kind) => match (kind, value) {
                (BuiltinKind::Bool, Literal::Bool(_)) => true,
                (BuiltinKind::String, Literal::String(_)) => true,
                (BuiltinKind::Byte, Literal::Int(v)) => (0..=255).contains(v),
                (BuiltinKind::Short, Literal::Int(v)) => {
                    (i64::from(i16::MIN)..=i64::from(i16::MAX)).contains(v)
                }
                (BuiltinKind::Int, Literal::Int(v)) => {
                    (i64::from(i32::MIN)..=i64::from(i32::MAX)).contains(v)
                }
                (BuiltinKind::Long, Literal::Int(_)) => true,
                (BuiltinKind::Float | BuiltinKind::Double, Literal::Float(_)) => true,
                (BuiltinKind::Float | BuiltinKind::Double, Literal::Int(_)) => true,
                _ => false,
            },
            NodeKind::Enum(_) => match value {
                // The enumerator must belong to the constant's enum type.
                Literal::Enumerator(e) => self
                    .ast
                    .node(*e)
                    .contained
                    .as_ref()
                    .is_some_and(|c| c.parent == ty),
                _ => false,
            },
            _ => false,
        }
    }
}
