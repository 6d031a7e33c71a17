//! Read-only traversal of the finished tree, consumed by backend code
//! generators.
//!
//! Traversal is depth-first in declaration order. Every hook is a default
//! no-op; `visit_included_contexts` gates descent into entities that came
//! from included files.

use lattice_identity::EntityId;

use crate::arena::Ast;
use crate::node::NodeKind;

#[allow(unused_variables)]
pub trait Visitor {
    /// Return true to also visit entities defined in included files.
    fn visit_included_contexts(&self) -> bool {
        false
    }

    fn visit_unit_start(&mut self, ast: &Ast) {}
    fn visit_unit_end(&mut self, ast: &Ast) {}

    /// Start hooks return false to skip the entity's children.
    fn visit_module_start(&mut self, ast: &Ast, id: EntityId) -> bool {
        true
    }
    fn visit_module_end(&mut self, ast: &Ast, id: EntityId) {}

    fn visit_class_decl(&mut self, ast: &Ast, id: EntityId) {}
    fn visit_class_def_start(&mut self, ast: &Ast, id: EntityId) -> bool {
        true
    }
    fn visit_class_def_end(&mut self, ast: &Ast, id: EntityId) {}

    fn visit_interface_decl(&mut self, ast: &Ast, id: EntityId) {}
    fn visit_interface_def_start(&mut self, ast: &Ast, id: EntityId) -> bool {
        true
    }
    fn visit_interface_def_end(&mut self, ast: &Ast, id: EntityId) {}

    fn visit_exception_start(&mut self, ast: &Ast, id: EntityId) -> bool {
        true
    }
    fn visit_exception_end(&mut self, ast: &Ast, id: EntityId) {}

    fn visit_struct_start(&mut self, ast: &Ast, id: EntityId) -> bool {
        true
    }
    fn visit_struct_end(&mut self, ast: &Ast, id: EntityId) {}

    fn visit_operation_start(&mut self, ast: &Ast, id: EntityId) -> bool {
        true
    }
    fn visit_operation_end(&mut self, ast: &Ast, id: EntityId) {}

    fn visit_enum_start(&mut self, ast: &Ast, id: EntityId) -> bool {
        true
    }
    fn visit_enum_end(&mut self, ast: &Ast, id: EntityId) {}

    fn visit_sequence(&mut self, ast: &Ast, id: EntityId) {}
    fn visit_dictionary(&mut self, ast: &Ast, id: EntityId) {}
    fn visit_enumerator(&mut self, ast: &Ast, id: EntityId) {}
    fn visit_const(&mut self, ast: &Ast, id: EntityId) {}
    fn visit_parameter(&mut self, ast: &Ast, id: EntityId) {}
    fn visit_data_member(&mut self, ast: &Ast, id: EntityId) {}
}

impl Ast {
    /// Walk the whole tree with `visitor`, declaration order, depth-first.
    pub fn visit(&self, visitor: &mut dyn Visitor) {
        visitor.visit_unit_start(self);
        for &child in self.children(EntityId::GLOBAL) {
            self.visit_entity(visitor, child);
        }
        visitor.visit_unit_end(self);
    }

    fn visit_entity(&self, visitor: &mut dyn Visitor, id: EntityId) {
        if !visitor.visit_included_contexts() {
            if let Some(contained) = &self.node(id).contained {
                if self.context(contained.context).included {
                    return;
                }
            }
        }

        match &self.node(id).kind {
            NodeKind::Module => {
                if visitor.visit_module_start(self, id) {
                    self.visit_children(visitor, id);
                }
                visitor.visit_module_end(self, id);
            }
            NodeKind::ClassDecl(_) => visitor.visit_class_decl(self, id),
            NodeKind::ClassDef(_) => {
                if visitor.visit_class_def_start(self, id) {
                    self.visit_children(visitor, id);
                }
                visitor.visit_class_def_end(self, id);
            }
            NodeKind::InterfaceDecl(_) => visitor.visit_interface_decl(self, id),
            NodeKind::InterfaceDef(_) => {
                if visitor.visit_interface_def_start(self, id) {
                    self.visit_children(visitor, id);
                }
                visitor.visit_interface_def_end(self, id);
            }
            NodeKind::Exception(_) => {
                if visitor.visit_exception_start(self, id) {
                    self.visit_children(visitor, id);
                }
                visitor.visit_exception_end(self, id);
            }
            NodeKind::Struct => {
                if visitor.visit_struct_start(self, id) {
                    self.visit_children(visitor, id);
                }
                visitor.visit_struct_end(self, id);
            }
            NodeKind::Operation(_) => {
                if visitor.visit_operation_start(self, id) {
                    self.visit_children(visitor, id);
                }
                visitor.visit_operation_end(self, id);
            }
            NodeKind::Enum(_) => {
                if visitor.visit_enum_start(self, id) {
                    self.visit_children(visitor, id);
                }
                visitor.visit_enum_end(self, id);
            }
            NodeKind::Sequence(_) => visitor.visit_sequence(self, id),
            NodeKind::Dictionary(_) => visitor.visit_dictionary(self, id),
            NodeKind::Enumerator(_) => visitor.visit_enumerator(self, id),
            NodeKind::Const(_) => visitor.visit_const(self, id),
            NodeKind::Parameter(_) => visitor.visit_parameter(self, id),
            NodeKind::DataMember(_) => visitor.visit_data_member(self, id),
            // Builtins are not part of the declared tree; reserved slots and
            // the global scope are never children.
            NodeKind::Builtin(_) | NodeKind::GlobalScope | NodeKind::Reserved => {}
        }
    }

    fn visit_children(&self, visitor: &mut dyn Visitor, id: EntityId) {
        for &child in self.children(id) {
            self.visit_entity(visitor, child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::BuiltinKind;
    use crate::node::{DataMember, Node, Scope, Sequence};

    #[derive(Default)]
    struct Recorder {
        events: Vec<&'static str>,
    }

    impl Visitor for Recorder {
        fn visit_unit_start(&mut self, _: &Ast) {
            self.events.push("unit_start");
        }
        fn visit_unit_end(&mut self, _: &Ast) {
            self.events.push("unit_end");
        }
        fn visit_module_start(&mut self, _: &Ast, _: EntityId) -> bool {
            self.events.push("module_start");
            true
        }
        fn visit_module_end(&mut self, _: &Ast, _: EntityId) {
            self.events.push("module_end");
        }
        fn visit_struct_start(&mut self, _: &Ast, _: EntityId) -> bool {
            self.events.push("struct_start");
            true
        }
        fn visit_struct_end(&mut self, _: &Ast, _: EntityId) {
            self.events.push("struct_end");
        }
        fn visit_sequence(&mut self, _: &Ast, _: EntityId) {
            self.events.push("sequence");
        }
        fn visit_data_member(&mut self, _: &Ast, _: EntityId) {
            self.events.push("data_member");
        }
    }

    #[test]
    fn traversal_is_depth_first_in_declaration_order() {
        let mut ast = Ast::new();
        let module = ast.alloc(Node {
            kind: NodeKind::Module,
            contained: None,
            scope: Some(Scope::default()),
        });
        ast.add_child(EntityId::GLOBAL, module);

        let int = ast.alloc(Node {
            kind: NodeKind::Builtin(BuiltinKind::Int),
            contained: None,
            scope: None,
        });
        let s = ast.alloc(Node {
            kind: NodeKind::Struct,
            contained: None,
            scope: Some(Scope::default()),
        });
        ast.add_child(module, s);
        let member = ast.alloc(Node {
            kind: NodeKind::DataMember(DataMember {
                ty: int,
                tag: None,
                default: None,
            }),
            contained: None,
            scope: None,
        });
        ast.add_child(s, member);
        let seq = ast.alloc(Node {
            kind: NodeKind::Sequence(Sequence { element: int }),
            contained: None,
            scope: None,
        });
        ast.add_child(module, seq);

        let mut recorder = Recorder::default();
        ast.visit(&mut recorder);
        assert_eq!(
            recorder.events,
            [
                "unit_start",
                "module_start",
                "struct_start",
                "data_member",
                "struct_end",
                "sequence",
                "module_end",
                "unit_end",
            ]
        );
    }
}
