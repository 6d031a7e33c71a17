//! Class and interface factories, including forward-declaration patching.
//!
//! A definition always creates (or reuses) its matching declaration and
//! links both directions; every previously seen declaration for the same
//! name is patched to point at the new definition. A declaration with no
//! definition is only reported at point of use ("declared but not defined").

use lattice_ast::{ClassDecl, ClassDef, InterfaceDecl, InterfaceDef, NodeKind};
use lattice_identity::EntityId;

use crate::errors::SemanticError;
use crate::lookup::Existing;
use crate::ordinals::TagRef;
use crate::unit::Unit;

impl Unit {
    // ===== Classes =====

    /// Forward-declare a class. Repeating a forward declaration is a
    /// compatible redeclaration and yields a fresh declaration node linked to
    /// the definition, if one exists yet.
    pub fn create_class_decl(&mut self, name: &str) -> EntityId {
        let parent = self.current_container();
        self.check_module_scope("class");
        let scoped = self.ast.qualify(parent, name);
        tracing::debug!(%scoped, "create_class_decl");

        match self.find_existing(&scoped) {
            Existing::Exact(id)
                if !matches!(
                    self.ast.node(id).kind,
                    NodeKind::ClassDecl(_) | NodeKind::ClassDef(_)
                ) =>
            {
                self.redefinition_error(name, id, "class");
                return self.placeholder_entity(
                    parent,
                    name,
                    NodeKind::ClassDecl(ClassDecl::default()),
                    false,
                );
            }
            Existing::CaseVariant(id) => {
                self.capitalization_error(name, id);
                return self.placeholder_entity(
                    parent,
                    name,
                    NodeKind::ClassDecl(ClassDecl::default()),
                    false,
                );
            }
            _ => {}
        }

        // Link the new declaration to an already-seen definition, if any.
        let definition = self
            .find_all_exact(&scoped)
            .iter()
            .find_map(|&e| match &self.ast.node(e).kind {
                NodeKind::ClassDef(_) => Some(e),
                NodeKind::ClassDecl(decl) => decl.definition,
                _ => None,
            });

        let id = self.new_entity(
            parent,
            name,
            NodeKind::ClassDecl(ClassDecl { definition }),
            false,
        );
        self.check_introduced(name, id);
        id
    }

    /// Define a class. Patches every earlier forward declaration of the same
    /// name to point at this definition.
    pub fn create_class_def(
        &mut self,
        name: &str,
        compact_id: Option<TagRef>,
        base: Option<EntityId>,
    ) -> EntityId {
        let parent = self.current_container();
        self.check_module_scope("class");
        let scoped = self.ast.qualify(parent, name);
        tracing::debug!(%scoped, "create_class_def");

        let exact = self.find_all_exact(&scoped);
        let conflict = exact
            .iter()
            .find(|&&e| !matches!(self.ast.node(e).kind, NodeKind::ClassDecl(_)))
            .copied();
        if let Some(e) = conflict {
            self.redefinition_error(name, e, "class");
            return self.class_def_placeholder(parent, name, base);
        }
        if exact.is_empty() {
            if let Existing::CaseVariant(e) = self.find_existing(&scoped) {
                self.capitalization_error(name, e);
                return self.class_def_placeholder(parent, name, base);
            }
        }

        let base = base.and_then(|b| self.resolve_class_base(b));
        let compact_id = compact_id.and_then(|r| self.resolve_compact_id(&r, &scoped));

        // The definition needs a stable id before the declarations can be
        // patched, so reserve the slot first.
        let def_id = self.ast.reserve();
        for &decl in &exact {
            if let Some(d) = self.ast.node_mut(decl).as_class_decl_mut() {
                d.definition = Some(def_id);
            }
        }
        let declaration = match exact.first() {
            Some(&d) => d,
            None => {
                let d = self.new_entity(
                    parent,
                    name,
                    NodeKind::ClassDecl(ClassDecl {
                        definition: Some(def_id),
                    }),
                    false,
                );
                self.check_introduced(name, d);
                d
            }
        };

        self.define_reserved(
            def_id,
            parent,
            name,
            NodeKind::ClassDef(ClassDef {
                declaration,
                compact_id,
                base,
            }),
            true,
        );
        self.check_introduced(name, def_id);
        def_id
    }

    fn class_def_placeholder(
        &mut self,
        parent: EntityId,
        name: &str,
        base: Option<EntityId>,
    ) -> EntityId {
        let declaration =
            self.placeholder_entity(parent, name, NodeKind::ClassDecl(ClassDecl::default()), false);
        self.placeholder_entity(
            parent,
            name,
            NodeKind::ClassDef(ClassDef {
                declaration,
                compact_id: None,
                base,
            }),
            true,
        )
    }

    /// Normalize a class base reference to its definition, reporting
    /// "declared but not defined" lazily at this point of use.
    fn resolve_class_base(&mut self, base: EntityId) -> Option<EntityId> {
        match &self.ast.node(base).kind {
            NodeKind::ClassDef(_) => Some(base),
            NodeKind::ClassDecl(decl) => match decl.definition {
                Some(def) => Some(def),
                None => {
                    let name = self.ast.node(base).scoped_name().to_string();
                    self.error(SemanticError::DeclaredButNotDefined {
                        name,
                        span: self.current_location().span.into(),
                    });
                    None
                }
            },
            _ => {
                let name = self.ast.node(base).name().to_string();
                let kind = self.ast.node(base).kind_name();
                self.error(SemanticError::BadBase {
                    name,
                    kind,
                    span: self.current_location().span.into(),
                });
                None
            }
        }
    }

    // ===== Interfaces =====

    pub fn create_interface_decl(&mut self, name: &str) -> EntityId {
        let parent = self.current_container();
        self.check_module_scope("interface");
        let scoped = self.ast.qualify(parent, name);
        tracing::debug!(%scoped, "create_interface_decl");

        match self.find_existing(&scoped) {
            Existing::Exact(id)
                if !matches!(
                    self.ast.node(id).kind,
                    NodeKind::InterfaceDecl(_) | NodeKind::InterfaceDef(_)
                ) =>
            {
                self.redefinition_error(name, id, "interface");
                return self.placeholder_entity(
                    parent,
                    name,
                    NodeKind::InterfaceDecl(InterfaceDecl::default()),
                    false,
                );
            }
            Existing::CaseVariant(id) => {
                self.capitalization_error(name, id);
                return self.placeholder_entity(
                    parent,
                    name,
                    NodeKind::InterfaceDecl(InterfaceDecl::default()),
                    false,
                );
            }
            _ => {}
        }

        let definition = self
            .find_all_exact(&scoped)
            .iter()
            .find_map(|&e| match &self.ast.node(e).kind {
                NodeKind::InterfaceDef(_) => Some(e),
                NodeKind::InterfaceDecl(decl) => decl.definition,
                _ => None,
            });

        let id = self.new_entity(
            parent,
            name,
            NodeKind::InterfaceDecl(InterfaceDecl { definition }),
            false,
        );
        self.check_introduced(name, id);
        id
    }

    /// Define an interface. Patches forward declarations like classes do,
    /// then checks the direct bases for ambiguous multiple inheritance.
    pub fn create_interface_def(&mut self, name: &str, bases: &[EntityId]) -> EntityId {
        let parent = self.current_container();
        self.check_module_scope("interface");
        let scoped = self.ast.qualify(parent, name);
        tracing::debug!(%scoped, "create_interface_def");

        let exact = self.find_all_exact(&scoped);
        let conflict = exact
            .iter()
            .find(|&&e| !matches!(self.ast.node(e).kind, NodeKind::InterfaceDecl(_)))
            .copied();
        if let Some(e) = conflict {
            self.redefinition_error(name, e, "interface");
            return self.interface_def_placeholder(parent, name);
        }
        if exact.is_empty() {
            if let Existing::CaseVariant(e) = self.find_existing(&scoped) {
                self.capitalization_error(name, e);
                return self.interface_def_placeholder(parent, name);
            }
        }

        let bases: Vec<EntityId> = bases
            .iter()
            .filter_map(|&b| self.resolve_interface_base(b))
            .collect();
        self.check_base_ambiguity(name, &bases);

        let def_id = self.ast.reserve();
        for &decl in &exact {
            if let Some(d) = self.ast.node_mut(decl).as_interface_decl_mut() {
                d.definition = Some(def_id);
            }
        }
        let declaration = match exact.first() {
            Some(&d) => d,
            None => {
                let d = self.new_entity(
                    parent,
                    name,
                    NodeKind::InterfaceDecl(InterfaceDecl {
                        definition: Some(def_id),
                    }),
                    false,
                );
                self.check_introduced(name, d);
                d
            }
        };

        self.define_reserved(
            def_id,
            parent,
            name,
            NodeKind::InterfaceDef(InterfaceDef { declaration, bases }),
            true,
        );
        self.check_introduced(name, def_id);
        def_id
    }

    fn interface_def_placeholder(&mut self, parent: EntityId, name: &str) -> EntityId {
        let declaration = self.placeholder_entity(
            parent,
            name,
            NodeKind::InterfaceDecl(InterfaceDecl::default()),
            false,
        );
        self.placeholder_entity(
            parent,
            name,
            NodeKind::InterfaceDef(InterfaceDef {
                declaration,
                bases: Vec::new(),
            }),
            true,
        )
    }

    fn resolve_interface_base(&mut self, base: EntityId) -> Option<EntityId> {
        match &self.ast.node(base).kind {
            NodeKind::InterfaceDef(_) => Some(base),
            NodeKind::InterfaceDecl(decl) => match decl.definition {
                Some(def) => Some(def),
                None => {
                    let name = self.ast.node(base).scoped_name().to_string();
                    self.error(SemanticError::DeclaredButNotDefined {
                        name,
                        span: self.current_location().span.into(),
                    });
                    None
                }
            },
            _ => {
                let name = self.ast.node(base).name().to_string();
                let kind = self.ast.node(base).kind_name();
                self.error(SemanticError::BadBase {
                    name,
                    kind,
                    span: self.current_location().span.into(),
                });
                None
            }
        }
    }
}
