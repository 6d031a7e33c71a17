//! Builder entry points called by grammar reductions.
//!
//! Every factory classifies a same-name lookup as compatible redeclaration,
//! incompatible redefinition, or capitalization mismatch. On hard failure it
//! records the error and returns a placeholder entity, so callers always get
//! a value and diagnostics keep accumulating.

mod classes;
mod enums;
mod members;

use lattice_ast::{Dictionary, ExceptionDef, NodeKind, Sequence};
use lattice_identity::EntityId;

use crate::errors::SemanticError;
use crate::lookup::Existing;
use crate::unit::Unit;

impl Unit {
    // ===== Shared failure paths =====

    pub(crate) fn redefinition_error(
        &mut self,
        name: &str,
        existing: EntityId,
        new_kind: &'static str,
    ) {
        let existing_kind = self.ast.node(existing).kind_name();
        self.error(SemanticError::Redefinition {
            name: name.to_string(),
            existing_kind,
            new_kind,
            span: self.current_location().span.into(),
        });
    }

    pub(crate) fn capitalization_error(&mut self, name: &str, existing: EntityId) {
        let existing_name = self.ast.node(existing).name().to_string();
        self.error(SemanticError::CapitalizationMismatch {
            name: name.to_string(),
            existing: existing_name,
            span: self.current_location().span.into(),
        });
    }

    /// Non-module definitions may not appear at global scope.
    pub(crate) fn check_module_scope(&mut self, kind: &'static str) {
        if self.current_container() == EntityId::GLOBAL {
            self.error(SemanticError::GlobalScopeViolation {
                kind,
                span: self.current_location().span.into(),
            });
        }
    }

    /// Shared redefinition/capitalization gate for kinds that allow no form
    /// of redeclaration. Returns false when the factory must fall back to a
    /// placeholder.
    pub(crate) fn check_fresh_name(&mut self, name: &str, new_kind: &'static str) -> bool {
        let parent = self.current_container();
        let scoped = self.ast.qualify(parent, name);
        match self.find_existing(&scoped) {
            Existing::None => true,
            Existing::Exact(id) => {
                self.redefinition_error(name, id, new_kind);
                false
            }
            Existing::CaseVariant(id) => {
                self.capitalization_error(name, id);
                false
            }
        }
    }

    // ===== Modules =====

    /// Create a module, or reuse an existing one: reopening a module with the
    /// exact same spelling is a compatible redeclaration.
    pub fn create_module(&mut self, name: &str) -> EntityId {
        let parent = self.current_container();
        let scoped = self.ast.qualify(parent, name);
        tracing::debug!(%scoped, "create_module");
        match self.find_existing(&scoped) {
            Existing::Exact(id) if matches!(self.ast.node(id).kind, NodeKind::Module) => {
                self.check_introduced(name, id);
                id
            }
            Existing::Exact(id) => {
                self.redefinition_error(name, id, "module");
                self.placeholder_entity(parent, name, NodeKind::Module, true)
            }
            Existing::CaseVariant(id) => {
                self.capitalization_error(name, id);
                self.placeholder_entity(parent, name, NodeKind::Module, true)
            }
            Existing::None => {
                let id = self.new_entity(parent, name, NodeKind::Module, true);
                self.check_introduced(name, id);
                id
            }
        }
    }

    // ===== Structs =====

    pub fn create_struct(&mut self, name: &str) -> EntityId {
        let parent = self.current_container();
        self.check_module_scope("structure");
        if !self.check_fresh_name(name, "structure") {
            return self.placeholder_entity(parent, name, NodeKind::Struct, true);
        }
        let id = self.new_entity(parent, name, NodeKind::Struct, true);
        self.check_introduced(name, id);
        id
    }

    // ===== Sequences =====

    pub fn create_sequence(&mut self, name: &str, element: EntityId) -> EntityId {
        let parent = self.current_container();
        self.check_module_scope("sequence");
        let kind = NodeKind::Sequence(Sequence { element });
        if !self.check_fresh_name(name, "sequence") {
            return self.placeholder_entity(parent, name, kind, false);
        }
        let id = self.new_entity(parent, name, kind, false);
        self.check_introduced(name, id);
        id
    }

    // ===== Dictionaries =====

    /// Key types must be integral, boolean, string, enum, or a struct
    /// composed recursively of legal key types.
    pub fn create_dictionary(&mut self, name: &str, key: EntityId, value: EntityId) -> EntityId {
        let parent = self.current_container();
        self.check_module_scope("dictionary");

        if !lattice_ast::is_legal_dictionary_key(&self.ast, key) {
            let type_name = self.type_display_name(key);
            self.error(SemanticError::IllegalDictionaryKey {
                type_name,
                span: self.current_location().span.into(),
            });
        }

        let kind = NodeKind::Dictionary(Dictionary { key, value });
        if !self.check_fresh_name(name, "dictionary") {
            return self.placeholder_entity(parent, name, kind, false);
        }
        let id = self.new_entity(parent, name, kind, false);
        self.check_introduced(name, id);
        id
    }

    // ===== Exceptions =====

    pub fn create_exception(&mut self, name: &str, base: Option<EntityId>) -> EntityId {
        let parent = self.current_container();
        self.check_module_scope("exception");

        let base = base.and_then(|b| match self.ast.node(b).kind {
            NodeKind::Exception(_) => Some(b),
            _ => {
                let base_name = self.ast.node(b).name().to_string();
                let kind = self.ast.node(b).kind_name();
                self.error(SemanticError::BadBase {
                    name: base_name,
                    kind,
                    span: self.current_location().span.into(),
                });
                None
            }
        });

        let kind = NodeKind::Exception(ExceptionDef { base });
        if !self.check_fresh_name(name, "exception") {
            return self.placeholder_entity(parent, name, kind, true);
        }
        let id = self.new_entity(parent, name, kind, true);
        self.check_introduced(name, id);
        id
    }

    // ===== Display helpers =====

    /// Name a type the way diagnostics refer to it: scoped name when it has
    /// one, keyword for builtins.
    pub(crate) fn type_display_name(&self, id: EntityId) -> String {
        let node = self.ast.node(id);
        match node.as_builtin() {
            Some(kind) => kind.keyword().to_string(),
            None => node.scoped_name().to_string(),
        }
    }
}
