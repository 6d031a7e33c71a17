//! Scope resolution over the case-insensitive scoped-name table.
//!
//! Relative names search the current scope outward through enclosing
//! containers; `::`-prefixed names go straight to the global scope. A
//! case-variant match resolves with a warning rather than failing, so later
//! passes see the entity the author most plausibly meant.

use lattice_ast::NodeKind;
use lattice_identity::EntityId;

use crate::errors::{SemanticError, SemanticWarning};
use crate::unit::Unit;

/// Case folding for the symbol tables: scoped names are matched
/// case-insensitively, with exact-case comparison layered on top.
pub(crate) fn fold(s: &str) -> String {
    s.to_ascii_lowercase()
}

/// Outcome of probing the name table for a scoped name.
pub(crate) enum Existing {
    None,
    /// At least one binding with the exact same spelling.
    Exact(EntityId),
    /// Only case-variant bindings exist; carries the first of them.
    CaseVariant(EntityId),
}

impl Unit {
    /// Probe the global table for `scoped`, distinguishing exact-case hits
    /// from case-variant ones.
    pub(crate) fn find_existing(&self, scoped: &str) -> Existing {
        let Some(candidates) = self.contents.get(&fold(scoped)) else {
            return Existing::None;
        };
        for &id in candidates {
            if self.ast.node(id).scoped_name() == scoped {
                return Existing::Exact(id);
            }
        }
        match candidates.first() {
            Some(&id) => Existing::CaseVariant(id),
            None => Existing::None,
        }
    }

    /// Every exact-case binding of `scoped` (multiple for repeated forward
    /// declarations).
    pub(crate) fn find_all_exact(&self, scoped: &str) -> Vec<EntityId> {
        self.contents
            .get(&fold(scoped))
            .map(|candidates| {
                candidates
                    .iter()
                    .copied()
                    .filter(|&id| self.ast.node(id).scoped_name() == scoped)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Resolve a (possibly qualified) name to a type entity. Builtins win for
    /// unqualified names; then the current scope is searched outward. Records
    /// an `Undefined` or `NotAType` error on failure.
    pub fn lookup_type(&mut self, name: &str) -> Option<EntityId> {
        tracing::trace!(name, "lookup_type");
        if !name.contains("::") {
            if let Some(id) = self.builtin_by_keyword(name) {
                return Some(id);
            }
        }

        let found = self.lookup_name(name)?;
        if !self.ast.node(found).is_type() {
            self.error(SemanticError::NotAType {
                name: name.to_string(),
                span: self.current_location().span.into(),
            });
            return None;
        }
        Some(found)
    }

    /// Resolve a (possibly qualified) name to any contained entity.
    pub fn lookup_contained(&mut self, name: &str) -> Option<EntityId> {
        tracing::trace!(name, "lookup_contained");
        self.lookup_name(name)
    }

    fn lookup_name(&mut self, name: &str) -> Option<EntityId> {
        if let Some(absolute) = name.strip_prefix("::") {
            let scoped = format!("::{absolute}");
            return match self.find_existing(&scoped) {
                Existing::Exact(id) => Some(id),
                Existing::CaseVariant(id) => {
                    self.case_mismatch_warning(name, id);
                    Some(id)
                }
                Existing::None => {
                    self.error(SemanticError::Undefined {
                        name: name.to_string(),
                        span: self.current_location().span.into(),
                    });
                    None
                }
            };
        }

        // Relative name: search the current scope outward. Capitalization
        // mismatches found along the way warn but still resolve.
        let scopes: Vec<EntityId> = {
            let current = self.current_container();
            std::iter::once(current)
                .chain(self.ast.ancestors(current))
                .collect()
        };
        for scope in scopes {
            let scoped = self.ast.qualify(scope, name);
            match self.find_existing(&scoped) {
                Existing::Exact(id) => {
                    self.check_introduced(name, id);
                    return Some(id);
                }
                Existing::CaseVariant(id) => {
                    self.case_mismatch_warning(name, id);
                    self.check_introduced(name, id);
                    return Some(id);
                }
                Existing::None => {}
            }
        }

        self.error(SemanticError::Undefined {
            name: name.to_string(),
            span: self.current_location().span.into(),
        });
        None
    }

    fn case_mismatch_warning(&mut self, name: &str, found: EntityId) {
        let found_name = self.ast.node(found).scoped_name().to_string();
        self.warning(SemanticWarning::CaseMismatchedLookup {
            name: name.to_string(),
            found: found_name,
            span: self.current_location().span.into(),
        });
    }

    /// Record, per scope, the first entity an identifier's leading component
    /// was bound to, and reject a later use that resolves to a different
    /// entity in the same scope. Parameters and data members live in
    /// independent namespaces and never collide with type names.
    pub(crate) fn check_introduced(&mut self, name: &str, entity: EntityId) {
        if matches!(
            self.ast.node(entity).kind,
            NodeKind::Parameter(_) | NodeKind::DataMember(_)
        ) {
            return;
        }

        let first = name.split("::").next().unwrap_or(name).to_string();
        // For a qualified use the introduced name is only the first
        // component; bind it to the ancestor of the resolved entity that the
        // component actually names.
        let mut entity = entity;
        if name.contains("::") {
            let mut current = entity;
            loop {
                if self.ast.node(current).name() == first {
                    entity = current;
                    break;
                }
                match self.ast.node(current).contained.as_ref() {
                    Some(c) if c.parent != EntityId::GLOBAL => current = c.parent,
                    _ => break,
                }
            }
        }

        let scope_id = self.current_container();
        let previous = self
            .ast
            .node(scope_id)
            .scope
            .as_ref()
            .and_then(|s| s.introduced.get(&first).copied());

        match previous {
            None => {
                if let Some(scope) = self.ast.node_mut(scope_id).scope.as_mut() {
                    scope.introduced.insert(first, entity);
                }
            }
            // Redeclarations of the same scoped name (forward declarations
            // and their definition) do not change what the name means.
            Some(prev)
                if prev != entity
                    && self.ast.node(prev).scoped_name()
                        != self.ast.node(entity).scoped_name() =>
            {
                self.error(SemanticError::ChangedMeaning {
                    name: first,
                    span: self.current_location().span.into(),
                });
            }
            Some(_) => {}
        }
    }
}
