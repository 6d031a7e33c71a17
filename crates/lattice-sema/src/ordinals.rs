//! Tag and compact-id resolution.
//!
//! A tag or compact id is either an integer literal or a name that must
//! resolve to exactly one of: a single unscoped enumerator, or an integral
//! constant. Failures report an error and synthesize a sentinel value (-1)
//! so construction continues; factories skip duplicate checks on sentinels.

use lattice_ast::{Literal, NodeKind};
use lattice_identity::EntityId;
use smallvec::SmallVec;

use crate::errors::SemanticError;
use crate::lookup::Existing;
use crate::unit::Unit;

/// Sentinel stored when a tag or id could not be resolved.
pub const SENTINEL_TAG: i32 = -1;

const ORDINAL_MAX: i64 = i32::MAX as i64;

/// A not-yet-resolved tag/compact-id as the grammar delivers it.
#[derive(Debug, Clone)]
pub enum TagRef {
    Literal(i64),
    Named(String),
}

impl Unit {
    /// Resolve a tag to a value in `[0, 2^31-1]`, or the sentinel.
    pub fn resolve_tag(&mut self, r: &TagRef) -> i32 {
        let value = match r {
            TagRef::Literal(v) => Some(*v),
            TagRef::Named(name) => self.resolve_ordinal_name(name),
        };
        match value {
            Some(v) if (0..=ORDINAL_MAX).contains(&v) => v as i32,
            Some(v) => {
                self.error(SemanticError::TagOutOfRange {
                    value: v,
                    span: self.current_location().span.into(),
                });
                SENTINEL_TAG
            }
            None => SENTINEL_TAG,
        }
    }

    /// Resolve a compact id, checking range and unit-wide uniqueness. The
    /// winning id is recorded against `owner` in the id registry.
    pub(crate) fn resolve_compact_id(&mut self, r: &TagRef, owner: &str) -> Option<i32> {
        let value = match r {
            TagRef::Literal(v) => Some(*v),
            TagRef::Named(name) => self.resolve_ordinal_name(name),
        };
        let value = match value {
            Some(v) if (0..=ORDINAL_MAX).contains(&v) => v as i32,
            Some(v) => {
                self.error(SemanticError::CompactIdOutOfRange {
                    value: v,
                    span: self.current_location().span.into(),
                });
                return None;
            }
            None => return None,
        };

        if let Some(existing) = self.compact_ids.get(&value).cloned() {
            self.error(SemanticError::CompactIdDuplicate {
                id: value,
                existing,
                span: self.current_location().span.into(),
            });
            return None;
        }
        self.compact_ids.insert(value, owner.to_string());
        Some(value)
    }

    /// Resolve a name used in tag position to its integral value.
    fn resolve_ordinal_name(&mut self, name: &str) -> Option<i64> {
        tracing::trace!(name, "resolve_ordinal_name");

        // Unscoped names prefer enumerators, searched one enclosing scope at
        // a time; every candidate at the innermost matching level counts.
        if !name.contains("::") {
            let scopes: Vec<EntityId> = {
                let current = self.current_container();
                std::iter::once(current)
                    .chain(self.ast.ancestors(current))
                    .collect()
            };
            for scope in scopes {
                let candidates = self.enumerators_named(scope, name);
                match candidates.as_slice() {
                    [] => {}
                    [single] => {
                        let value = self
                            .ast
                            .node(*single)
                            .as_enumerator()
                            .expect("candidates are enumerators")
                            .value;
                        return Some(value);
                    }
                    many => {
                        let list = many
                            .iter()
                            .map(|&e| format!("`{}`", self.ast.node(e).scoped_name()))
                            .collect::<Vec<_>>()
                            .join(", ");
                        self.error(SemanticError::AmbiguousReference {
                            name: name.to_string(),
                            candidates: list,
                            span: self.current_location().span.into(),
                        });
                        return None;
                    }
                }
            }
        }

        // Fall back to an integral constant (or a fully qualified
        // enumerator).
        match self.find_named_silent(name) {
            Some(e) => match &self.ast.node(e).kind {
                NodeKind::Enumerator(en) => Some(en.value),
                NodeKind::Const(c) => match (&self.ast.node(c.ty).kind, &c.value) {
                    (NodeKind::Builtin(b), Literal::Int(v)) if b.is_integral() => Some(*v),
                    _ => {
                        self.bad_tag_reference(name);
                        None
                    }
                },
                _ => {
                    self.bad_tag_reference(name);
                    None
                }
            },
            None => {
                self.bad_tag_reference(name);
                None
            }
        }
    }

    /// All enumerators named `name` across the enums directly contained in
    /// `scope`.
    fn enumerators_named(&self, scope: EntityId, name: &str) -> SmallVec<[EntityId; 2]> {
        let mut found = SmallVec::new();
        for &child in self.ast.children(scope) {
            if !matches!(self.ast.node(child).kind, NodeKind::Enum(_)) {
                continue;
            }
            for &enumerator in self.ast.children(child) {
                if self.ast.node(enumerator).name() == name {
                    found.push(enumerator);
                }
            }
        }
        found
    }

    /// Name resolution without diagnostics, for contexts that report their
    /// own failure.
    fn find_named_silent(&self, name: &str) -> Option<EntityId> {
        let take = |existing: Existing| match existing {
            Existing::Exact(id) | Existing::CaseVariant(id) => Some(id),
            Existing::None => None,
        };
        if let Some(absolute) = name.strip_prefix("::") {
            return take(self.find_existing(&format!("::{absolute}")));
        }
        let current = self.current_container();
        for scope in std::iter::once(current).chain(self.ast.ancestors(current)) {
            let scoped = self.ast.qualify(scope, name);
            if let Some(id) = take(self.find_existing(&scoped)) {
                return Some(id);
            }
        }
        None
    }

    fn bad_tag_reference(&mut self, name: &str) {
        self.error(SemanticError::BadTagReference {
            name: name.to_string(),
            span: self.current_location().span.into(),
        });
    }
}
