//! Enum and enumerator factories.

use lattice_ast::{EnumDef, Enumerator, NodeKind};
use lattice_identity::EntityId;

use crate::errors::SemanticError;
use crate::unit::Unit;

impl Unit {
    pub fn create_enum(&mut self, name: &str) -> EntityId {
        let parent = self.current_container();
        self.check_module_scope("enumeration");
        let kind = NodeKind::Enum(EnumDef::default());
        if !self.check_fresh_name(name, "enumeration") {
            return self.placeholder_entity(parent, name, kind, true);
        }
        let id = self.new_entity(parent, name, kind, true);
        self.check_introduced(name, id);
        id
    }

    /// Create an enumerator in the current (enum) container. An explicit
    /// value marks the enum; an implicit value is the previous value plus
    /// one.
    ///
    /// Duplicate detection deliberately only runs once the enum's running
    /// minimum/maximum has stopped expanding: a value that moves either
    /// bound skips the scan entirely. Downstream tooling depends on today's
    /// diagnostic set, so this is reproduced exactly, including the bounds
    /// starting inverted (the first enumerator only closes the minimum, the
    /// second only the maximum).
    pub fn create_enumerator(&mut self, name: &str, explicit: Option<i64>) -> EntityId {
        let parent = self.current_container();
        debug_assert!(
            matches!(self.ast.node(parent).kind, NodeKind::Enum(_)),
            "create_enumerator outside an enum"
        );

        let value = {
            let enum_def = self
                .ast
                .node(parent)
                .as_enum()
                .expect("enumerators live in enums");
            match explicit {
                Some(v) => v,
                None => enum_def.last_value + 1,
            }
        };

        if explicit.is_some() && !(0..=i64::from(i32::MAX)).contains(&value) {
            self.error(SemanticError::EnumeratorValueOutOfRange {
                name: name.to_string(),
                value,
                span: self.current_location().span.into(),
            });
        }

        let (min, max) = {
            let e = self.ast.node(parent).as_enum().expect("checked above");
            (e.min_value, e.max_value)
        };
        if value < min {
            // Range still expanding downward; no duplicate scan.
        } else if value > max {
            // Range still expanding upward; no duplicate scan.
        } else {
            let duplicate = self.ast.children(parent).iter().copied().find(|&c| {
                self.ast.node(c).as_enumerator().map(|e| e.value) == Some(value)
            });
            if let Some(other) = duplicate {
                let other_name = self.ast.node(other).name().to_string();
                self.error(SemanticError::DuplicateEnumeratorValue {
                    name: name.to_string(),
                    other: other_name,
                    value,
                    span: self.current_location().span.into(),
                });
            }
        }

        {
            let enum_def = self
                .ast
                .node_mut(parent)
                .as_enum_mut()
                .expect("checked above");
            if value < enum_def.min_value {
                enum_def.min_value = value;
            } else if value > enum_def.max_value {
                enum_def.max_value = value;
            }
            enum_def.last_value = value;
            if explicit.is_some() {
                enum_def.has_explicit_values = true;
            }
        }

        let kind = NodeKind::Enumerator(Enumerator { value });
        if !self.check_fresh_name(name, "enumerator") {
            return self.placeholder_entity(parent, name, kind, false);
        }
        let id = self.new_entity(parent, name, kind, false);
        self.check_introduced(name, id);
        id
    }
}
