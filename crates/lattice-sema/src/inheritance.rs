//! Multiple-interface-inheritance ambiguity detection.
//!
//! Each direct base seeds one partition. Walking a base's ancestry, the
//! left-most ancestor chain stays in that base's partition while every other
//! ancestor spawns a partition of its own. An operation name reachable from
//! two partitions is ambiguous; names that collide only case-insensitively
//! get their own diagnostic. Each offending name is reported at most once.

use lattice_ast::NodeKind;
use lattice_identity::EntityId;
use rustc_hash::FxHashSet;

use crate::errors::SemanticError;
use crate::lookup::fold;
use crate::unit::Unit;

impl Unit {
    /// Check the direct bases of the interface `name` for operations that
    /// would be inherited through more than one path.
    pub(crate) fn check_base_ambiguity(&mut self, name: &str, bases: &[EntityId]) {
        if bases.len() < 2 {
            return;
        }

        let mut partitions: Vec<Vec<EntityId>> = Vec::new();
        for &base in bases {
            partitions.push(Vec::new());
            let idx = partitions.len() - 1;
            self.add_partition(&mut partitions, idx, base);
        }

        let name_sets: Vec<Vec<String>> = partitions
            .iter()
            .map(|members| self.operation_names(members))
            .collect();

        let mut reported: FxHashSet<String> = FxHashSet::default();
        for i in 0..name_sets.len() {
            for j in (i + 1)..name_sets.len() {
                for a in &name_sets[i] {
                    for b in &name_sets[j] {
                        if a == b {
                            if reported.insert(a.clone()) {
                                self.error(SemanticError::AmbiguousInheritance {
                                    interface: name.to_string(),
                                    operation: a.clone(),
                                    span: self.current_location().span.into(),
                                });
                            }
                        } else if fold(a) == fold(b) {
                            if reported.insert(fold(a)) {
                                self.error(SemanticError::InheritedCapitalizationMismatch {
                                    interface: name.to_string(),
                                    first: a.clone(),
                                    second: b.clone(),
                                    span: self.current_location().span.into(),
                                });
                            }
                        }
                    }
                }
            }
        }
    }

    /// Add `interface` and its ancestry to `partitions[idx]`: the left-most
    /// ancestor chain joins the same partition, every other ancestor starts
    /// a new one.
    fn add_partition(
        &self,
        partitions: &mut Vec<Vec<EntityId>>,
        idx: usize,
        interface: EntityId,
    ) {
        partitions[idx].push(interface);

        let bases: Vec<EntityId> = match self.ast.node(interface).as_interface_def() {
            Some(def) => def.bases.clone(),
            None => return,
        };
        let Some((&leftmost, rest)) = bases.split_first() else {
            return;
        };
        self.add_partition(partitions, idx, leftmost);
        for &other in rest {
            partitions.push(Vec::new());
            let new_idx = partitions.len() - 1;
            self.add_partition(partitions, new_idx, other);
        }
    }

    /// Union of operation names declared directly by each partition member.
    fn operation_names(&self, members: &[EntityId]) -> Vec<String> {
        let mut names = Vec::new();
        let mut seen: FxHashSet<String> = FxHashSet::default();
        for &member in members {
            for &child in self.ast.children(member) {
                if matches!(self.ast.node(child).kind, NodeKind::Operation(_)) {
                    let op = self.ast.node(child).name().to_string();
                    if seen.insert(op.clone()) {
                        names.push(op);
                    }
                }
            }
        }
        names
    }
}
