//! Id newtypes for the session's tables.

macro_rules! define_entity_id {
    ($(#[$meta:meta])* $vis:vis struct $name:ident;) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis struct $name(u32);

        impl $name {
            pub fn new(index: u32) -> Self {
                Self(index)
            }

            pub fn index(self) -> u32 {
                self.0
            }
        }
    };
}

define_entity_id! {
    /// Identity for a node in the entity arena (module, type, operation, member).
    /// Index 0 is always the global scope.
    pub struct EntityId;
}

impl EntityId {
    /// The global scope, present in every arena.
    pub const GLOBAL: Self = Self(0);
}

define_entity_id! {
    /// Identity for a definition context (one per opened source file).
    pub struct ContextId;
}

define_entity_id! {
    /// Identity for an entry in the session's file table.
    pub struct FileId;
}

impl Default for FileId {
    fn default() -> Self {
        FileId::new(0)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_copy_and_distinct() {
        let a = EntityId::new(1);
        let b = a;
        assert_eq!(a, b);
        assert_ne!(a, EntityId::new(2));
    }

    #[test]
    fn global_is_index_zero() {
        assert_eq!(EntityId::GLOBAL.index(), 0);
    }
}
