//! The entity arena.
//!
//! Every entity of a compilation session lives in one `Vec`, addressed by
//! `EntityId`. Slot 0 is the global scope. A slot can be reserved before its
//! node is populated, so self-referential entities have a stable id to
//! register into lookup maps while still under construction.

use lattice_identity::{ContextId, EntityId, FileId};

use crate::context::DefinitionContext;
use crate::node::{Node, NodeKind, Scope};

#[derive(Debug, Clone)]
pub struct Ast {
    nodes: Vec<Node>,
    files: Vec<String>,
    contexts: Vec<DefinitionContext>,
}

impl Default for Ast {
    fn default() -> Self {
        Self::new()
    }
}

impl Ast {
    pub fn new() -> Self {
        let global = Node {
            kind: NodeKind::GlobalScope,
            contained: None,
            scope: Some(Scope::default()),
        };
        Ast {
            nodes: vec![global],
            files: Vec::new(),
            contexts: Vec::new(),
        }
    }

    // ===== Nodes =====

    pub fn alloc(&mut self, node: Node) -> EntityId {
        let id = EntityId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Reserve a slot; the caller must `define` it before the node is read.
    pub fn reserve(&mut self) -> EntityId {
        self.alloc(Node::reserved())
    }

    pub fn define(&mut self, id: EntityId, node: Node) {
        debug_assert!(matches!(self.nodes[id.index() as usize].kind, NodeKind::Reserved));
        self.nodes[id.index() as usize] = node;
    }

    pub fn node(&self, id: EntityId) -> &Node {
        &self.nodes[id.index() as usize]
    }

    pub fn node_mut(&mut self, id: EntityId) -> &mut Node {
        &mut self.nodes[id.index() as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // Never true: the global scope always occupies slot 0.
        self.nodes.is_empty()
    }

    /// Children of a scope, in declaration order. Empty for non-scopes.
    pub fn children(&self, id: EntityId) -> &[EntityId] {
        self.node(id)
            .scope
            .as_ref()
            .map_or(&[], |s| s.children.as_slice())
    }

    pub fn add_child(&mut self, parent: EntityId, child: EntityId) {
        let scope = self
            .node_mut(parent)
            .scope
            .as_mut()
            .expect("add_child on a non-scope entity");
        scope.children.push(child);
    }

    /// The scoped name of an entity's own scope, i.e. the prefix its children
    /// get. `::` for the global scope.
    pub fn scope_prefix(&self, id: EntityId) -> String {
        match &self.node(id).contained {
            None => "::".to_string(),
            Some(c) => c.scoped_name.clone(),
        }
    }

    /// Qualify `name` inside the scope of `parent`.
    pub fn qualify(&self, parent: EntityId, name: &str) -> String {
        match &self.node(parent).contained {
            None => format!("::{name}"),
            Some(c) => format!("{}::{}", c.scoped_name, name),
        }
    }

    /// Walk the parent chain from `id` (exclusive) up to and including the
    /// global scope.
    pub fn ancestors(&self, id: EntityId) -> Ancestors<'_> {
        Ancestors {
            ast: self,
            next: self.node(id).contained.as_ref().map(|c| c.parent),
            started_at_global: id == EntityId::GLOBAL,
        }
    }

    // ===== Files and contexts =====

    pub fn intern_file(&mut self, path: &str) -> FileId {
        if let Some(i) = self.files.iter().position(|f| f == path) {
            return FileId::new(i as u32);
        }
        let id = FileId::new(self.files.len() as u32);
        self.files.push(path.to_string());
        id
    }

    pub fn file_name(&self, id: FileId) -> &str {
        &self.files[id.index() as usize]
    }

    pub fn push_context(&mut self, ctx: DefinitionContext) -> ContextId {
        let id = ContextId::new(self.contexts.len() as u32);
        self.contexts.push(ctx);
        id
    }

    pub fn context(&self, id: ContextId) -> &DefinitionContext {
        &self.contexts[id.index() as usize]
    }

    pub fn context_mut(&mut self, id: ContextId) -> &mut DefinitionContext {
        &mut self.contexts[id.index() as usize]
    }

    pub fn contexts(&self) -> &[DefinitionContext] {
        &self.contexts
    }
}

pub struct Ancestors<'a> {
    ast: &'a Ast,
    next: Option<EntityId>,
    started_at_global: bool,
}

impl Iterator for Ancestors<'_> {
    type Item = EntityId;

    fn next(&mut self) -> Option<EntityId> {
        if self.started_at_global {
            return None;
        }
        let current = self.next?;
        self.next = self.ast.node(current).contained.as_ref().map(|c| c.parent);
        if current == EntityId::GLOBAL {
            self.next = None;
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Contained;
    use lattice_identity::Location;

    fn named(ast: &mut Ast, parent: EntityId, name: &str) -> EntityId {
        let scoped = ast.qualify(parent, name);
        let id = ast.alloc(Node {
            kind: NodeKind::Module,
            contained: Some(Contained {
                name: name.to_string(),
                scoped_name: scoped,
                parent,
                context: ContextId::new(0),
                location: Location::default(),
                comment: None,
                metadata: Vec::new(),
            }),
            scope: Some(Scope::default()),
        });
        ast.add_child(parent, id);
        id
    }

    #[test]
    fn global_scope_occupies_slot_zero() {
        let ast = Ast::new();
        assert!(matches!(ast.node(EntityId::GLOBAL).kind, NodeKind::GlobalScope));
    }

    #[test]
    fn qualify_builds_scoped_names() {
        let mut ast = Ast::new();
        let m = named(&mut ast, EntityId::GLOBAL, "M");
        let n = named(&mut ast, m, "N");
        assert_eq!(ast.node(m).scoped_name(), "::M");
        assert_eq!(ast.node(n).scoped_name(), "::M::N");
    }

    #[test]
    fn ancestors_walk_to_global() {
        let mut ast = Ast::new();
        let m = named(&mut ast, EntityId::GLOBAL, "M");
        let n = named(&mut ast, m, "N");
        let chain: Vec<EntityId> = ast.ancestors(n).collect();
        assert_eq!(chain, vec![m, EntityId::GLOBAL]);
    }

    #[test]
    fn reserve_then_define() {
        let mut ast = Ast::new();
        let id = ast.reserve();
        assert!(matches!(ast.node(id).kind, NodeKind::Reserved));
        ast.define(
            id,
            Node {
                kind: NodeKind::Module,
                contained: None,
                scope: Some(Scope::default()),
            },
        );
        assert!(matches!(ast.node(id).kind, NodeKind::Module));
    }

    #[test]
    fn file_interning_deduplicates() {
        let mut ast = Ast::new();
        let a = ast.intern_file("a.idl");
        let b = ast.intern_file("a.idl");
        assert_eq!(a, b);
        assert_eq!(ast.file_name(a), "a.idl");
    }
}
