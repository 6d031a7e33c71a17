//! The compilation session.
//!
//! One `Unit` owns the arena, the scope and definition-context stacks, the
//! global scoped-name map, the compact-id registry, and the builtin cache.
//! The external scanner/reducer drives the `create_*` builder methods
//! depth-first as scopes open and close; everything is synchronous and a
//! session serves exactly one construction at a time.

use lattice_ast::{
    Ast, BuiltinKind, DefinitionContext, Metadata, Node, NodeKind, Scope, WarningCategory,
};
use lattice_identity::{ContextId, EntityId, Location, Span};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::diagnostics::Diagnostics;
use crate::errors::{SemanticError, SemanticWarning};

pub struct Unit {
    pub(crate) ast: Ast,
    pub(crate) diagnostics: Diagnostics,
    /// Lower-cased scoped name -> every entity bound to that name. More than
    /// one entry means case-variant bindings kept for diagnostics.
    pub(crate) contents: FxHashMap<String, SmallVec<[EntityId; 2]>>,
    /// Compact id -> scoped type name, for unit-wide uniqueness.
    pub(crate) compact_ids: FxHashMap<i32, String>,
    builtins: FxHashMap<BuiltinKind, EntityId>,
    container_stack: Vec<EntityId>,
    context_stack: Vec<ContextId>,
    current_location: Location,
}

impl Default for Unit {
    fn default() -> Self {
        Self::new()
    }
}

impl Unit {
    pub fn new() -> Self {
        let mut ast = Ast::new();
        // Slot 0 of the file table backs locations reported before the
        // scanner opens the first file.
        ast.intern_file("<unknown>");

        let mut builtins = FxHashMap::default();
        for kind in BuiltinKind::ALL {
            let id = ast.alloc(Node {
                kind: NodeKind::Builtin(kind),
                contained: None,
                scope: None,
            });
            builtins.insert(kind, id);
        }

        Unit {
            ast,
            diagnostics: Diagnostics::new(),
            contents: FxHashMap::default(),
            compact_ids: FxHashMap::default(),
            builtins,
            container_stack: vec![EntityId::GLOBAL],
            context_stack: Vec::new(),
            current_location: Location::default(),
        }
    }

    // ===== Session control =====

    /// Open a definition context for a source file. `included` marks files
    /// pulled in by the preprocessor rather than named on the command line.
    pub fn push_file(&mut self, path: &str, included: bool) -> ContextId {
        let file = self.ast.intern_file(path);
        let ctx = self.ast.push_context(DefinitionContext::new(file, included));
        self.context_stack.push(ctx);
        self.current_location = Location::new(file, Span::default());
        tracing::debug!(path, included, "opened definition context");
        ctx
    }

    pub fn pop_file(&mut self) {
        self.context_stack.pop();
        if let Some(&ctx) = self.context_stack.last() {
            let file = self.ast.context(ctx).file;
            self.current_location = Location::new(file, Span::default());
        }
    }

    /// The scanner feeds its current position before each reduction.
    pub fn set_position(&mut self, span: Span) {
        self.current_location.span = span;
    }

    pub fn current_location(&self) -> Location {
        self.current_location
    }

    pub(crate) fn current_context(&self) -> ContextId {
        *self
            .context_stack
            .last()
            .expect("builder called with no open definition context")
    }

    pub fn current_container(&self) -> EntityId {
        *self
            .container_stack
            .last()
            .expect("container stack is never empty")
    }

    pub fn push_container(&mut self, id: EntityId) {
        self.container_stack.push(id);
    }

    pub fn pop_container(&mut self) {
        // The global scope stays on the stack for the whole session.
        if self.container_stack.len() > 1 {
            self.container_stack.pop();
        }
    }

    /// Unwind all open scope and context stacks after a hard failure.
    pub fn abort(&mut self) {
        self.container_stack.truncate(1);
        self.context_stack.clear();
    }

    // ===== Builtins =====

    pub fn builtin(&self, kind: BuiltinKind) -> EntityId {
        self.builtins[&kind]
    }

    pub(crate) fn builtin_by_keyword(&self, name: &str) -> Option<EntityId> {
        BuiltinKind::from_keyword(name).map(|k| self.builtin(k))
    }

    // ===== Metadata and comments =====

    /// Attach an annotation to an entity; the directive/argument split
    /// happens here, once.
    pub fn add_metadata(&mut self, id: EntityId, raw: &str) {
        let metadata = Metadata::parse(raw, self.current_location);
        if let Some(contained) = &mut self.ast.node_mut(id).contained {
            contained.metadata.push(metadata);
        }
    }

    /// Attach file-level metadata to the current definition context.
    /// `suppress-warning` directives take effect immediately.
    pub fn add_file_metadata(&mut self, raw: &str) {
        let metadata = Metadata::parse(raw, self.current_location);
        let ctx = self.current_context();

        if metadata.directive() == "suppress-warning" {
            let mut categories: Vec<WarningCategory> = Vec::new();
            let mut unknown: Vec<String> = Vec::new();
            if !metadata.has_arguments() {
                categories.push(WarningCategory::All);
            }
            for arg in metadata.argument_list() {
                match WarningCategory::from_str(arg) {
                    Some(cat) => categories.push(cat),
                    None => unknown.push(arg.to_string()),
                }
            }
            for name in unknown {
                self.warning(SemanticWarning::UnknownWarningCategory {
                    name,
                    span: self.current_location.span.into(),
                });
            }
            let context = self.ast.context_mut(ctx);
            for cat in categories {
                context.suppress(cat);
            }
        }

        self.ast.context_mut(ctx).metadata.push(metadata);
    }

    pub fn set_comment(&mut self, id: EntityId, text: &str) {
        if let Some(contained) = &mut self.ast.node_mut(id).contained {
            contained.comment = Some(text.to_string());
        }
    }

    // ===== Diagnostics =====

    pub(crate) fn error(&mut self, error: SemanticError) {
        self.diagnostics.error(error, self.current_location);
    }

    /// Record a warning unless the current definition context suppresses its
    /// category.
    pub(crate) fn warning(&mut self, warning: SemanticWarning) {
        let ctx = self.context_stack.last().copied();
        self.warning_in(ctx, warning, self.current_location);
    }

    /// Record a warning against a specific definition context (used by the
    /// metadata validator, which runs after the context stack has unwound).
    pub(crate) fn warning_in(
        &mut self,
        ctx: Option<ContextId>,
        warning: SemanticWarning,
        location: Location,
    ) {
        if let Some(ctx) = ctx {
            if self.ast.context(ctx).suppresses(warning.category()) {
                return;
            }
        }
        self.diagnostics.warning(warning, location);
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.error_count()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    // ===== Results =====

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// Finish the session: the arena for generator traversal plus every
    /// recorded diagnostic. Success is `diagnostics.error_count() == 0`.
    pub fn finish(self) -> (Ast, Diagnostics) {
        (self.ast, self.diagnostics)
    }

    // ===== Internal construction helpers =====

    /// Allocate a named entity under `parent` and wire it into the tree and
    /// the global name map. All factories funnel through here once their
    /// semantic checks pass.
    pub(crate) fn new_entity(
        &mut self,
        parent: EntityId,
        name: &str,
        kind: NodeKind,
        with_scope: bool,
    ) -> EntityId {
        let id = self.ast.reserve();
        self.fill_entity(id, parent, name, kind, with_scope);
        self.ast.add_child(parent, id);
        let scoped = self.ast.node(id).scoped_name().to_string();
        self.register(&scoped, id);
        id
    }

    /// Like `new_entity`, but the entity is neither added to its parent's
    /// child list nor registered for lookup. Returned after hard factory
    /// failures so callers always get a value to continue with.
    pub(crate) fn placeholder_entity(
        &mut self,
        parent: EntityId,
        name: &str,
        kind: NodeKind,
        with_scope: bool,
    ) -> EntityId {
        let id = self.ast.reserve();
        self.fill_entity(id, parent, name, kind, with_scope);
        id
    }

    /// Populate a slot reserved with `Ast::reserve` and wire it in like
    /// `new_entity` does. Used where an entity's id must exist before its
    /// node can be built (forward-declaration patching).
    pub(crate) fn define_reserved(
        &mut self,
        id: EntityId,
        parent: EntityId,
        name: &str,
        kind: NodeKind,
        with_scope: bool,
    ) {
        self.fill_entity(id, parent, name, kind, with_scope);
        self.ast.add_child(parent, id);
        let scoped = self.ast.node(id).scoped_name().to_string();
        self.register(&scoped, id);
    }

    fn fill_entity(
        &mut self,
        id: EntityId,
        parent: EntityId,
        name: &str,
        kind: NodeKind,
        with_scope: bool,
    ) {
        let contained = lattice_ast::Contained {
            name: name.to_string(),
            scoped_name: self.ast.qualify(parent, name),
            parent,
            context: self.current_context(),
            location: self.current_location,
            comment: None,
            metadata: Vec::new(),
        };
        self.ast.define(
            id,
            Node {
                kind,
                contained: Some(contained),
                scope: with_scope.then(Scope::default),
            },
        );
    }

    pub(crate) fn register(&mut self, scoped: &str, id: EntityId) {
        self.contents
            .entry(crate::lookup::fold(scoped))
            .or_default()
            .push(id);
    }
}
