//! Metadata validation: one visitor pass over the finished tree.
//!
//! Every annotation is checked against the directive registry; any failing
//! check removes the annotation from its element. Failures are warnings,
//! never hard errors.

mod registry;

pub use registry::{AppliesTo, ArgKind, DirectiveRegistry, DirectiveSpec, ExtraCheck, Placement};

use lattice_ast::{Ast, Metadata, NodeKind, Visitor};
use lattice_identity::{ContextId, EntityId, Location};
use rustc_hash::FxHashSet;

use crate::errors::SemanticWarning;
use crate::unit::Unit;

/// Validates annotations for one target language. Directives carrying a
/// different language prefix are dropped silently; everything else must
/// satisfy its registry entry.
pub struct MetadataValidator<'a> {
    registry: &'a DirectiveRegistry,
    language: Option<String>,
    /// Replacement metadata lists for elements that lost annotations.
    retained: Vec<(EntityId, Vec<Metadata>)>,
    retained_file: Vec<(ContextId, Vec<Metadata>)>,
    warnings: Vec<(ContextId, SemanticWarning, Location)>,
}

/// Everything the pass produced; applied to the tree by the unit.
pub(crate) struct ValidationOutput {
    pub retained: Vec<(EntityId, Vec<Metadata>)>,
    pub retained_file: Vec<(ContextId, Vec<Metadata>)>,
    pub warnings: Vec<(ContextId, SemanticWarning, Location)>,
}

impl<'a> MetadataValidator<'a> {
    pub fn new(registry: &'a DirectiveRegistry, language: Option<&str>) -> Self {
        Self {
            registry,
            language: language.map(str::to_string),
            retained: Vec::new(),
            retained_file: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn finish(self) -> ValidationOutput {
        ValidationOutput {
            retained: self.retained,
            retained_file: self.retained_file,
            warnings: self.warnings,
        }
    }

    fn check_element(&mut self, ast: &Ast, id: EntityId) {
        let node = ast.node(id);
        let Some(contained) = &node.contained else {
            return;
        };
        if contained.metadata.is_empty() {
            return;
        }

        let Some(element) = AppliesTo::of_node(node) else {
            return;
        };
        let ctx = contained.context;
        // Uniqueness is tracked per element; the set resets here.
        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut kept: Vec<Metadata> = Vec::new();
        let mut dropped = false;

        for metadata in &contained.metadata {
            if self.validate_one(ast, Some(id), element, ctx, metadata, &mut seen) {
                kept.push(metadata.clone());
            } else {
                dropped = true;
            }
        }
        if dropped {
            self.retained.push((id, kept));
        }
    }

    fn check_file_metadata(&mut self, ast: &Ast) {
        for (index, context) in ast.contexts().iter().enumerate() {
            if context.metadata.is_empty() {
                continue;
            }
            let ctx = ContextId::new(index as u32);
            let mut seen: FxHashSet<String> = FxHashSet::default();
            let mut kept: Vec<Metadata> = Vec::new();
            let mut dropped = false;
            for metadata in &context.metadata {
                if self.validate_one(ast, None, AppliesTo::File, ctx, metadata, &mut seen) {
                    kept.push(metadata.clone());
                } else {
                    dropped = true;
                }
            }
            if dropped {
                self.retained_file.push((ctx, kept));
            }
        }
    }

    /// Run the full check pipeline for one annotation. Returns false when
    /// the annotation must be dropped from its element.
    fn validate_one(
        &mut self,
        ast: &Ast,
        element_id: Option<EntityId>,
        element: AppliesTo,
        ctx: ContextId,
        metadata: &Metadata,
        seen: &mut FxHashSet<String>,
    ) -> bool {
        let directive = metadata.directive();
        tracing::trace!(directive, "validate metadata");

        // Another language's annotation: not ours to validate.
        if let Some(prefix) = metadata.language_prefix() {
            if Some(prefix) != self.language.as_deref() {
                return false;
            }
        }

        let Some(spec) = self.registry.get(directive) else {
            self.warn(
                ctx,
                SemanticWarning::UnknownDirective {
                    directive: directive.to_string(),
                    span: metadata.location.span.into(),
                },
                metadata.location,
            );
            return false;
        };

        if !self.check_arguments(spec, ctx, metadata) {
            return false;
        }

        // A type-only directive on a definition is redirected to the
        // definition's type; the kind check below then runs against that
        // type.
        let target = match spec.placement {
            Placement::TypeOnly => match self.redirect_target(ast, element_id, element) {
                Some(target) => target,
                None => {
                    self.misapplied(spec, element, ctx, metadata);
                    return false;
                }
            },
            Placement::DefinitionOnly | Placement::Either => element,
        };

        if !spec.applies_to.contains(&target) {
            self.misapplied(spec, element, ctx, metadata);
            return false;
        }

        if spec.unique && !seen.insert(directive.to_string()) {
            self.warn(
                ctx,
                SemanticWarning::DuplicateDirective {
                    directive: directive.to_string(),
                    span: metadata.location.span.into(),
                },
                metadata.location,
            );
            return false;
        }

        if let Some(check) = spec.extra_check {
            if let Err(message) = check(metadata) {
                self.warn(
                    ctx,
                    SemanticWarning::DirectiveCheckFailed {
                        directive: directive.to_string(),
                        message,
                        span: metadata.location.span.into(),
                    },
                    metadata.location,
                );
                return false;
            }
        }

        true
    }

    fn check_arguments(
        &mut self,
        spec: &DirectiveSpec,
        ctx: ContextId,
        metadata: &Metadata,
    ) -> bool {
        let directive = metadata.directive().to_string();
        let span = metadata.location.span.into();
        match spec.arity {
            ArgKind::None if metadata.has_arguments() => {
                self.warn(
                    ctx,
                    SemanticWarning::UnexpectedArguments { directive, span },
                    metadata.location,
                );
                return false;
            }
            ArgKind::One if metadata.argument_list().count() != 1 => {
                self.warn(
                    ctx,
                    SemanticWarning::WrongArgumentCount { directive, span },
                    metadata.location,
                );
                return false;
            }
            ArgKind::RequiredText if !metadata.has_arguments() => {
                self.warn(
                    ctx,
                    SemanticWarning::MissingArguments { directive, span },
                    metadata.location,
                );
                return false;
            }
            _ => {}
        }

        if let Some(legal) = spec.legal_values {
            for arg in metadata.argument_list() {
                if !legal.contains(&arg) {
                    self.warn(
                        ctx,
                        SemanticWarning::InvalidArgumentValue {
                            directive: metadata.directive().to_string(),
                            value: arg.to_string(),
                            legal: legal.join(", "),
                            span: metadata.location.span.into(),
                        },
                        metadata.location,
                    );
                    return false;
                }
            }
        }
        true
    }

    /// The type a type-only directive on a definition actually applies to:
    /// an operation's return type, a member's or parameter's declared type.
    /// Pure type entities pass through unchanged.
    fn redirect_target(
        &self,
        ast: &Ast,
        element_id: Option<EntityId>,
        element: AppliesTo,
    ) -> Option<AppliesTo> {
        let id = element_id?;
        let underlying = match &ast.node(id).kind {
            NodeKind::Operation(op) => op.return_type,
            NodeKind::DataMember(member) => Some(member.ty),
            NodeKind::Parameter(param) => Some(param.ty),
            // Already a type context.
            _ => return Some(element),
        };
        AppliesTo::of_node(ast.node(underlying?))
    }

    fn misapplied(
        &mut self,
        spec: &DirectiveSpec,
        element: AppliesTo,
        ctx: ContextId,
        metadata: &Metadata,
    ) {
        self.warn(
            ctx,
            SemanticWarning::MisappliedDirective {
                directive: spec.name.to_string(),
                target: element.display().to_string(),
                span: metadata.location.span.into(),
            },
            metadata.location,
        );
    }

    fn warn(&mut self, ctx: ContextId, warning: SemanticWarning, location: Location) {
        self.warnings.push((ctx, warning, location));
    }
}

impl Visitor for MetadataValidator<'_> {
    fn visit_included_contexts(&self) -> bool {
        true
    }

    fn visit_unit_start(&mut self, ast: &Ast) {
        self.check_file_metadata(ast);
    }

    fn visit_module_start(&mut self, ast: &Ast, id: EntityId) -> bool {
        self.check_element(ast, id);
        true
    }

    fn visit_class_decl(&mut self, ast: &Ast, id: EntityId) {
        self.check_element(ast, id);
    }

    fn visit_class_def_start(&mut self, ast: &Ast, id: EntityId) -> bool {
        self.check_element(ast, id);
        true
    }

    fn visit_interface_decl(&mut self, ast: &Ast, id: EntityId) {
        self.check_element(ast, id);
    }

    fn visit_interface_def_start(&mut self, ast: &Ast, id: EntityId) -> bool {
        self.check_element(ast, id);
        true
    }

    fn visit_exception_start(&mut self, ast: &Ast, id: EntityId) -> bool {
        self.check_element(ast, id);
        true
    }

    fn visit_struct_start(&mut self, ast: &Ast, id: EntityId) -> bool {
        self.check_element(ast, id);
        true
    }

    fn visit_operation_start(&mut self, ast: &Ast, id: EntityId) -> bool {
        self.check_element(ast, id);
        true
    }

    fn visit_enum_start(&mut self, ast: &Ast, id: EntityId) -> bool {
        self.check_element(ast, id);
        true
    }

    fn visit_sequence(&mut self, ast: &Ast, id: EntityId) {
        self.check_element(ast, id);
    }

    fn visit_dictionary(&mut self, ast: &Ast, id: EntityId) {
        self.check_element(ast, id);
    }

    fn visit_enumerator(&mut self, ast: &Ast, id: EntityId) {
        self.check_element(ast, id);
    }

    fn visit_const(&mut self, ast: &Ast, id: EntityId) {
        self.check_element(ast, id);
    }

    fn visit_parameter(&mut self, ast: &Ast, id: EntityId) {
        self.check_element(ast, id);
    }

    fn visit_data_member(&mut self, ast: &Ast, id: EntityId) {
        self.check_element(ast, id);
    }
}

impl Unit {
    /// Run the metadata-annotation pass over the finished tree with the
    /// default registry.
    pub fn validate_metadata(&mut self, language: Option<&str>) {
        let registry = DirectiveRegistry::default();
        self.validate_metadata_with(language, &registry);
    }

    /// Run the metadata-annotation pass with a caller-supplied registry.
    pub fn validate_metadata_with(&mut self, language: Option<&str>, registry: &DirectiveRegistry) {
        let mut validator = MetadataValidator::new(registry, language);
        self.ast.visit(&mut validator);
        let output = validator.finish();

        for (id, kept) in output.retained {
            if let Some(contained) = &mut self.ast.node_mut(id).contained {
                contained.metadata = kept;
            }
        }
        for (ctx, kept) in output.retained_file {
            self.ast.context_mut(ctx).metadata = kept;
        }
        for (ctx, warning, location) in output.warnings {
            self.warning_in(Some(ctx), warning, location);
        }
    }
}
