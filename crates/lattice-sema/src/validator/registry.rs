//! The directive registry: one entry per known metadata directive,
//! specifying where it may appear, what arguments it takes, and any extra
//! validation.

use lattice_ast::{Metadata, Node, NodeKind};
use rustc_hash::FxHashMap;

/// Accepted argument shape for a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// No arguments allowed.
    None,
    /// Exactly one argument.
    One,
    /// Free-form text, required.
    RequiredText,
    /// Free-form text, optional.
    OptionalText,
    /// Any number of arguments, including none.
    Any,
}

/// Whether a directive targets types, definitions, or either.
///
/// A type-only directive applied to a definition is redirected to the
/// definition's type (return type, field type, parameter type); a
/// definition-only directive never redirects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Either,
    TypeOnly,
    DefinitionOnly,
}

/// Entity kinds a directive may attach to. `File` stands for file-level
/// metadata in a definition context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliesTo {
    File,
    Module,
    Class,
    Interface,
    Exception,
    Struct,
    Sequence,
    Dictionary,
    Enum,
    Enumerator,
    Const,
    Operation,
    Parameter,
    DataMember,
    Builtin,
}

impl AppliesTo {
    /// Classify an arena node for the applies-to check.
    pub fn of_node(node: &Node) -> Option<AppliesTo> {
        match &node.kind {
            NodeKind::Module => Some(AppliesTo::Module),
            NodeKind::ClassDecl(_) | NodeKind::ClassDef(_) => Some(AppliesTo::Class),
            NodeKind::InterfaceDecl(_) | NodeKind::InterfaceDef(_) => Some(AppliesTo::Interface),
            NodeKind::Exception(_) => Some(AppliesTo::Exception),
            NodeKind::Struct => Some(AppliesTo::Struct),
            NodeKind::Sequence(_) => Some(AppliesTo::Sequence),
            NodeKind::Dictionary(_) => Some(AppliesTo::Dictionary),
            NodeKind::Enum(_) => Some(AppliesTo::Enum),
            NodeKind::Enumerator(_) => Some(AppliesTo::Enumerator),
            NodeKind::Const(_) => Some(AppliesTo::Const),
            NodeKind::Operation(_) => Some(AppliesTo::Operation),
            NodeKind::Parameter(_) => Some(AppliesTo::Parameter),
            NodeKind::DataMember(_) => Some(AppliesTo::DataMember),
            NodeKind::Builtin(_) => Some(AppliesTo::Builtin),
            NodeKind::GlobalScope | NodeKind::Reserved => None,
        }
    }

    /// The wording diagnostics use for a rejected target.
    pub fn display(self) -> &'static str {
        match self {
            AppliesTo::File => "file metadata",
            AppliesTo::Module => "modules",
            AppliesTo::Class => "classes",
            AppliesTo::Interface => "interfaces",
            AppliesTo::Exception => "exceptions",
            AppliesTo::Struct => "structures",
            AppliesTo::Sequence => "sequences",
            AppliesTo::Dictionary => "dictionaries",
            AppliesTo::Enum => "enumerations",
            AppliesTo::Enumerator => "enumerators",
            AppliesTo::Const => "constants",
            AppliesTo::Operation => "operations",
            AppliesTo::Parameter => "parameters",
            AppliesTo::DataMember => "data members",
            AppliesTo::Builtin => "primitive types",
        }
    }
}

/// Custom validation hook run after every structural check has passed.
pub type ExtraCheck = fn(&Metadata) -> Result<(), String>;

#[derive(Debug, Clone)]
pub struct DirectiveSpec {
    pub name: &'static str,
    pub applies_to: &'static [AppliesTo],
    pub arity: ArgKind,
    /// Closed set of legal argument values, checked per comma-split
    /// argument.
    pub legal_values: Option<&'static [&'static str]>,
    pub placement: Placement,
    /// At most one occurrence per element.
    pub unique: bool,
    pub extra_check: Option<ExtraCheck>,
}

/// Registry of known directives, keyed by full directive name (including any
/// language prefix). Generators may register their own entries before
/// validation runs.
#[derive(Debug, Clone)]
pub struct DirectiveRegistry {
    by_name: FxHashMap<&'static str, DirectiveSpec>,
}

impl DirectiveRegistry {
    /// An empty registry, for callers that want full control.
    pub fn empty() -> Self {
        Self {
            by_name: FxHashMap::default(),
        }
    }

    pub fn register(&mut self, spec: DirectiveSpec) {
        self.by_name.insert(spec.name, spec);
    }

    pub fn get(&self, name: &str) -> Option<&DirectiveSpec> {
        self.by_name.get(name)
    }
}

fn serial_version_uid_is_integer(metadata: &Metadata) -> Result<(), String> {
    metadata
        .arguments()
        .trim()
        .parse::<i64>()
        .map(|_| ())
        .map_err(|_| format!("`{}` is not a valid serial version UID", metadata.arguments()))
}

impl Default for DirectiveRegistry {
    fn default() -> Self {
        use AppliesTo::*;

        let mut registry = DirectiveRegistry::empty();

        registry.register(DirectiveSpec {
            name: "deprecated",
            applies_to: &[
                Module, Class, Interface, Exception, Struct, Sequence, Dictionary, Enum,
                Enumerator, Const, Operation, DataMember,
            ],
            arity: ArgKind::OptionalText,
            legal_values: None,
            placement: Placement::DefinitionOnly,
            unique: true,
            extra_check: None,
        });

        registry.register(DirectiveSpec {
            name: "format",
            applies_to: &[Operation],
            arity: ArgKind::One,
            legal_values: Some(&["compact", "sliced", "default"]),
            placement: Placement::DefinitionOnly,
            unique: true,
            extra_check: None,
        });

        registry.register(DirectiveSpec {
            name: "amd",
            applies_to: &[Interface, Operation],
            arity: ArgKind::None,
            legal_values: None,
            placement: Placement::DefinitionOnly,
            unique: true,
            extra_check: None,
        });

        registry.register(DirectiveSpec {
            name: "marshaled-result",
            applies_to: &[Interface, Operation],
            arity: ArgKind::None,
            legal_values: None,
            placement: Placement::DefinitionOnly,
            unique: true,
            extra_check: None,
        });

        registry.register(DirectiveSpec {
            name: "protected",
            applies_to: &[Class, Struct, Exception, DataMember],
            arity: ArgKind::None,
            legal_values: None,
            placement: Placement::DefinitionOnly,
            unique: true,
            extra_check: None,
        });

        registry.register(DirectiveSpec {
            name: "suppress-warning",
            applies_to: &[File],
            arity: ArgKind::Any,
            legal_values: Some(&["all", "deprecated", "invalid-metadata"]),
            placement: Placement::DefinitionOnly,
            unique: false,
            extra_check: None,
        });

        registry.register(DirectiveSpec {
            name: "cpp:type",
            applies_to: &[Sequence, Dictionary, Struct, Builtin],
            arity: ArgKind::RequiredText,
            legal_values: None,
            placement: Placement::TypeOnly,
            unique: true,
            extra_check: None,
        });

        registry.register(DirectiveSpec {
            name: "cpp:view-type",
            applies_to: &[Sequence, Dictionary, Builtin],
            arity: ArgKind::RequiredText,
            legal_values: None,
            placement: Placement::TypeOnly,
            unique: true,
            extra_check: None,
        });

        registry.register(DirectiveSpec {
            name: "cpp:array",
            applies_to: &[Sequence],
            arity: ArgKind::None,
            legal_values: None,
            placement: Placement::TypeOnly,
            unique: true,
            extra_check: None,
        });

        registry.register(DirectiveSpec {
            name: "java:serial-version-uid",
            applies_to: &[Class, Exception],
            arity: ArgKind::RequiredText,
            legal_values: None,
            placement: Placement::DefinitionOnly,
            unique: true,
            extra_check: Some(serial_version_uid_is_integer),
        });

        registry
    }
}
