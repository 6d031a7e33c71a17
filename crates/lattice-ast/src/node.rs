//! Arena node definitions: the entity kinds and the capability structs they
//! carry.
//!
//! An entity that is simultaneously a scope and a named member (a class, an
//! operation) holds two independent capability structs rather than belonging
//! to two type hierarchies; behavior is exposed through functions that take
//! whichever capability they need.

use lattice_identity::{ContextId, EntityId, Location};
use rustc_hash::FxHashMap;

use crate::builtin::BuiltinKind;
use crate::metadata::Metadata;

/// The "named member of a container" capability: every entity except the
/// global scope carries one.
#[derive(Debug, Clone)]
pub struct Contained {
    pub name: String,
    /// Fully qualified name, `::`-separated, computed once at creation.
    pub scoped_name: String,
    /// Owning container. Back-reference only; ownership is the arena's.
    pub parent: EntityId,
    /// Definition context (source file) this entity came from.
    pub context: ContextId,
    pub location: Location,
    pub comment: Option<String>,
    pub metadata: Vec<Metadata>,
}

/// The "holds nested named children" capability.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    /// Owned children, in declaration order.
    pub children: Vec<EntityId>,
    /// First entity each identifier's leading component was bound to in this
    /// scope. Used to reject meaning changes within one scope.
    pub introduced: FxHashMap<String, EntityId>,
}

/// Operation dispatch mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationMode {
    #[default]
    Normal,
    Idempotent,
}

/// A compile-time constant value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Reference to an enumerator entity.
    Enumerator(EntityId),
}

#[derive(Debug, Clone, Default)]
pub struct ClassDecl {
    /// Patched to the definition when (if) one is seen.
    pub definition: Option<EntityId>,
}

#[derive(Debug, Clone)]
pub struct ClassDef {
    /// The declaration this definition satisfies. Always present; a
    /// definition creates its declaration if none was forward-declared.
    pub declaration: EntityId,
    pub compact_id: Option<i32>,
    pub base: Option<EntityId>,
}

#[derive(Debug, Clone, Default)]
pub struct InterfaceDecl {
    pub definition: Option<EntityId>,
}

#[derive(Debug, Clone)]
pub struct InterfaceDef {
    pub declaration: EntityId,
    /// Direct bases, in declaration order.
    pub bases: Vec<EntityId>,
}

#[derive(Debug, Clone, Default)]
pub struct ExceptionDef {
    pub base: Option<EntityId>,
}

#[derive(Debug, Clone)]
pub struct Sequence {
    pub element: EntityId,
}

#[derive(Debug, Clone)]
pub struct Dictionary {
    pub key: EntityId,
    pub value: EntityId,
}

#[derive(Debug, Clone)]
pub struct EnumDef {
    pub has_explicit_values: bool,
    /// Running value range, used by duplicate detection. The bounds start
    /// inverted (max < min) and close in as enumerators are added.
    pub min_value: i64,
    pub max_value: i64,
    /// Value assigned to the most recent enumerator; implicit values are
    /// this plus one.
    pub last_value: i64,
}

impl Default for EnumDef {
    fn default() -> Self {
        Self {
            has_explicit_values: false,
            min_value: i64::MAX,
            max_value: i64::MIN,
            last_value: -1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Enumerator {
    pub value: i64,
}

#[derive(Debug, Clone)]
pub struct ConstDef {
    pub ty: EntityId,
    pub value: Literal,
}

#[derive(Debug, Clone)]
pub struct Operation {
    /// None for void operations.
    pub return_type: Option<EntityId>,
    /// Tag for an optional return value.
    pub return_tag: Option<i32>,
    pub mode: OperationMode,
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub ty: EntityId,
    /// Tag marking this parameter optional.
    pub tag: Option<i32>,
    pub is_out: bool,
}

#[derive(Debug, Clone)]
pub struct DataMember {
    pub ty: EntityId,
    pub tag: Option<i32>,
    pub default: Option<Literal>,
}

/// The closed set of entity kinds.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// The arena's root scope; exactly one, at index 0.
    GlobalScope,
    Builtin(BuiltinKind),
    Module,
    ClassDecl(ClassDecl),
    ClassDef(ClassDef),
    InterfaceDecl(InterfaceDecl),
    InterfaceDef(InterfaceDef),
    Exception(ExceptionDef),
    Struct,
    Sequence(Sequence),
    Dictionary(Dictionary),
    Enum(EnumDef),
    Enumerator(Enumerator),
    Const(ConstDef),
    Operation(Operation),
    Parameter(Parameter),
    DataMember(DataMember),
    /// A slot reserved ahead of population, so an entity has a stable id
    /// while it is still being filled in.
    Reserved,
}

/// One entity in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub contained: Option<Contained>,
    pub scope: Option<Scope>,
}

impl Node {
    pub fn reserved() -> Self {
        Node {
            kind: NodeKind::Reserved,
            contained: None,
            scope: None,
        }
    }

    pub fn name(&self) -> &str {
        self.contained.as_ref().map_or("", |c| c.name.as_str())
    }

    pub fn scoped_name(&self) -> &str {
        self.contained
            .as_ref()
            .map_or("::", |c| c.scoped_name.as_str())
    }

    /// Human-readable kind name, as used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::GlobalScope => "global scope",
            NodeKind::Builtin(_) => "primitive type",
            NodeKind::Module => "module",
            NodeKind::ClassDecl(_) | NodeKind::ClassDef(_) => "class",
            NodeKind::InterfaceDecl(_) | NodeKind::InterfaceDef(_) => "interface",
            NodeKind::Exception(_) => "exception",
            NodeKind::Struct => "structure",
            NodeKind::Sequence(_) => "sequence",
            NodeKind::Dictionary(_) => "dictionary",
            NodeKind::Enum(_) => "enumeration",
            NodeKind::Enumerator(_) => "enumerator",
            NodeKind::Const(_) => "constant",
            NodeKind::Operation(_) => "operation",
            NodeKind::Parameter(_) => "parameter",
            NodeKind::DataMember(_) => "data member",
            NodeKind::Reserved => "<reserved>",
        }
    }

    /// Whether this entity denotes a type usable in type positions.
    pub fn is_type(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Builtin(_)
                | NodeKind::ClassDecl(_)
                | NodeKind::ClassDef(_)
                | NodeKind::InterfaceDecl(_)
                | NodeKind::InterfaceDef(_)
                | NodeKind::Struct
                | NodeKind::Sequence(_)
                | NodeKind::Dictionary(_)
                | NodeKind::Enum(_)
        )
    }

    /// Two entities are compatible for redeclaration when they are the same
    /// kind of thing (module reopening, repeated forward declaration). A
    /// declaration and its definition are also compatible.
    pub fn same_kind(&self, other: &Node) -> bool {
        use NodeKind::*;
        matches!(
            (&self.kind, &other.kind),
            (GlobalScope, GlobalScope)
                | (Builtin(_), Builtin(_))
                | (Module, Module)
                | (ClassDecl(_) | ClassDef(_), ClassDecl(_) | ClassDef(_))
                | (InterfaceDecl(_) | InterfaceDef(_), InterfaceDecl(_) | InterfaceDef(_))
                | (Exception(_), Exception(_))
                | (Struct, Struct)
                | (Sequence(_), Sequence(_))
                | (Dictionary(_), Dictionary(_))
                | (Enum(_), Enum(_))
                | (Enumerator(_), Enumerator(_))
                | (Const(_), Const(_))
                | (Operation(_), Operation(_))
                | (Parameter(_), Parameter(_))
                | (DataMember(_), DataMember(_))
        )
    }

    pub fn as_builtin(&self) -> Option<BuiltinKind> {
        match self.kind {
            NodeKind::Builtin(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn as_class_decl(&self) -> Option<&ClassDecl> {
        match &self.kind {
            NodeKind::ClassDecl(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_class_decl_mut(&mut self) -> Option<&mut ClassDecl> {
        match &mut self.kind {
            NodeKind::ClassDecl(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_class_def(&self) -> Option<&ClassDef> {
        match &self.kind {
            NodeKind::ClassDef(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_interface_decl(&self) -> Option<&InterfaceDecl> {
        match &self.kind {
            NodeKind::InterfaceDecl(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_interface_decl_mut(&mut self) -> Option<&mut InterfaceDecl> {
        match &mut self.kind {
            NodeKind::InterfaceDecl(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_interface_def(&self) -> Option<&InterfaceDef> {
        match &self.kind {
            NodeKind::InterfaceDef(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_exception(&self) -> Option<&ExceptionDef> {
        match &self.kind {
            NodeKind::Exception(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match &self.kind {
            NodeKind::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&Dictionary> {
        match &self.kind {
            NodeKind::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumDef> {
        match &self.kind {
            NodeKind::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_enum_mut(&mut self) -> Option<&mut EnumDef> {
        match &mut self.kind {
            NodeKind::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_enumerator(&self) -> Option<&Enumerator> {
        match &self.kind {
            NodeKind::Enumerator(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_const(&self) -> Option<&ConstDef> {
        match &self.kind {
            NodeKind::Const(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_operation(&self) -> Option<&Operation> {
        match &self.kind {
            NodeKind::Operation(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_parameter(&self) -> Option<&Parameter> {
        match &self.kind {
            NodeKind::Parameter(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_data_member(&self) -> Option<&DataMember> {
        match &self.kind {
            NodeKind::DataMember(m) => Some(m),
            _ => None,
        }
    }
}
