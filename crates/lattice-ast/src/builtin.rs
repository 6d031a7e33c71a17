//! Built-in types and their wire-level properties.

use crate::types::OptionalFormat;

/// The built-in types of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinKind {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
    /// A class instance passed by value.
    Object,
    /// A proxy to a remote object.
    ObjectProxy,
    /// The root of the value hierarchy.
    Value,
}

impl BuiltinKind {
    pub const ALL: [BuiltinKind; 11] = [
        BuiltinKind::Bool,
        BuiltinKind::Byte,
        BuiltinKind::Short,
        BuiltinKind::Int,
        BuiltinKind::Long,
        BuiltinKind::Float,
        BuiltinKind::Double,
        BuiltinKind::String,
        BuiltinKind::Object,
        BuiltinKind::ObjectProxy,
        BuiltinKind::Value,
    ];

    /// The source-level keyword for this type.
    pub fn keyword(self) -> &'static str {
        match self {
            BuiltinKind::Bool => "bool",
            BuiltinKind::Byte => "byte",
            BuiltinKind::Short => "short",
            BuiltinKind::Int => "int",
            BuiltinKind::Long => "long",
            BuiltinKind::Float => "float",
            BuiltinKind::Double => "double",
            BuiltinKind::String => "string",
            BuiltinKind::Object => "Object",
            BuiltinKind::ObjectProxy => "Object*",
            BuiltinKind::Value => "Value",
        }
    }

    pub fn from_keyword(name: &str) -> Option<BuiltinKind> {
        BuiltinKind::ALL.iter().copied().find(|k| k.keyword() == name)
    }

    /// Minimum number of bytes this type occupies on the wire.
    pub fn min_wire_size(self) -> u32 {
        match self {
            BuiltinKind::Bool | BuiltinKind::Byte => 1,
            BuiltinKind::Short => 2,
            BuiltinKind::Int | BuiltinKind::Float => 4,
            BuiltinKind::Long | BuiltinKind::Double => 8,
            // Empty string: one size byte.
            BuiltinKind::String => 1,
            // Nil instance or marker byte.
            BuiltinKind::Object | BuiltinKind::Value => 1,
            // Nil proxy: two size bytes.
            BuiltinKind::ObjectProxy => 2,
        }
    }

    pub fn is_variable_length(self) -> bool {
        matches!(
            self,
            BuiltinKind::String
                | BuiltinKind::Object
                | BuiltinKind::ObjectProxy
                | BuiltinKind::Value
        )
    }

    /// Whether values of this type are (or may contain) class instances.
    pub fn uses_classes(self) -> bool {
        matches!(self, BuiltinKind::Object | BuiltinKind::Value)
    }

    pub fn is_integral(self) -> bool {
        matches!(
            self,
            BuiltinKind::Byte | BuiltinKind::Short | BuiltinKind::Int | BuiltinKind::Long
        )
    }

    pub fn is_numeric(self) -> bool {
        self.is_integral() || matches!(self, BuiltinKind::Float | BuiltinKind::Double)
    }

    pub fn optional_format(self) -> OptionalFormat {
        match self {
            BuiltinKind::Bool | BuiltinKind::Byte => OptionalFormat::F1,
            BuiltinKind::Short => OptionalFormat::F2,
            BuiltinKind::Int | BuiltinKind::Float => OptionalFormat::F4,
            BuiltinKind::Long | BuiltinKind::Double => OptionalFormat::F8,
            BuiltinKind::String => OptionalFormat::VSize,
            BuiltinKind::ObjectProxy => OptionalFormat::FSize,
            BuiltinKind::Object | BuiltinKind::Value => OptionalFormat::Class,
        }
    }
}
