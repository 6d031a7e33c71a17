// errors.rs
//! Semantic errors (E1xxx) and warnings (W1xxx).

use lattice_ast::WarningCategory;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum SemanticError {
    #[error("redefinition of `{name}` as {new_kind}; previously defined as {existing_kind}")]
    #[diagnostic(code(E1001))]
    Redefinition {
        name: String,
        existing_kind: &'static str,
        new_kind: &'static str,
        #[label("redefined here")]
        span: SourceSpan,
    },

    #[error("`{name}` differs only in capitalization from `{existing}`")]
    #[diagnostic(code(E1002))]
    CapitalizationMismatch {
        name: String,
        existing: String,
        #[label("conflicting capitalization")]
        span: SourceSpan,
    },

    #[error("only modules can be defined at global scope, not a {kind}")]
    #[diagnostic(code(E1003))]
    GlobalScopeViolation {
        kind: &'static str,
        #[label("must be inside a module")]
        span: SourceSpan,
    },

    #[error("`{name}` is not defined")]
    #[diagnostic(code(E1004))]
    Undefined {
        name: String,
        #[label("not found in any enclosing scope")]
        span: SourceSpan,
    },

    #[error("`{name}` has been declared but not defined")]
    #[diagnostic(code(E1005))]
    DeclaredButNotDefined {
        name: String,
        #[label("definition required here")]
        span: SourceSpan,
    },

    #[error("`{name}` has changed meaning in this scope")]
    #[diagnostic(code(E1006))]
    ChangedMeaning {
        name: String,
        #[label("resolves to a different entity than an earlier use")]
        span: SourceSpan,
    },

    #[error("`{name}` is ambiguous: candidates are {candidates}")]
    #[diagnostic(code(E1007))]
    AmbiguousReference {
        name: String,
        candidates: String,
        #[label("ambiguous reference")]
        span: SourceSpan,
    },

    #[error("tag {value} is out of range (tags must be in [0, 2147483647])")]
    #[diagnostic(code(E1008))]
    TagOutOfRange {
        value: i64,
        #[label("out of range")]
        span: SourceSpan,
    },

    #[error("compact id {value} is out of range (ids must be in [0, 2147483647])")]
    #[diagnostic(code(E1009))]
    CompactIdOutOfRange {
        value: i64,
        #[label("out of range")]
        span: SourceSpan,
    },

    #[error("compact id {id} is already assigned to `{existing}`")]
    #[diagnostic(code(E1010))]
    CompactIdDuplicate {
        id: i32,
        existing: String,
        #[label("duplicate compact id")]
        span: SourceSpan,
    },

    #[error("duplicate tag {tag}")]
    #[diagnostic(code(E1011))]
    DuplicateTag {
        tag: i32,
        #[label("tag already used in this scope")]
        span: SourceSpan,
    },

    #[error("structure `{name}` cannot contain itself")]
    #[diagnostic(code(E1012))]
    SelfContainingStruct {
        name: String,
        #[label("recursive member")]
        span: SourceSpan,
    },

    #[error("`{type_name}` is not a legal dictionary key type")]
    #[diagnostic(
        code(E1013),
        help("keys must be integral, boolean, string, enum, or structs of such types")
    )]
    IllegalDictionaryKey {
        type_name: String,
        #[label("illegal key type")]
        span: SourceSpan,
    },

    #[error("enumerator `{name}` has the same value ({value}) as `{other}`")]
    #[diagnostic(code(E1014))]
    DuplicateEnumeratorValue {
        name: String,
        other: String,
        value: i64,
        #[label("duplicate value")]
        span: SourceSpan,
    },

    #[error("enumerator `{name}` has value {value} outside [0, 2147483647]")]
    #[diagnostic(code(E1015))]
    EnumeratorValueOutOfRange {
        name: String,
        value: i64,
        #[label("out of range")]
        span: SourceSpan,
    },

    #[error("`{name}` does not denote a type")]
    #[diagnostic(code(E1016))]
    NotAType {
        name: String,
        #[label("a type is required here")]
        span: SourceSpan,
    },

    #[error("`{name}` does not resolve to an enumerator or an integral constant")]
    #[diagnostic(code(E1017))]
    BadTagReference {
        name: String,
        #[label("cannot be used as a tag value")]
        span: SourceSpan,
    },

    #[error("initializer of constant `{name}` is not compatible with `{type_name}`")]
    #[diagnostic(code(E1018))]
    BadConstValue {
        name: String,
        type_name: String,
        #[label("incompatible initializer")]
        span: SourceSpan,
    },

    #[error("`{name}` cannot be used as a base: it is a {kind}")]
    #[diagnostic(code(E1019))]
    BadBase {
        name: String,
        kind: &'static str,
        #[label("illegal base")]
        span: SourceSpan,
    },

    #[error("ambiguous multiple inheritance: operation `{operation}` reaches `{interface}` through more than one base")]
    #[diagnostic(code(E1020))]
    AmbiguousInheritance {
        interface: String,
        operation: String,
        #[label("inherited ambiguously")]
        span: SourceSpan,
    },

    #[error("operations `{first}` and `{second}` inherited by `{interface}` differ only in capitalization")]
    #[diagnostic(code(E1021))]
    InheritedCapitalizationMismatch {
        interface: String,
        first: String,
        second: String,
        #[label("conflicting inherited operations")]
        span: SourceSpan,
    },

    #[error("required parameter `{name}` declared after a tagged parameter")]
    #[diagnostic(code(E1022))]
    RequiredAfterTagged {
        name: String,
        #[label("must precede all tagged parameters")]
        span: SourceSpan,
    },
}

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum SemanticWarning {
    #[error("ignoring unknown metadata directive `{directive}`")]
    #[diagnostic(code(W1001))]
    UnknownDirective {
        directive: String,
        #[label("unknown directive")]
        span: SourceSpan,
    },

    #[error("metadata directive `{directive}` takes no arguments")]
    #[diagnostic(code(W1002))]
    UnexpectedArguments {
        directive: String,
        #[label("arguments not allowed")]
        span: SourceSpan,
    },

    #[error("metadata directive `{directive}` requires an argument")]
    #[diagnostic(code(W1003))]
    MissingArguments {
        directive: String,
        #[label("argument required")]
        span: SourceSpan,
    },

    #[error("metadata directive `{directive}` takes exactly one argument")]
    #[diagnostic(code(W1004))]
    WrongArgumentCount {
        directive: String,
        #[label("exactly one argument expected")]
        span: SourceSpan,
    },

    #[error("`{value}` is not a legal argument for metadata directive `{directive}`")]
    #[diagnostic(code(W1005))]
    InvalidArgumentValue {
        directive: String,
        value: String,
        legal: String,
        #[label("legal values: {legal}")]
        span: SourceSpan,
    },

    #[error("metadata directive `{directive}` cannot be applied to {target}")]
    #[diagnostic(code(W1006))]
    MisappliedDirective {
        directive: String,
        target: String,
        #[label("misapplied directive")]
        span: SourceSpan,
    },

    #[error("ignoring duplicate metadata directive `{directive}`")]
    #[diagnostic(code(W1007))]
    DuplicateDirective {
        directive: String,
        #[label("already applied to this element")]
        span: SourceSpan,
    },

    #[error("`{name}` matches `{found}` but differs in capitalization")]
    #[diagnostic(code(W1008))]
    CaseMismatchedLookup {
        name: String,
        found: String,
        #[label("capitalization mismatch")]
        span: SourceSpan,
    },

    #[error("unknown warning category `{name}` in suppress-warning metadata")]
    #[diagnostic(code(W1009))]
    UnknownWarningCategory {
        name: String,
        #[label("unknown category")]
        span: SourceSpan,
    },

    #[error("metadata directive `{directive}` rejected: {message}")]
    #[diagnostic(code(W1010))]
    DirectiveCheckFailed {
        directive: String,
        message: String,
        #[label("failed validation")]
        span: SourceSpan,
    },
}

impl SemanticWarning {
    /// Category used for `suppress-warning` filtering.
    pub fn category(&self) -> WarningCategory {
        match self {
            SemanticWarning::UnknownDirective { .. }
            | SemanticWarning::UnexpectedArguments { .. }
            | SemanticWarning::MissingArguments { .. }
            | SemanticWarning::WrongArgumentCount { .. }
            | SemanticWarning::InvalidArgumentValue { .. }
            | SemanticWarning::MisappliedDirective { .. }
            | SemanticWarning::DuplicateDirective { .. }
            | SemanticWarning::UnknownWarningCategory { .. }
            | SemanticWarning::DirectiveCheckFailed { .. } => WarningCategory::InvalidMetadata,
            SemanticWarning::CaseMismatchedLookup { .. } => WarningCategory::All,
        }
    }
}
