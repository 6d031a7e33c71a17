//! Metadata annotations.
//!
//! A raw annotation is split into directive and arguments exactly once, at
//! attachment time, independent of which entity it is later validated
//! against.

use lattice_identity::Location;

/// Language prefixes recognized in directives. A directive such as
/// `cpp:view-type:std::string_view` belongs to the `cpp` backend; the second
/// colon separates directive from arguments.
pub const LANGUAGE_PREFIXES: [&str; 9] = [
    "cpp", "cs", "java", "js", "matlab", "php", "python", "ruby", "swift",
];

/// One parsed annotation: directive, arguments, and where it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    directive: String,
    arguments: String,
    pub location: Location,
}

impl Metadata {
    /// Split a raw `directive[:arguments]` string.
    ///
    /// If the text before the first `:` is a known language prefix, the
    /// directive extends to the second `:` (if present); otherwise the first
    /// `:` marks the boundary. With no `:` the whole string is the directive.
    pub fn parse(raw: &str, location: Location) -> Self {
        let (directive, arguments) = match raw.split_once(':') {
            None => (raw, ""),
            Some((head, rest)) => {
                if LANGUAGE_PREFIXES.contains(&head) {
                    match rest.split_once(':') {
                        Some((dir, args)) => (&raw[..head.len() + 1 + dir.len()], args),
                        None => (raw, ""),
                    }
                } else {
                    (head, rest)
                }
            }
        };
        Metadata {
            directive: directive.to_string(),
            arguments: arguments.to_string(),
            location,
        }
    }

    pub fn directive(&self) -> &str {
        &self.directive
    }

    pub fn arguments(&self) -> &str {
        &self.arguments
    }

    pub fn has_arguments(&self) -> bool {
        !self.arguments.is_empty()
    }

    /// The language prefix of the directive, if it has one.
    pub fn language_prefix(&self) -> Option<&str> {
        let head = self.directive.split(':').next()?;
        LANGUAGE_PREFIXES.contains(&head).then_some(head)
    }

    /// Arguments split on commas, trimmed.
    pub fn argument_list(&self) -> impl Iterator<Item = &str> {
        self.arguments
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Metadata {
        Metadata::parse(raw, Location::default())
    }

    #[test]
    fn bare_directive() {
        let m = parse("deprecated");
        assert_eq!(m.directive(), "deprecated");
        assert_eq!(m.arguments(), "");
        assert_eq!(m.language_prefix(), None);
    }

    #[test]
    fn directive_with_arguments() {
        let m = parse("format:sliced");
        assert_eq!(m.directive(), "format");
        assert_eq!(m.arguments(), "sliced");
    }

    #[test]
    fn language_prefix_consumes_second_colon() {
        let m = parse("cpp:view-type:std::string_view");
        assert_eq!(m.directive(), "cpp:view-type");
        assert_eq!(m.arguments(), "std::string_view");
        assert_eq!(m.language_prefix(), Some("cpp"));
    }

    #[test]
    fn language_prefix_without_arguments() {
        let m = parse("cpp:array");
        assert_eq!(m.directive(), "cpp:array");
        assert_eq!(m.arguments(), "");
    }

    #[test]
    fn unknown_prefix_splits_at_first_colon() {
        let m = parse("rust:type:Vec<u8>");
        assert_eq!(m.directive(), "rust");
        assert_eq!(m.arguments(), "type:Vec<u8>");
    }

    #[test]
    fn argument_list_trims_and_skips_empties() {
        let m = parse("suppress-warning: deprecated , invalid-metadata,");
        let args: Vec<&str> = m.argument_list().collect();
        assert_eq!(args, ["deprecated", "invalid-metadata"]);
    }
}
