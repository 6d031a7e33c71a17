// tests/metadata.rs
//! Integration tests for the metadata validation pass: every failing check
//! warns and removes the annotation; nothing here is a hard error.

use lattice_ast::{BuiltinKind, OperationMode};
use lattice_identity::EntityId;
use lattice_sema::{SemanticWarning, Unit};

fn unit() -> Unit {
    let mut unit = Unit::new();
    unit.push_file("test.lat", false);
    unit
}

fn open_module(unit: &mut Unit, name: &str) -> EntityId {
    let id = unit.create_module(name);
    unit.push_container(id);
    id
}

fn metadata_of(unit: &Unit, id: EntityId) -> Vec<String> {
    unit.ast()
        .node(id)
        .contained
        .as_ref()
        .map(|c| c.metadata.iter().map(|m| m.directive().to_string()).collect())
        .unwrap_or_default()
}

#[test]
fn misapplied_directive_warns_once_and_is_removed() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let s = unit.create_struct("S");
    unit.push_container(s);
    let member = unit.create_data_member("x", unit.builtin(BuiltinKind::Int), None, None);
    unit.add_metadata(member, "amd");

    unit.validate_metadata(None);
    assert_eq!(unit.error_count(), 0);
    let warnings = unit.diagnostics().warnings();
    assert_eq!(warnings.len(), 1);
    match &warnings[0].warning {
        SemanticWarning::MisappliedDirective {
            directive, target, ..
        } => {
            assert_eq!(directive, "amd");
            assert_eq!(target, "data members");
        }
        other => panic!("expected MisappliedDirective, got {other:?}"),
    }
    assert!(metadata_of(&unit, member).is_empty());
}

#[test]
fn duplicate_unique_directive_keeps_the_first() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let s = unit.create_struct("S");
    unit.add_metadata(s, "deprecated:use T instead");
    unit.add_metadata(s, "deprecated:no really");

    unit.validate_metadata(None);
    let warnings = unit.diagnostics().warnings();
    assert_eq!(warnings.len(), 1);
    assert!(matches!(
        warnings[0].warning,
        SemanticWarning::DuplicateDirective { .. }
    ));

    let kept = &unit.ast().node(s).contained.as_ref().unwrap().metadata;
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].arguments(), "use T instead");
}

#[test]
fn unknown_directive_warns_and_is_removed() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let s = unit.create_struct("S");
    unit.add_metadata(s, "no-such-directive");

    unit.validate_metadata(None);
    assert!(matches!(
        unit.diagnostics().warnings()[0].warning,
        SemanticWarning::UnknownDirective { .. }
    ));
    assert!(metadata_of(&unit, s).is_empty());
}

#[test]
fn format_arguments_are_checked_against_legal_values() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let iface = unit.create_interface_def("I", &[]);
    unit.push_container(iface);
    let good = unit.create_operation("good", None, None, OperationMode::Normal);
    let bad = unit.create_operation("bad", None, None, OperationMode::Normal);
    unit.add_metadata(good, "format:sliced");
    unit.add_metadata(bad, "format:pretty");

    unit.validate_metadata(None);
    let warnings = unit.diagnostics().warnings();
    assert_eq!(warnings.len(), 1);
    match &warnings[0].warning {
        SemanticWarning::InvalidArgumentValue { value, .. } => assert_eq!(value, "pretty"),
        other => panic!("expected InvalidArgumentValue, got {other:?}"),
    }
    assert_eq!(metadata_of(&unit, good), vec!["format"]);
    assert!(metadata_of(&unit, bad).is_empty());
}

#[test]
fn argument_arity_is_enforced() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let iface = unit.create_interface_def("I", &[]);
    unit.add_metadata(iface, "amd:unexpected");
    let seq = unit.create_sequence("Seq", unit.builtin(BuiltinKind::Int));
    unit.add_metadata(seq, "cpp:type");

    unit.validate_metadata(Some("cpp"));
    let warnings = unit.diagnostics().warnings();
    assert_eq!(warnings.len(), 2);
    assert!(matches!(
        warnings[0].warning,
        SemanticWarning::UnexpectedArguments { .. }
    ));
    assert!(matches!(
        warnings[1].warning,
        SemanticWarning::MissingArguments { .. }
    ));
    assert!(metadata_of(&unit, iface).is_empty());
    assert!(metadata_of(&unit, seq).is_empty());
}

#[test]
fn other_language_annotations_are_dropped_silently() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let seq = unit.create_sequence("Seq", unit.builtin(BuiltinKind::Int));
    unit.add_metadata(seq, "cpp:type:std::list<int>");

    unit.validate_metadata(Some("java"));
    assert!(unit.diagnostics().warnings().is_empty());
    assert!(metadata_of(&unit, seq).is_empty());
}

#[test]
fn matching_language_annotations_are_kept() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let seq = unit.create_sequence("Seq", unit.builtin(BuiltinKind::Int));
    unit.add_metadata(seq, "cpp:type:std::list<int>");

    unit.validate_metadata(Some("cpp"));
    assert!(unit.diagnostics().warnings().is_empty());
    assert_eq!(metadata_of(&unit, seq), vec!["cpp:type"]);
    let kept = &unit.ast().node(seq).contained.as_ref().unwrap().metadata;
    assert_eq!(kept[0].arguments(), "std::list<int>");
}

#[test]
fn type_only_directive_redirects_to_the_underlying_type() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let seq = unit.create_sequence("Seq", unit.builtin(BuiltinKind::Byte));
    let iface = unit.create_interface_def("I", &[]);
    unit.push_container(iface);
    let returns_seq = unit.create_operation("fetch", Some(seq), None, OperationMode::Normal);
    let returns_nothing = unit.create_operation("ping", None, None, OperationMode::Normal);
    unit.add_metadata(returns_seq, "cpp:array");
    unit.add_metadata(returns_nothing, "cpp:array");

    unit.validate_metadata(Some("cpp"));
    // On `fetch` the directive lands on the returned sequence type; `ping`
    // has no type for it to land on.
    let warnings = unit.diagnostics().warnings();
    assert_eq!(warnings.len(), 1);
    assert!(matches!(
        warnings[0].warning,
        SemanticWarning::MisappliedDirective { .. }
    ));
    assert_eq!(metadata_of(&unit, returns_seq), vec!["cpp:array"]);
    assert!(metadata_of(&unit, returns_nothing).is_empty());
}

#[test]
fn file_metadata_is_validated_too() {
    let mut unit = unit();
    let ctx = unit.push_file("other.lat", false);
    unit.add_file_metadata("amd");

    unit.validate_metadata(None);
    let warnings = unit.diagnostics().warnings();
    assert_eq!(warnings.len(), 1);
    match &warnings[0].warning {
        SemanticWarning::MisappliedDirective { target, .. } => {
            assert_eq!(target, "file metadata");
        }
        other => panic!("expected MisappliedDirective, got {other:?}"),
    }
    assert!(unit.ast().context(ctx).metadata.is_empty());
}

#[test]
fn suppress_warning_silences_metadata_warnings_in_its_file() {
    let mut unit = unit();
    unit.add_file_metadata("suppress-warning:invalid-metadata");
    open_module(&mut unit, "M");
    let s = unit.create_struct("S");
    unit.add_metadata(s, "no-such-directive");

    unit.validate_metadata(None);
    assert!(unit.diagnostics().warnings().is_empty());
    // The bad annotation is still removed, just quietly.
    assert!(metadata_of(&unit, s).is_empty());
}

#[test]
fn suppress_warning_without_arguments_covers_everything() {
    let mut unit = unit();
    unit.add_file_metadata("suppress-warning");
    open_module(&mut unit, "M");
    let s = unit.create_struct("S");
    unit.add_metadata(s, "no-such-directive");

    unit.validate_metadata(None);
    assert!(unit.diagnostics().warnings().is_empty());
}

#[test]
fn unknown_suppress_warning_category_is_reported() {
    let mut unit = unit();
    unit.add_file_metadata("suppress-warning:bogus");
    assert!(matches!(
        unit.diagnostics().warnings()[0].warning,
        SemanticWarning::UnknownWarningCategory { .. }
    ));

    // Validation also rejects the illegal argument value.
    unit.validate_metadata(None);
    assert!(unit
        .diagnostics()
        .warnings()
        .iter()
        .any(|w| matches!(w.warning, SemanticWarning::InvalidArgumentValue { .. })));
}

#[test]
fn serial_version_uid_must_be_an_integer() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let good = unit.create_class_def("Good", None, None);
    let bad = unit.create_class_def("Bad", None, None);
    unit.add_metadata(good, "java:serial-version-uid:123456789");
    unit.add_metadata(bad, "java:serial-version-uid:not-a-number");

    unit.validate_metadata(Some("java"));
    let warnings = unit.diagnostics().warnings();
    assert_eq!(warnings.len(), 1);
    assert!(matches!(
        warnings[0].warning,
        SemanticWarning::DirectiveCheckFailed { .. }
    ));
    assert_eq!(metadata_of(&unit, good), vec!["java:serial-version-uid"]);
    assert!(metadata_of(&unit, bad).is_empty());
}

#[test]
fn valid_annotations_survive_untouched() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let iface = unit.create_interface_def("I", &[]);
    unit.add_metadata(iface, "amd");
    unit.add_metadata(iface, "deprecated");

    unit.validate_metadata(None);
    assert!(unit.diagnostics().warnings().is_empty());
    assert_eq!(metadata_of(&unit, iface), vec!["amd", "deprecated"]);
}
