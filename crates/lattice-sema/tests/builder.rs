// tests/builder.rs
//! Integration tests for the builder: scope resolution, forward
//! declarations, inheritance checks, tags, and enumerators.

use lattice_ast::{BuiltinKind, ExceptionDef, Literal, OperationMode};
use lattice_identity::EntityId;
use lattice_sema::{SemanticError, TagRef, Unit, SENTINEL_TAG};

fn unit() -> Unit {
    let mut unit = Unit::new();
    unit.push_file("test.lat", false);
    unit
}

/// Open a module and enter it.
fn open_module(unit: &mut Unit, name: &str) -> EntityId {
    let id = unit.create_module(name);
    unit.push_container(id);
    id
}

#[test]
fn reopening_a_module_reuses_the_entity() {
    let mut unit = unit();
    let first = unit.create_module("M");
    let second = unit.create_module("M");
    assert_eq!(first, second);
    assert_eq!(unit.error_count(), 0);
}

#[test]
fn module_redefinition_by_other_kind_is_an_error() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    unit.create_struct("S");
    let clash = unit.create_module("S");
    assert_eq!(unit.error_count(), 1);
    assert!(matches!(
        unit.diagnostics().errors()[0].error,
        SemanticError::Redefinition { .. }
    ));
    // The placeholder module is still usable as a container.
    unit.push_container(clash);
    unit.pop_container();
}

#[test]
fn non_module_at_global_scope_is_rejected() {
    let mut unit = unit();
    unit.create_struct("S");
    assert!(unit
        .diagnostics()
        .errors()
        .iter()
        .any(|e| matches!(e.error, SemanticError::GlobalScopeViolation { .. })));
}

#[test]
fn capitalization_clash_reports_once_and_first_wins() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let first = unit.create_struct("Foo");
    let second = unit.create_struct("foo");
    assert_ne!(first, second);

    assert_eq!(unit.error_count(), 1);
    assert!(matches!(
        unit.diagnostics().errors()[0].error,
        SemanticError::CapitalizationMismatch { .. }
    ));

    // The loser is a placeholder: lookups keep resolving to the first
    // definition (with a capitalization warning for the variant spelling).
    let found = unit.lookup_type("foo").unwrap();
    assert_eq!(found, first);
    assert_eq!(unit.error_count(), 1);

    let (ast, _) = unit.finish();
    assert_eq!(ast.node(first).name(), "Foo");
}

#[test]
fn forward_declaration_is_patched_by_the_definition() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let decl_a = unit.create_class_decl("C");
    let decl_b = unit.create_class_decl("C");
    let def = unit.create_class_def("C", None, None);
    assert_eq!(unit.error_count(), 0);

    let (ast, _) = unit.finish();
    assert_eq!(ast.node(decl_a).as_class_decl().unwrap().definition, Some(def));
    assert_eq!(ast.node(decl_b).as_class_decl().unwrap().definition, Some(def));
    // The first declaration becomes the definition's declaration link.
    assert_eq!(ast.node(def).as_class_def().unwrap().declaration, decl_a);
}

#[test]
fn declaration_after_definition_links_immediately() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let def = unit.create_interface_def("I", &[]);
    let late_decl = unit.create_interface_decl("I");
    assert_eq!(unit.error_count(), 0);

    let (ast, _) = unit.finish();
    assert_eq!(
        ast.node(late_decl).as_interface_decl().unwrap().definition,
        Some(def)
    );
}

#[test]
fn base_declared_but_not_defined_is_reported_at_use() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let decl = unit.create_class_decl("Base");
    let derived = unit.create_class_def("Derived", None, Some(decl));
    assert!(matches!(
        unit.diagnostics().errors()[0].error,
        SemanticError::DeclaredButNotDefined { .. }
    ));

    // The definition still exists, just without a base.
    let (ast, _) = unit.finish();
    assert_eq!(ast.node(derived).as_class_def().unwrap().base, None);
}

#[test]
fn tag_above_i32_max_is_rejected_without_abort() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let iface = unit.create_interface_def("I", &[]);
    unit.push_container(iface);
    let op = unit.create_operation(
        "get",
        Some(unit.builtin(BuiltinKind::Int)),
        Some(TagRef::Literal(i64::from(i32::MAX) + 1)),
        OperationMode::Normal,
    );
    assert_eq!(unit.error_count(), 1);
    assert!(matches!(
        unit.diagnostics().errors()[0].error,
        SemanticError::TagOutOfRange { .. }
    ));

    // Construction continued with the sentinel.
    let (ast, _) = unit.finish();
    assert_eq!(
        ast.node(op).as_operation().unwrap().return_tag,
        Some(SENTINEL_TAG)
    );
}

#[test]
fn duplicate_tags_on_siblings_are_rejected_but_sentinels_are_not() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let iface = unit.create_interface_def("I", &[]);
    unit.push_container(iface);
    let op = unit.create_operation("op", None, None, OperationMode::Normal);
    unit.push_container(op);

    let int = unit.builtin(BuiltinKind::Int);
    unit.create_parameter("a", int, Some(TagRef::Literal(1)), false);
    unit.create_parameter("b", int, Some(TagRef::Literal(1)), false);
    assert_eq!(unit.error_count(), 1);
    assert!(matches!(
        unit.diagnostics().errors()[0].error,
        SemanticError::DuplicateTag { tag: 1, .. }
    ));

    // Two failed resolutions both map to the sentinel; that is not a
    // duplicate.
    unit.create_parameter("c", int, Some(TagRef::Literal(-5)), false);
    unit.create_parameter("d", int, Some(TagRef::Literal(-5)), false);
    let range_errors = unit
        .diagnostics()
        .errors()
        .iter()
        .filter(|e| matches!(e.error, SemanticError::TagOutOfRange { .. }))
        .count();
    assert_eq!(range_errors, 2);
    let duplicate_errors = unit
        .diagnostics()
        .errors()
        .iter()
        .filter(|e| matches!(e.error, SemanticError::DuplicateTag { .. }))
        .count();
    assert_eq!(duplicate_errors, 1);
}

#[test]
fn exception_bases_must_be_exceptions() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let base = unit.create_exception("Base", None);
    let derived = unit.create_exception("Derived", Some(base));
    assert_eq!(unit.error_count(), 0);

    let s = unit.create_struct("S");
    let bad = unit.create_exception("Bad", Some(s));
    assert_eq!(unit.error_count(), 1);
    assert!(matches!(
        unit.diagnostics().errors()[0].error,
        SemanticError::BadBase { .. }
    ));

    let (ast, _) = unit.finish();
    let def: &ExceptionDef = ast.node(derived).as_exception().unwrap();
    assert_eq!(def.base, Some(base));
    // The illegal base is dropped, not kept.
    assert_eq!(ast.node(bad).as_exception().unwrap().base, None);
}

#[test]
fn required_parameters_must_precede_tagged_ones() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let iface = unit.create_interface_def("I", &[]);
    unit.push_container(iface);
    let op = unit.create_operation("op", None, None, OperationMode::Normal);
    unit.push_container(op);

    let int = unit.builtin(BuiltinKind::Int);
    unit.create_parameter("a", int, None, false);
    unit.create_parameter("b", int, Some(TagRef::Literal(1)), false);
    assert_eq!(unit.error_count(), 0);

    // A required parameter after a tagged one breaks the wire order.
    unit.create_parameter("c", int, None, false);
    assert_eq!(unit.error_count(), 1);
    match &unit.diagnostics().errors()[0].error {
        SemanticError::RequiredAfterTagged { name, .. } => assert_eq!(name, "c"),
        other => panic!("expected RequiredAfterTagged, got {other:?}"),
    }

    // Further tagged parameters are still fine.
    unit.create_parameter("d", int, Some(TagRef::Literal(2)), true);
    assert_eq!(unit.error_count(), 1);
}

#[test]
fn tag_may_name_an_enumerator_or_integral_constant() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let e = unit.create_enum("Color");
    unit.push_container(e);
    unit.create_enumerator("Red", Some(3));
    unit.pop_container();
    unit.create_const("SIZE", unit.builtin(BuiltinKind::Int), Literal::Int(7));

    let iface = unit.create_interface_def("I", &[]);
    unit.push_container(iface);
    let op = unit.create_operation("op", None, None, OperationMode::Normal);
    unit.push_container(op);
    let int = unit.builtin(BuiltinKind::Int);
    let a = unit.create_parameter("a", int, Some(TagRef::Named("Red".into())), false);
    let b = unit.create_parameter("b", int, Some(TagRef::Named("SIZE".into())), false);
    assert_eq!(unit.error_count(), 0);

    let (ast, _) = unit.finish();
    assert_eq!(ast.node(a).as_parameter().unwrap().tag, Some(3));
    assert_eq!(ast.node(b).as_parameter().unwrap().tag, Some(7));
}

#[test]
fn ambiguous_enumerator_reference_lists_candidates() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    for name in ["A", "B"] {
        let e = unit.create_enum(name);
        unit.push_container(e);
        unit.create_enumerator("Same", Some(1));
        unit.pop_container();
    }
    let iface = unit.create_interface_def("I", &[]);
    unit.push_container(iface);
    let op = unit.create_operation("op", None, None, OperationMode::Normal);
    unit.push_container(op);
    let int = unit.builtin(BuiltinKind::Int);
    let p = unit.create_parameter("p", int, Some(TagRef::Named("Same".into())), false);
    assert!(matches!(
        unit.diagnostics().errors()[0].error,
        SemanticError::AmbiguousReference { .. }
    ));
    let (ast, _) = unit.finish();
    assert_eq!(ast.node(p).as_parameter().unwrap().tag, Some(SENTINEL_TAG));
}

#[test]
fn duplicate_compact_id_is_rejected_unit_wide() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let first = unit.create_class_def("A", Some(TagRef::Literal(12)), None);
    let second = unit.create_class_def("B", Some(TagRef::Literal(12)), None);
    assert_eq!(unit.error_count(), 1);
    assert!(matches!(
        unit.diagnostics().errors()[0].error,
        SemanticError::CompactIdDuplicate { id: 12, .. }
    ));

    let (ast, _) = unit.finish();
    assert_eq!(ast.node(first).as_class_def().unwrap().compact_id, Some(12));
    assert_eq!(ast.node(second).as_class_def().unwrap().compact_id, None);
}

#[test]
fn diamond_inheritance_reports_the_operation_once() {
    let mut unit = unit();
    open_module(&mut unit, "M");

    let base = unit.create_interface_def("Base", &[]);
    unit.push_container(base);
    unit.create_operation("m", None, None, OperationMode::Normal);
    unit.pop_container();

    let left = unit.create_interface_def("Left", &[base]);
    let right = unit.create_interface_def("Right", &[base]);
    unit.create_interface_def("Diamond", &[left, right]);

    assert_eq!(unit.error_count(), 1);
    match &unit.diagnostics().errors()[0].error {
        SemanticError::AmbiguousInheritance {
            interface,
            operation,
            ..
        } => {
            assert_eq!(interface, "Diamond");
            assert_eq!(operation, "m");
        }
        other => panic!("expected AmbiguousInheritance, got {other:?}"),
    }
}

#[test]
fn inherited_operations_differing_in_case_are_reported() {
    let mut unit = unit();
    open_module(&mut unit, "M");

    let a = unit.create_interface_def("A", &[]);
    unit.push_container(a);
    unit.create_operation("getValue", None, None, OperationMode::Normal);
    unit.pop_container();

    let b = unit.create_interface_def("B", &[]);
    unit.push_container(b);
    unit.create_operation("getvalue", None, None, OperationMode::Normal);
    unit.pop_container();

    unit.create_interface_def("C", &[a, b]);
    assert_eq!(unit.error_count(), 1);
    assert!(matches!(
        unit.diagnostics().errors()[0].error,
        SemanticError::InheritedCapitalizationMismatch { .. }
    ));
}

#[test]
fn single_base_inheritance_is_never_ambiguous() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let base = unit.create_interface_def("Base", &[]);
    unit.push_container(base);
    unit.create_operation("m", None, None, OperationMode::Normal);
    unit.pop_container();
    unit.create_interface_def("Derived", &[base]);
    assert_eq!(unit.error_count(), 0);
}

#[test]
fn dictionary_key_legality() {
    let mut unit = unit();
    open_module(&mut unit, "M");

    let float = unit.builtin(BuiltinKind::Float);
    let int = unit.builtin(BuiltinKind::Int);
    unit.create_dictionary("Bad", float, int);
    assert_eq!(unit.error_count(), 1);
    assert!(matches!(
        unit.diagnostics().errors()[0].error,
        SemanticError::IllegalDictionaryKey { .. }
    ));

    // A struct of integral members is a legal key.
    let good = unit.create_struct("Key");
    unit.push_container(good);
    unit.create_data_member("x", int, None, None);
    unit.pop_container();
    unit.create_dictionary("Good", good, int);
    assert_eq!(unit.error_count(), 1);

    // A struct with a float member is not.
    let bad = unit.create_struct("FloatKey");
    unit.push_container(bad);
    unit.create_data_member("f", float, None, None);
    unit.pop_container();
    unit.create_dictionary("AlsoBad", bad, int);
    assert_eq!(unit.error_count(), 2);
}

#[test]
fn self_containing_struct_is_rejected_and_kept_acyclic() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let s = unit.create_struct("S");
    unit.push_container(s);
    unit.create_data_member("inner", s, None, None);
    assert_eq!(unit.error_count(), 1);
    assert!(matches!(
        unit.diagnostics().errors()[0].error,
        SemanticError::SelfContainingStruct { .. }
    ));

    // The offending member stayed out of the tree.
    let (ast, _) = unit.finish();
    assert!(ast.children(s).is_empty());
}

#[test]
fn indirect_struct_recursion_is_rejected() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let outer = unit.create_struct("Outer");
    let inner = unit.create_struct("Inner");
    unit.push_container(inner);
    unit.create_data_member("back", outer, None, None);
    unit.pop_container();
    unit.push_container(outer);
    unit.create_data_member("in", inner, None, None);
    assert!(matches!(
        unit.diagnostics().errors()[0].error,
        SemanticError::SelfContainingStruct { .. }
    ));
}

#[test]
fn undefined_name_reports_and_returns_none() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    assert!(unit.lookup_type("Missing").is_none());
    assert!(matches!(
        unit.diagnostics().errors()[0].error,
        SemanticError::Undefined { .. }
    ));
}

#[test]
fn value_lookup_does_not_yield_types_silently() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let iface = unit.create_interface_def("I", &[]);
    unit.push_container(iface);
    unit.create_operation("op", None, None, OperationMode::Normal);
    unit.pop_container();
    // An operation is not a type.
    assert!(unit.lookup_type("I::op").is_none());
    assert!(matches!(
        unit.diagnostics().errors()[0].error,
        SemanticError::NotAType { .. }
    ));
}

#[test]
fn name_changing_meaning_within_a_scope_is_an_error() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let outer = unit.create_struct("S");
    open_module(&mut unit, "N");

    // First use binds `S` to the outer struct in this scope.
    let found = unit.lookup_type("S").unwrap();
    assert_eq!(found, outer);

    // Defining a different `S` here changes what the name means.
    unit.create_struct("S");
    assert!(unit
        .diagnostics()
        .errors()
        .iter()
        .any(|e| matches!(e.error, SemanticError::ChangedMeaning { .. })));
}

#[test]
fn parameters_do_not_shadow_type_names() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let s = unit.create_struct("Data");
    unit.push_container(s);
    unit.create_data_member("x", unit.builtin(BuiltinKind::Int), None, None);
    unit.pop_container();

    let iface = unit.create_interface_def("I", &[]);
    unit.push_container(iface);
    let op = unit.create_operation("op", None, None, OperationMode::Normal);
    unit.push_container(op);
    // A parameter named like a type does not trip introduced-name tracking.
    unit.create_parameter("Data", s, None, false);
    unit.pop_container();
    unit.pop_container();
    assert_eq!(unit.error_count(), 0);
}

#[test]
fn enumerator_values_assign_implicitly_and_check_range() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let e = unit.create_enum("E");
    unit.push_container(e);
    let a = unit.create_enumerator("A", None);
    let b = unit.create_enumerator("B", Some(10));
    let c = unit.create_enumerator("C", None);
    unit.create_enumerator("D", Some(-1));
    assert_eq!(unit.error_count(), 1);
    assert!(matches!(
        unit.diagnostics().errors()[0].error,
        SemanticError::EnumeratorValueOutOfRange { .. }
    ));

    let (ast, _) = unit.finish();
    assert_eq!(ast.node(a).as_enumerator().unwrap().value, 0);
    assert_eq!(ast.node(b).as_enumerator().unwrap().value, 10);
    assert_eq!(ast.node(c).as_enumerator().unwrap().value, 11);
    assert!(ast.node(e).as_enum().unwrap().has_explicit_values);
}

#[test]
fn duplicate_enumerator_value_hidden_while_range_expands() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let e = unit.create_enum("E");
    unit.push_container(e);

    // The first enumerator only closes the running minimum, so a duplicate
    // that immediately follows still looks range-expanding and is not
    // reported.
    unit.create_enumerator("A", Some(5));
    unit.create_enumerator("B", Some(5));
    assert_eq!(unit.error_count(), 0);

    // By the third occurrence both bounds are closed and the scan runs.
    unit.create_enumerator("C", Some(5));
    assert_eq!(unit.error_count(), 1);
    match &unit.diagnostics().errors()[0].error {
        SemanticError::DuplicateEnumeratorValue { name, value, .. } => {
            assert_eq!(name, "C");
            assert_eq!(*value, 5);
        }
        other => panic!("expected DuplicateEnumeratorValue, got {other:?}"),
    }
}

#[test]
fn duplicate_enumerator_value_inside_closed_range_is_reported() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let e = unit.create_enum("E");
    unit.push_container(e);
    unit.create_enumerator("Low", Some(0));
    unit.create_enumerator("High", Some(10));
    unit.create_enumerator("Again", Some(0));
    assert_eq!(unit.error_count(), 1);
    assert!(matches!(
        unit.diagnostics().errors()[0].error,
        SemanticError::DuplicateEnumeratorValue { .. }
    ));
}

#[test]
fn const_initializers_are_type_checked() {
    let mut unit = unit();
    open_module(&mut unit, "M");
    let byte = unit.builtin(BuiltinKind::Byte);
    unit.create_const("OK", byte, Literal::Int(200));
    assert_eq!(unit.error_count(), 0);
    unit.create_const("TooBig", byte, Literal::Int(300));
    assert_eq!(unit.error_count(), 1);
    assert!(matches!(
        unit.diagnostics().errors()[0].error,
        SemanticError::BadConstValue { .. }
    ));

    // Enum-typed constants require an enumerator of that enum.
    let e = unit.create_enum("E");
    unit.push_container(e);
    let red = unit.create_enumerator("Red", None);
    unit.pop_container();
    unit.create_const("COLOR", e, Literal::Enumerator(red));
    assert_eq!(unit.error_count(), 1);
    unit.create_const("WRONG", e, Literal::Int(0));
    assert_eq!(unit.error_count(), 2);
}

#[test]
fn construction_is_deterministic() {
    let build = || {
        let mut unit = unit();
        open_module(&mut unit, "M");
        let foo = unit.create_struct("Foo");
        unit.add_metadata(foo, "deprecated:use Bar");
        unit.add_metadata(foo, "protected");
        unit.create_struct("foo");
        let e = unit.create_enum("E");
        unit.push_container(e);
        unit.create_enumerator("A", Some(5));
        unit.create_enumerator("B", Some(5));
        unit.create_enumerator("C", Some(5));
        unit.pop_container();
        unit.validate_metadata(None);
        let (ast, diagnostics) = unit.finish();

        // Scoped names of every entity wired into the tree, in visit order
        // via the parent links.
        let scoped_names: Vec<String> = (0..ast.len() as u32)
            .map(EntityId::new)
            .filter(|&id| ast.node(id).contained.is_some())
            .map(|id| ast.node(id).scoped_name().to_string())
            .collect();
        let foo_metadata: Vec<String> = ast
            .node(foo)
            .contained
            .as_ref()
            .unwrap()
            .metadata
            .iter()
            .map(|m| {
                if m.has_arguments() {
                    format!("{}:{}", m.directive(), m.arguments())
                } else {
                    m.directive().to_string()
                }
            })
            .collect();
        let codes: Vec<String> = diagnostics
            .errors()
            .iter()
            .map(|e| format!("{}", e.error))
            .collect();
        (scoped_names, foo_metadata, codes)
    };

    let first = build();
    let second = build();
    assert_eq!(first, second);
    // Both annotations on `Foo` are valid and survive validation.
    assert_eq!(first.1, ["deprecated:use Bar", "protected"]);
}
