//! Whole-tree registration.

mod support;

use cobol_common::{ErrorSeverity, ErrorSource, SemanticErrorKind};
use cobol_symbols::{ProgramKey, RegistrationPass, SymbolOptions, SymbolService};
use cobol_tree::{AnalysisResult, NodeArena, NodeIndex, NodeKind, TreeBuilder};
use support::*;

/// Route trace output through the test harness so span fields are exercised.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("trace")
        .try_init();
}

fn definitions_of(arena: &NodeArena, usage: NodeIndex) -> Vec<NodeIndex> {
    match arena.kind(usage) {
        Some(NodeKind::VariableUsage(data)) => data.definitions.clone(),
        other => panic!("not a variable usage: {other:?}"),
    }
}

fn usage_count(arena: &NodeArena, definition: NodeIndex) -> usize {
    match arena.kind(definition) {
        Some(NodeKind::VariableDefinition(data)) => data.usages.len(),
        Some(NodeKind::Paragraph(data) | NodeKind::ProcedureSection(data)) => data.usages.len(),
        other => panic!("not a definition: {other:?}"),
    }
}

/// MAIN performs LATER, which is written after it, and uses TOTAL.
fn forward_reference_tree() -> (AnalysisResult, NodeIndex, NodeIndex, NodeIndex, NodeIndex) {
    let mut b = TreeBuilder::new(URI);
    open_program(&mut b, "TEST", 0);
    open_data_section(&mut b, 2);
    let total = variable(&mut b, "TOTAL", 1, 3);
    b.close();
    open_paragraph(&mut b, "MAIN", 10);
    let usage = perform(&mut b, "LATER", None, 11);
    let total_usage = variable_usage(&mut b, "total", 12);
    b.close();
    let (later, _) = open_paragraph(&mut b, "LATER", 20);
    b.close();
    (b.finish(), usage, later, total, total_usage)
}

#[test]
fn test_forward_references_resolve() {
    let (mut result, _usage, later, total, total_usage) = forward_reference_tree();
    let service = SymbolService::new();

    let errors = RegistrationPass::new(&service).run(&mut result);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    assert_eq!(usage_count(&result.arena, later), 1);
    assert_eq!(usage_count(&result.arena, total), 1);
    assert_eq!(definitions_of(&result.arena, total_usage), vec![total]);
}

#[test]
fn test_rerun_replaces_previous_bindings() {
    let service = SymbolService::new();
    for _ in 0..3 {
        let (mut result, ..) = forward_reference_tree();
        assert!(RegistrationPass::new(&service).run(&mut result).is_empty());

        let program = result.arena.children(result.root)[0];
        let paragraphs = service.get_paragraph_map(&result.arena, program);
        assert_eq!(paragraphs["LATER"].usages().len(), 1);
        assert_eq!(paragraphs["LATER"].definitions().len(), 1);
        assert_eq!(service.get_variables(&result.arena, program)["TOTAL"].len(), 1);
    }
    assert_eq!(service.len(), 1);
}

#[test]
fn test_pass_leaves_other_documents_alone() {
    let service = SymbolService::new();
    let other = ProgramKey::new("OTHER", "file:///other.cbl");
    service.table(other.clone());

    let (mut result, ..) = forward_reference_tree();
    RegistrationPass::new(&service).run(&mut result);
    assert!(service.contains_program(&other));
    assert_eq!(service.len(), 2);
}

#[test]
fn test_errors_do_not_stop_the_pass() {
    init_logging();
    let mut b = TreeBuilder::new(URI);
    open_program(&mut b, "TEST", 0);
    open_paragraph(&mut b, "MAIN", 10);
    perform(&mut b, "MISSING-1", None, 11);
    perform(&mut b, "WORK", None, 12);
    perform(&mut b, "MISSING-2", None, 13);
    variable_usage(&mut b, "NOWHERE", 14);
    b.close();
    let (work, _) = open_paragraph(&mut b, "WORK", 20);
    let mut result = b.finish();

    let service = SymbolService::new();
    let errors = RegistrationPass::new(&service).run(&mut result);

    let reported: Vec<(SemanticErrorKind, &str)> = errors
        .iter()
        .map(|error| (error.kind, error.name.as_str()))
        .collect();
    assert_eq!(
        reported,
        [
            (SemanticErrorKind::ParagraphNotDefined, "MISSING-1"),
            (SemanticErrorKind::ParagraphNotDefined, "MISSING-2"),
            (SemanticErrorKind::VariableNotDefined, "NOWHERE"),
        ]
    );
    assert!(errors.iter().all(|e| e.source == ErrorSource::Parsing));
    assert_eq!(
        errors[2].message_template().render(),
        "Variable NOWHERE is not defined"
    );
    assert_eq!(usage_count(&result.arena, work), 1);
}

#[test]
fn test_undefined_variable_reporting_is_configurable() {
    let tree = || {
        let mut b = TreeBuilder::new(URI);
        open_program(&mut b, "TEST", 0);
        variable_usage(&mut b, "NOWHERE", 14);
        b.finish()
    };

    let silent = SymbolService::with_options(SymbolOptions {
        report_undefined_variables: false,
        ..SymbolOptions::default()
    });
    assert!(RegistrationPass::new(&silent).run(&mut tree()).is_empty());

    let warning = SymbolService::with_options(SymbolOptions {
        undefined_variable_severity: ErrorSeverity::Warning,
        ..SymbolOptions::default()
    });
    let errors = RegistrationPass::new(&warning).run(&mut tree());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].severity, ErrorSeverity::Warning);
}

#[test]
fn test_section_qualifier_is_not_a_definition() {
    let mut b = TreeBuilder::new(URI);
    let program = open_program(&mut b, "TEST", 0);
    open_section(&mut b, "S", 10);
    open_paragraph(&mut b, "P", 11);
    go_to(&mut b, "P", Some("S"), 12);
    go_to(&mut b, "P", Some("ELSEWHERE"), 13);
    let mut result = b.finish();

    let service = SymbolService::new();
    let errors = RegistrationPass::new(&service).run(&mut result);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, SemanticErrorKind::ParagraphNotDefined);

    let sections = service.get_section_map(&result.arena, program);
    assert_eq!(sections.keys().collect::<Vec<_>>(), ["S"]);
    assert_eq!(sections["S"].definitions().len(), 1);
}

#[test]
fn test_perform_section_binds_section_body() {
    let mut b = TreeBuilder::new(URI);
    let program = open_program(&mut b, "TEST", 0);
    let (init, _) = open_section(&mut b, "INIT", 10);
    b.close();
    let (_main, _) = open_section(&mut b, "MAIN-LOGIC", 20);
    open_paragraph(&mut b, "START", 21);
    perform(&mut b, "INIT", None, 22);
    let mut result = b.finish();

    let service = SymbolService::new();
    assert!(RegistrationPass::new(&service).run(&mut result).is_empty());
    assert_eq!(usage_count(&result.arena, init), 1);
    assert_eq!(
        service.get_section_map(&result.arena, program)["INIT"]
            .usages()
            .len(),
        1
    );
}

#[test]
fn test_nested_program_sees_enclosing_globals() {
    let mut b = TreeBuilder::new(URI);
    open_program(&mut b, "OUTER", 0);
    open_data_section(&mut b, 2);
    let shared = global_variable(&mut b, "SHARED", 1, 3);
    b.close();
    open_program(&mut b, "INNER", 100);
    let usage = variable_usage(&mut b, "SHARED", 110);
    let mut result = b.finish();

    let service = SymbolService::new();
    assert!(RegistrationPass::new(&service).run(&mut result).is_empty());
    assert_eq!(definitions_of(&result.arena, usage), vec![shared]);
    assert_eq!(usage_count(&result.arena, shared), 1);
}

#[test]
fn test_qualified_reference_annotates_every_name() {
    let mut b = TreeBuilder::new(URI);
    open_program(&mut b, "TEST", 0);
    open_data_section(&mut b, 2);
    let group_a = open_group(&mut b, "A", 1, 3);
    let in_a = variable(&mut b, "FIELD", 5, 4);
    b.close();
    let group_b = open_group(&mut b, "B", 1, 5);
    variable(&mut b, "FIELD", 5, 6);
    b.close().close();
    let chain = qualified_usage(&mut b, &["FIELD", "A"], 20);
    let missing = qualified_usage(&mut b, &["FIELD", "C"], 21);
    let mut result = b.finish();

    let service = SymbolService::new();
    let errors = RegistrationPass::new(&service).run(&mut result);

    assert_eq!(definitions_of(&result.arena, chain[0]), vec![in_a]);
    assert_eq!(definitions_of(&result.arena, chain[1]), vec![group_a]);
    assert_eq!(usage_count(&result.arena, in_a), 1);
    assert_eq!(usage_count(&result.arena, group_a), 1);
    assert_eq!(usage_count(&result.arena, group_b), 0);
    assert!(definitions_of(&result.arena, missing[1]).is_empty());

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, SemanticErrorKind::VariableNotDefined);
    assert_eq!(
        errors[0].locality,
        *result.arena.locality(missing[0]).unwrap()
    );
}

#[test]
fn test_qualifier_element_reaches_group() {
    let mut b = TreeBuilder::new(URI);
    open_program(&mut b, "TEST", 0);
    open_data_section(&mut b, 2);
    let record = open_group(&mut b, "REC", 1, 3);
    let group = open_group(&mut b, "GRP", 5, 4);
    variable(&mut b, "FIELD", 10, 5);
    b.close().close().close();
    let chain = qualified_usage(&mut b, &["FIELD", "GRP", "REC"], 20);
    let mut result = b.finish();

    let service = SymbolService::new();
    assert!(RegistrationPass::new(&service).run(&mut result).is_empty());

    let qualifier = result.arena.locality(chain[1]).unwrap().clone();
    let element = service
        .find_element_by_position(&result, URI, qualifier.range.start)
        .expect("qualifier carries a context");
    assert_eq!(element.name, "GRP");
    assert_eq!(
        element.definitions,
        vec![result.arena.locality(group).unwrap().to_location()]
    );
    assert_eq!(element.usages, vec![qualifier.to_location()]);

    assert_eq!(definitions_of(&result.arena, chain[2]), vec![record]);
    assert_eq!(usage_count(&result.arena, record), 1);
}
