use crate::diagnostics::{
    ErrorSeverity, ErrorSource, SemanticError, SemanticErrorKind, format_message,
    get_message_template, message_keys,
};
use crate::position::{Locality, Range};

fn locality() -> Locality {
    Locality::new("file:///test.cbl", Range::on_line(7, 19, 25))
}

#[test]
fn test_format_message_replaces_placeholders() {
    assert_eq!(format_message("{0} and {1}", &["A", "B"]), "A and B");
    assert_eq!(format_message("no args", &[]), "no args");
}

#[test]
fn test_every_error_kind_has_a_template() {
    for kind in [
        SemanticErrorKind::ParagraphNotDefined,
        SemanticErrorKind::AmbiguousReference,
        SemanticErrorKind::VariableNotDefined,
    ] {
        assert!(
            get_message_template(kind.message_key()).is_some(),
            "missing template for {kind:?}"
        );
    }
}

#[test]
fn test_semantic_error_defaults_to_parsing_error() {
    let error = SemanticError::error(SemanticErrorKind::AmbiguousReference, "PARA-X", locality());
    assert_eq!(error.source, ErrorSource::Parsing);
    assert_eq!(error.severity, ErrorSeverity::Error);

    let template = error.message_template();
    assert_eq!(template.key, message_keys::AMBIGUOUS_REFERENCE);
    assert_eq!(template.args, vec!["PARA-X".to_string()]);
    assert_eq!(template.render(), "Ambiguous reference: PARA-X");
}

#[test]
fn test_semantic_error_display_is_single_line() {
    let error = SemanticError::error(SemanticErrorKind::ParagraphNotDefined, "MISSING", locality())
        .with_severity(ErrorSeverity::Warning)
        .with_source(ErrorSource::Dialect);
    let rendered = error.to_string();
    assert_eq!(
        rendered,
        "file:///test.cbl:8:20: The following paragraph or section is not defined: MISSING"
    );
    assert!(!rendered.contains('\n'));
    assert_eq!(error.source.text(), "COBOL Language Support - Dialect");
}
