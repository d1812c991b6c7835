//! Load a tree, run registration and render the requested view as JSON.

use crate::args::{CliArgs, Command};
use anyhow::{Context, Result};
use cobol_common::{ErrorSeverity, Location, Position, SemanticError};
use cobol_symbols::{RegistrationPass, SymbolOptions, SymbolService, SymbolTableSnapshot, read_table};
use cobol_tree::{AnalysisResult, SourceNode};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// A finished registration run.
pub struct Analysis {
    pub document_uri: String,
    pub service: SymbolService,
    pub result: AnalysisResult,
    pub errors: Vec<SemanticError>,
}

/// One semantic error in client-facing form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticOutput {
    pub message: String,
    pub code: &'static str,
    pub severity: ErrorSeverity,
    pub source: &'static str,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copybook: Option<String>,
}

impl From<&SemanticError> for DiagnosticOutput {
    fn from(error: &SemanticError) -> Self {
        let template = error.message_template();
        DiagnosticOutput {
            message: template.render(),
            code: template.key,
            severity: error.severity,
            source: error.source.text(),
            location: error.locality.to_location(),
            copybook: error.locality.copybook_id.clone(),
        }
    }
}

/// Options from `path`, or the defaults when no file is given.
pub fn load_options(path: Option<&Path>) -> Result<SymbolOptions> {
    let Some(path) = path else {
        return Ok(SymbolOptions::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))
}

/// Lower the JSON tree at `path`; nodes without a URI get `document_uri`.
pub fn load_tree(path: &Path, document_uri: &str) -> Result<AnalysisResult> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read tree {}", path.display()))?;
    let source: SourceNode = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse tree {}", path.display()))?;
    let result = source.into_analysis_result(document_uri);
    debug!(nodes = result.arena.len(), "tree loaded");
    Ok(result)
}

/// `file://` URI for a local path.
pub fn document_uri_for(path: &Path) -> Result<String> {
    let absolute = std::path::absolute(path)
        .with_context(|| format!("failed to resolve {}", path.display()))?;
    Ok(format!("file://{}", absolute.display()))
}

pub fn analyze(args: &CliArgs) -> Result<Analysis> {
    let options = load_options(args.config.as_deref())?;
    let document_uri = match &args.document_uri {
        Some(uri) => uri.clone(),
        None => document_uri_for(&args.tree)?,
    };
    let mut result = load_tree(&args.tree, &document_uri)?;

    let service = SymbolService::with_options(options);
    let errors = RegistrationPass::new(&service).run(&mut result);
    info!(
        programs = service.len(),
        errors = errors.len(),
        uri = %document_uri,
        "analysis finished"
    );
    Ok(Analysis {
        document_uri,
        service,
        result,
        errors,
    })
}

/// Every program's table, keyed by program key.
pub fn symbols(analysis: &Analysis) -> BTreeMap<String, SymbolTableSnapshot> {
    analysis
        .service
        .get_program_symbols()
        .into_iter()
        .map(|(key, table)| {
            let snapshot = read_table(&table).snapshot(&analysis.result.arena);
            (key.to_string(), snapshot)
        })
        .collect()
}

pub fn diagnostics(analysis: &Analysis) -> Vec<DiagnosticOutput> {
    analysis.errors.iter().map(DiagnosticOutput::from).collect()
}

/// Run the command and return its JSON output.
pub fn run(args: &CliArgs) -> Result<Value> {
    let analysis = analyze(args)?;
    let value = match &args.command {
        Command::Symbols => serde_json::to_value(symbols(&analysis)),
        Command::Diagnostics => serde_json::to_value(diagnostics(&analysis)),
        Command::Element {
            uri,
            line,
            character,
        } => {
            let uri = uri.as_deref().unwrap_or(&analysis.document_uri);
            let element = analysis.service.find_element_by_position(
                &analysis.result,
                uri,
                Position::new(*line, *character),
            );
            serde_json::to_value(element)
        }
    };
    value.context("failed to serialize output")
}
