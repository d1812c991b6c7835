//! Tree traversal driving the symbol service.
//!
//! Registration runs in two phases over the whole tree. All definitions are
//! registered first, so a PERFORM or variable reference written before its
//! target still resolves. Usages are bound in the second phase, in document
//! order.

use crate::matcher::qualifier_groups;
use crate::service::SymbolService;
use cobol_common::{Locality, SemanticError, SemanticErrorKind};
use cobol_tree::{AnalysisResult, NodeArena, NodeIndex, NodeKind};
use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;
use tracing::{debug, trace};

/// One registration run over an [`AnalysisResult`].
pub struct RegistrationPass<'s> {
    service: &'s SymbolService,
}

/// A usage site collected for the second phase.
#[derive(Debug)]
enum UsageSite {
    CodeBlock(NodeIndex),
    /// Head first, then qualifiers. Every name in the chain is annotated.
    Variable(Vec<NodeIndex>),
}

impl<'s> RegistrationPass<'s> {
    pub fn new(service: &'s SymbolService) -> Self {
        RegistrationPass { service }
    }

    /// Register every definition and bind every usage in `result`.
    ///
    /// Tables of every document declaring a program in the tree are reset
    /// first, so running the pass again over a fresh tree of the same
    /// documents replaces the previous bindings. Returns the semantic errors
    /// in the order they were found.
    #[tracing::instrument(level = "debug", skip_all, fields(nodes = result.arena.len()))]
    pub fn run(&self, result: &mut AnalysisResult) -> Vec<SemanticError> {
        for uri in &program_documents(&result.arena, result.root) {
            self.service.reset(uri);
        }

        let mut errors = Vec::new();
        self.register_definitions(&result.arena, result.root, &mut errors);
        let sites = collect_usages(&result.arena, result.root);
        debug!(usages = sites.len(), "definitions registered");
        for site in sites {
            match site {
                UsageSite::CodeBlock(usage) => {
                    self.bind_code_block(&mut result.arena, usage, &mut errors)
                }
                UsageSite::Variable(chain) => {
                    self.bind_variable(&mut result.arena, &chain, &mut errors)
                }
            }
        }
        debug!(errors = errors.len(), "registration finished");
        errors
    }

    fn register_definitions(
        &self,
        arena: &NodeArena,
        root: NodeIndex,
        errors: &mut Vec<SemanticError>,
    ) {
        for idx in arena.depth_first(root).indices() {
            let Some(kind) = arena.kind(idx) else {
                continue;
            };
            let program = arena.owning_program(idx);
            match (kind, program) {
                (NodeKind::DataSection { .. }, _) => {
                    self.service.register_variables_in_program(arena, idx);
                }
                (NodeKind::SectionName { .. }, Some(program))
                    if matches!(
                        arena.kind(arena.parent(idx)),
                        Some(NodeKind::ProcedureSection(_))
                    ) =>
                {
                    errors.extend(self.service.register_section_name(arena, program, idx));
                }
                (NodeKind::ParagraphName { .. }, Some(program)) => {
                    errors.extend(self.service.register_paragraph_name(arena, program, idx));
                }
                (NodeKind::Paragraph(_) | NodeKind::ProcedureSection(_), Some(program)) => {
                    self.service.register_code_block(arena, program, idx);
                }
                _ => {}
            }
        }
    }

    fn bind_code_block(
        &self,
        arena: &mut NodeArena,
        usage: NodeIndex,
        errors: &mut Vec<SemanticError>,
    ) {
        let Some(program) = arena.owning_program(usage) else {
            trace!(usage = usage.0, "code block usage outside any program");
            return;
        };
        errors.extend(self.service.register_code_block_usage(arena, program, usage));
    }

    fn bind_variable(
        &self,
        arena: &mut NodeArena,
        chain: &[NodeIndex],
        errors: &mut Vec<SemanticError>,
    ) {
        let Some(&head) = chain.first() else {
            return;
        };
        let Some(program) = arena.owning_program(head) else {
            trace!(usage = head.0, "variable usage outside any program");
            return;
        };
        let Some(node) = arena.get(head) else {
            return;
        };
        let name = node.name().unwrap_or_default().to_string();
        let locality = node.locality.clone();

        let definitions = self.service.get_variable_definition(arena, program, chain);
        if definitions.is_empty() {
            let options = self.service.options();
            if options.report_undefined_variables {
                errors.push(
                    SemanticError::error(SemanticErrorKind::VariableNotDefined, name, locality)
                        .with_severity(options.undefined_variable_severity),
                );
            }
            return;
        }

        let location = locality.to_location();
        for &definition in &definitions {
            arena.add_usage(definition, location.clone());
        }
        bind_qualifiers(arena, &chain[1..], &definitions);
        arena.set_usage_definitions(head, definitions);
    }
}

/// Annotate each qualifier with the group items it named for the resolved
/// `definitions`, and record the qualifier on those groups.
fn bind_qualifiers(arena: &mut NodeArena, qualifiers: &[NodeIndex], definitions: &[NodeIndex]) {
    if qualifiers.is_empty() {
        return;
    }
    let mut groups_by_qualifier = vec![Vec::new(); qualifiers.len()];
    for &definition in definitions {
        let Some(groups) = qualifier_groups(arena, definition, qualifiers) else {
            continue;
        };
        for (found, group) in groups_by_qualifier.iter_mut().zip(groups) {
            if !found.contains(&group) {
                found.push(group);
            }
        }
    }
    for (&qualifier, groups) in qualifiers.iter().zip(groups_by_qualifier) {
        let Some(location) = arena.locality(qualifier).map(Locality::to_location) else {
            continue;
        };
        for &group in &groups {
            arena.add_usage(group, location.clone());
        }
        arena.set_usage_definitions(qualifier, groups);
    }
}

/// Documents that declare a program in the tree, in document order.
fn program_documents(arena: &NodeArena, root: NodeIndex) -> IndexSet<String, FxBuildHasher> {
    arena
        .depth_first(root)
        .indices()
        .filter_map(|idx| arena.get(idx))
        .filter(|node| node.kind.is_program())
        .map(|node| node.locality.uri.clone())
        .collect()
}

fn collect_usages(arena: &NodeArena, root: NodeIndex) -> Vec<UsageSite> {
    let mut sites = Vec::new();
    for idx in arena.depth_first(root).indices() {
        match arena.kind(idx) {
            Some(NodeKind::CodeBlockUsage { .. }) => sites.push(UsageSite::CodeBlock(idx)),
            Some(NodeKind::QualifiedReference) => {
                let chain: Vec<NodeIndex> = arena
                    .children(idx)
                    .iter()
                    .copied()
                    .filter(|&child| matches!(arena.kind(child), Some(NodeKind::VariableUsage(_))))
                    .collect();
                if !chain.is_empty() {
                    sites.push(UsageSite::Variable(chain));
                }
            }
            Some(NodeKind::VariableUsage(_))
                if !matches!(
                    arena.kind(arena.parent(idx)),
                    Some(NodeKind::QualifiedReference)
                ) =>
            {
                sites.push(UsageSite::Variable(vec![idx]));
            }
            _ => {}
        }
    }
    sites
}
