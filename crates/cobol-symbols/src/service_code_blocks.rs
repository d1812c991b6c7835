//! Paragraph and section binding.
//!
//! Definitions are recorded twice: the body node goes into the program's
//! code-block list (used to resolve usages), and the name node's location
//! goes into the paragraph or section reference for that name (used by
//! navigation).
//!
//! A usage binds to the single definition with its name. When several
//! paragraphs share the name, the one declared in the usage's own section
//! wins; anything else is ambiguous. An explicit `OF <section>` qualifier on
//! the enclosing PERFORM / GO TO / sentence restricts candidates first.

use crate::code_block::CodeBlockReference;
use crate::service::{SymbolService, read_table, write_table};
use crate::symbol_table::normalize_name;
use cobol_common::{Locality, Location, SemanticError, SemanticErrorKind};
use cobol_tree::{NodeArena, NodeIndex, NodeKind};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

impl SymbolService {
    /// Record a section definition name. Never reports an error; duplicate
    /// sections accumulate in the same reference.
    #[tracing::instrument(level = "trace", skip_all, fields(program_idx = program.0, node_idx = node.0))]
    pub fn register_section_name(
        &self,
        arena: &NodeArena,
        program: NodeIndex,
        node: NodeIndex,
    ) -> Option<SemanticError> {
        let (name, location) = named_location(arena, node)?;
        let table = self.program_table(arena, program);
        write_table(&table).section_entry(name).add_definition(location);
        trace!(section = %name, "section registered");
        None
    }

    /// Record a paragraph definition name. Never reports an error; duplicate
    /// paragraphs accumulate in the same reference.
    #[tracing::instrument(level = "trace", skip_all, fields(program_idx = program.0, node_idx = node.0))]
    pub fn register_paragraph_name(
        &self,
        arena: &NodeArena,
        program: NodeIndex,
        node: NodeIndex,
    ) -> Option<SemanticError> {
        let (name, location) = named_location(arena, node)?;
        let table = self.program_table(arena, program);
        write_table(&table).paragraph_entry(name).add_definition(location);
        trace!(paragraph = %name, "paragraph registered");
        None
    }

    /// Add a paragraph or section body to the program's code-block list.
    pub fn register_code_block(&self, arena: &NodeArena, program: NodeIndex, node: NodeIndex) {
        if !arena.kind(node).is_some_and(NodeKind::is_code_block_definition) {
            warn!(node = node.0, "register_code_block: not a paragraph or section");
            return;
        }
        let table = self.program_table(arena, program);
        write_table(&table).code_blocks.push(node);
    }

    /// Bind a code-block usage to its definition.
    ///
    /// Returns `None` when the usage was bound, otherwise exactly one error:
    /// `ParagraphNotDefined` when nothing matches, `AmbiguousReference` when
    /// more than one definition remains after narrowing by section. On
    /// success the usage location is attached to the definition node and
    /// mirrored onto the paragraph and section references of that name.
    /// A `usage` index missing from the arena never binds; it reports
    /// `ParagraphNotDefined` with an empty name and locality.
    #[tracing::instrument(level = "debug", skip_all, fields(program_idx = program.0, usage_idx = usage.0))]
    pub fn register_code_block_usage(
        &self,
        arena: &mut NodeArena,
        program: NodeIndex,
        usage: NodeIndex,
    ) -> Option<SemanticError> {
        let (name, locality) = match arena.get(usage) {
            Some(node) => (node.name().unwrap_or_default().to_string(), node.locality.clone()),
            None => {
                warn!("register_code_block_usage: unknown usage node");
                return Some(SemanticError::error(
                    SemanticErrorKind::ParagraphNotDefined,
                    String::new(),
                    Locality::default(),
                ));
            }
        };
        let table = self.program_table(arena, program);

        let definition = {
            let symbols = read_table(&table);
            match resolve_code_block(arena, &symbols.code_blocks, usage, &name) {
                Ok(definition) => definition,
                Err(kind) => return Some(SemanticError::error(kind, name, locality)),
            }
        };

        let location = locality.to_location();
        arena.add_usage(definition, location.clone());

        let mut table = write_table(&table);
        if let Some(reference) = table.paragraphs.get_mut(&normalize_name(&name)) {
            reference.add_usage(location.clone());
        }
        if let Some(reference) = table.sections.get_mut(&normalize_name(&name)) {
            reference.add_usage(location);
        }
        trace!(name = %name, definition = definition.0, "code block usage bound");
        None
    }

    /// Paragraph reference for `name`, or the section reference of the same
    /// name when no paragraph has it.
    pub fn get_code_block_reference(
        &self,
        arena: &NodeArena,
        program: NodeIndex,
        name: &str,
    ) -> Option<CodeBlockReference> {
        let table = self.existing_program_table(arena, program)?;
        let table = read_table(&table);
        table
            .paragraph(name)
            .or_else(|| table.section(name))
            .cloned()
    }

    /// Apply `extract` to the section reference named by `section_node`.
    /// Empty when the node has no program or the section is unknown.
    pub fn get_section_locations<F>(
        &self,
        arena: &NodeArena,
        section_node: NodeIndex,
        extract: F,
    ) -> Vec<Location>
    where
        F: for<'r> Fn(&'r CodeBlockReference) -> &'r [Location],
    {
        let Some(name) = arena.name(section_node) else {
            return Vec::new();
        };
        let Some(program) = arena.owning_program(section_node) else {
            return Vec::new();
        };
        let Some(table) = self.existing_program_table(arena, program) else {
            return Vec::new();
        };
        let table = read_table(&table);
        table
            .section(name)
            .map(|reference| extract(reference).to_vec())
            .unwrap_or_default()
    }
}

/// Pick the single definition a usage refers to.
fn resolve_code_block(
    arena: &NodeArena,
    code_blocks: &[NodeIndex],
    usage: NodeIndex,
    name: &str,
) -> Result<NodeIndex, SemanticErrorKind> {
    let mut candidates: SmallVec<[NodeIndex; 2]> = code_blocks
        .iter()
        .copied()
        .filter(|&definition| matches_usage(arena, definition, usage, name))
        .collect();

    if candidates.is_empty() {
        debug!(name, "code block not defined");
        return Err(SemanticErrorKind::ParagraphNotDefined);
    }

    if candidates.len() > 1 {
        // A usage inside a section prefers the paragraph of that section.
        let usage_section = arena.enclosing_section_name(usage);
        candidates.retain(|definition| {
            arena
                .enclosing_section_name(*definition)
                .eq_ignore_ascii_case(usage_section)
        });
        if candidates.len() != 1 {
            debug!(
                name,
                usage_section,
                remaining = candidates.len(),
                "ambiguous code block reference"
            );
            return Err(SemanticErrorKind::AmbiguousReference);
        }
    }

    Ok(candidates[0])
}

/// Name and location of a named node.
fn named_location(arena: &NodeArena, node: NodeIndex) -> Option<(&str, Location)> {
    let n = arena.get(node)?;
    Some((n.name()?, n.locality.to_location()))
}

/// Whether `definition` is a candidate for `usage`.
///
/// The names must match. When the usage sits directly in a PERFORM, GO TO or
/// sentence that names a section (`GO TO PARA OF SECTION-X`), the definition
/// must also live in that section; without a qualifier every same-named
/// definition stays a candidate.
fn matches_usage(arena: &NodeArena, definition: NodeIndex, usage: NodeIndex, name: &str) -> bool {
    if !arena
        .name(definition)
        .is_some_and(|def_name| def_name.eq_ignore_ascii_case(name))
    {
        return false;
    }

    let statement = arena.parent(usage);
    if !arena
        .kind(statement)
        .is_some_and(NodeKind::is_code_block_statement)
    {
        return true;
    }

    let qualifier = arena
        .children(statement)
        .iter()
        .find_map(|&child| match arena.kind(child) {
            Some(NodeKind::SectionName { name }) => Some(name.as_str()),
            _ => None,
        });
    match qualifier {
        Some(section) => arena
            .enclosing_section_name(definition)
            .eq_ignore_ascii_case(section),
        None => true,
    }
}
