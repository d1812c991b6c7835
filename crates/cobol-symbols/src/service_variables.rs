//! Variable registration and resolution.
//!
//! Resolution is two-level: the usage's own program first, then the global
//! declarations visible from it. The global view walks outwards through the
//! enclosing programs and lets the nearest program's GLOBAL item win when
//! names collide.

use crate::service::{SymbolService, read_table, write_table};
use crate::symbol_table::{Declarations, FxIndexMap, ProgramKey, VariableMap};
use cobol_common::limits::MAX_PROGRAM_NESTING;
use cobol_tree::{NodeArena, NodeIndex, NodeKind};
use smallvec::smallvec;
use tracing::{debug, trace, warn};

impl SymbolService {
    /// Add one declaration to the program's variable multi-map. Duplicate
    /// names accumulate.
    pub fn register_variable(&self, arena: &NodeArena, program: NodeIndex, node: NodeIndex) {
        let Some(name) = variable_name(arena, node) else {
            warn!(node = node.0, "register_variable: not a variable definition");
            return;
        };
        let table = self.program_table(arena, program);
        write_table(&table).insert_variable(name, node);
    }

    /// Register every declaration below `subtree`, at any depth (group items,
    /// their elementary items, index items...), into the owning program.
    #[tracing::instrument(level = "debug", skip_all, fields(subtree_idx = subtree.0))]
    pub fn register_variables_in_program(&self, arena: &NodeArena, subtree: NodeIndex) {
        let Some(program) = arena.owning_program(subtree) else {
            debug!("no owning program, skipping");
            return;
        };
        let declarations: Vec<(NodeIndex, &str)> = arena
            .children(subtree)
            .iter()
            .flat_map(|&child| arena.depth_first(child).indices())
            .filter_map(|idx| variable_name(arena, idx).map(|name| (idx, name)))
            .collect();
        if declarations.is_empty() {
            return;
        }

        let table = self.program_table(arena, program);
        let mut table = write_table(&table);
        for &(idx, name) in &declarations {
            table.insert_variable(name, idx);
        }
        debug!(count = declarations.len(), "variables registered");
    }

    /// Declarations a usage chain refers to.
    ///
    /// `usage_chain` is the written reference, head first, then qualifiers
    /// (`FIELD OF GROUP` is `[FIELD, GROUP]`). The program's own variables
    /// are tried first; when they yield nothing, the GLOBAL declarations of
    /// the program and its enclosing programs are tried. An empty result
    /// means the name is undefined; reporting that is up to the caller.
    #[tracing::instrument(level = "debug", skip_all, fields(program_idx = program.0))]
    pub fn get_variable_definition(
        &self,
        arena: &NodeArena,
        program: NodeIndex,
        usage_chain: &[NodeIndex],
    ) -> Vec<NodeIndex> {
        if let Some(table) = self.existing_program_table(arena, program) {
            let table = read_table(&table);
            let found = self
                .matcher
                .find_variables_for_usage(arena, table.variables(), usage_chain);
            if !found.is_empty() {
                trace!(count = found.len(), "resolved locally");
                return found;
            }
        }

        let globals: VariableMap = self
            .global_variables(arena, program)
            .into_iter()
            .map(|(name, idx)| -> (String, Declarations) { (name, smallvec![idx]) })
            .collect();
        let found = self
            .matcher
            .find_variables_for_usage(arena, &globals, usage_chain);
        trace!(count = found.len(), globals = globals.len(), "resolved through globals");
        found
    }

    /// GLOBAL declarations visible from `program`, one per name. Enclosing
    /// programs are collected first so that nearer declarations overwrite
    /// them.
    pub fn global_variables(
        &self,
        arena: &NodeArena,
        program: NodeIndex,
    ) -> FxIndexMap<String, NodeIndex> {
        let mut chain = Vec::new();
        let mut current = Some(program);
        while let Some(idx) = current {
            if chain.len() >= MAX_PROGRAM_NESTING {
                warn!("program nesting limit reached while collecting globals");
                break;
            }
            chain.push(idx);
            current = arena.owning_program(idx);
        }

        let mut result = FxIndexMap::default();
        for &idx in chain.iter().rev() {
            let Some(table) = self.existing_table(&ProgramKey::of(arena, idx)) else {
                continue;
            };
            let table = read_table(&table);
            for (name, declarations) in table.variables() {
                for &decl in declarations {
                    if is_global(arena, decl) {
                        result.insert(name.clone(), decl);
                    }
                }
            }
        }
        result
    }
}

fn variable_name(arena: &NodeArena, idx: NodeIndex) -> Option<&str> {
    match arena.kind(idx) {
        Some(NodeKind::VariableDefinition(data)) => Some(&data.name),
        _ => None,
    }
}

fn is_global(arena: &NodeArena, idx: NodeIndex) -> bool {
    matches!(arena.kind(idx), Some(NodeKind::VariableDefinition(data)) if data.global)
}
