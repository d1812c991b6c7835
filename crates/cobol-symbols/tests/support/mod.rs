//! Tree-building shorthands shared by the integration tests.
#![allow(dead_code)]

use cobol_common::Range;
use cobol_tree::{CodeBlockData, NodeIndex, NodeKind, TreeBuilder, UsageData, VariableData};

pub const URI: &str = "file:///test.cbl";

fn line(n: u32) -> Range {
    Range::on_line(n, 7, 30)
}

pub fn open_program(b: &mut TreeBuilder, name: &str, at: u32) -> NodeIndex {
    b.open(
        NodeKind::Program {
            name: name.to_string(),
        },
        Range::new(
            cobol_common::Position::new(at, 0),
            cobol_common::Position::new(at + 99, 0),
        ),
    )
}

pub fn open_data_section(b: &mut TreeBuilder, at: u32) -> NodeIndex {
    b.open(
        NodeKind::DataSection {
            name: "WORKING-STORAGE".to_string(),
        },
        line(at),
    )
}

/// Opens a procedure section and adds its name node. Returns `(section, name)`.
pub fn open_section(b: &mut TreeBuilder, name: &str, at: u32) -> (NodeIndex, NodeIndex) {
    let section = b.open(NodeKind::ProcedureSection(CodeBlockData::new(name)), line(at));
    let name_node = b.leaf(
        NodeKind::SectionName {
            name: name.to_string(),
        },
        Range::on_line(at, 7, 7 + name.len() as u32),
    );
    (section, name_node)
}

/// Opens a paragraph and adds its name node. Returns `(paragraph, name)`.
pub fn open_paragraph(b: &mut TreeBuilder, name: &str, at: u32) -> (NodeIndex, NodeIndex) {
    let paragraph = b.open(NodeKind::Paragraph(CodeBlockData::new(name)), line(at));
    let name_node = b.leaf(
        NodeKind::ParagraphName {
            name: name.to_string(),
        },
        Range::on_line(at, 7, 7 + name.len() as u32),
    );
    (paragraph, name_node)
}

fn code_block_statement(
    b: &mut TreeBuilder,
    statement: NodeKind,
    target: &str,
    qualifier: Option<&str>,
    at: u32,
) -> NodeIndex {
    b.open(statement, Range::on_line(at, 11, 60));
    let usage = b.leaf(
        NodeKind::CodeBlockUsage {
            name: target.to_string(),
        },
        Range::on_line(at, 19, 19 + target.len() as u32),
    );
    if let Some(section) = qualifier {
        b.leaf(
            NodeKind::SectionName {
                name: section.to_string(),
            },
            Range::on_line(at, 40, 40 + section.len() as u32),
        );
    }
    b.close();
    usage
}

/// `PERFORM target [OF qualifier]`. Returns the usage node.
pub fn perform(b: &mut TreeBuilder, target: &str, qualifier: Option<&str>, at: u32) -> NodeIndex {
    code_block_statement(b, NodeKind::Perform, target, qualifier, at)
}

/// `GO TO target [OF qualifier]`. Returns the usage node.
pub fn go_to(b: &mut TreeBuilder, target: &str, qualifier: Option<&str>, at: u32) -> NodeIndex {
    code_block_statement(b, NodeKind::GoTo, target, qualifier, at)
}

/// Sentence-style `target [OF qualifier]`. Returns the usage node.
pub fn sentence(b: &mut TreeBuilder, target: &str, qualifier: Option<&str>, at: u32) -> NodeIndex {
    code_block_statement(b, NodeKind::Sentence, target, qualifier, at)
}

pub fn variable(b: &mut TreeBuilder, name: &str, level: u8, at: u32) -> NodeIndex {
    b.leaf(
        NodeKind::VariableDefinition(VariableData::new(name, level)),
        line(at),
    )
}

pub fn global_variable(b: &mut TreeBuilder, name: &str, level: u8, at: u32) -> NodeIndex {
    b.leaf(
        NodeKind::VariableDefinition(VariableData::new(name, level).global()),
        line(at),
    )
}

/// Group item that later items nest under until `close`.
pub fn open_group(b: &mut TreeBuilder, name: &str, level: u8, at: u32) -> NodeIndex {
    b.open(
        NodeKind::VariableDefinition(VariableData::new(name, level)),
        line(at),
    )
}

pub fn variable_usage(b: &mut TreeBuilder, name: &str, at: u32) -> NodeIndex {
    b.leaf(
        NodeKind::VariableUsage(UsageData::new(name)),
        Range::on_line(at, 20, 20 + name.len() as u32),
    )
}

/// `head OF q1 OF q2 ...` as a qualified reference. Returns the chain.
pub fn qualified_usage(b: &mut TreeBuilder, chain: &[&str], at: u32) -> Vec<NodeIndex> {
    b.open(NodeKind::QualifiedReference, Range::on_line(at, 20, 70));
    let nodes = chain
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let start = 20 + 12 * i as u32;
            b.leaf(
                NodeKind::VariableUsage(UsageData::new(*name)),
                Range::on_line(at, start, start + name.len() as u32),
            )
        })
        .collect();
    b.close();
    nodes
}
