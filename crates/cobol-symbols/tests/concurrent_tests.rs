//! Concurrent symbol service tests
//!
//! The program-key map is a DashMap, so analyses of different documents,
//! queries and resets may run on different threads against one shared
//! service.

mod support;

use cobol_common::Position;
use cobol_symbols::{ProgramKey, RegistrationPass, SymbolService};
use cobol_tree::{AnalysisResult, TreeBuilder};
use rayon::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use support::*;

fn document(i: usize) -> String {
    format!("file:///doc_{i}.cbl")
}

fn analysis(uri: &str) -> AnalysisResult {
    let mut b = TreeBuilder::new(uri);
    open_program(&mut b, "MAIN", 0);
    open_data_section(&mut b, 2);
    variable(&mut b, "COUNTER", 1, 3);
    b.close();
    open_paragraph(&mut b, "FIRST", 10);
    perform(&mut b, "SECOND", None, 11);
    variable_usage(&mut b, "COUNTER", 12);
    b.close();
    open_paragraph(&mut b, "SECOND", 20);
    b.finish()
}

#[test]
fn test_concurrent_table_creation_is_unique() {
    let service = Arc::new(SymbolService::new());
    let keys: Vec<ProgramKey> = (0..1000)
        .map(|i| ProgramKey::new(&format!("P{}", i % 50), "file:///shared.cbl"))
        .collect();

    let tables: Vec<_> = keys
        .par_iter()
        .map(|key| service.table(key.clone()))
        .collect();

    assert_eq!(service.len(), 50);
    for (key, table) in keys.iter().zip(&tables) {
        let current = service.existing_table(key).expect("table exists");
        assert!(Arc::ptr_eq(table, &current), "table for {key} was replaced");
    }
}

#[test]
fn test_concurrent_document_analysis() {
    let service = Arc::new(SymbolService::new());
    let error_count = AtomicUsize::new(0);

    let results: Vec<AnalysisResult> = (0..64)
        .into_par_iter()
        .map(|i| {
            let mut result = analysis(&document(i));
            let errors = RegistrationPass::new(&service).run(&mut result);
            error_count.fetch_add(errors.len(), Ordering::Relaxed);
            result
        })
        .collect();

    assert_eq!(error_count.load(Ordering::Relaxed), 0);
    assert_eq!(service.len(), 64);

    results.par_iter().enumerate().for_each(|(i, result)| {
        let element = service
            .find_element_by_position(result, &document(i), Position::new(20, 8))
            .expect("paragraph name");
        assert_eq!(element.usages.len(), 1);
        assert!(element.usages.iter().all(|l| l.uri == document(i)));
    });
}

#[test]
fn test_concurrent_reset_and_reanalysis() {
    let service = Arc::new(SymbolService::new());
    for i in 0..32 {
        RegistrationPass::new(&service).run(&mut analysis(&document(i)));
    }

    // Even documents are closed while odd documents are re-analysed.
    (0..32).into_par_iter().for_each(|i| {
        if i % 2 == 0 {
            service.reset(&document(i));
        } else {
            let mut result = analysis(&document(i));
            let errors = RegistrationPass::new(&service).run(&mut result);
            assert!(errors.is_empty());
        }
    });

    assert_eq!(service.len(), 16);
    for i in 0..32 {
        let key = ProgramKey::new("MAIN", &document(i));
        assert_eq!(service.contains_program(&key), i % 2 == 1);
    }

    // Re-analysis replaced the tables instead of accumulating.
    let program_symbols = service.get_program_symbols();
    for table in program_symbols.values() {
        let table = cobol_symbols::read_table(table);
        assert_eq!(table.paragraph("SECOND").map(|r| r.usages().len()), Some(1));
    }
}

#[test]
fn test_queries_during_resets_keep_their_snapshot() {
    let service = Arc::new(SymbolService::new());
    let mut result = analysis(&document(0));
    RegistrationPass::new(&service).run(&mut result);
    let program = result.arena.children(result.root)[0];
    let key = service.program_key(&result.arena, program);

    let seen = AtomicUsize::new(0);
    (0..200).into_par_iter().for_each(|i| {
        if i % 10 == 0 {
            service.reset(&document(0));
        } else if let Some(table) = service.existing_table(&key) {
            let table = cobol_symbols::read_table(&table);
            assert_eq!(table.paragraphs().len(), 2);
            seen.fetch_add(1, Ordering::Relaxed);
        }
    });

    assert!(!service.contains_program(&key));
    assert!(seen.load(Ordering::Relaxed) <= 180);
}
