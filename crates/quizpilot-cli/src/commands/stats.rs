//! The `quizpilot stats` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};
use serde::Serialize;

use quizpilot_core::model::Ledger;
use quizpilot_core::traits::LedgerStore;
use quizpilot_store::CsvLedgerStore;

/// Aggregate view of a persisted ledger.
#[derive(Debug, Serialize)]
struct LedgerSummary {
    /// Questions with a persisted row.
    questions: usize,
    /// Questions whose correct option is known.
    resolved: usize,
    /// Questions still being probed.
    probing: usize,
    /// Questions where every seen option is marked incorrect.
    contradictions: usize,
    /// Option cells seen across all questions.
    options_seen: usize,
    /// Option cells classified incorrect.
    options_eliminated: usize,
}

fn summarize(ledger: &Ledger) -> LedgerSummary {
    let mut summary = LedgerSummary {
        questions: ledger.len(),
        resolved: 0,
        probing: 0,
        contradictions: 0,
        options_seen: 0,
        options_eliminated: 0,
    };

    for (_, record) in ledger.records() {
        if record.is_resolved() {
            summary.resolved += 1;
        } else if record.is_contradictory() {
            summary.contradictions += 1;
        } else {
            summary.probing += 1;
        }
        summary.options_seen += record.options.len();
        summary.options_eliminated += record.incorrect.len();
    }

    summary
}

pub fn execute(storage: PathBuf, format: String) -> Result<()> {
    let store = CsvLedgerStore::new(&storage);
    let ledger = store.load()?;
    let summary = summarize(&ledger);

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        "table" => print_table(&storage, &summary),
        other => anyhow::bail!("unknown format: {other} (expected table or json)"),
    }

    Ok(())
}

fn print_table(storage: &std::path::Path, summary: &LedgerSummary) {
    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![
        Cell::new("Questions known"),
        Cell::new(summary.questions),
    ]);
    table.add_row(vec![Cell::new("Resolved"), Cell::new(summary.resolved)]);
    table.add_row(vec![Cell::new("Still probing"), Cell::new(summary.probing)]);
    table.add_row(vec![
        Cell::new("Contradictions"),
        Cell::new(summary.contradictions),
    ]);
    table.add_row(vec![
        Cell::new("Options seen"),
        Cell::new(summary.options_seen),
    ]);
    table.add_row(vec![
        Cell::new("Options eliminated"),
        Cell::new(summary.options_eliminated),
    ]);

    println!("Ledger: {}", storage.display());
    println!("{table}");
}
