//! The `quizpilot run` command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use quizpilot_browser::{load_config_from, ChromiumQuizBrowser};
use quizpilot_core::engine::{EncounterObserver, QuizSession, SessionConfig};
use quizpilot_core::report::{EncounterKind, EncounterOutcome, SessionTotals};
use quizpilot_store::CsvLedgerStore;

/// Console observer.
struct ConsoleObserver;

impl EncounterObserver for ConsoleObserver {
    fn on_encounter(&self, index: u64, outcome: &EncounterOutcome) {
        let tag = match outcome.kind {
            EncounterKind::ReusedKnownCorrect => "reused",
            EncounterKind::Probed => "probe",
            EncounterKind::ProbedExhausted => "probe (exhausted)",
            EncounterKind::FirstSeen => "new",
        };
        let observed = match outcome.observed_correct {
            Some(true) => " => correct",
            Some(false) => " => incorrect",
            None => "",
        };
        eprintln!(
            "  [{index}] {tag}: {} :: {}{observed}",
            outcome.question, outcome.chosen
        );
    }

    fn on_quiz_restart(&self, total_answered: u64) {
        eprintln!("  Restarting quiz ({total_answered} answered so far)");
    }

    fn on_session_complete(&self, totals: &SessionTotals, elapsed: Duration) {
        eprintln!(
            "\nSession complete: {} reused, {} probed, {} new, {} correct observations ({:.1}s)",
            totals.reused,
            totals.probed,
            totals.first_seen,
            totals.observed_correct,
            elapsed.as_secs_f64()
        );
    }
}

pub async fn execute(
    config_path: Option<PathBuf>,
    url: Option<String>,
    storage: Option<PathBuf>,
    max_questions: Option<u64>,
    report: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(url) = url {
        config.quiz_url = url;
    }
    if let Some(storage) = storage {
        config.storage_path = storage;
    }
    anyhow::ensure!(
        !config.quiz_url.is_empty(),
        "no quiz URL configured; pass --url or set quiz_url in quizpilot.toml"
    );
    if let Some(cap) = max_questions {
        anyhow::ensure!(cap >= 1, "--max-questions must be at least 1");
    }

    let store = CsvLedgerStore::new(&config.storage_path);
    let browser = ChromiumQuizBrowser::launch(&config).await?;

    let session_config = SessionConfig {
        restart_after: config.restart_after,
        max_encounters: max_questions,
    };
    let mut session = QuizSession::new(Arc::new(browser), Arc::new(store), session_config)?;

    eprintln!(
        "quizpilot — driving {} (ledger: {}, {} questions known)",
        config.quiz_url,
        config.storage_path.display(),
        session.ledger().len()
    );

    let session_report = session.run(&ConsoleObserver).await?;

    if let Some(report_path) = report {
        session_report.save_json(&report_path)?;
        eprintln!("Session report saved to: {}", report_path.display());
    }

    Ok(())
}
