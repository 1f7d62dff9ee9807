//! End-to-end session tests: the engine driving a scripted browser against
//! the real CSV store.

use std::sync::Arc;

use quizpilot_browser::{MockBrowser, ScriptedQuestion};
use quizpilot_core::engine::{NoopObserver, QuizSession, SessionConfig};
use quizpilot_core::model::OptionOutcome;
use quizpilot_core::report::EncounterKind;
use quizpilot_core::traits::LedgerStore;
use quizpilot_store::CsvLedgerStore;

fn store_in(dir: &tempfile::TempDir) -> CsvLedgerStore {
    CsvLedgerStore::new(dir.path().join("quiz_results.csv"))
}

fn session(
    script: Vec<ScriptedQuestion>,
    store: CsvLedgerStore,
    config: SessionConfig,
) -> QuizSession {
    QuizSession::new(Arc::new(MockBrowser::new(script)), Arc::new(store), config)
        .unwrap()
        .with_seed(42)
}

#[tokio::test]
async fn first_sighting_appends_annotated_row() {
    let dir = tempfile::tempdir().unwrap();
    let script = vec![ScriptedQuestion::new("R?", &["X", "Y"], "X")];
    let mut session = session(script, store_in(&dir), SessionConfig::default());

    let outcome = session.process_next_question().await.unwrap();
    assert_eq!(outcome.kind, EncounterKind::FirstSeen);
    assert!(!outcome.reused_known_correct);
    assert!(outcome.observed_correct.is_some());
    // The chosen cell carries its annotation inline.
    let annotated = outcome
        .options
        .iter()
        .filter(|cell| cell.contains("(Correct)") || cell.contains("(Incorrect)"))
        .count();
    assert_eq!(annotated, 1);

    let persisted = store_in(&dir).load().unwrap();
    let record = persisted.get("R?").unwrap();
    assert_eq!(record.options, vec!["X", "Y"]);
    let observed = OptionOutcome::from_signal(outcome.observed_correct.unwrap());
    assert_eq!(record.outcome_of(&outcome.chosen), observed);
}

#[tokio::test]
async fn resolved_question_reuses_without_outcome_signal() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store
        .append_question("Q?", &["A".into(), "B (Correct)".into(), "C".into()])
        .unwrap();

    let script = vec![ScriptedQuestion::new("Q?", &["A", "B", "C"], "B")];
    let browser = Arc::new(MockBrowser::new(script));
    let mut session = QuizSession::new(
        browser.clone(),
        Arc::new(store),
        SessionConfig {
            restart_after: 25,
            max_encounters: Some(3),
        },
    )
    .unwrap()
    .with_seed(7);

    let report = session.run(&NoopObserver).await.unwrap();

    assert_eq!(report.totals.reused, 3);
    assert_eq!(report.totals.probed, 0);
    // Branch 1 never waits for the outcome signal.
    assert_eq!(browser.outcome_signals(), 0);
    for outcome in &report.encounters {
        assert_eq!(outcome.kind, EncounterKind::ReusedKnownCorrect);
        assert_eq!(outcome.chosen, "B");
        assert_eq!(outcome.observed_correct, None);
    }

    // Reuse never mutates the ledger.
    let persisted = store_in(&dir).load().unwrap();
    assert_eq!(persisted.get("Q?").unwrap().correct.as_deref(), Some("B"));
    assert_eq!(persisted.get("Q?").unwrap().incorrect.len(), 0);
}

#[tokio::test]
async fn single_candidate_probe_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store
        .append_question("Q?", &["A (Incorrect)".into(), "B".into(), "C (Incorrect)".into()])
        .unwrap();

    let script = vec![ScriptedQuestion::new("Q?", &["A", "B", "C"], "B")];
    let mut session = session(script, store, SessionConfig::default());

    let outcome = session.process_next_question().await.unwrap();
    assert_eq!(outcome.kind, EncounterKind::Probed);
    assert_eq!(outcome.chosen, "B");
    assert_eq!(outcome.observed_correct, Some(true));

    let persisted = store_in(&dir).load().unwrap();
    assert_eq!(persisted.get("Q?").unwrap().correct.as_deref(), Some("B"));
}

#[tokio::test]
async fn contradiction_falls_back_to_first_rendered() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store
        .append_question(
            "Q?",
            &[
                "A (Incorrect)".into(),
                "B (Incorrect)".into(),
                "C (Incorrect)".into(),
            ],
        )
        .unwrap();

    let script = vec![ScriptedQuestion::new("Q?", &["A", "B", "C"], "B")];
    let mut session = session(script, store, SessionConfig::default());

    let outcome = session.process_next_question().await.unwrap();
    assert_eq!(outcome.kind, EncounterKind::ProbedExhausted);
    assert_eq!(outcome.chosen, "A");

    // The poisoned record stays as it was; there is no cell left to
    // classify.
    let persisted = store_in(&dir).load().unwrap();
    let record = persisted.get("Q?").unwrap();
    assert!(record.is_contradictory());
    assert_eq!(record.incorrect.len(), 3);
}

#[tokio::test]
async fn probing_eliminates_options_until_resolved() {
    let dir = tempfile::tempdir().unwrap();
    let script = vec![ScriptedQuestion::new("Q?", &["A", "B", "C"], "C")];
    let mut session = session(
        script,
        store_in(&dir),
        SessionConfig {
            restart_after: 25,
            max_encounters: Some(6),
        },
    );

    let report = session.run(&NoopObserver).await.unwrap();

    // Knowledge is monotonic: every probe either found the answer or
    // eliminated a candidate, and the question must resolve within the
    // option count.
    let persisted = store_in(&dir).load().unwrap();
    let record = persisted.get("Q?").unwrap();
    assert_eq!(record.correct.as_deref(), Some("C"));
    assert!(record.incorrect.iter().all(|o| o == "A" || o == "B"));
    assert!(report.totals.reused >= 3);

    // Once resolved, no later encounter re-probes.
    let resolved_at = report
        .encounters
        .iter()
        .position(|o| o.observed_correct == Some(true))
        .unwrap();
    for outcome in &report.encounters[resolved_at + 1..] {
        assert_eq!(outcome.kind, EncounterKind::ReusedKnownCorrect);
    }
}

#[tokio::test]
async fn restart_threshold_triggers_quiz_restart() {
    let dir = tempfile::tempdir().unwrap();
    let script = vec![
        ScriptedQuestion::new("Q1", &["A", "B"], "A"),
        ScriptedQuestion::new("Q2", &["X", "Y"], "Y"),
    ];
    let mut session = session(
        script,
        store_in(&dir),
        SessionConfig {
            restart_after: 2,
            max_encounters: Some(5),
        },
    );

    let report = session.run(&NoopObserver).await.unwrap();
    assert_eq!(report.totals.quiz_restarts, 2);
    assert_eq!(session.answered_since_restart(), 1);
}

#[tokio::test]
async fn text_drift_is_a_distinct_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    // The ledger knows an answer the page no longer shows.
    store
        .append_question("Q?", &["Old wording (Correct)".into(), "B".into()])
        .unwrap();

    let script = vec![ScriptedQuestion::new("Q?", &["New wording", "B"], "B")];
    let mut session = session(script, store, SessionConfig::default());

    let err = session.process_next_question().await.unwrap_err();
    let drift = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<quizpilot_core::error::BrowserError>())
        .any(|cause| cause.is_text_drift());
    assert!(drift, "expected OptionNotFound in the chain, got: {err:#}");
}

#[tokio::test]
async fn session_report_round_trips_through_json() {
    let dir = tempfile::tempdir().unwrap();
    let script = vec![ScriptedQuestion::new("Q?", &["A", "B"], "A")];
    let mut session = session(
        script,
        store_in(&dir),
        SessionConfig {
            restart_after: 25,
            max_encounters: Some(2),
        },
    );

    let report = session.run(&NoopObserver).await.unwrap();
    let path = dir.path().join("session.json");
    report.save_json(&path).unwrap();

    let loaded = quizpilot_core::report::SessionReport::load_json(&path).unwrap();
    assert_eq!(loaded.id, report.id);
    assert_eq!(loaded.encounters.len(), report.encounters.len());
    assert_eq!(loaded.totals, report.totals);
}
