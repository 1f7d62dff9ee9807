//! The quiz session engine.
//!
//! Owns the in-memory ledger, the browsing and storage collaborators, and
//! the loop state, exposed as a resumable step function so a harness can
//! drive a bounded number of encounters.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

use crate::model::{annotated_row, Ledger, OptionOutcome};
use crate::policy::{decide, Decision};
use crate::report::{EncounterKind, EncounterOutcome, SessionReport, SessionTotals};
use crate::traits::{LedgerStore, QuizBrowser};

/// Session tuning knobs.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Restart the quiz after this many answered questions.
    pub restart_after: u32,
    /// Stop after this many encounters; `None` runs until the process is
    /// terminated.
    pub max_encounters: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            restart_after: 25,
            max_encounters: None,
        }
    }
}

/// Progress callbacks for a running session.
pub trait EncounterObserver: Send + Sync {
    fn on_encounter(&self, index: u64, outcome: &EncounterOutcome);
    fn on_quiz_restart(&self, total_answered: u64);
    fn on_session_complete(&self, totals: &SessionTotals, elapsed: Duration);
}

/// No-op observer.
pub struct NoopObserver;

impl EncounterObserver for NoopObserver {
    fn on_encounter(&self, _: u64, _: &EncounterOutcome) {}
    fn on_quiz_restart(&self, _: u64) {}
    fn on_session_complete(&self, _: &SessionTotals, _: Duration) {}
}

/// One quiz-answering session: the ledger, the collaborators, and the loop
/// counters. Strictly sequential; one question is fully resolved before the
/// next begins.
pub struct QuizSession {
    ledger: Ledger,
    browser: Arc<dyn QuizBrowser>,
    store: Arc<dyn LedgerStore>,
    config: SessionConfig,
    answered_since_restart: u32,
    rng: StdRng,
}

impl QuizSession {
    /// Create a session, replaying the persisted ledger into memory. A
    /// missing storage destination yields an empty ledger.
    pub fn new(
        browser: Arc<dyn QuizBrowser>,
        store: Arc<dyn LedgerStore>,
        config: SessionConfig,
    ) -> Result<Self> {
        anyhow::ensure!(config.restart_after >= 1, "restart_after must be at least 1");
        let ledger = store.load().context("failed to load answer ledger")?;
        tracing::info!(questions = ledger.len(), "answer ledger loaded");
        Ok(Self {
            ledger,
            browser,
            store,
            config,
            answered_since_restart: 0,
            rng: StdRng::from_os_rng(),
        })
    }

    /// Seed the probe RNG for deterministic tests.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// The in-memory ledger as of the last completed encounter.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Questions answered since the last quiz restart.
    pub fn answered_since_restart(&self) -> u32 {
        self.answered_since_restart
    }

    /// Resolve one rendered question end to end: decide, click, observe,
    /// persist, advance. Restarts the quiz when the configured threshold is
    /// reached.
    pub async fn process_next_question(&mut self) -> Result<EncounterOutcome> {
        let question = self
            .browser
            .question_text()
            .await
            .context("failed to read question text")?;
        let rendered = self
            .browser
            .option_texts()
            .await
            .context("failed to read option texts")?;
        anyhow::ensure!(
            !rendered.is_empty(),
            "question {question:?} rendered no options"
        );

        let decision = decide(self.ledger.get(&question), &rendered, &mut self.rng);
        tracing::debug!(question = %question, option = decision.option(), "selecting option");
        self.browser
            .select_option(decision.option())
            .await
            .with_context(|| format!("failed to select option for {question:?}"))?;

        let outcome = match decision {
            Decision::KnownCorrect { option } => EncounterOutcome {
                question,
                options: rendered,
                chosen: option,
                reused_known_correct: true,
                observed_correct: None,
                kind: EncounterKind::ReusedKnownCorrect,
            },
            Decision::Probe { option, exhausted } => {
                let correct = self.browser.await_outcome().await?;
                let observed = OptionOutcome::from_signal(correct);
                if self.ledger.record_outcome(&question, &option, observed) {
                    self.store
                        .record_outcome(&question, &option, observed)
                        .with_context(|| format!("failed to persist outcome for {question:?}"))?;
                }
                EncounterOutcome {
                    question,
                    options: rendered,
                    chosen: option,
                    reused_known_correct: false,
                    observed_correct: Some(correct),
                    kind: if exhausted {
                        EncounterKind::ProbedExhausted
                    } else {
                        EncounterKind::Probed
                    },
                }
            }
            Decision::FirstEncounter { option } => {
                let correct = self.browser.await_outcome().await?;
                let observed = OptionOutcome::from_signal(correct);
                let cells = annotated_row(&rendered, &option, observed);
                self.ledger
                    .insert_record(&question, &rendered, &option, observed);
                self.store
                    .append_question(&question, &cells)
                    .with_context(|| format!("failed to append new question {question:?}"))?;
                EncounterOutcome {
                    question,
                    options: cells,
                    chosen: option,
                    reused_known_correct: false,
                    observed_correct: Some(correct),
                    kind: EncounterKind::FirstSeen,
                }
            }
        };

        self.browser.advance().await?;
        self.answered_since_restart += 1;
        if self.answered_since_restart >= self.config.restart_after {
            tracing::info!(
                answered = self.answered_since_restart,
                "restart threshold reached, restarting quiz"
            );
            self.browser.restart().await?;
            self.answered_since_restart = 0;
        }

        Ok(outcome)
    }

    /// Drive the session until the configured encounter cap, reporting each
    /// encounter to `observer`. With no cap this only returns on error.
    pub async fn run(&mut self, observer: &dyn EncounterObserver) -> Result<SessionReport> {
        let start = Instant::now();
        let id = Uuid::new_v4();
        let started_at = chrono::Utc::now();
        let bounded = self.config.max_encounters.is_some();

        let mut totals = SessionTotals::default();
        let mut encounters = Vec::new();
        let mut processed: u64 = 0;

        loop {
            if let Some(cap) = self.config.max_encounters {
                if processed >= cap {
                    break;
                }
            }

            let outcome = self.process_next_question().await?;
            totals.tally(&outcome);
            observer.on_encounter(processed, &outcome);
            // Unbounded runs never return; don't accumulate encounters.
            if bounded {
                encounters.push(outcome);
            }
            processed += 1;

            if self.answered_since_restart == 0 {
                totals.quiz_restarts += 1;
                observer.on_quiz_restart(processed);
            }
        }

        let elapsed = start.elapsed();
        observer.on_session_complete(&totals, elapsed);

        Ok(SessionReport {
            id,
            started_at,
            encounters,
            totals,
            duration_ms: elapsed.as_millis() as u64,
        })
    }
}
