//! Encounter outcomes and the JSON session report.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How one question encounter was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterKind {
    /// A previously known-correct answer was reused.
    ReusedKnownCorrect,
    /// Probed among options not yet classified incorrect.
    Probed,
    /// Every rendered option was already classified incorrect; the first
    /// rendered option was chosen deterministically.
    ProbedExhausted,
    /// First sighting of the question; probed uniformly at random.
    FirstSeen,
}

/// The outcome of one fully resolved question encounter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterOutcome {
    /// The question text as rendered.
    pub question: String,
    /// The rendered options in on-screen order. For first sightings the
    /// chosen cell carries its inline annotation, matching the persisted
    /// row.
    pub options: Vec<String>,
    /// The option that was clicked.
    pub chosen: String,
    /// Whether a previously known-correct answer was reused. Reused
    /// encounters skip the outcome signal and persist nothing.
    pub reused_known_correct: bool,
    /// The observed pass/fail signal; `None` for reused encounters.
    pub observed_correct: Option<bool>,
    pub kind: EncounterKind,
}

/// Aggregate counters for one session run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTotals {
    /// Encounters resolved by reusing a known-correct answer.
    pub reused: usize,
    /// Probes on partially known questions (exhausted fallbacks included).
    pub probed: usize,
    /// First sightings.
    pub first_seen: usize,
    /// Exhausted-fallback probes, counted separately as a contradiction
    /// signal.
    pub exhausted: usize,
    /// Probes whose outcome signal came back correct.
    pub observed_correct: usize,
    /// Full quiz restarts triggered by the restart threshold.
    pub quiz_restarts: u32,
}

impl SessionTotals {
    /// Fold one encounter into the counters.
    pub fn tally(&mut self, outcome: &EncounterOutcome) {
        match outcome.kind {
            EncounterKind::ReusedKnownCorrect => self.reused += 1,
            EncounterKind::Probed => self.probed += 1,
            EncounterKind::ProbedExhausted => {
                self.probed += 1;
                self.exhausted += 1;
            }
            EncounterKind::FirstSeen => self.first_seen += 1,
        }
        if outcome.observed_correct == Some(true) {
            self.observed_correct += 1;
        }
    }
}

/// Record of one bounded session run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique run identifier.
    pub id: Uuid,
    /// When the session started.
    pub started_at: DateTime<Utc>,
    /// Per-encounter outcomes, in order.
    pub encounters: Vec<EncounterOutcome>,
    /// Aggregate counters.
    pub totals: SessionTotals,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl SessionReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(kind: EncounterKind, observed_correct: Option<bool>) -> EncounterOutcome {
        EncounterOutcome {
            question: "Q".into(),
            options: vec!["A".into(), "B".into()],
            chosen: "A".into(),
            reused_known_correct: kind == EncounterKind::ReusedKnownCorrect,
            observed_correct,
            kind,
        }
    }

    #[test]
    fn tally_counts_kinds() {
        let mut totals = SessionTotals::default();
        totals.tally(&outcome(EncounterKind::ReusedKnownCorrect, None));
        totals.tally(&outcome(EncounterKind::Probed, Some(true)));
        totals.tally(&outcome(EncounterKind::ProbedExhausted, Some(false)));
        totals.tally(&outcome(EncounterKind::FirstSeen, Some(true)));

        assert_eq!(totals.reused, 1);
        assert_eq!(totals.probed, 2);
        assert_eq!(totals.exhausted, 1);
        assert_eq!(totals.first_seen, 1);
        assert_eq!(totals.observed_correct, 2);
    }

    #[test]
    fn json_roundtrip() {
        let report = SessionReport {
            id: Uuid::nil(),
            started_at: Utc::now(),
            encounters: vec![outcome(EncounterKind::FirstSeen, Some(false))],
            totals: SessionTotals::default(),
            duration_ms: 42,
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        report.save_json(&path).unwrap();
        let loaded = SessionReport::load_json(&path).unwrap();

        assert_eq!(loaded.id, Uuid::nil());
        assert_eq!(loaded.encounters.len(), 1);
        assert_eq!(loaded.encounters[0].kind, EncounterKind::FirstSeen);
    }
}
