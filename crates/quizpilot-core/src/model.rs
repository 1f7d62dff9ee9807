//! Core data model for the answer ledger.
//!
//! A ledger maps question text (the exact rendered string, no normalization)
//! to everything known about that question's options. Persisted option cells
//! carry their classification inline as a literal ` (Correct)` or
//! ` (Incorrect)` suffix; the helpers here parse and render those cells.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Literal annotation a stored cell carries once its option is known correct.
pub const CORRECT_ANNOTATION: &str = "(Correct)";

/// Literal annotation a stored cell carries once its option is known incorrect.
pub const INCORRECT_ANNOTATION: &str = "(Incorrect)";

/// Classification of a single answer option under a specific question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionOutcome {
    Unknown,
    Correct,
    Incorrect,
}

impl OptionOutcome {
    /// The inline cell annotation for this outcome, if it has one.
    pub fn annotation(self) -> Option<&'static str> {
        match self {
            OptionOutcome::Correct => Some(CORRECT_ANNOTATION),
            OptionOutcome::Incorrect => Some(INCORRECT_ANNOTATION),
            OptionOutcome::Unknown => None,
        }
    }

    /// Classify an observed pass/fail signal.
    pub fn from_signal(correct: bool) -> Self {
        if correct {
            OptionOutcome::Correct
        } else {
            OptionOutcome::Incorrect
        }
    }
}

impl fmt::Display for OptionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionOutcome::Unknown => write!(f, "unknown"),
            OptionOutcome::Correct => write!(f, "correct"),
            OptionOutcome::Incorrect => write!(f, "incorrect"),
        }
    }
}

/// Split a stored option cell into its bare text and classification.
///
/// The cell is trimmed first; a trailing annotation is stripped from the
/// returned text.
pub fn parse_cell(cell: &str) -> (String, OptionOutcome) {
    let trimmed = cell.trim();
    if let Some(text) = trimmed.strip_suffix(CORRECT_ANNOTATION) {
        (text.trim_end().to_string(), OptionOutcome::Correct)
    } else if let Some(text) = trimmed.strip_suffix(INCORRECT_ANNOTATION) {
        (text.trim_end().to_string(), OptionOutcome::Incorrect)
    } else {
        (trimmed.to_string(), OptionOutcome::Unknown)
    }
}

/// Render an option cell with the annotation for `outcome` appended.
pub fn annotate_cell(text: &str, outcome: OptionOutcome) -> String {
    match outcome.annotation() {
        Some(annotation) => format!("{text} {annotation}"),
        None => text.to_string(),
    }
}

/// Build the persisted cells for a newly observed question: every option
/// bare except the chosen one, which carries the outcome annotation inline.
/// Only the first cell matching `chosen` is annotated.
pub fn annotated_row(options: &[String], chosen: &str, outcome: OptionOutcome) -> Vec<String> {
    let mut annotated = false;
    options
        .iter()
        .map(|option| {
            if !annotated && option == chosen {
                annotated = true;
                annotate_cell(option, outcome)
            } else {
                option.clone()
            }
        })
        .collect()
}

/// Everything known about a single quiz question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// The option text known to be correct, once discovered. At most one;
    /// authoritative once set.
    pub correct: Option<String>,
    /// Option texts observed to be incorrect.
    pub incorrect: Vec<String>,
    /// Every option text ever seen for this question, in first-observed
    /// order. Used to reconstruct persisted rows.
    pub options: Vec<String>,
}

impl QuestionRecord {
    /// Whether the correct option is known.
    pub fn is_resolved(&self) -> bool {
        self.correct.is_some()
    }

    /// Whether `option` has been classified incorrect.
    pub fn is_incorrect(&self, option: &str) -> bool {
        self.incorrect.iter().any(|o| o == option)
    }

    /// The classification of `option` under this question.
    pub fn outcome_of(&self, option: &str) -> OptionOutcome {
        if self.correct.as_deref() == Some(option) {
            OptionOutcome::Correct
        } else if self.is_incorrect(option) {
            OptionOutcome::Incorrect
        } else {
            OptionOutcome::Unknown
        }
    }

    /// Whether every seen option has been classified incorrect — the
    /// contradiction state in which the correct option was never isolated.
    pub fn is_contradictory(&self) -> bool {
        !self.is_resolved()
            && !self.options.is_empty()
            && self.options.iter().all(|o| self.is_incorrect(o))
    }

    fn register_option(&mut self, option: &str) {
        if !self.options.iter().any(|o| o == option) {
            self.options.push(option.to_string());
        }
    }
}

/// In-memory mapping from question text to its record.
///
/// Built once at startup by replaying persisted rows, then mutated in place
/// as new outcomes are observed. Knowledge is monotonic: records and option
/// lists only gain entries, and a classification, once made, is never
/// overwritten.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    records: HashMap<String, QuestionRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of known questions.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up the record for a question, if it has been seen before.
    pub fn get(&self, question: &str) -> Option<&QuestionRecord> {
        self.records.get(question)
    }

    pub fn contains(&self, question: &str) -> bool {
        self.records.contains_key(question)
    }

    /// Iterate over all known questions and their records.
    pub fn records(&self) -> impl Iterator<Item = (&String, &QuestionRecord)> {
        self.records.iter()
    }

    /// Register a question on its first sighting: all rendered options in
    /// order, with the chosen one classified per the observed outcome.
    /// No-op if the question is already known.
    pub fn insert_record(
        &mut self,
        question: &str,
        options: &[String],
        chosen: &str,
        outcome: OptionOutcome,
    ) {
        if self.records.contains_key(question) {
            return;
        }
        let record = QuestionRecord {
            correct: None,
            incorrect: Vec::new(),
            options: options.to_vec(),
        };
        self.records.insert(question.to_string(), record);
        self.record_outcome(question, chosen, outcome);
    }

    /// Record an observation for a known question. Existing classifications
    /// are never overwritten. Returns whether the ledger changed.
    pub fn record_outcome(&mut self, question: &str, option: &str, outcome: OptionOutcome) -> bool {
        let Some(record) = self.records.get_mut(question) else {
            return false;
        };
        record.register_option(option);
        match outcome {
            OptionOutcome::Correct => {
                if record.correct.is_none() && !record.is_incorrect(option) {
                    record.correct = Some(option.to_string());
                    true
                } else {
                    false
                }
            }
            OptionOutcome::Incorrect => {
                if record.correct.as_deref() != Some(option) && !record.is_incorrect(option) {
                    record.incorrect.push(option.to_string());
                    true
                } else {
                    false
                }
            }
            OptionOutcome::Unknown => false,
        }
    }

    /// Replay one persisted row (question plus option cells) into the
    /// mapping. Empty cells are skipped; repeated rows for the same question
    /// merge rather than overwrite.
    pub fn replay_row(&mut self, question: &str, cells: &[String]) {
        let record = self.records.entry(question.to_string()).or_default();
        for cell in cells {
            if cell.trim().is_empty() {
                continue;
            }
            let (text, outcome) = parse_cell(cell);
            record.register_option(&text);
            match outcome {
                OptionOutcome::Correct => {
                    if record.correct.is_none() && !record.is_incorrect(&text) {
                        record.correct = Some(text);
                    }
                }
                OptionOutcome::Incorrect => {
                    if record.correct.as_deref() != Some(text.as_str())
                        && !record.is_incorrect(&text)
                    {
                        record.incorrect.push(text);
                    }
                }
                OptionOutcome::Unknown => {}
            }
        }
    }
}
