//! Option selection policy.
//!
//! The three-branch decision at the heart of the system, kept as a pure
//! function over a question's ledger record and the currently rendered
//! options. The session engine does the clicking and persisting around it.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::model::QuestionRecord;

/// What the policy decided for one question encounter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The ledger already knows the correct option; select it and skip the
    /// outcome signal entirely.
    KnownCorrect { option: String },
    /// Probe an option on a partially known question. `exhausted` marks the
    /// contradiction fallback: every rendered option is already classified
    /// incorrect, so the first rendered option is chosen deterministically.
    Probe { option: String, exhausted: bool },
    /// First sighting of the question; probe uniformly at random across all
    /// rendered options.
    FirstEncounter { option: String },
}

impl Decision {
    /// The option text to click.
    pub fn option(&self) -> &str {
        match self {
            Decision::KnownCorrect { option }
            | Decision::Probe { option, .. }
            | Decision::FirstEncounter { option } => option,
        }
    }

    /// Whether this encounter reuses a previously known-correct answer.
    /// Such encounters need no outcome signal and no persistence.
    pub fn reuses_known_correct(&self) -> bool {
        matches!(self, Decision::KnownCorrect { .. })
    }
}

/// Decide which rendered option to select for one question encounter.
///
/// `record` is the question's ledger entry if the question has been seen
/// before; `rendered` is the option list as currently on screen and must be
/// non-empty. A resolved option is never re-probed, except through the
/// exhausted fallback. If the known-correct text is no longer on screen the
/// decision still names it; the click surfaces the drift as
/// [`crate::error::BrowserError::OptionNotFound`].
pub fn decide<R: Rng + ?Sized>(
    record: Option<&QuestionRecord>,
    rendered: &[String],
    rng: &mut R,
) -> Decision {
    debug_assert!(!rendered.is_empty());

    let Some(record) = record else {
        let option = rendered
            .choose(rng)
            .expect("rendered options are non-empty")
            .clone();
        return Decision::FirstEncounter { option };
    };

    if let Some(correct) = &record.correct {
        return Decision::KnownCorrect {
            option: correct.clone(),
        };
    }

    let candidates: Vec<&String> = rendered
        .iter()
        .filter(|option| !record.is_incorrect(option))
        .collect();

    match candidates.choose(rng) {
        Some(option) => Decision::Probe {
            option: (*option).clone(),
            exhausted: false,
        },
        None => Decision::Probe {
            option: rendered[0].clone(),
            exhausted: true,
        },
    }
}
