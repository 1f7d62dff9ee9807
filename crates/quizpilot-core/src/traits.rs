//! Collaborator traits for the browsing and storage layers.
//!
//! These traits are implemented by the `quizpilot-browser` and
//! `quizpilot-store` crates respectively; the session engine only ever sees
//! the capability set defined here.

use async_trait::async_trait;

use crate::error::{BrowserError, LedgerError};
use crate::model::{Ledger, OptionOutcome};

// ---------------------------------------------------------------------------
// Quiz browser trait
// ---------------------------------------------------------------------------

/// Capability set the session needs from a rendered quiz page.
///
/// One question is fully resolved before the next is touched, so
/// implementations never see interleaved calls.
#[async_trait]
pub trait QuizBrowser: Send + Sync {
    /// Text of the currently rendered question.
    async fn question_text(&self) -> Result<String, BrowserError>;

    /// Texts of the currently rendered options, in on-screen order.
    async fn option_texts(&self) -> Result<Vec<String>, BrowserError>;

    /// Click the option whose trimmed text equals `text`.
    ///
    /// Fails with [`BrowserError::OptionNotFound`] when no rendered option
    /// matches.
    async fn select_option(&self, text: &str) -> Result<(), BrowserError>;

    /// Wait for the result indicator and report whether the selected answer
    /// was accepted as correct.
    async fn await_outcome(&self) -> Result<bool, BrowserError>;

    /// Move on to the next question. Idempotent when no advance control is
    /// present.
    async fn advance(&self) -> Result<(), BrowserError>;

    /// Restart the quiz from the beginning.
    async fn restart(&self) -> Result<(), BrowserError>;
}

// ---------------------------------------------------------------------------
// Ledger store trait
// ---------------------------------------------------------------------------

/// Persistence for the answer ledger.
///
/// Storage failures are fatal to the session. A failed rewrite must not
/// leave a truncated row set behind.
pub trait LedgerStore: Send + Sync {
    /// Load every persisted row into a fresh [`Ledger`]. A missing
    /// destination is an empty ledger, not an error.
    fn load(&self) -> Result<Ledger, LedgerError>;

    /// Append one new question row: question text first, then the option
    /// cells exactly as given (the chosen option already annotated inline).
    /// Writes the header first when the destination is missing or empty.
    fn append_question(&self, question: &str, cells: &[String]) -> Result<(), LedgerError>;

    /// Annotate the first unclassified cell matching `option` on the row
    /// for `question`, rewriting the whole row set. Returns whether anything
    /// changed; no matching unclassified cell is a no-op, not an error.
    fn record_outcome(
        &self,
        question: &str,
        option: &str,
        outcome: OptionOutcome,
    ) -> Result<bool, LedgerError>;
}
