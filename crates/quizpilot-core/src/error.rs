//! Collaborator error types.
//!
//! These errors represent failures in the browsing and storage layers.
//! Defined in `quizpilot-core` so the session engine can classify them —
//! in particular, tell text-drift logic errors apart from I/O failures —
//! without string matching.

use thiserror::Error;

/// Errors from the browsing layer.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// A decided option text could not be matched to any rendered element:
    /// the decision and the page have drifted apart.
    #[error("option not on screen: {option:?}")]
    OptionNotFound { option: String },

    /// Waiting for a page element timed out.
    #[error("timed out after {waited_ms}ms waiting for {selector:?}")]
    Timeout { selector: String, waited_ms: u64 },

    /// Launching the browser or loading the page failed.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// The underlying browser transport failed.
    #[error("browser transport error: {0}")]
    Transport(String),
}

impl BrowserError {
    /// Returns `true` for the text-drift logic error, as opposed to an
    /// infrastructure failure.
    pub fn is_text_drift(&self) -> bool {
        matches!(self, BrowserError::OptionNotFound { .. })
    }
}

/// Errors from the ledger storage layer. All are fatal to the session; the
/// store never retries silently.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Underlying file I/O failed.
    #[error("ledger I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted row violates the tabular layout: no question field, or
    /// more option cells than the header declares. Row numbers are 1-based
    /// over data rows.
    #[error("malformed ledger row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    /// The storage backend rejected the data.
    #[error("ledger storage error: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_drift_classification() {
        let drift = BrowserError::OptionNotFound {
            option: "35 mph".into(),
        };
        assert!(drift.is_text_drift());

        let timeout = BrowserError::Timeout {
            selector: "div.option".into(),
            waited_ms: 15_000,
        };
        assert!(!timeout.is_text_drift());
    }

    #[test]
    fn malformed_row_message() {
        let err = LedgerError::MalformedRow {
            row: 3,
            reason: "row wider than header".into(),
        };
        assert_eq!(
            err.to_string(),
            "malformed ledger row 3: row wider than header"
        );
    }
}
