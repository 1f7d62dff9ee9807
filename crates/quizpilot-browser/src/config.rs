//! Quiz target configuration.
//!
//! Everything site-specific lives here: the quiz URL, the CSS selectors for
//! the page elements, the wait timings, the storage path, and the restart
//! threshold. Loaded from TOML with CLI overrides applied by the binary.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// CSS selectors for the quiz page elements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Selectors {
    /// The rendered question text.
    #[serde(default = "default_question_selector")]
    pub question: String,
    /// One element per answer option.
    #[serde(default = "default_option_selector")]
    pub option: String,
    /// Visible only when the selected answer was accepted as correct.
    #[serde(default = "default_success_selector")]
    pub success: String,
    /// The control that advances to the next question, when present.
    #[serde(default = "default_next_selector")]
    pub next: String,
}

fn default_question_selector() -> String {
    "h3.font-weight-normal span".to_string()
}
fn default_option_selector() -> String {
    "div.option".to_string()
}
fn default_success_selector() -> String {
    "div.h3.text-success".to_string()
}
fn default_next_selector() -> String {
    "#cancel".to_string()
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            question: default_question_selector(),
            option: default_option_selector(),
            success: default_success_selector(),
            next: default_next_selector(),
        }
    }
}

/// Top-level quizpilot configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Quiz start URL.
    #[serde(default)]
    pub quiz_url: String,
    /// Answer ledger CSV path.
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,
    /// Restart the quiz after this many answered questions.
    #[serde(default = "default_restart_after")]
    pub restart_after: u32,
    /// Milliseconds to wait before checking the result indicator.
    #[serde(default = "default_result_wait_ms")]
    pub result_wait_ms: u64,
    /// Milliseconds to wait around advancing to the next question.
    #[serde(default = "default_advance_wait_ms")]
    pub advance_wait_ms: u64,
    /// Milliseconds to wait for page elements before giving up.
    #[serde(default = "default_element_timeout_ms")]
    pub element_timeout_ms: u64,
    /// Run Chromium headless. Off by default; the quiz is easier to watch
    /// (and debug) with a visible window.
    #[serde(default)]
    pub headless: bool,
    #[serde(default)]
    pub selectors: Selectors,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("quiz_results.csv")
}
fn default_restart_after() -> u32 {
    25
}
fn default_result_wait_ms() -> u64 {
    1000
}
fn default_advance_wait_ms() -> u64 {
    2000
}
fn default_element_timeout_ms() -> u64 {
    15_000
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            quiz_url: String::new(),
            storage_path: default_storage_path(),
            restart_after: default_restart_after(),
            result_wait_ms: default_result_wait_ms(),
            advance_wait_ms: default_advance_wait_ms(),
            element_timeout_ms: default_element_timeout_ms(),
            headless: false,
            selectors: Selectors::default(),
        }
    }
}

/// Load configuration from the well-known paths.
///
/// Search order:
/// 1. `quizpilot.toml` in the current directory
/// 2. `~/.config/quizpilot/config.toml`
///
/// Falls back to defaults when neither exists.
pub fn load_config() -> Result<QuizConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizpilot.toml");
        if local.exists() {
            Some(local)
        } else if let Some(global) = global_config_path().filter(|p| p.exists()) {
            Some(global)
        } else {
            None
        }
    };

    match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))
        }
        None => Ok(QuizConfig::default()),
    }
}

fn global_config_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizpilot").join("config.toml"))
}
