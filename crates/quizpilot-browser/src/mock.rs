//! Scripted quiz browser for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use quizpilot_core::error::BrowserError;
use quizpilot_core::traits::QuizBrowser;

/// One scripted question: the rendered text, the rendered options, and
/// which option the quiz treats as correct.
#[derive(Debug, Clone)]
pub struct ScriptedQuestion {
    pub text: String,
    pub options: Vec<String>,
    pub correct: String,
}

impl ScriptedQuestion {
    pub fn new(text: &str, options: &[&str], correct: &str) -> Self {
        Self {
            text: text.to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct: correct.to_string(),
        }
    }
}

/// A [`QuizBrowser`] that replays a scripted question sequence, for driving
/// the session engine without a real page.
///
/// The script cycles: advancing past the last question wraps back to the
/// first, the way a short quiz repeats its pool. Restarting rewinds to the
/// beginning.
pub struct MockBrowser {
    script: Vec<ScriptedQuestion>,
    position: AtomicUsize,
    clicks: Mutex<Vec<String>>,
    last_click: Mutex<Option<String>>,
    outcome_signals: AtomicUsize,
    restarts: AtomicUsize,
}

impl MockBrowser {
    pub fn new(script: Vec<ScriptedQuestion>) -> Self {
        assert!(!script.is_empty(), "script must have at least one question");
        Self {
            script,
            position: AtomicUsize::new(0),
            clicks: Mutex::new(Vec::new()),
            last_click: Mutex::new(None),
            outcome_signals: AtomicUsize::new(0),
            restarts: AtomicUsize::new(0),
        }
    }

    fn current(&self) -> &ScriptedQuestion {
        &self.script[self.position.load(Ordering::Relaxed) % self.script.len()]
    }

    /// Every option clicked, in order.
    pub fn clicks(&self) -> Vec<String> {
        self.clicks.lock().unwrap().clone()
    }

    /// How many times the outcome signal was consulted.
    pub fn outcome_signals(&self) -> usize {
        self.outcome_signals.load(Ordering::Relaxed)
    }

    /// How many times the quiz was restarted.
    pub fn restarts(&self) -> usize {
        self.restarts.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl QuizBrowser for MockBrowser {
    async fn question_text(&self) -> Result<String, BrowserError> {
        Ok(self.current().text.clone())
    }

    async fn option_texts(&self) -> Result<Vec<String>, BrowserError> {
        Ok(self.current().options.clone())
    }

    async fn select_option(&self, text: &str) -> Result<(), BrowserError> {
        let question = self.current();
        if !question.options.iter().any(|o| o.trim() == text.trim()) {
            return Err(BrowserError::OptionNotFound {
                option: text.to_string(),
            });
        }
        self.clicks.lock().unwrap().push(text.to_string());
        *self.last_click.lock().unwrap() = Some(text.to_string());
        Ok(())
    }

    async fn await_outcome(&self) -> Result<bool, BrowserError> {
        self.outcome_signals.fetch_add(1, Ordering::Relaxed);
        let clicked = self.last_click.lock().unwrap().clone();
        Ok(clicked.as_deref() == Some(self.current().correct.as_str()))
    }

    async fn advance(&self) -> Result<(), BrowserError> {
        self.position.fetch_add(1, Ordering::Relaxed);
        *self.last_click.lock().unwrap() = None;
        Ok(())
    }

    async fn restart(&self) -> Result<(), BrowserError> {
        self.position.store(0, Ordering::Relaxed);
        self.restarts.fetch_add(1, Ordering::Relaxed);
        *self.last_click.lock().unwrap() = None;
        Ok(())
    }
}
