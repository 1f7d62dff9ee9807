//! quizpilot-browser — quiz page drivers.
//!
//! Implements the `QuizBrowser` trait for a Chromium instance driven over
//! the DevTools protocol, plus a scripted mock for driving the session
//! engine in tests, and the TOML configuration layer.

pub mod chromium;
pub mod config;
pub mod mock;

pub use chromium::ChromiumQuizBrowser;
pub use config::{load_config, load_config_from, QuizConfig, Selectors};
pub use mock::{MockBrowser, ScriptedQuestion};
