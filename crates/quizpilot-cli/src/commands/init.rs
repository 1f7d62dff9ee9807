//! The `quizpilot init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizpilot.toml").exists() {
        println!("quizpilot.toml already exists, skipping.");
    } else {
        std::fs::write("quizpilot.toml", SAMPLE_CONFIG)?;
        println!("Created quizpilot.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit quizpilot.toml with your quiz URL and selectors");
    println!("  2. Run: quizpilot run");
    println!("  3. Inspect progress: quizpilot stats");

    Ok(())
}

const SAMPLE_CONFIG: &str = r##"# quizpilot configuration

# The page the quiz starts on.
quiz_url = ""

# Where observed answers accumulate.
storage_path = "quiz_results.csv"

# Restart the quiz after this many answered questions.
restart_after = 25

# Page timing, in milliseconds.
result_wait_ms = 1000
advance_wait_ms = 2000
element_timeout_ms = 15000

# Run Chromium without a visible window.
headless = false

[selectors]
question = "h3.font-weight-normal span"
option = "div.option"
success = "div.h3.text-success"
next = "#cancel"
"##;
