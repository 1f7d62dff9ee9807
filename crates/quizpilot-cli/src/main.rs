//! quizpilot CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizpilot", version, about = "Answer-memory quiz driver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive the quiz in a browser
    Run {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Quiz start URL (overrides config)
        #[arg(long)]
        url: Option<String>,

        /// Answer ledger CSV path (overrides config)
        #[arg(long)]
        storage: Option<PathBuf>,

        /// Stop after this many questions (default: run until interrupted)
        #[arg(long)]
        max_questions: Option<u64>,

        /// Write a session report JSON here on completion
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Summarize the answer ledger
    Stats {
        /// Answer ledger CSV path
        #[arg(long, default_value = "quiz_results.csv")]
        storage: PathBuf,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Create a starter quizpilot.toml
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizpilot=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            url,
            storage,
            max_questions,
            report,
        } => commands::run::execute(config, url, storage, max_questions, report).await,
        Commands::Stats { storage, format } => commands::stats::execute(storage, format),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
