//! # claimflow CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber, opens the
//! session, and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use claimflow_cli::claim::{
    run_claim_pdf, run_generate, run_review, ClaimPdfArgs, ReviewArgs,
};
use claimflow_cli::codes::{run_codes, CodesArgs};
use claimflow_cli::form::{run_form, FormArgs};
use claimflow_cli::history::{run_history, HistoryArgs};
use claimflow_cli::ingest::{run_ingest, run_suggest, IngestArgs};
use claimflow_cli::status::{run_health, run_reset, run_status};
use claimflow_cli::{Session, DEFAULT_STATE_DIR};

/// claimflow: prepare medical claims from clinical notes.
///
/// Ingests a clinical note, suggests ICD-10 and CPT codes, and submits the
/// approved, signed claim to the coding service.
#[derive(Parser, Debug)]
#[command(name = "claimflow", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Coding service base URL. Overrides CLAIMFLOW_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory holding the persisted draft and claims history.
    #[arg(long, global = true, default_value = DEFAULT_STATE_DIR)]
    state_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract text and entities from a note or document.
    Ingest(IngestArgs),

    /// Fetch and show code suggestions for the ingested document.
    Suggest,

    /// Edit the approved codes.
    Codes(CodesArgs),

    /// Set amount and signer, and show the claim as it will be submitted.
    Review(ReviewArgs),

    /// Submit the reviewed claim and clear the draft.
    Generate,

    /// Fill and render a CMS-1500 form.
    Form(FormArgs),

    /// Render the claim summary PDF.
    ClaimPdf(ClaimPdfArgs),

    /// Show or clear generated claims.
    History(HistoryArgs),

    /// Summarize the current draft.
    Status,

    /// Clear the current draft.
    Reset,

    /// Probe the coding service.
    Health,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let session = match Session::open(cli.api_url.as_deref(), &cli.state_dir) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(1);
        }
    };

    let result = match &cli.command {
        Commands::Ingest(args) => run_ingest(args, &session).await,
        Commands::Suggest => run_suggest(&session).await,
        Commands::Codes(args) => run_codes(args, &session),
        Commands::Review(args) => run_review(args, &session).await,
        Commands::Generate => run_generate(&session).await,
        Commands::Form(args) => run_form(args, &session).await,
        Commands::ClaimPdf(args) => run_claim_pdf(args, &session).await,
        Commands::History(args) => run_history(args, &session),
        Commands::Status => run_status(&session),
        Commands::Reset => run_reset(&session),
        Commands::Health => run_health(&session).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
