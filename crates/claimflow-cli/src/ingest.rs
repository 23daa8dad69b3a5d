//! # Ingest and Suggest Subcommands
//!
//! `ingest` sends pasted text or a document to the extractor and replaces
//! the draft's text, entities, and suggestion cache. `suggest` enters the
//! Suggest stage, fetching suggestions when the cache is empty, and prints
//! them with their approval marks.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use claimflow_client::{FileUpload, IngestOptions};
use claimflow_core::ClaimDraft;
use claimflow_workflow::Stage;

use crate::session::Session;

/// Arguments for `claimflow ingest`.
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Clinical note text.
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub text: Option<String>,

    /// Document to upload (PDF, image, or plain text).
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Keep all extracted text instead of only clinically relevant text.
    #[arg(long, requires = "file")]
    pub all_text: bool,

    /// Ask the service to return suggestions with the extraction.
    #[arg(long, requires = "file")]
    pub auto_suggest: bool,
}

/// Execute `claimflow ingest`.
pub async fn run_ingest(args: &IngestArgs, session: &Session) -> Result<u8> {
    let ctl = session.controller();
    let summary = match (&args.text, &args.file) {
        (Some(text), _) => ctl.ingest_text(text).await?,
        (None, Some(path)) => {
            let file = read_upload(path)?;
            let options = IngestOptions {
                clinical_only: !args.all_text,
                auto_suggest: args.auto_suggest,
            };
            ctl.ingest_file(file, options).await?
        }
        (None, None) => bail!("either --text or --file is required"),
    };

    println!(
        "OK: ingested {} characters, {} entities",
        summary.characters, summary.entities
    );
    print_entities(&ctl.draft().snapshot());
    if summary.suggestions > 0 {
        println!("{} suggestions returned with the upload", summary.suggestions);
    }
    Ok(0)
}

fn read_upload(path: &Path) -> Result<FileUpload> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();
    Ok(FileUpload::new(filename, bytes))
}

fn print_entities(draft: &ClaimDraft) {
    for entity in &draft.entities {
        let span = entity.span_in(&draft.text).unwrap_or(entity.text.as_str());
        println!("  {:<14} {span}", entity.label.as_str());
    }
}

/// Execute `claimflow suggest`.
pub async fn run_suggest(session: &Session) -> Result<u8> {
    let ctl = session.controller();
    if ctl.navigate(Stage::Suggest).await? != Stage::Suggest {
        bail!("no document ingested; run `claimflow ingest` first");
    }

    let draft = ctl.draft().snapshot();
    if draft.suggestions.is_empty() {
        println!("No suggestions found.");
        return Ok(0);
    }
    println!("Suggestions ({}):", draft.suggestions.len());
    for s in &draft.suggestions {
        let mark = if draft.approved.contains(&s.code) { "x" } else { " " };
        println!(
            "  [{mark}] {:<8} {:<7} {:>3}%  {}",
            s.code,
            s.system.as_str(),
            s.score_percent(),
            s.description
        );
        if !s.reason.is_empty() {
            println!("        {}", s.reason);
        }
    }
    Ok(0)
}
