//! # Review, Generate, and Claim PDF Subcommands
//!
//! `review` records the billed amount and signer and shows the draft as it
//! will be submitted. `generate` submits it and dismisses the confirmation
//! in the same invocation, which clears the draft. The stage is not
//! persisted, so a draft left behind would be submitted again as a new
//! claim by the next `generate`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use claimflow_workflow::{PdfDocument, CLAIM_PDF_FILENAME};

use crate::codes::print_approved;
use crate::session::Session;

/// Arguments for `claimflow review`.
#[derive(Args, Debug)]
pub struct ReviewArgs {
    /// Billed amount. Negative, NaN, and infinite values are stored as 0.
    #[arg(long)]
    pub amount: Option<f64>,

    /// Name of the signing provider.
    #[arg(long)]
    pub signed_by: Option<String>,
}

/// Execute `claimflow review`.
pub async fn run_review(args: &ReviewArgs, session: &Session) -> Result<u8> {
    session.enter_review().await?;
    let draft = session.controller().draft();
    if let Some(amount) = args.amount {
        draft.set_amount(amount);
    }
    if let Some(signer) = &args.signed_by {
        draft.set_signed_by(signer.as_str());
    }

    let snapshot = draft.snapshot();
    print_approved(&snapshot.approved);
    println!("Amount: {:.2}", snapshot.amount);
    if snapshot.signer_is_blank() {
        println!("Signed by: (unsigned)");
    } else {
        println!("Signed by: {}", snapshot.signed_by);
    }
    Ok(0)
}

/// Execute `claimflow generate`.
pub async fn run_generate(session: &Session) -> Result<u8> {
    session.enter_review().await?;
    let ctl = session.controller();
    let confirmation = ctl.generate_claim().await?;

    println!("OK: generated claim {}", confirmation.claim_id());
    println!("  Codes: {}", confirmation.record.codes_count);
    if let Some(amount) = confirmation.record.amount {
        println!("  Amount: {amount:.2}");
    }
    match (confirmation.tx_hash(), confirmation.explorer_url()) {
        (Some(hash), Some(url)) => {
            println!("  Transaction: {hash}");
            println!("  Explorer: {url}");
        }
        _ => println!("  Transaction: (not recorded)"),
    }
    if let Some(pdf) = &confirmation.metadata().pdf_url {
        println!("  PDF: {pdf}");
    }

    ctl.dismiss_confirmation()?;
    Ok(0)
}

/// Arguments for `claimflow claim-pdf`.
#[derive(Args, Debug)]
pub struct ClaimPdfArgs {
    /// Output path. Defaults to `cms1500.pdf` in the current directory.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Execute `claimflow claim-pdf`.
pub async fn run_claim_pdf(args: &ClaimPdfArgs, session: &Session) -> Result<u8> {
    let pdf = session.controller().preview_claim_pdf().await?;
    let out = args
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(CLAIM_PDF_FILENAME));
    write_pdf(&pdf, &out)?;
    Ok(0)
}

pub(crate) fn write_pdf(pdf: &PdfDocument, out: &Path) -> Result<()> {
    std::fs::write(out, &pdf.bytes)
        .with_context(|| format!("failed to write {}", out.display()))?;
    println!("OK: wrote {} ({} bytes)", out.display(), pdf.bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimflow_core::{CodeSuggestion, CodeSystem};

    fn reviewable(dir: &Path) -> Session {
        let session = Session::open(Some("http://127.0.0.1:1"), dir).unwrap();
        let draft = session.controller().draft();
        draft.set_text("Patient has type 2 diabetes");
        draft.add_approved(CodeSuggestion {
            code: "E11.9".into(),
            system: CodeSystem::Icd10,
            description: "Type 2 diabetes".into(),
            score: 0.92,
            reason: String::new(),
        });
        session
    }

    #[tokio::test]
    async fn review_stores_unusable_amounts_as_zero() {
        let dir = tempfile::tempdir().unwrap();
        let session = reviewable(dir.path());

        for amount in [-40.0, f64::NAN, f64::INFINITY] {
            let args = ReviewArgs {
                amount: Some(amount),
                signed_by: None,
            };
            assert_eq!(run_review(&args, &session).await.unwrap(), 0);
            assert_eq!(session.controller().draft().amount(), 0.0);
        }

        let args = ReviewArgs {
            amount: Some(250.5),
            signed_by: Some("Dr. Smith".into()),
        };
        run_review(&args, &session).await.unwrap();
        assert_eq!(session.controller().draft().amount(), 250.5);
        assert_eq!(session.controller().draft().signed_by(), "Dr. Smith");
    }
}
