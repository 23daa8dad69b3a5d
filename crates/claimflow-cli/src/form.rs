//! # Form Subcommand
//!
//! Opens the CMS-1500 form for the reviewed draft (header fields derived by
//! the service, blank when derivation fails), applies `--field` and
//! `--pointer` overrides, and writes the rendered PDF.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use claimflow_client::FormFields;
use claimflow_workflow::FORM_PDF_FILENAME;

use crate::claim::write_pdf;
use crate::session::Session;

/// Arguments for `claimflow form`.
#[derive(Args, Debug)]
pub struct FormArgs {
    /// Header field override, e.g. `patient_name=Jane Doe`. Repeatable.
    #[arg(long = "field", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    pub fields: Vec<(String, String)>,

    /// Diagnosis pointers for a row (1-based), e.g. `2=1,3`. Repeatable.
    #[arg(long = "pointer", value_name = "ROW=POINTERS", value_parser = parse_assignment)]
    pub pointers: Vec<(String, String)>,

    /// Print the derived fields and pointers without rendering.
    #[arg(long)]
    pub dry_run: bool,

    /// Output path. Defaults to `cms1500_filled.pdf` in the current directory.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Execute `claimflow form`.
pub async fn run_form(args: &FormArgs, session: &Session) -> Result<u8> {
    session.enter_review().await?;
    let ctl = session.controller();
    let mut form = ctl.open_form().await;

    for (name, value) in &args.fields {
        if !form.set_field(name, value.as_str()) {
            bail!(
                "unknown form field {name:?} (known: {})",
                FormFields::NAMES.join(", ")
            );
        }
    }
    for (row, value) in &args.pointers {
        let index = parse_row(row)?;
        if !form.set_pointer(index, value.as_str()) {
            bail!("row {row} is out of range; the form has {} rows", form.pointers().len());
        }
    }

    if args.dry_run {
        for (name, value) in form.fields.entries() {
            println!("  {name:<18} {}", value.unwrap_or(""));
        }
        for (row, pointers) in form.to_request().diag_pointers.iter().enumerate() {
            println!("  row {:<2} pointers {pointers:?}", row + 1);
        }
        return Ok(0);
    }

    let pdf = ctl.render_form(&form).await?;
    let out = args
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(FORM_PDF_FILENAME));
    write_pdf(&pdf, &out)?;
    Ok(0)
}

/// Split `NAME=VALUE` at the first `=`.
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got {raw:?}")),
    }
}

fn parse_row(row: &str) -> Result<usize> {
    match row.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => bail!("invalid row {row:?}; rows are numbered from 1"),
    }
}
