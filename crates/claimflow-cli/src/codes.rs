//! # Codes Subcommand
//!
//! Edits the approved set: toggle a cached suggestion, add a manual code,
//! edit a description, remove a code, or list the set.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use claimflow_core::ApprovedSet;
use claimflow_workflow::ManualCode;

use crate::session::Session;

/// Arguments for `claimflow codes`.
#[derive(Args, Debug)]
pub struct CodesArgs {
    #[command(subcommand)]
    pub command: CodesCommand,
}

#[derive(Subcommand, Debug)]
pub enum CodesCommand {
    /// Approve or unapprove a suggested code.
    Toggle {
        /// Code as shown by `claimflow suggest`.
        code: String,
    },

    /// Add a code by hand.
    Add {
        #[arg(long)]
        code: String,
        #[arg(long)]
        description: String,
        /// Code system, e.g. ICD-10 or CPT.
        #[arg(long, default_value = "ICD-10")]
        system: String,
    },

    /// Replace the description of an approved code.
    Describe { code: String, description: String },

    /// Remove an approved code.
    Remove { code: String },

    /// List approved codes.
    List,
}

/// Execute `claimflow codes`.
pub fn run_codes(args: &CodesArgs, session: &Session) -> Result<u8> {
    let ctl = session.controller();
    let editor = ctl.editor();

    match &args.command {
        CodesCommand::Toggle { code } => match editor.toggle_suggested(code) {
            Some(true) => println!("OK: approved {code}"),
            Some(false) => println!("OK: unapproved {code}"),
            None => bail!("no suggestion with code {code}; run `claimflow suggest` first"),
        },
        CodesCommand::Add {
            code,
            description,
            system,
        } => {
            if editor.is_approved(code.trim()) {
                bail!("{} is already approved", code.trim());
            }
            let added = editor.add_manual(
                ManualCode::new(code.as_str(), description.as_str()).with_system(system.as_str()),
            )?;
            println!("OK: added {} ({})", added.code, added.system.as_str());
        }
        CodesCommand::Describe { code, description } => {
            if !editor.describe(code, description)? {
                bail!("{code} is not approved");
            }
            println!("OK: updated {code}");
        }
        CodesCommand::Remove { code } => {
            if !editor.remove(code) {
                bail!("{code} is not approved");
            }
            println!("OK: removed {code}");
        }
        CodesCommand::List => print_approved(&ctl.draft().approved()),
    }
    Ok(0)
}

pub(crate) fn print_approved(approved: &ApprovedSet) {
    if approved.is_empty() {
        println!("No approved codes.");
        return;
    }
    println!("Approved codes ({}):", approved.len());
    for c in approved.iter() {
        println!("  {:<8} {:<7} {}", c.code, c.system.as_str(), c.description);
    }
}
