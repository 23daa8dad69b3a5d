//! # History Subcommand
//!
//! Lists or clears the claims generated on this machine, newest first.

use anyhow::Result;
use clap::{Args, Subcommand};
use claimflow_store::HistoryStore;

use crate::session::Session;

/// Arguments for `claimflow history`.
#[derive(Args, Debug)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: Option<HistoryCommand>,
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// List generated claims (the default).
    List,
    /// Forget every generated claim.
    Clear,
}

/// Execute `claimflow history`.
pub fn run_history(args: &HistoryArgs, session: &Session) -> Result<u8> {
    let history = session.controller().history();
    match args.command.as_ref().unwrap_or(&HistoryCommand::List) {
        HistoryCommand::List => print_history(history),
        HistoryCommand::Clear => {
            let count = history.len();
            history.clear();
            println!("OK: cleared {count} claims");
        }
    }
    Ok(0)
}

fn print_history(history: &HistoryStore) {
    let records = history.list();
    if records.is_empty() {
        println!("No claims generated yet.");
        return;
    }
    println!("Claims ({}):", records.len());
    for r in &records {
        let amount = r
            .amount
            .map(|a| format!("{a:.2}"))
            .unwrap_or_else(|| "-".to_string());
        let tx = r.short_tx_hash().unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<12} {}  {:>2} codes  {:>10}  {tx}",
            r.id.as_str(),
            r.date.date_label(),
            r.codes_count,
            amount
        );
    }
}
