//! # Status, Reset, and Health Subcommands

use anyhow::Result;

use crate::session::Session;

/// Execute `claimflow status`: summarize the draft and the history.
pub fn run_status(session: &Session) -> Result<u8> {
    let ctl = session.controller();
    let draft = ctl.draft().snapshot();

    println!("State: {}", session.state_dir().display());
    println!("Service: {}", ctl.service().base_url());
    if draft.is_empty() {
        println!("Draft: empty");
    } else {
        println!("Draft:");
        println!("  Text: {} characters", draft.text.chars().count());
        println!("  Entities: {}", draft.entities.len());
        println!("  Suggestions: {}", draft.suggestions.len());
        println!("  Approved: {}", draft.approved.codes().join(", "));
        println!("  Amount: {:.2}", draft.amount);
        if !draft.signer_is_blank() {
            println!("  Signed by: {}", draft.signed_by);
        }
    }
    println!("Claims generated: {}", ctl.history().len());
    Ok(0)
}

/// Execute `claimflow reset`: clear the draft, keeping the history.
pub fn run_reset(session: &Session) -> Result<u8> {
    session.controller().draft().reset();
    println!("OK: draft cleared");
    Ok(0)
}

/// Execute `claimflow health`. Exits 1 unless the service is healthy.
pub async fn run_health(session: &Session) -> Result<u8> {
    let report = session.controller().service().health_check().await;
    println!("{}: {}", report.url, report.status);
    Ok(if report.is_healthy() { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_keeps_history() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::open(Some("http://127.0.0.1:1"), dir.path()).unwrap();
        let ctl = session.controller();
        ctl.draft().set_text("Patient has type 2 diabetes");
        ctl.draft().set_signed_by("Dr. Smith");
        ctl.history().add(claimflow_core::ClaimRecord {
            id: claimflow_core::ClaimId::new("CLM-001"),
            date: claimflow_core::Timestamp::now(),
            codes_count: 1,
            amount: None,
            tx_hash: None,
        });
        assert_eq!(run_status(&session).unwrap(), 0);

        assert_eq!(run_reset(&session).unwrap(), 0);
        assert!(ctl.draft().snapshot().is_empty());
        assert_eq!(ctl.history().len(), 1);
    }

    #[tokio::test]
    async fn unreachable_service_is_unhealthy() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::open(Some("http://127.0.0.1:1"), dir.path()).unwrap();
        assert_eq!(run_health(&session).await.unwrap(), 1);
    }
}
