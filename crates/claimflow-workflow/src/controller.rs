//! # Workflow Controller
//!
//! Drives one claim through the stages in [`crate::stage`], enforcing the
//! entry guards and orchestrating every coding service call.
//!
//! ## Entry Guards
//!
//! | Target | Guard | On failure |
//! |--------|-------|------------|
//! | `Suggest` | draft text is non-empty | redirect to `Upload`, no service call |
//! | `Review` | approved set is non-empty | redirect to `Suggest` (its guard applies) |
//! | `Generated` | successful `generate_claim` only | `InvalidTransition` |
//! | anything from `Generated` | `dismiss_confirmation` only | `InvalidTransition` |
//!
//! Entering `Suggest` with an empty suggestion cache fetches suggestions
//! (`top_k = 10`) at most once per ingestion. A fetch that fails may be
//! retried by re-entering. A response that arrives after a newer ingestion is
//! discarded.
//!
//! ## Concurrency
//!
//! The controller is `Send + Sync` and may be shared behind an `Arc`. No lock
//! is held across an `.await`. At most one generation request is in flight.

use std::sync::atomic::{AtomicBool, Ordering};

use claimflow_client::{
    ClaimMetadata, CodingService, FileUpload, GenerateClaimRequest, GenerateClaimResponse,
    IngestOptions, IngestResponse, SuggestRequest,
};
use claimflow_core::{ClaimId, ClaimRecord, Timestamp};
use claimflow_store::{DraftStore, HistoryStore};
use parking_lot::Mutex;

use crate::editor::ApprovalEditor;
use crate::error::{ValidationError, WorkflowError};
use crate::form::{FormDraft, PdfDocument, CLAIM_PDF_FILENAME, FORM_PDF_FILENAME};
use crate::stage::{Stage, StageTransition};

/// Number of suggestions requested when entering `Suggest`.
pub const SUGGEST_TOP_K: u32 = 10;

/// Transitions kept in the in-memory log; older ones are dropped first.
pub const TRANSITION_LOG_LIMIT: usize = 256;

// ─── Results ─────────────────────────────────────────────────────────

/// What an ingestion stored in the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    /// Ingestion counter after this ingestion.
    pub ingestion: u64,
    pub characters: usize,
    pub entities: usize,
    /// Suggestions returned with the upload (auto-suggest only).
    pub suggestions: usize,
}

/// A successfully generated claim, held until dismissed.
#[derive(Debug, Clone)]
pub struct Confirmation {
    pub response: GenerateClaimResponse,
    /// The entry appended to the claims history.
    pub record: ClaimRecord,
}

impl Confirmation {
    pub fn claim_id(&self) -> &ClaimId {
        &self.response.claim_id
    }

    pub fn metadata(&self) -> &ClaimMetadata {
        &self.response.metadata
    }

    pub fn tx_hash(&self) -> Option<&str> {
        self.record.tx_hash.as_deref()
    }

    pub fn explorer_url(&self) -> Option<String> {
        self.response.metadata.explorer_url()
    }
}

// ─── In-flight flag ──────────────────────────────────────────────────

/// Holds an `AtomicBool` set for its lifetime, so a cancelled future
/// releases the flag too.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// ─── The Controller ──────────────────────────────────────────────────

/// Orchestrates the claim workflow over a [`CodingService`].
#[derive(Debug)]
pub struct WorkflowController<S> {
    service: S,
    draft: DraftStore,
    history: HistoryStore,
    stage: Mutex<Stage>,
    transition_log: Mutex<Vec<StageTransition>>,
    confirmation: Mutex<Option<Confirmation>>,
    generating: AtomicBool,
    suggesting: AtomicBool,
    /// Ingestion counter whose suggestions were successfully fetched.
    fetched_for: Mutex<Option<u64>>,
}

impl<S: CodingService> WorkflowController<S> {
    /// A controller at `Upload` over the given service and stores.
    pub fn new(service: S, draft: DraftStore, history: HistoryStore) -> Self {
        Self {
            service,
            draft,
            history,
            stage: Mutex::new(Stage::Upload),
            transition_log: Mutex::new(Vec::new()),
            confirmation: Mutex::new(None),
            generating: AtomicBool::new(false),
            suggesting: AtomicBool::new(false),
            fetched_for: Mutex::new(None),
        }
    }

    pub fn stage(&self) -> Stage {
        *self.stage.lock()
    }

    /// The last [`TRANSITION_LOG_LIMIT`] stage changes, oldest first.
    pub fn transition_log(&self) -> Vec<StageTransition> {
        self.transition_log.lock().clone()
    }

    pub fn draft(&self) -> &DraftStore {
        &self.draft
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Editor over this controller's approved set.
    pub fn editor(&self) -> ApprovalEditor<'_> {
        ApprovalEditor::new(&self.draft)
    }

    /// The confirmation showing in `Generated`, if any.
    pub fn confirmation(&self) -> Option<Confirmation> {
        self.confirmation.lock().clone()
    }

    /// Whether a generation request is outstanding.
    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::Acquire)
    }

    // ── Ingestion ────────────────────────────────────────────────────

    /// Send pasted text for extraction and store the result.
    pub async fn ingest_text(&self, text: &str) -> Result<IngestSummary, WorkflowError> {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyText.into());
        }
        let resp = self.service.ingest_text(text).await?;
        Ok(self.store_ingestion(resp))
    }

    /// Upload a document for extraction and store the result.
    pub async fn ingest_file(
        &self,
        file: FileUpload,
        options: IngestOptions,
    ) -> Result<IngestSummary, WorkflowError> {
        let resp = self.service.ingest_file(file, options).await?;
        Ok(self.store_ingestion(resp))
    }

    fn store_ingestion(&self, resp: IngestResponse) -> IngestSummary {
        let characters = resp.text.chars().count();
        let entities = resp.entities.len();
        let suggestions = resp.suggestions.unwrap_or_default();
        let suggested = suggestions.len();
        let ingestion = self
            .draft
            .apply_ingestion(resp.text, resp.entities, suggestions);
        tracing::info!(ingestion, characters, entities, suggestions = suggested, "document ingested");
        IngestSummary {
            ingestion,
            characters,
            entities,
            suggestions: suggested,
        }
    }

    // ── Navigation ───────────────────────────────────────────────────

    /// Move toward `target`, applying entry guards. Returns the stage
    /// actually reached.
    ///
    /// If entering `Suggest` triggers a suggestion fetch that fails, the
    /// stage is `Suggest` and the error is returned.
    pub async fn navigate(&self, target: Stage) -> Result<Stage, WorkflowError> {
        let current = self.stage();
        if current == Stage::Generated || target == Stage::Generated {
            if current == target {
                return Ok(current);
            }
            return Err(WorkflowError::InvalidTransition {
                from: current,
                to: target,
            });
        }

        match target {
            Stage::Suggest => self.enter_suggest(None).await,
            Stage::Review => {
                if self.draft.read(|d| d.approved.is_empty()) {
                    return self.enter_suggest(Some("no approved codes")).await;
                }
                self.enter(Stage::Review, None);
                Ok(Stage::Review)
            }
            Stage::Upload | Stage::Claims | Stage::Generated => {
                self.enter(target, None);
                Ok(target)
            }
        }
    }

    /// Leave `Suggest` for `Review`. Requires at least one approved code.
    pub fn continue_from_suggest(&self) -> Result<Stage, WorkflowError> {
        let current = self.stage();
        if current != Stage::Suggest {
            return Err(WorkflowError::InvalidTransition {
                from: current,
                to: Stage::Review,
            });
        }
        if self.draft.read(|d| d.approved.is_empty()) {
            return Err(ValidationError::NoCodesSelected.into());
        }
        self.enter(Stage::Review, None);
        Ok(Stage::Review)
    }

    async fn enter_suggest(&self, reason: Option<&str>) -> Result<Stage, WorkflowError> {
        let (has_text, cache_empty, ingestion, text) = self.draft.read(|d| {
            (
                d.has_text(),
                d.suggestions.is_empty(),
                d.ingestion,
                d.text.clone(),
            )
        });
        if !has_text {
            self.enter(Stage::Upload, Some("no document ingested"));
            return Ok(Stage::Upload);
        }
        self.enter(Stage::Suggest, reason);

        let already_fetched = *self.fetched_for.lock() == Some(ingestion);
        if cache_empty && !already_fetched {
            self.fetch_suggestions(text, ingestion).await?;
        }
        Ok(Stage::Suggest)
    }

    async fn fetch_suggestions(&self, text: String, ingestion: u64) -> Result<(), WorkflowError> {
        let Some(_guard) = InFlight::acquire(&self.suggesting) else {
            tracing::debug!(ingestion, "suggestion fetch already in flight");
            return Ok(());
        };

        let req = SuggestRequest {
            text,
            top_k: Some(SUGGEST_TOP_K),
        };
        let resp = match self.service.suggest_codes(&req).await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(ingestion, "suggestion fetch failed: {e}");
                return Err(e.into());
            }
        };

        let count = resp.suggestions.len();
        if self.draft.apply_suggestions(ingestion, resp.suggestions) {
            *self.fetched_for.lock() = Some(ingestion);
            tracing::info!(ingestion, count, "found code suggestions");
        } else {
            tracing::debug!(ingestion, "discarding suggestions for a superseded document");
        }
        Ok(())
    }

    fn enter(&self, to: Stage, reason: Option<&str>) {
        let from = {
            let mut stage = self.stage.lock();
            std::mem::replace(&mut *stage, to)
        };
        if from == to {
            return;
        }
        tracing::info!(from = %from, to = %to, reason = reason.unwrap_or(""), "stage transition");
        let mut log = self.transition_log.lock();
        if log.len() >= TRANSITION_LOG_LIMIT {
            let excess = log.len() + 1 - TRANSITION_LOG_LIMIT;
            log.drain(..excess);
        }
        log.push(StageTransition {
            from,
            to,
            timestamp: Timestamp::now(),
            reason: reason.map(str::to_string),
        });
    }

    // ── Generation ───────────────────────────────────────────────────

    /// Generate a claim from the draft.
    ///
    /// Requires `Review`, a non-empty approved set, and a non-blank signer.
    /// On success the claim is appended to the history and the controller
    /// moves to `Generated`; the draft is kept until
    /// [`dismiss_confirmation`](Self::dismiss_confirmation).
    pub async fn generate_claim(&self) -> Result<Confirmation, WorkflowError> {
        let current = self.stage();
        if current != Stage::Review {
            return Err(WorkflowError::InvalidTransition {
                from: current,
                to: Stage::Generated,
            });
        }

        let draft = self.draft.snapshot();
        if draft.approved.is_empty() {
            return Err(ValidationError::NoApprovedCodes.into());
        }
        if draft.signer_is_blank() {
            return Err(ValidationError::Unsigned.into());
        }

        let Some(_guard) = InFlight::acquire(&self.generating) else {
            return Err(WorkflowError::GenerationInProgress);
        };

        let amount = (draft.amount > 0.0).then_some(draft.amount);
        let req = GenerateClaimRequest {
            approved: draft.approved.as_slice().to_vec(),
            amount,
            signed_by: Some(draft.signed_by.clone()),
        };
        let response = self.service.generate_claim(&req).await?;

        let codes_count = if response.approved.is_empty() {
            draft.approved.len()
        } else {
            response.approved.len()
        };
        let record = ClaimRecord {
            id: response.claim_id.clone(),
            date: Timestamp::now(),
            codes_count,
            amount,
            tx_hash: response.metadata.transaction_hash().map(str::to_string),
        };
        self.history.add(record.clone());

        let confirmation = Confirmation { response, record };
        *self.confirmation.lock() = Some(confirmation.clone());
        self.enter(Stage::Generated, Some("claim generated"));
        Ok(confirmation)
    }

    /// Close the confirmation: clear the draft and move to `Claims`.
    pub fn dismiss_confirmation(&self) -> Result<Stage, WorkflowError> {
        let current = self.stage();
        if current != Stage::Generated {
            return Err(WorkflowError::InvalidTransition {
                from: current,
                to: Stage::Claims,
            });
        }
        self.confirmation.lock().take();
        self.draft.reset();
        self.enter(Stage::Claims, Some("confirmation dismissed"));
        Ok(Stage::Claims)
    }

    // ── Documents ────────────────────────────────────────────────────

    /// Render the claim summary PDF for the approved set.
    pub async fn preview_claim_pdf(&self) -> Result<PdfDocument, WorkflowError> {
        let approved = self.draft.approved();
        if approved.is_empty() {
            return Err(ValidationError::NoApprovedCodes.into());
        }
        let bytes = self.service.render_claim_pdf(approved.as_slice()).await?;
        Ok(PdfDocument {
            filename: CLAIM_PDF_FILENAME,
            bytes,
        })
    }

    /// Open the CMS-1500 form for the current draft.
    pub async fn open_form(&self) -> FormDraft {
        let draft = self.draft.snapshot();
        FormDraft::open(&self.service, &draft).await
    }

    /// Render a filled CMS-1500.
    pub async fn render_form(&self, form: &FormDraft) -> Result<PdfDocument, WorkflowError> {
        let bytes = self.service.render_form_pdf(&form.to_request()).await?;
        Ok(PdfDocument {
            filename: FORM_PDF_FILENAME,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    use claimflow_client::{ClientError, FormFields, FormPdfRequest, SuggestResponse};
    use claimflow_core::{CodeSuggestion, CodeSystem};

    /// In-process service double that counts calls.
    #[derive(Default)]
    struct FakeService {
        suggest_calls: AtomicUsize,
        generate_calls: AtomicUsize,
        suggestions: Mutex<Vec<CodeSuggestion>>,
        fail_suggest: AtomicBool,
        fail_derive: AtomicBool,
        /// Called inside suggest_codes before it returns.
        on_suggest: Mutex<Option<Box<dyn Fn() + Send + Sync>>>,
    }

    fn offline(endpoint: &str) -> ClientError {
        ClientError::Status {
            endpoint: endpoint.into(),
            status: 503,
            reason: "Service Unavailable".into(),
            body: String::new(),
        }
    }

    impl CodingService for FakeService {
        async fn ingest_text(&self, text: &str) -> Result<IngestResponse, ClientError> {
            Ok(IngestResponse {
                text: text.to_string(),
                entities: vec![],
                suggestions: None,
            })
        }

        async fn ingest_file(
            &self,
            file: FileUpload,
            options: IngestOptions,
        ) -> Result<IngestResponse, ClientError> {
            Ok(IngestResponse {
                text: String::from_utf8_lossy(&file.bytes).into_owned(),
                entities: vec![],
                suggestions: options
                    .auto_suggest
                    .then(|| self.suggestions.lock().clone()),
            })
        }

        async fn suggest_codes(&self, _req: &SuggestRequest) -> Result<SuggestResponse, ClientError> {
            self.suggest_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(hook) = self.on_suggest.lock().as_ref() {
                hook();
            }
            if self.fail_suggest.load(Ordering::SeqCst) {
                return Err(offline("POST /suggest"));
            }
            Ok(SuggestResponse {
                entities: vec![],
                suggestions: self.suggestions.lock().clone(),
            })
        }

        async fn generate_claim(
            &self,
            req: &GenerateClaimRequest,
        ) -> Result<GenerateClaimResponse, ClientError> {
            self.generate_calls.fetch_add(1, Ordering::SeqCst);
            Ok(GenerateClaimResponse {
                claim_id: ClaimId::new("CLM-TEST"),
                approved: req.approved.clone(),
                metadata: ClaimMetadata {
                    tx_hash: Some("0xfeedbeef".into()),
                    ..ClaimMetadata::default()
                },
            })
        }

        async fn derive_form_fields(&self, _text: &str) -> Result<FormFields, ClientError> {
            if self.fail_derive.load(Ordering::SeqCst) {
                return Err(offline("POST /cms1500/derive"));
            }
            Ok(FormFields {
                patient_name: Some("Jane Doe".into()),
                ..FormFields::default()
            })
        }

        async fn render_form_pdf(&self, _req: &FormPdfRequest) -> Result<Vec<u8>, ClientError> {
            Ok(b"%PDF form".to_vec())
        }

        async fn render_claim_pdf(
            &self,
            _approved: &[CodeSuggestion],
        ) -> Result<Vec<u8>, ClientError> {
            Ok(b"%PDF claim".to_vec())
        }
    }

    fn diabetes() -> CodeSuggestion {
        CodeSuggestion {
            code: "E11.9".into(),
            system: CodeSystem::Icd10,
            description: "Type 2 diabetes mellitus without complications".into(),
            score: 0.92,
            reason: String::new(),
        }
    }

    fn controller() -> WorkflowController<FakeService> {
        WorkflowController::new(
            FakeService::default(),
            DraftStore::in_memory(),
            HistoryStore::in_memory(),
        )
    }

    async fn at_review(ctl: &WorkflowController<FakeService>) {
        ctl.ingest_text("Patient has type 2 diabetes").await.unwrap();
        ctl.draft().toggle_approved(diabetes());
        assert_eq!(ctl.navigate(Stage::Review).await.unwrap(), Stage::Review);
    }

    #[tokio::test]
    async fn suggest_without_text_redirects_to_upload_without_calling() {
        let ctl = controller();
        let stage = ctl.navigate(Stage::Suggest).await.unwrap();
        assert_eq!(stage, Stage::Upload);
        assert_eq!(ctl.service().suggest_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn review_without_codes_redirects_through_suggest() {
        let ctl = controller();
        assert_eq!(ctl.navigate(Stage::Review).await.unwrap(), Stage::Upload);

        ctl.ingest_text("note").await.unwrap();
        assert_eq!(ctl.navigate(Stage::Review).await.unwrap(), Stage::Suggest);
        assert_eq!(ctl.service().suggest_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn blank_text_is_rejected_before_any_call() {
        let ctl = controller();
        let err = ctl.ingest_text("  \n ").await.unwrap_err();
        assert_eq!(err.as_validation(), Some(&ValidationError::EmptyText));
        assert_eq!(ctl.draft().ingestion(), 0);
    }

    #[tokio::test]
    async fn suggestions_fetched_once_per_ingestion() {
        let ctl = controller();
        ctl.ingest_text("note").await.unwrap();
        ctl.navigate(Stage::Suggest).await.unwrap();
        ctl.navigate(Stage::Upload).await.unwrap();
        ctl.navigate(Stage::Suggest).await.unwrap();
        // Zero results still count as fetched.
        assert_eq!(ctl.service().suggest_calls.load(Ordering::SeqCst), 1);

        ctl.ingest_text("another note").await.unwrap();
        ctl.navigate(Stage::Suggest).await.unwrap();
        assert_eq!(ctl.service().suggest_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn cached_suggestions_skip_the_fetch() {
        let ctl = controller();
        ctl.ingest_text("note").await.unwrap();
        ctl.draft().set_suggestions(vec![diabetes()]);
        ctl.navigate(Stage::Suggest).await.unwrap();
        assert_eq!(ctl.service().suggest_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_fetch_stays_in_suggest_and_can_retry() {
        let ctl = controller();
        ctl.ingest_text("note").await.unwrap();
        ctl.service().fail_suggest.store(true, Ordering::SeqCst);
        assert!(ctl.navigate(Stage::Suggest).await.is_err());
        assert_eq!(ctl.stage(), Stage::Suggest);

        ctl.service().fail_suggest.store(false, Ordering::SeqCst);
        *ctl.service().suggestions.lock() = vec![diabetes()];
        ctl.navigate(Stage::Suggest).await.unwrap();
        assert_eq!(ctl.service().suggest_calls.load(Ordering::SeqCst), 2);
        assert_eq!(ctl.draft().suggestions().len(), 1);
    }

    #[tokio::test]
    async fn stale_suggestions_are_not_applied() {
        let draft = DraftStore::in_memory();
        let service = FakeService::default();
        *service.suggestions.lock() = vec![diabetes()];
        // A new document arrives while the suggest call is outstanding.
        let racing = draft.clone();
        *service.on_suggest.lock() = Some(Box::new(move || {
            racing.apply_ingestion("newer note", vec![], vec![]);
        }));
        let ctl = WorkflowController::new(service, draft, HistoryStore::in_memory());

        ctl.ingest_text("older note").await.unwrap();
        ctl.navigate(Stage::Suggest).await.unwrap();
        assert!(ctl.draft().suggestions().is_empty());
        assert_eq!(ctl.draft().text(), "newer note");
    }

    #[tokio::test]
    async fn auto_suggest_upload_fills_cache() {
        let ctl = controller();
        *ctl.service().suggestions.lock() = vec![diabetes()];
        let options = IngestOptions {
            clinical_only: true,
            auto_suggest: true,
        };
        let summary = ctl
            .ingest_file(FileUpload::new("note.txt", b"Patient has diabetes".to_vec()), options)
            .await
            .unwrap();
        assert_eq!(summary.suggestions, 1);
        ctl.navigate(Stage::Suggest).await.unwrap();
        assert_eq!(ctl.service().suggest_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn continue_requires_a_selection() {
        let ctl = controller();
        ctl.ingest_text("note").await.unwrap();
        ctl.navigate(Stage::Suggest).await.unwrap();
        let err = ctl.continue_from_suggest().unwrap_err();
        assert_eq!(err.to_string(), "Please select at least one code to continue");

        ctl.draft().toggle_approved(diabetes());
        assert_eq!(ctl.continue_from_suggest().unwrap(), Stage::Review);
    }

    #[tokio::test]
    async fn generate_validates_before_calling() {
        let ctl = controller();
        at_review(&ctl).await;

        let err = ctl.generate_claim().await.unwrap_err();
        assert_eq!(err.to_string(), "Please sign the claim");

        ctl.draft().set_signed_by("Dr. Smith");
        ctl.draft().remove_approved("E11.9");
        let err = ctl.generate_claim().await.unwrap_err();
        assert_eq!(err.to_string(), "Please add at least one code");
        assert_eq!(ctl.service().generate_calls.load(Ordering::SeqCst), 0);
        assert!(ctl.history().is_empty());
    }

    #[tokio::test]
    async fn generate_records_history_and_holds_confirmation() {
        let ctl = controller();
        at_review(&ctl).await;
        ctl.draft().set_signed_by("Dr. Smith");

        let confirmation = ctl.generate_claim().await.unwrap();
        assert_eq!(ctl.stage(), Stage::Generated);
        assert_eq!(confirmation.claim_id().as_str(), "CLM-TEST");
        assert_eq!(confirmation.tx_hash(), Some("0xfeedbeef"));

        let record = &ctl.history().list()[0];
        assert_eq!(record.codes_count, 1);
        assert_eq!(record.amount, None);
        // Draft is kept until dismissal.
        assert!(!ctl.draft().approved().is_empty());

        assert!(matches!(
            ctl.navigate(Stage::Upload).await,
            Err(WorkflowError::InvalidTransition { .. })
        ));

        assert_eq!(ctl.dismiss_confirmation().unwrap(), Stage::Claims);
        assert!(ctl.draft().snapshot().is_empty());
        assert!(ctl.confirmation().is_none());
    }

    #[tokio::test]
    async fn generated_cannot_be_entered_by_navigation() {
        let ctl = controller();
        assert!(matches!(
            ctl.navigate(Stage::Generated).await,
            Err(WorkflowError::InvalidTransition { .. })
        ));
        assert!(ctl.dismiss_confirmation().is_err());
    }

    #[tokio::test]
    async fn second_generation_in_flight_is_rejected() {
        let ctl = Arc::new(controller());
        at_review(&ctl).await;
        ctl.draft().set_signed_by("Dr. Smith");

        let held = InFlight::acquire(&ctl.generating).unwrap();
        assert!(matches!(
            ctl.generate_claim().await,
            Err(WorkflowError::GenerationInProgress)
        ));
        drop(held);
        assert!(ctl.generate_claim().await.is_ok());
        assert_eq!(ctl.service().generate_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn transitions_are_logged() {
        let ctl = controller();
        at_review(&ctl).await;
        let log = ctl.transition_log();
        let path: Vec<_> = log.iter().map(|t| (t.from, t.to)).collect();
        assert_eq!(path, vec![(Stage::Upload, Stage::Review)]);
    }

    #[tokio::test]
    async fn transition_log_keeps_only_the_newest_entries() {
        let ctl = controller();
        for _ in 0..TRANSITION_LOG_LIMIT {
            ctl.navigate(Stage::Claims).await.unwrap();
            ctl.navigate(Stage::Upload).await.unwrap();
        }
        let log = ctl.transition_log();
        assert_eq!(log.len(), TRANSITION_LOG_LIMIT);
        let last = log.last().unwrap();
        assert_eq!((last.from, last.to), (Stage::Claims, Stage::Upload));
        assert_eq!((log[0].from, log[0].to), (Stage::Upload, Stage::Claims));
    }

    #[tokio::test]
    async fn form_derivation_failure_leaves_fields_blank() {
        let ctl = controller();
        at_review(&ctl).await;
        ctl.service().fail_derive.store(true, Ordering::SeqCst);
        let form = ctl.open_form().await;
        assert_eq!(form.fields, FormFields::default());
        assert_eq!(form.pointers(), ["1"]);

        ctl.service().fail_derive.store(false, Ordering::SeqCst);
        let form = ctl.open_form().await;
        assert_eq!(form.fields.patient_name.as_deref(), Some("Jane Doe"));
        let pdf = ctl.render_form(&form).await.unwrap();
        assert_eq!(pdf.filename, "cms1500_filled.pdf");
    }

    #[tokio::test]
    async fn claim_pdf_uses_fixed_filename() {
        let ctl = controller();
        at_review(&ctl).await;
        let pdf = ctl.preview_claim_pdf().await.unwrap();
        assert_eq!(pdf.filename, "cms1500.pdf");
        assert_eq!(pdf.bytes, b"%PDF claim");
    }
}
