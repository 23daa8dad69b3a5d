//! # Coding Service Seam
//!
//! [`CodingService`] is the boundary the workflow layer is generic over.
//! [`CodingClient`](crate::CodingClient) implements it over HTTP; tests and
//! embedders can supply their own implementation.
//!
//! Methods return `Send` futures so a controller generic over the trait can
//! be driven from a multi-threaded runtime.

use std::future::Future;

use claimflow_core::CodeSuggestion;

use crate::error::ClientError;
use crate::types::{
    FileUpload, FormFields, FormPdfRequest, GenerateClaimRequest, GenerateClaimResponse,
    IngestOptions, IngestResponse, SuggestRequest, SuggestResponse,
};

/// The seven coding service operations.
pub trait CodingService: Send + Sync {
    /// Extract entities from plain text.
    fn ingest_text(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<IngestResponse, ClientError>> + Send;

    /// Extract text and entities from an uploaded document.
    fn ingest_file(
        &self,
        file: FileUpload,
        options: IngestOptions,
    ) -> impl Future<Output = Result<IngestResponse, ClientError>> + Send;

    /// Ranked code suggestions for a text.
    fn suggest_codes(
        &self,
        req: &SuggestRequest,
    ) -> impl Future<Output = Result<SuggestResponse, ClientError>> + Send;

    /// Generate and notarize a claim.
    fn generate_claim(
        &self,
        req: &GenerateClaimRequest,
    ) -> impl Future<Output = Result<GenerateClaimResponse, ClientError>> + Send;

    /// Infer CMS-1500 header fields from a text.
    fn derive_form_fields(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<FormFields, ClientError>> + Send;

    /// Render a filled CMS-1500 PDF.
    fn render_form_pdf(
        &self,
        req: &FormPdfRequest,
    ) -> impl Future<Output = Result<Vec<u8>, ClientError>> + Send;

    /// Render the claim summary PDF.
    fn render_claim_pdf(
        &self,
        approved: &[CodeSuggestion],
    ) -> impl Future<Output = Result<Vec<u8>, ClientError>> + Send;
}
