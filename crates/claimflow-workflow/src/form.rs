//! # CMS-1500 Form Assembly
//!
//! Opening the form asks the coding service to derive the nine header fields
//! from the draft text. That call is best-effort: any failure leaves every
//! field blank. Each approved code gets a diagnosis-pointer input (at most
//! [`MAX_FORM_ROWS`]), prefilled with `"1"`.
//!
//! ## Pointer Syntax
//!
//! A pointer input is a comma-separated list. Each token is read as the
//! integer at its start (`"2b"` is 2, `"x2"` is nothing) and kept when it is
//! at least 1. A blank input means `"1"`.

use claimflow_client::{CodingService, FormFields, FormPdfRequest};
use claimflow_core::{ClaimDraft, CodeSuggestion};

/// Service-line rows on the paper form.
pub const MAX_FORM_ROWS: usize = 10;

/// Suggested filename for a rendered CMS-1500.
pub const FORM_PDF_FILENAME: &str = "cms1500_filled.pdf";

/// Suggested filename for the claim summary PDF.
pub const CLAIM_PDF_FILENAME: &str = "cms1500.pdf";

/// A rendered PDF with its suggested filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfDocument {
    pub filename: &'static str,
    pub bytes: Vec<u8>,
}

/// An open CMS-1500 form: header fields plus one pointer input per row.
#[derive(Debug, Clone, PartialEq)]
pub struct FormDraft {
    pub fields: FormFields,
    pointers: Vec<String>,
    approved: Vec<CodeSuggestion>,
    text: String,
}

impl FormDraft {
    /// A form over `approved` and `text` with the given header fields.
    pub fn new(approved: Vec<CodeSuggestion>, text: impl Into<String>, fields: FormFields) -> Self {
        let rows = approved.len().min(MAX_FORM_ROWS);
        Self {
            fields,
            pointers: vec!["1".to_string(); rows],
            approved,
            text: text.into(),
        }
    }

    /// Open the form for `draft`, autofilling header fields from the service.
    pub async fn open<S: CodingService>(service: &S, draft: &ClaimDraft) -> Self {
        let fields = match service.derive_form_fields(&draft.text).await {
            Ok(fields) => fields,
            Err(e) => {
                tracing::warn!("form field derivation failed, leaving fields blank: {e}");
                FormFields::default()
            }
        };
        Self::new(draft.approved.as_slice().to_vec(), draft.text.clone(), fields)
    }

    /// Pointer inputs, one per form row.
    pub fn pointers(&self) -> &[String] {
        &self.pointers
    }

    /// Set the pointer input of `row` (0-based). Returns `false` if the
    /// form has no such row.
    pub fn set_pointer(&mut self, row: usize, input: impl Into<String>) -> bool {
        match self.pointers.get_mut(row) {
            Some(slot) => {
                *slot = input.into();
                true
            }
            None => false,
        }
    }

    /// Set header field `name`. Returns `false` for an unknown name.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.fields.field_mut(name) {
            Some(slot) => {
                *slot = Some(value.into());
                true
            }
            None => false,
        }
    }

    /// The render request: all approved codes, the draft text, non-blank
    /// header fields, and the parsed pointer rows.
    pub fn to_request(&self) -> FormPdfRequest {
        FormPdfRequest {
            approved: self.approved.clone(),
            text: self.text.clone(),
            fields: self.fields.clone().without_blanks(),
            diag_pointers: self.pointers.iter().map(|p| parse_pointers(p)).collect(),
        }
    }
}

/// Parse one pointer input into its 1-based pointers.
pub fn parse_pointers(input: &str) -> Vec<u32> {
    let input = if input.trim().is_empty() { "1" } else { input };
    input
        .split(',')
        .filter_map(leading_integer)
        .filter(|&n| n >= 1)
        .filter_map(|n| u32::try_from(n).ok())
        .collect()
}

// The integer prefix of `token` after trimming, with an optional sign.
fn leading_integer(token: &str) -> Option<i64> {
    let token = token.trim();
    let (negative, rest) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    // Saturate rather than fail on absurdly long digit runs.
    let value = rest[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimflow_core::CodeSystem;
    use proptest::prelude::*;

    fn codes(n: usize) -> Vec<CodeSuggestion> {
        (0..n)
            .map(|i| CodeSuggestion {
                code: format!("C{i}"),
                system: CodeSystem::Icd10,
                description: format!("code {i}"),
                score: 0.5,
                reason: String::new(),
            })
            .collect()
    }

    #[test]
    fn pointer_examples() {
        assert_eq!(parse_pointers("1"), vec![1]);
        assert_eq!(parse_pointers("1, 2,3"), vec![1, 2, 3]);
        assert_eq!(parse_pointers(""), vec![1]);
        assert_eq!(parse_pointers("   "), vec![1]);
        assert_eq!(parse_pointers("0,-2,abc"), Vec::<u32>::new());
        assert_eq!(parse_pointers("2b, x3, 4.5"), vec![2, 4]);
        assert_eq!(parse_pointers("+3"), vec![3]);
        assert_eq!(parse_pointers("1,,2"), vec![1, 2]);
    }

    #[test]
    fn huge_pointer_is_dropped() {
        assert_eq!(parse_pointers("99999999999999999999999"), Vec::<u32>::new());
    }

    #[test]
    fn rows_capped_at_ten() {
        let form = FormDraft::new(codes(14), "note", FormFields::default());
        assert_eq!(form.pointers().len(), MAX_FORM_ROWS);
        assert!(form.pointers().iter().all(|p| p == "1"));
        let req = form.to_request();
        assert_eq!(req.approved.len(), 14);
        assert_eq!(req.diag_pointers.len(), MAX_FORM_ROWS);
    }

    #[test]
    fn set_pointer_and_field() {
        let mut form = FormDraft::new(codes(2), "note", FormFields::default());
        assert!(form.set_pointer(1, "1,2"));
        assert!(!form.set_pointer(5, "1"));
        assert!(form.set_field("patient_name", "Jane Doe"));
        assert!(form.set_field("patient_id", "  "));
        assert!(!form.set_field("favourite_color", "blue"));

        let req = form.to_request();
        assert_eq!(req.diag_pointers, vec![vec![1], vec![1, 2]]);
        assert_eq!(req.fields.patient_name.as_deref(), Some("Jane Doe"));
        assert_eq!(req.fields.patient_id, None);
    }

    proptest! {
        #[test]
        fn parsed_pointers_are_positive(input in ".{0,40}") {
            for n in parse_pointers(&input) {
                prop_assert!(n >= 1);
            }
        }

        #[test]
        fn digit_lists_roundtrip(values in proptest::collection::vec(1u32..1000, 1..8)) {
            let input = values.iter().map(u32::to_string).collect::<Vec<_>>().join(", ");
            prop_assert_eq!(parse_pointers(&input), values);
        }
    }
}
