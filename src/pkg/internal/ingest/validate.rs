use serde::Serialize;

use crate::pkg::internal::ingest::spec::ResumeItem;

pub const ALLOWED_MEDIA_TYPE: &str = "application/pdf";
pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;
pub const MAX_BATCH_ITEMS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RejectReason {
    #[serde(rename = "unsupported type")]
    UnsupportedType,
    #[serde(rename = "too large")]
    TooLarge,
    #[serde(rename = "batch limit exceeded")]
    BatchLimitExceeded,
}

#[derive(Debug, Clone, Serialize)]
pub struct RejectedFile {
    pub name: String,
    pub reason: RejectReason,
}

#[derive(Debug, Default)]
pub struct ValidationOutcome {
    pub accepted: Vec<ResumeItem>,
    pub rejected: Vec<RejectedFile>,
}

/// Screens candidate files before any pipeline item is created. Pure function
/// of the candidates and the count of already-accepted items.
///
/// If the incoming set would push the batch past [`MAX_BATCH_ITEMS`], the
/// entire set is rejected; there is no partial admission of an overflowing
/// call.
pub fn validate(candidates: Vec<ResumeItem>, already_accepted: usize) -> ValidationOutcome {
    if already_accepted + candidates.len() > MAX_BATCH_ITEMS {
        return ValidationOutcome {
            accepted: Vec::new(),
            rejected: candidates
                .into_iter()
                .map(|c| RejectedFile {
                    name: c.filename,
                    reason: RejectReason::BatchLimitExceeded,
                })
                .collect(),
        };
    }

    let mut outcome = ValidationOutcome::default();
    for candidate in candidates {
        if candidate.media_type != ALLOWED_MEDIA_TYPE {
            outcome.rejected.push(RejectedFile {
                name: candidate.filename,
                reason: RejectReason::UnsupportedType,
            });
        } else if candidate.declared_size > MAX_FILE_BYTES {
            outcome.rejected.push(RejectedFile {
                name: candidate.filename,
                reason: RejectReason::TooLarge,
            });
        } else {
            outcome.accepted.push(candidate);
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(name: &str, size: usize) -> ResumeItem {
        ResumeItem {
            filename: name.to_string(),
            declared_size: size,
            media_type: ALLOWED_MEDIA_TYPE.to_string(),
            content: vec![0u8; 16],
        }
    }

    #[test]
    fn accepts_valid_pdfs() {
        let outcome = validate(vec![pdf("a.pdf", 1024), pdf("b.pdf", 2048)], 0);
        assert_eq!(outcome.accepted.len(), 2);
        assert!(outcome.rejected.is_empty());
    }

    #[test]
    fn rejects_unsupported_media_type() {
        let mut doc = pdf("cv.docx", 1024);
        doc.media_type =
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document".into();
        let outcome = validate(vec![doc], 0);
        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.rejected[0].reason, RejectReason::UnsupportedType);
    }

    #[test]
    fn rejects_oversized_file() {
        let outcome = validate(vec![pdf("big.pdf", MAX_FILE_BYTES + 1)], 0);
        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.rejected[0].reason, RejectReason::TooLarge);
    }

    #[test]
    fn file_at_size_ceiling_is_accepted() {
        let outcome = validate(vec![pdf("edge.pdf", MAX_FILE_BYTES)], 0);
        assert_eq!(outcome.accepted.len(), 1);
    }

    #[test]
    fn every_input_lands_in_exactly_one_bucket() {
        let mut odt = pdf("cv.odt", 100);
        odt.media_type = "application/vnd.oasis.opendocument.text".into();
        let inputs = vec![pdf("a.pdf", 100), odt, pdf("big.pdf", MAX_FILE_BYTES + 1)];
        let total = inputs.len();
        let outcome = validate(inputs, 0);
        assert_eq!(outcome.accepted.len() + outcome.rejected.len(), total);
    }

    #[test]
    fn overflowing_set_is_rejected_entirely() {
        let candidates: Vec<_> = (0..11).map(|i| pdf(&format!("{i}.pdf"), 100)).collect();
        let outcome = validate(candidates, 0);
        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.rejected.len(), 11);
        assert!(outcome
            .rejected
            .iter()
            .all(|r| r.reason == RejectReason::BatchLimitExceeded));
    }

    #[test]
    fn overflow_counts_previously_accepted_items() {
        let candidates = vec![pdf("a.pdf", 100), pdf("b.pdf", 100)];
        let outcome = validate(candidates, 9);
        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.rejected.len(), 2);
    }

    #[test]
    fn exactly_full_batch_is_admitted() {
        let candidates: Vec<_> = (0..10).map(|i| pdf(&format!("{i}.pdf"), 100)).collect();
        let outcome = validate(candidates, 0);
        assert_eq!(outcome.accepted.len(), 10);
    }
}
