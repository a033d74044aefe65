//! # Document Expiration Module
//!
//! Classifies habilitation documents by how close they are to expiring.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  upload ──► expiration date stored ONCE                                 │
//! │             (caller-supplied, or upload instant + 180 days)             │
//! │                                                                         │
//! │  every read ──► days = ceil((expiration − reference) / 1 day)          │
//! │                      │                                                  │
//! │                      ├── days < 0   → expired  ┐ dashboard alerts       │
//! │                      ├── 0 ..= 30   → critical ┘                        │
//! │                      ├── 31 ..= 90  → warning                           │
//! │                      └── > 90       → valid                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## One Reference Instant Per Listing
//! Nothing here reads the clock. A listing captures its reference instant
//! once and hands the same value to every classification, so two documents
//! in one response are never evaluated against different "now"s.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::{DocumentStatus, DocumentType};
use crate::validation::{validate_name, ValidationResult};
use crate::MAX_DOCUMENT_VALIDITY_DAYS;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

// =============================================================================
// Document Record
// =============================================================================

/// A stored habilitation document, owned by one user.
///
/// Carries no status field: status is derived at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// The user who uploaded it; every read and write is scoped by it.
    pub owner_id: String,

    /// Display name (the uploaded file name by default).
    pub name: String,

    /// Location of the file in object storage.
    pub file_url: String,

    pub document_type: DocumentType,

    /// Stored once at upload; only an explicit update changes it.
    #[ts(as = "String")]
    pub expiration_date: DateTime<Utc>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// `uploadDocument` request. The file itself already lives in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
    pub name: String,
    pub file_url: String,
    pub document_type: DocumentType,
    /// `YYYY-MM-DD` or RFC 3339; absent means the default validity.
    #[serde(default)]
    pub expiration_date: Option<String>,
}

impl NewDocument {
    /// Checks the fields and resolves the expiration against the upload
    /// instant. Returns the trimmed name and the expiration to store.
    pub fn validate(
        &self,
        upload_instant: DateTime<Utc>,
        validity_days: i64,
    ) -> ValidationResult<(String, DateTime<Utc>)> {
        if validity_days <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "validityDays".to_string(),
            });
        }
        let name = validate_name("name", &self.name)?;
        if self.file_url.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "fileUrl".to_string(),
            });
        }
        let expiration =
            resolve_expiration(self.expiration_date.as_deref(), upload_instant, validity_days)?;
        Ok((name, expiration))
    }
}

/// A document plus its read-time classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedDocument {
    #[serde(flatten)]
    pub document: Document,
    pub days_until_expiration: i64,
    pub status: DocumentStatus,
}

/// Output of [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub days_until_expiration: i64,
    pub status: DocumentStatus,
}

// =============================================================================
// Classifier
// =============================================================================

/// `ceil((expiration − reference) / 1 day)`.
///
/// Any positive fraction of a day counts as a whole day; a document expiring
/// 1 ms after the reference instant has 1 day left, one expiring 1 ms before
/// has 0 days left (still critical, not yet expired).
pub fn days_until_expiration(expiration: DateTime<Utc>, reference: DateTime<Utc>) -> i64 {
    let millis = (expiration - reference).num_milliseconds();
    let days = millis / MILLIS_PER_DAY;
    // Integer division truncates toward zero, which already is the ceiling
    // for negative values.
    if millis % MILLIS_PER_DAY > 0 {
        days + 1
    } else {
        days
    }
}

/// Classifies one expiration date against a reference instant.
///
/// ## Example
/// ```rust
/// use chrono::{Duration, TimeZone, Utc};
/// use licita_core::documents::classify;
/// use licita_core::DocumentStatus;
///
/// let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
/// let c = classify(now + Duration::days(10), now);
///
/// assert_eq!(c.days_until_expiration, 10);
/// assert_eq!(c.status, DocumentStatus::Critical);
/// ```
pub fn classify(expiration: DateTime<Utc>, reference: DateTime<Utc>) -> Classification {
    let days = days_until_expiration(expiration, reference);
    Classification {
        days_until_expiration: days,
        status: DocumentStatus::from_days(days),
    }
}

/// Attaches a classification to a document.
pub fn classify_document(document: Document, reference: DateTime<Utc>) -> ClassifiedDocument {
    let Classification {
        days_until_expiration,
        status,
    } = classify(document.expiration_date, reference);

    ClassifiedDocument {
        document,
        days_until_expiration,
        status,
    }
}

/// Classifies a whole listing against ONE reference instant.
pub fn classify_batch(
    documents: impl IntoIterator<Item = Document>,
    reference: DateTime<Utc>,
) -> Vec<ClassifiedDocument> {
    documents
        .into_iter()
        .map(|doc| classify_document(doc, reference))
        .collect()
}

// =============================================================================
// Upload Helpers
// =============================================================================

/// Expiration applied when an upload carries no date.
///
/// ## Example
/// ```rust
/// use chrono::{Duration, Utc};
/// use licita_core::documents::default_expiration;
/// use licita_core::DEFAULT_DOCUMENT_VALIDITY_DAYS;
///
/// let uploaded = Utc::now();
/// let expires = default_expiration(uploaded, DEFAULT_DOCUMENT_VALIDITY_DAYS).unwrap();
/// assert_eq!(expires - uploaded, Duration::days(180));
///
/// assert!(default_expiration(uploaded, 0).is_err());
/// ```
///
/// `validity_days` must lie in `1..=MAX_DOCUMENT_VALIDITY_DAYS`.
pub fn default_expiration(
    upload_instant: DateTime<Utc>,
    validity_days: i64,
) -> ValidationResult<DateTime<Utc>> {
    if validity_days <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "validityDays".to_string(),
        });
    }
    if validity_days > MAX_DOCUMENT_VALIDITY_DAYS {
        return Err(ValidationError::TooLarge {
            field: "validityDays".to_string(),
            max: MAX_DOCUMENT_VALIDITY_DAYS.into(),
        });
    }

    Duration::try_days(validity_days)
        .and_then(|validity| upload_instant.checked_add_signed(validity))
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: "validityDays".to_string(),
            reason: "expiration falls outside the supported date range".to_string(),
        })
}

/// Resolves the expiration of an upload: the supplied date, or the default.
pub fn resolve_expiration(
    supplied: Option<&str>,
    upload_instant: DateTime<Utc>,
    validity_days: i64,
) -> ValidationResult<DateTime<Utc>> {
    match supplied.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => parse_expiration_date(raw),
        None => default_expiration(upload_instant, validity_days),
    }
}

/// Parses a caller-supplied expiration date.
///
/// ## Accepted Formats
/// - RFC 3339 instant: `2025-06-30T15:00:00-03:00`
/// - Calendar date: `2025-06-30` (midnight UTC)
pub fn parse_expiration_date(raw: &str) -> ValidationResult<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: "expirationDate".to_string(),
            reason: "expected YYYY-MM-DD or an RFC 3339 timestamp".to_string(),
        })
}

// =============================================================================
// Dashboard Summary
// =============================================================================

/// Per-status counts plus the documents the dashboard alerts on.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub total: usize,
    pub valid: usize,
    pub warning: usize,
    pub critical: usize,
    pub expired: usize,
    /// Critical and expired documents, soonest expiration first.
    pub alerts: Vec<ClassifiedDocument>,
}

impl DocumentSummary {
    /// Builds the summary from an already classified listing.
    pub fn from_classified(documents: &[ClassifiedDocument]) -> Self {
        let mut summary = DocumentSummary {
            total: documents.len(),
            ..DocumentSummary::default()
        };

        for doc in documents {
            match doc.status {
                DocumentStatus::Valid => summary.valid += 1,
                DocumentStatus::Warning => summary.warning += 1,
                DocumentStatus::Critical => summary.critical += 1,
                DocumentStatus::Expired => summary.expired += 1,
            }
        }

        summary.alerts = documents
            .iter()
            .filter(|doc| doc.status.needs_alert())
            .cloned()
            .collect();
        summary
            .alerts
            .sort_by_key(|doc| doc.document.expiration_date);

        summary
    }

    /// Number of documents needing attention (critical + expired).
    pub fn alert_count(&self) -> usize {
        self.critical + self.expired
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 14, 30, 0).unwrap()
    }

    fn doc(id: &str, expiration: DateTime<Utc>) -> Document {
        Document {
            id: id.to_string(),
            owner_id: "user-1".to_string(),
            name: format!("{id}.pdf"),
            file_url: format!("documents/user-1/{id}.pdf"),
            document_type: DocumentType::Fgts,
            expiration_date: expiration,
            created_at: now() - Duration::days(30),
        }
    }

    #[test]
    fn test_reference_scenarios() {
        let c = classify(now() + Duration::days(10), now());
        assert_eq!(c.days_until_expiration, 10);
        assert_eq!(c.status, DocumentStatus::Critical);

        let c = classify(now() - Duration::days(5), now());
        assert_eq!(c.days_until_expiration, -5);
        assert_eq!(c.status, DocumentStatus::Expired);

        let c = classify(now() + Duration::days(95), now());
        assert_eq!(c.status, DocumentStatus::Valid);
    }

    #[test]
    fn test_boundaries() {
        let cases = [
            (-1, DocumentStatus::Expired),
            (0, DocumentStatus::Critical),
            (30, DocumentStatus::Critical),
            (31, DocumentStatus::Warning),
            (90, DocumentStatus::Warning),
            (91, DocumentStatus::Valid),
        ];
        for (days, expected) in cases {
            let c = classify(now() + Duration::days(days), now());
            assert_eq!(c.days_until_expiration, days);
            assert_eq!(c.status, expected, "days = {days}");
        }
    }

    #[test]
    fn test_partial_days_round_up() {
        assert_eq!(days_until_expiration(now() + Duration::hours(1), now()), 1);
        assert_eq!(days_until_expiration(now() + Duration::milliseconds(1), now()), 1);
        assert_eq!(days_until_expiration(now() + Duration::hours(30 * 24 + 1), now()), 31);
        // ceil(-0.5) = 0: still critical on the day it lapses
        assert_eq!(days_until_expiration(now() - Duration::hours(12), now()), 0);
        assert_eq!(days_until_expiration(now() - Duration::hours(25), now()), -1);
        assert_eq!(days_until_expiration(now(), now()), 0);
    }

    #[test]
    fn test_classifier_is_pure() {
        let exp = now() + Duration::days(45);
        assert_eq!(classify(exp, now()), classify(exp, now()));
    }

    #[test]
    fn test_batch_uses_single_reference() {
        let reference = now();
        let docs = vec![
            doc("a", reference + Duration::days(30)),
            doc("b", reference + Duration::days(31)),
            doc("c", reference - Duration::milliseconds(1)),
        ];

        let classified = classify_batch(docs, reference);
        let statuses: Vec<_> = classified.iter().map(|d| d.status).collect();
        assert_eq!(
            statuses,
            vec![DocumentStatus::Critical, DocumentStatus::Warning, DocumentStatus::Critical]
        );
    }

    #[test]
    fn test_default_expiration() {
        let exp = default_expiration(now(), 180).unwrap();
        assert_eq!(exp, Utc.with_ymd_and_hms(2025, 9, 6, 14, 30, 0).unwrap());
        assert_eq!(classify(exp, now()).days_until_expiration, 180);
    }

    #[test]
    fn test_default_expiration_rejects_out_of_range_validity() {
        for days in [0, -1, i64::MIN] {
            let err = default_expiration(now(), days).unwrap_err();
            assert_eq!(err.code(), "MUST_BE_POSITIVE", "days = {days}");
            assert_eq!(err.field(), "validityDays");
        }
        for days in [MAX_DOCUMENT_VALIDITY_DAYS + 1, i64::MAX] {
            let err = default_expiration(now(), days).unwrap_err();
            assert_eq!(err.code(), "TOO_LARGE", "days = {days}");
        }
        assert!(default_expiration(now(), MAX_DOCUMENT_VALIDITY_DAYS).is_ok());
    }

    #[test]
    fn test_resolve_expiration() {
        let default = default_expiration(now(), 180).unwrap();
        assert_eq!(resolve_expiration(None, now(), 180).unwrap(), default);
        assert_eq!(resolve_expiration(Some("  "), now(), 180).unwrap(), default);
        assert_eq!(
            resolve_expiration(Some("2025-12-31"), now(), 180).unwrap(),
            Utc.with_ymd_and_hms(2025, 12, 31, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_expiration_date() {
        assert_eq!(
            parse_expiration_date("2025-06-30T15:00:00-03:00").unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 30, 18, 0, 0).unwrap()
        );
        let err = parse_expiration_date("30/06/2025").unwrap_err();
        assert_eq!(err.field(), "expirationDate");
        assert!(parse_expiration_date("2025-02-30").is_err());
    }

    #[test]
    fn test_new_document_validation() {
        let upload: NewDocument = serde_json::from_value(serde_json::json!({
            "name": " CND Federal.pdf ",
            "fileUrl": "documents/user-1/cnd.pdf",
            "documentType": "certidao_negativa_federal"
        }))
        .unwrap();

        let (name, expiration) = upload.validate(now(), 180).unwrap();
        assert_eq!(name, "CND Federal.pdf");
        assert_eq!(expiration, default_expiration(now(), 180).unwrap());

        let mut bad = upload.clone();
        bad.file_url = String::new();
        assert_eq!(bad.validate(now(), 180).unwrap_err().field(), "fileUrl");

        let mut bad = upload.clone();
        bad.expiration_date = Some("amanhã".to_string());
        assert_eq!(bad.validate(now(), 180).unwrap_err().code(), "INVALID_FORMAT");

        // A non-positive validity is rejected even when a date is supplied.
        let mut dated = upload;
        dated.expiration_date = Some("2025-12-31".to_string());
        for days in [0, -10] {
            let err = dated.validate(now(), days).unwrap_err();
            assert_eq!(err.code(), "MUST_BE_POSITIVE");
            assert_eq!(err.field(), "validityDays");
        }
    }

    #[test]
    fn test_unknown_document_type_is_outro() {
        let upload: NewDocument = serde_json::from_value(serde_json::json!({
            "name": "x",
            "fileUrl": "y",
            "documentType": "alvara_sanitario"
        }))
        .unwrap();
        assert_eq!(upload.document_type, DocumentType::Outro);
    }

    #[test]
    fn test_summary() {
        let reference = now();
        let docs = classify_batch(
            vec![
                doc("valid", reference + Duration::days(200)),
                doc("warn", reference + Duration::days(60)),
                doc("crit", reference + Duration::days(3)),
                doc("gone", reference - Duration::days(2)),
                doc("gone-earlier", reference - Duration::days(20)),
            ],
            reference,
        );

        let summary = DocumentSummary::from_classified(&docs);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.valid, 1);
        assert_eq!(summary.warning, 1);
        assert_eq!(summary.critical, 1);
        assert_eq!(summary.expired, 2);
        assert_eq!(summary.alert_count(), 3);

        let ids: Vec<_> = summary.alerts.iter().map(|d| d.document.id.as_str()).collect();
        assert_eq!(ids, vec!["gone-earlier", "gone", "crit"]);
    }

    #[test]
    fn test_classified_document_wire_shape() {
        let classified = classify_document(doc("a", now() + Duration::days(10)), now());
        let value = serde_json::to_value(&classified).unwrap();

        assert_eq!(value["id"], "a");
        assert_eq!(value["documentType"], "fgts");
        assert_eq!(value["daysUntilExpiration"], 10);
        assert_eq!(value["status"], "critical");
    }
}
