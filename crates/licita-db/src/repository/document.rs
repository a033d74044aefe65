//! # Document Repository
//!
//! Database operations for habilitation documents.
//!
//! ## Key Operations
//! - Upload with a defaulted expiration (stored once)
//! - Listings classified at read time against ONE reference instant
//! - Expiration updates and deletes
//!
//! Every statement filters by `owner_id`. A document owned by someone else
//! is indistinguishable from one that does not exist.
//!
//! ## Read Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ReferenceInstant::capture()  ← clock read exactly once                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SELECT ... WHERE owner_id = ? ORDER BY expiration_date                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  classify_batch(rows, reference)  → daysUntilExpiration + status       │
//! │       │                                                                 │
//! │       ├──► list_classified   (everything)                              │
//! │       ├──► expiring          (critical + expired)                      │
//! │       └──► summary           (counts + alerts)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use licita_core::documents::{
    classify_batch, parse_expiration_date, ClassifiedDocument, Document, DocumentSummary,
    NewDocument,
};
use licita_core::ValidationError;

use crate::error::{DbError, DbResult};

const DOCUMENT_COLUMNS: &str =
    "id, owner_id, name, file_url, document_type, expiration_date, created_at";

// =============================================================================
// Reference Instant
// =============================================================================

/// The "now" a whole listing is classified against.
///
/// Captured once per request and shared by every document in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReferenceInstant(DateTime<Utc>);

impl ReferenceInstant {
    /// Reads the wall clock.
    pub fn capture() -> Self {
        ReferenceInstant(Utc::now())
    }

    /// A fixed instant (replays, tests).
    pub fn at(instant: DateTime<Utc>) -> Self {
        ReferenceInstant(instant)
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for ReferenceInstant {
    fn from(instant: DateTime<Utc>) -> Self {
        ReferenceInstant(instant)
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for document database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.documents();
///
/// let doc = repo.upload("user-42", &new_doc, Utc::now(), 180).await?;
/// let alerts = repo.expiring("user-42", ReferenceInstant::capture()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: SqlitePool,
}

impl DocumentRepository {
    /// Creates a new DocumentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DocumentRepository { pool }
    }

    /// Stores a new document.
    ///
    /// The expiration is resolved here, once: the supplied date, or
    /// `upload_instant + validity_days`. Reads never recompute it.
    ///
    /// ## Errors
    /// `DbError::Core` if the owner, name, file URL or date is invalid.
    pub async fn upload(
        &self,
        owner_id: &str,
        new_document: &NewDocument,
        upload_instant: DateTime<Utc>,
        validity_days: i64,
    ) -> DbResult<Document> {
        let owner_id = require_owner(owner_id)?;
        let (name, expiration_date) = new_document.validate(upload_instant, validity_days)?;

        let document = Document {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            name,
            file_url: new_document.file_url.trim().to_string(),
            document_type: new_document.document_type,
            expiration_date,
            created_at: upload_instant,
        };

        sqlx::query(
            r#"
            INSERT INTO documents (
                id, owner_id, name, file_url, document_type,
                expiration_date, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            "#,
        )
        .bind(&document.id)
        .bind(&document.owner_id)
        .bind(&document.name)
        .bind(&document.file_url)
        .bind(document.document_type)
        .bind(document.expiration_date)
        .bind(document.created_at)
        .execute(&self.pool)
        .await?;

        info!(
            owner_id = %document.owner_id,
            document_id = %document.id,
            document_type = ?document.document_type,
            expiration_date = %document.expiration_date,
            "Document uploaded"
        );

        Ok(document)
    }

    /// Gets one of the owner's documents.
    ///
    /// ## Errors
    /// `DbError::NotFound` if it doesn't exist or belongs to someone else.
    pub async fn get(&self, owner_id: &str, id: &str) -> DbResult<Document> {
        let sql = format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1 AND owner_id = ?2"
        );

        sqlx::query_as::<_, Document>(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Document", id))
    }

    /// All of the owner's documents, soonest expiration first, unclassified.
    async fn list(&self, owner_id: &str) -> DbResult<Vec<Document>> {
        let sql = format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE owner_id = ?1 \
             ORDER BY expiration_date ASC, created_at ASC"
        );

        let documents = sqlx::query_as::<_, Document>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(documents)
    }

    /// `listDocuments`: every document of the owner, classified against
    /// `reference`, ordered by expiration date.
    pub async fn list_classified(
        &self,
        owner_id: &str,
        reference: ReferenceInstant,
    ) -> DbResult<Vec<ClassifiedDocument>> {
        let documents = self.list(owner_id).await?;
        let classified = classify_batch(documents, reference.instant());

        debug!(
            owner_id = %owner_id,
            reference = %reference.instant(),
            count = classified.len(),
            "Classified document listing"
        );

        Ok(classified)
    }

    /// `getExpiringDocuments`: the owner's critical and expired documents.
    pub async fn expiring(
        &self,
        owner_id: &str,
        reference: ReferenceInstant,
    ) -> DbResult<Vec<ClassifiedDocument>> {
        let expiring: Vec<ClassifiedDocument> = self
            .list_classified(owner_id, reference)
            .await?
            .into_iter()
            .filter(|doc| doc.status.needs_alert())
            .collect();

        debug!(owner_id = %owner_id, count = expiring.len(), "Expiring documents");
        Ok(expiring)
    }

    /// Dashboard summary: per-status counts and alert documents.
    pub async fn summary(
        &self,
        owner_id: &str,
        reference: ReferenceInstant,
    ) -> DbResult<DocumentSummary> {
        let classified = self.list_classified(owner_id, reference).await?;
        Ok(DocumentSummary::from_classified(&classified))
    }

    /// Replaces a document's expiration date.
    ///
    /// ## Arguments
    /// * `expiration_date` - `YYYY-MM-DD` or RFC 3339
    ///
    /// ## Errors
    /// - `DbError::Core` for an unparseable date
    /// - `DbError::NotFound` if it doesn't exist or belongs to someone else
    pub async fn update_expiration(
        &self,
        owner_id: &str,
        id: &str,
        expiration_date: &str,
    ) -> DbResult<Document> {
        let expiration = parse_expiration_date(expiration_date)?;

        let result = sqlx::query(
            r#"
            UPDATE documents SET
                expiration_date = ?3,
                updated_at = ?4
            WHERE id = ?1 AND owner_id = ?2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(expiration)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Document", id));
        }

        info!(
            owner_id = %owner_id,
            document_id = %id,
            expiration_date = %expiration,
            "Document expiration updated"
        );

        self.get(owner_id, id).await
    }

    /// Deletes one of the owner's documents.
    ///
    /// Removing the file from object storage is the caller's concern.
    pub async fn delete(&self, owner_id: &str, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE id = ?1 AND owner_id = ?2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Document", id));
        }

        info!(owner_id = %owner_id, document_id = %id, "Document deleted");
        Ok(())
    }

    /// Counts the owner's documents.
    pub async fn count(&self, owner_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE owner_id = ?1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

fn require_owner(owner_id: &str) -> DbResult<&str> {
    let owner_id = owner_id.trim();
    if owner_id.is_empty() {
        return Err(ValidationError::Required {
            field: "ownerId".to_string(),
        }
        .into());
    }
    Ok(owner_id)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{Duration, TimeZone};
    use licita_core::{DocumentStatus, DocumentType};

    const OWNER: &str = "user-1";
    const OTHER: &str = "user-2";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 14, 30, 0).unwrap()
    }

    fn new_doc(name: &str, expiration: Option<DateTime<Utc>>) -> NewDocument {
        NewDocument {
            name: name.to_string(),
            file_url: format!("documents/{OWNER}/{name}"),
            document_type: DocumentType::CertidaoNegativaFederal,
            expiration_date: expiration.map(|e| e.to_rfc3339()),
        }
    }

    async fn repo() -> DocumentRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().documents()
    }

    #[tokio::test]
    async fn test_upload_defaults_expiration() {
        let repo = repo().await;

        let doc = repo
            .upload(OWNER, &new_doc("cnd.pdf", None), now(), 180)
            .await
            .unwrap();
        assert_eq!(doc.expiration_date, now() + Duration::days(180));

        let stored = repo.get(OWNER, &doc.id).await.unwrap();
        assert_eq!(stored, doc);
    }

    #[tokio::test]
    async fn test_upload_rejects_invalid_input() {
        let repo = repo().await;

        let err = repo
            .upload("  ", &new_doc("cnd.pdf", None), now(), 180)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(_)));

        let mut bad = new_doc("cnd.pdf", None);
        bad.expiration_date = Some("31/12/2025".to_string());
        let err = repo.upload(OWNER, &bad, now(), 180).await.unwrap_err();
        assert!(matches!(err, DbError::Core(_)));

        assert_eq!(repo.count(OWNER).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_upload_rejects_out_of_range_validity() {
        let repo = repo().await;

        for days in [0, -10, i64::MIN, i64::MAX] {
            let err = repo
                .upload(OWNER, &new_doc("cnd.pdf", None), now(), days)
                .await
                .unwrap_err();
            assert!(matches!(err, DbError::Core(_)), "days = {days}: {err:?}");
        }

        assert_eq!(repo.count(OWNER).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_classified_ordering_and_status() {
        let repo = repo().await;
        let reference = ReferenceInstant::at(now());

        for (name, days) in [("valid", 95), ("expired", -5), ("critical", 10), ("warning", 60)] {
            repo.upload(OWNER, &new_doc(name, Some(now() + Duration::days(days))), now(), 180)
                .await
                .unwrap();
        }

        let listing = repo.list_classified(OWNER, reference).await.unwrap();
        let view: Vec<_> = listing
            .iter()
            .map(|d| (d.document.name.as_str(), d.days_until_expiration, d.status))
            .collect();

        assert_eq!(
            view,
            vec![
                ("expired", -5, DocumentStatus::Expired),
                ("critical", 10, DocumentStatus::Critical),
                ("warning", 60, DocumentStatus::Warning),
                ("valid", 95, DocumentStatus::Valid),
            ]
        );
    }

    #[tokio::test]
    async fn test_status_moves_with_reference_not_storage() {
        let repo = repo().await;
        repo.upload(OWNER, &new_doc("fgts", Some(now() + Duration::days(40))), now(), 180)
            .await
            .unwrap();

        let today = repo.list_classified(OWNER, now().into()).await.unwrap();
        assert_eq!(today[0].status, DocumentStatus::Warning);

        let later = ReferenceInstant::at(now() + Duration::days(20));
        let later = repo.list_classified(OWNER, later).await.unwrap();
        assert_eq!(later[0].status, DocumentStatus::Critical);
        assert_eq!(later[0].days_until_expiration, 20);
    }

    #[tokio::test]
    async fn test_expiring_and_summary() {
        let repo = repo().await;
        for (name, days) in [("a", 200), ("b", 30), ("c", 31), ("d", -1)] {
            repo.upload(OWNER, &new_doc(name, Some(now() + Duration::days(days))), now(), 180)
                .await
                .unwrap();
        }

        let expiring = repo.expiring(OWNER, now().into()).await.unwrap();
        let names: Vec<_> = expiring.iter().map(|d| d.document.name.as_str()).collect();
        assert_eq!(names, vec!["d", "b"]);

        let summary = repo.summary(OWNER, now().into()).await.unwrap();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.valid, 1);
        assert_eq!(summary.warning, 1);
        assert_eq!(summary.critical, 1);
        assert_eq!(summary.expired, 1);
        assert_eq!(summary.alerts.len(), 2);
    }

    #[tokio::test]
    async fn test_owner_isolation() {
        let repo = repo().await;
        let doc = repo
            .upload(OWNER, &new_doc("balanco.pdf", None), now(), 180)
            .await
            .unwrap();

        assert!(matches!(
            repo.get(OTHER, &doc.id).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            repo.update_expiration(OTHER, &doc.id, "2030-01-01").await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            repo.delete(OTHER, &doc.id).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(repo.list_classified(OTHER, now().into()).await.unwrap().is_empty());

        // untouched for the real owner
        assert_eq!(repo.get(OWNER, &doc.id).await.unwrap(), doc);
    }

    #[tokio::test]
    async fn test_update_expiration() {
        let repo = repo().await;
        let doc = repo
            .upload(OWNER, &new_doc("inss.pdf", None), now(), 180)
            .await
            .unwrap();

        let updated = repo.update_expiration(OWNER, &doc.id, "2025-03-20").await.unwrap();
        assert_eq!(
            updated.expiration_date,
            Utc.with_ymd_and_hms(2025, 3, 20, 0, 0, 0).unwrap()
        );
        assert_eq!(updated.created_at, doc.created_at);

        let listing = repo.list_classified(OWNER, now().into()).await.unwrap();
        assert_eq!(listing[0].status, DocumentStatus::Critical);

        let err = repo.update_expiration(OWNER, &doc.id, "soon").await.unwrap_err();
        assert!(matches!(err, DbError::Core(_)));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = repo().await;
        let doc = repo
            .upload(OWNER, &new_doc("dre.pdf", None), now(), 180)
            .await
            .unwrap();

        repo.delete(OWNER, &doc.id).await.unwrap();
        assert_eq!(repo.count(OWNER).await.unwrap(), 0);
        assert!(matches!(
            repo.delete(OWNER, &doc.id).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
