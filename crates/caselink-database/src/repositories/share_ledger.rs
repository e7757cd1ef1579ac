//! PostgreSQL implementation of the share ledger port.
//!
//! The ledger is append-only; rows of one share action are inserted inside a
//! single transaction so a partially recorded share can never be observed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use caselink_core::error::{AppError, ErrorKind};
use caselink_core::result::AppResult;
use caselink_core::types::pagination::{PageRequest, PageResponse};
use caselink_entity::share::{ShareInfo, ShareInfoCriteria};

use caselink_s2s::store::ShareLedger;

use super::map;

const LEDGER_FILTER: &str = "($1::TEXT IS NULL OR (target_kind = 'case' AND target_uuid = $1)) \
     AND ($2::TEXT IS NULL OR (target_kind = 'contact' AND target_uuid = $2)) \
     AND ($3::TEXT IS NULL OR (target_kind = 'sample' AND target_uuid = $3)) \
     AND ($4::TEXT IS NULL OR organization_id = $4)";

/// Share ledger backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgShareLedger {
    pool: PgPool,
}

impl PgShareLedger {
    /// Create a new ledger over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareLedger for PgShareLedger {
    async fn append(&self, rows: Vec<ShareInfo>) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        for row in &rows {
            sqlx::query(
                "INSERT INTO share_info (id, creation_date, organization_id, \
                 ownership_handed_over, sender_user_uuid, comment, target_kind, target_uuid) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(row.id)
            .bind(row.creation_date)
            .bind(&row.organization_id)
            .bind(row.ownership_handed_over)
            .bind(&row.sender_user_uuid)
            .bind(&row.comment)
            .bind(map::share_target_kind(&row.target))
            .bind(row.target.uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to append share record", e)
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })
    }

    async fn list(
        &self,
        criteria: &ShareInfoCriteria,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareInfo>> {
        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM share_info WHERE {LEDGER_FILTER}"
        ))
        .bind(&criteria.case_uuid)
        .bind(&criteria.contact_uuid)
        .bind(&criteria.sample_uuid)
        .bind(&criteria.organization_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count share records", e)
        })?;

        let rows: Vec<ShareInfoRow> = sqlx::query_as(&format!(
            "SELECT id, creation_date, organization_id, ownership_handed_over, \
             sender_user_uuid, comment, target_kind, target_uuid \
             FROM share_info WHERE {LEDGER_FILTER} \
             ORDER BY creation_date DESC LIMIT $5 OFFSET $6"
        ))
        .bind(&criteria.case_uuid)
        .bind(&criteria.contact_uuid)
        .bind(&criteria.sample_uuid)
        .bind(&criteria.organization_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list share records", e)
        })?;

        let items = rows
            .into_iter()
            .map(ShareInfoRow::into_share_info)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(PageResponse::new(
            items,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}

#[derive(sqlx::FromRow)]
struct ShareInfoRow {
    id: Uuid,
    creation_date: DateTime<Utc>,
    organization_id: String,
    ownership_handed_over: bool,
    sender_user_uuid: String,
    comment: Option<String>,
    target_kind: String,
    target_uuid: String,
}

impl ShareInfoRow {
    fn into_share_info(self) -> AppResult<ShareInfo> {
        Ok(ShareInfo {
            id: self.id,
            creation_date: self.creation_date,
            organization_id: self.organization_id,
            ownership_handed_over: self.ownership_handed_over,
            sender_user_uuid: self.sender_user_uuid,
            comment: self.comment,
            target: map::share_target_from_db(&self.target_kind, self.target_uuid)?,
        })
    }
}
