//! Deletion request repository.
//!
//! Status transitions are conditional updates guarded on `status = 'pending'`,
//! so a request that left `pending` between read and write is never
//! overwritten. The caller sees zero affected rows instead.

use std::sync::Arc;

use crate::entities::{
    Asset, DeletionRequest,
    deletion_request::{self, DeletionStatus},
};
use assetdesk_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use tracing::debug;

/// Deletion request repository for database operations.
#[derive(Clone)]
pub struct DeletionRequestRepository {
    db: Arc<DatabaseConnection>,
}

impl DeletionRequestRepository {
    /// Create a new deletion request repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a deletion request by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<deletion_request::Model>> {
        DeletionRequest::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a deletion request by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<deletion_request::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Deletion request {id} not found")))
    }

    /// Find the pending request for an asset, if any.
    pub async fn find_pending_for_asset(
        &self,
        asset_id: &str,
    ) -> AppResult<Option<deletion_request::Model>> {
        DeletionRequest::find()
            .filter(deletion_request::Column::AssetId.eq(asset_id))
            .filter(deletion_request::Column::Status.eq(DeletionStatus::Pending))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new request.
    ///
    /// The one-pending-per-asset index rejects a concurrent duplicate, which
    /// surfaces as [`AppError::DuplicatePending`].
    pub async fn create(
        &self,
        model: deletion_request::ActiveModel,
    ) -> AppResult<deletion_request::Model> {
        model.insert(self.db.as_ref()).await.map_err(|e| {
            if crate::is_unique_violation(&e) {
                AppError::DuplicatePending(
                    "A pending deletion request already exists for this asset".to_string(),
                )
            } else {
                AppError::Database(e.to_string())
            }
        })
    }

    /// List requests submitted by a user, newest first.
    pub async fn list_by_requester(
        &self,
        user_id: &str,
    ) -> AppResult<Vec<deletion_request::Model>> {
        DeletionRequest::find()
            .filter(deletion_request::Column::RequestedBy.eq(user_id))
            .order_by_desc(deletion_request::Column::CreatedAt)
            .order_by_desc(deletion_request::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all requests with an optional status filter, newest first.
    pub async fn list(
        &self,
        status: Option<DeletionStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<deletion_request::Model>> {
        let mut query = DeletionRequest::find()
            .order_by_desc(deletion_request::Column::CreatedAt)
            .order_by_desc(deletion_request::Column::Id);

        if let Some(s) = status {
            query = query.filter(deletion_request::Column::Status.eq(s));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count pending requests.
    pub async fn count_pending(&self) -> AppResult<u64> {
        DeletionRequest::find()
            .filter(deletion_request::Column::Status.eq(DeletionStatus::Pending))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Apply `changes` to a request that is still pending.
    ///
    /// Returns the number of rows updated: `0` when the request does not
    /// exist or is no longer pending.
    pub async fn transition(
        &self,
        id: &str,
        changes: deletion_request::ActiveModel,
    ) -> AppResult<u64> {
        let result = DeletionRequest::update_many()
            .set(changes)
            .filter(deletion_request::Column::Id.eq(id))
            .filter(deletion_request::Column::Status.eq(DeletionStatus::Pending))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Approve a pending request and delete its asset in one transaction.
    ///
    /// Nothing is written unless the request was still pending.
    pub async fn approve_and_delete_asset(
        &self,
        id: &str,
        changes: deletion_request::ActiveModel,
        asset_id: Option<&str>,
    ) -> AppResult<u64> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let result = DeletionRequest::update_many()
            .set(changes)
            .filter(deletion_request::Column::Id.eq(id))
            .filter(deletion_request::Column::Status.eq(DeletionStatus::Pending))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Ok(0);
        }

        if let Some(asset_id) = asset_id {
            let deleted = Asset::delete_by_id(asset_id)
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            debug!(asset_id = %asset_id, rows = deleted.rows_affected, "Deleted asset for approved request");
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}
