//! Deletion request service: the asset deletion approval workflow.
//!
//! A request starts `pending` and ends in exactly one of `approved`,
//! `rejected` or `cancelled`:
//!
//! ```text
//!            submit              approve
//!   (none) ---------> pending -----------> approved
//!                      |   |
//!               cancel |   | reject
//!                      v   v
//!               cancelled  rejected
//! ```
//!
//! Terminal requests are never reopened. After a rejection or cancellation
//! the owner may submit a new, independent request for the same asset.
//!
//! Every transition re-reads the request and is then applied as a
//! conditional update on `status = 'pending'`, so two admins racing on the
//! same request cannot both win.

use assetdesk_common::{AppError, AppResult, IdGenerator};
use assetdesk_db::{
    entities::{deletion_request, user},
    repositories::{AssetRepository, DeletionRequestRepository},
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use tracing::{info, warn};
use validator::Validate;

pub use assetdesk_db::entities::deletion_request::DeletionStatus;

use super::{clamp_offset, require_admin};

/// Minimum number of characters in a trimmed justification.
pub const MIN_JUSTIFICATION_LEN: usize = 10;

/// Input for submitting a deletion request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitDeletionRequestInput {
    pub asset_id: String,
    #[validate(length(max = 4096))]
    pub justification: String,
}

/// Reviewer input for approving or rejecting a request.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInput {
    #[validate(length(max = 4096))]
    pub comment: Option<String>,
}

/// Service owning the deletion request state machine.
#[derive(Clone)]
pub struct DeletionRequestService {
    request_repo: DeletionRequestRepository,
    asset_repo: AssetRepository,
    id_gen: IdGenerator,
}

impl DeletionRequestService {
    /// Create a new deletion request service.
    #[must_use]
    pub const fn new(request_repo: DeletionRequestRepository, asset_repo: AssetRepository) -> Self {
        Self {
            request_repo,
            asset_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit a request to delete one of the requester's assets.
    ///
    /// The asset's name and cost and the requester's email are copied into
    /// the request so it stays readable after the asset is gone.
    pub async fn submit(
        &self,
        requester: &user::Model,
        input: SubmitDeletionRequestInput,
    ) -> AppResult<deletion_request::Model> {
        input.validate()?;

        if input.justification.trim().chars().count() < MIN_JUSTIFICATION_LEN {
            return Err(AppError::Validation(format!(
                "Justification must be at least {MIN_JUSTIFICATION_LEN} characters"
            )));
        }

        let asset = self.asset_repo.get_by_id(&input.asset_id).await?;
        if asset.owner_id != requester.id {
            return Err(AppError::Forbidden(
                "Only the asset owner can request its deletion".to_string(),
            ));
        }

        if self
            .request_repo
            .find_pending_for_asset(&asset.id)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicatePending(
                "A pending deletion request already exists for this asset".to_string(),
            ));
        }

        let now = Utc::now();
        let model = deletion_request::ActiveModel {
            id: Set(self.id_gen.generate()),
            asset_id: Set(Some(asset.id.clone())),
            asset_name: Set(asset.name),
            asset_cost_cents: Set(asset.cost_cents),
            requested_by: Set(requester.id.clone()),
            requester_email: Set(requester.email.clone()),
            justification: Set(input.justification),
            status: Set(DeletionStatus::Pending),
            reviewed_by: Set(None),
            reviewer_email: Set(None),
            review_comment: Set(None),
            reviewed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = self.request_repo.create(model).await?;
        info!(
            request_id = %created.id,
            asset_id = %asset.id,
            requested_by = %requester.id,
            "Deletion request submitted"
        );
        Ok(created)
    }

    /// Approve a pending request, deleting its asset in the same transaction.
    ///
    /// The comment is optional; a blank comment is stored as absent.
    pub async fn approve(
        &self,
        reviewer: &user::Model,
        request_id: &str,
        input: ReviewInput,
    ) -> AppResult<deletion_request::Model> {
        require_admin(reviewer, "approve deletion requests")?;
        input.validate()?;

        let request = self.request_repo.get_by_id(request_id).await?;
        ensure_pending(&request)?;

        let comment = input
            .comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        let changes = review_changes(reviewer, DeletionStatus::Approved, comment);

        let updated = self
            .request_repo
            .approve_and_delete_asset(request_id, changes, request.asset_id.as_deref())
            .await?;
        if updated == 0 {
            warn!(request_id = %request_id, "Deletion request left pending before approval");
            return Err(not_pending());
        }

        info!(
            request_id = %request_id,
            asset_id = ?request.asset_id,
            reviewed_by = %reviewer.id,
            "Deletion request approved, asset deleted"
        );
        self.request_repo.get_by_id(request_id).await
    }

    /// Reject a pending request. A non-blank comment is mandatory.
    pub async fn reject(
        &self,
        reviewer: &user::Model,
        request_id: &str,
        input: ReviewInput,
    ) -> AppResult<deletion_request::Model> {
        require_admin(reviewer, "reject deletion requests")?;
        input.validate()?;

        let comment = input
            .comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                AppError::Validation("Please provide a reason for rejection".to_string())
            })?;

        let request = self.request_repo.get_by_id(request_id).await?;
        ensure_pending(&request)?;

        let changes = review_changes(reviewer, DeletionStatus::Rejected, Some(comment));
        if self.request_repo.transition(request_id, changes).await? == 0 {
            warn!(request_id = %request_id, "Deletion request left pending before rejection");
            return Err(not_pending());
        }

        info!(request_id = %request_id, reviewed_by = %reviewer.id, "Deletion request rejected");
        self.request_repo.get_by_id(request_id).await
    }

    /// Withdraw a pending request. Only the original requester may cancel,
    /// and no reviewer fields are recorded.
    pub async fn cancel(
        &self,
        requester: &user::Model,
        request_id: &str,
    ) -> AppResult<deletion_request::Model> {
        let request = self.request_repo.get_by_id(request_id).await?;

        if request.requested_by != requester.id {
            return Err(AppError::Forbidden(
                "Only the requester can cancel a deletion request".to_string(),
            ));
        }
        ensure_pending(&request)?;

        let changes = deletion_request::ActiveModel {
            status: Set(DeletionStatus::Cancelled),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if self.request_repo.transition(request_id, changes).await? == 0 {
            return Err(not_pending());
        }

        info!(request_id = %request_id, requested_by = %requester.id, "Deletion request cancelled");
        self.request_repo.get_by_id(request_id).await
    }

    /// All requests submitted by `user_id`, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<deletion_request::Model>> {
        self.request_repo.list_by_requester(user_id).await
    }

    /// All requests in the system, newest first. Admin only.
    pub async fn list_all(
        &self,
        caller: &user::Model,
        status: Option<DeletionStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<deletion_request::Model>> {
        require_admin(caller, "list all deletion requests")?;
        self.request_repo.list(status, limit, clamp_offset(offset)).await
    }

    /// Get a request visible to the caller (requester or admin).
    pub async fn get(
        &self,
        caller: &user::Model,
        request_id: &str,
    ) -> AppResult<deletion_request::Model> {
        let request = self.request_repo.get_by_id(request_id).await?;

        if request.requested_by != caller.id && !caller.is_admin {
            return Err(AppError::Forbidden(
                "Not the requester of this deletion request".to_string(),
            ));
        }

        Ok(request)
    }

    /// Number of requests awaiting review. Admin only.
    pub async fn count_pending(&self, caller: &user::Model) -> AppResult<u64> {
        require_admin(caller, "view pending deletion requests")?;
        self.request_repo.count_pending().await
    }
}

fn ensure_pending(request: &deletion_request::Model) -> AppResult<()> {
    if request.status.is_terminal() {
        return Err(AppError::InvalidState(format!(
            "Deletion request is already {}",
            request.status.as_str()
        )));
    }
    Ok(())
}

fn not_pending() -> AppError {
    AppError::InvalidState("Deletion request is no longer pending".to_string())
}

fn review_changes(
    reviewer: &user::Model,
    status: DeletionStatus,
    comment: Option<String>,
) -> deletion_request::ActiveModel {
    let now = Utc::now();
    deletion_request::ActiveModel {
        status: Set(status),
        reviewed_by: Set(Some(reviewer.id.clone())),
        reviewer_email: Set(Some(reviewer.email.clone())),
        review_comment: Set(comment),
        reviewed_at: Set(Some(now)),
        updated_at: Set(now),
        ..Default::default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use assetdesk_db::test_utils::TestDatabase;
    use std::time::Duration;

    struct Fixture {
        db: TestDatabase,
        service: DeletionRequestService,
        assets: AssetRepository,
        admin: user::Model,
        owner: user::Model,
        other: user::Model,
    }

    async fn setup() -> Fixture {
        let db = TestDatabase::new().await.unwrap();
        let admin = db.insert_user("admin1", "admin@example.com", true).await.unwrap();
        let owner = db.insert_user("owner1", "owner@example.com", false).await.unwrap();
        let other = db.insert_user("other1", "other@example.com", false).await.unwrap();
        db.insert_asset("asset1", "owner1", "ThinkPad X1", 50_000).await.unwrap();

        let assets = AssetRepository::new(db.connection());
        let service =
            DeletionRequestService::new(DeletionRequestRepository::new(db.connection()), assets.clone());

        Fixture {
            db,
            service,
            assets,
            admin,
            owner,
            other,
        }
    }

    fn submit_input(asset_id: &str, justification: &str) -> SubmitDeletionRequestInput {
        SubmitDeletionRequestInput {
            asset_id: asset_id.to_string(),
            justification: justification.to_string(),
        }
    }

    fn comment(text: &str) -> ReviewInput {
        ReviewInput {
            comment: Some(text.to_string()),
        }
    }

    #[tokio::test]
    async fn test_submit_snapshots_asset_and_requester() {
        let f = setup().await;

        let created = f
            .service
            .submit(&f.owner, submit_input("asset1", "no longer needed by team"))
            .await
            .unwrap();
        let read = f.service.get(&f.owner, &created.id).await.unwrap();

        assert_eq!(read.asset_id.as_deref(), Some("asset1"));
        assert_eq!(read.asset_name, "ThinkPad X1");
        assert_eq!(read.asset_cost_cents, 50_000);
        assert_eq!(read.requested_by, "owner1");
        assert_eq!(read.requester_email, "owner@example.com");
        assert_eq!(read.justification, "no longer needed by team");
        assert_eq!(read.status, DeletionStatus::Pending);
        assert!(read.reviewed_by.is_none());
        assert!(read.reviewer_email.is_none());
        assert!(read.review_comment.is_none());
        assert!(read.reviewed_at.is_none());
    }

    #[tokio::test]
    async fn test_submit_short_justification_persists_nothing() {
        let f = setup().await;

        for justification in ["", "too short", "   padded    ", "         \n\t"] {
            let result = f
                .service
                .submit(&f.owner, submit_input("asset1", justification))
                .await;
            assert!(
                matches!(result, Err(AppError::Validation(_))),
                "accepted {justification:?}"
            );
        }

        assert_eq!(f.db.count_rows("deletion_request").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_submit_exactly_ten_trimmed_characters() {
        let f = setup().await;

        let result = f
            .service
            .submit(&f.owner, submit_input("asset1", "  0123456789  "))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_submit_by_non_owner_forbidden() {
        let f = setup().await;

        let result = f
            .service
            .submit(&f.other, submit_input("asset1", "I want this gone"))
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
        assert_eq!(f.db.count_rows("deletion_request").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_submit_unknown_asset_not_found() {
        let f = setup().await;

        let result = f
            .service
            .submit(&f.owner, submit_input("missing", "hardware failure confirmed"))
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_second_pending_submit_rejected() {
        let f = setup().await;
        f.service
            .submit(&f.owner, submit_input("asset1", "no longer needed by team"))
            .await
            .unwrap();

        let result = f
            .service
            .submit(&f.owner, submit_input("asset1", "asking again, still unused"))
            .await;

        assert!(matches!(result, Err(AppError::DuplicatePending(_))));
        assert_eq!(f.db.count_rows("deletion_request").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_store_rejects_second_pending_row() {
        let f = setup().await;
        let repo = DeletionRequestRepository::new(f.db.connection());
        f.service
            .submit(&f.owner, submit_input("asset1", "no longer needed by team"))
            .await
            .unwrap();

        // Bypasses the service check, as a concurrent submit would
        let now = Utc::now();
        let duplicate = deletion_request::ActiveModel {
            id: Set("racing".to_string()),
            asset_id: Set(Some("asset1".to_string())),
            asset_name: Set("ThinkPad X1".to_string()),
            asset_cost_cents: Set(50_000),
            requested_by: Set("owner1".to_string()),
            requester_email: Set("owner@example.com".to_string()),
            justification: Set("submitted concurrently".to_string()),
            status: Set(DeletionStatus::Pending),
            reviewed_by: Set(None),
            reviewer_email: Set(None),
            review_comment: Set(None),
            reviewed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        assert!(matches!(
            repo.create(duplicate).await,
            Err(AppError::DuplicatePending(_))
        ));
    }

    #[tokio::test]
    async fn test_resubmit_after_each_terminal_status() {
        let f = setup().await;

        let r1 = f
            .service
            .submit(&f.owner, submit_input("asset1", "first attempt at removal"))
            .await
            .unwrap();
        f.service.cancel(&f.owner, &r1.id).await.unwrap();

        let r2 = f
            .service
            .submit(&f.owner, submit_input("asset1", "second attempt at removal"))
            .await
            .unwrap();
        f.service
            .reject(&f.admin, &r2.id, comment("still in use"))
            .await
            .unwrap();

        let r3 = f
            .service
            .submit(&f.owner, submit_input("asset1", "third attempt at removal"))
            .await
            .unwrap();
        f.service
            .approve(&f.admin, &r3.id, ReviewInput::default())
            .await
            .unwrap();

        assert_eq!(f.db.count_rows("deletion_request").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_reject_then_resubmit_scenario() {
        let f = setup().await;

        let r1 = f
            .service
            .submit(&f.owner, submit_input("asset1", "no longer needed by team"))
            .await
            .unwrap();
        assert_eq!(r1.asset_cost_cents, 50_000);

        let rejected = f
            .service
            .reject(&f.admin, &r1.id, comment("insufficient justification"))
            .await
            .unwrap();
        assert_eq!(rejected.status, DeletionStatus::Rejected);
        assert_eq!(
            rejected.review_comment.as_deref(),
            Some("insufficient justification")
        );

        let r2 = f
            .service
            .submit(
                &f.owner,
                submit_input("asset1", "re-justified: hardware failure confirmed"),
            )
            .await
            .unwrap();

        assert_ne!(r1.id, r2.id);
        assert_eq!(r2.status, DeletionStatus::Pending);
        let r1_again = f.service.get(&f.owner, &r1.id).await.unwrap();
        assert_eq!(r1_again.status, DeletionStatus::Rejected);
    }

    #[tokio::test]
    async fn test_reject_requires_comment() {
        let f = setup().await;
        let request = f
            .service
            .submit(&f.owner, submit_input("asset1", "no longer needed by team"))
            .await
            .unwrap();

        for input in [ReviewInput::default(), comment(""), comment("  \n ")] {
            let result = f.service.reject(&f.admin, &request.id, input).await;
            assert!(matches!(result, Err(AppError::Validation(_))));
        }

        let read = f.service.get(&f.admin, &request.id).await.unwrap();
        assert_eq!(read.status, DeletionStatus::Pending);
        assert!(read.reviewed_by.is_none());
    }

    #[tokio::test]
    async fn test_reject_leaves_asset() {
        let f = setup().await;
        let request = f
            .service
            .submit(&f.owner, submit_input("asset1", "no longer needed by team"))
            .await
            .unwrap();

        let rejected = f
            .service
            .reject(&f.admin, &request.id, comment("still assigned"))
            .await
            .unwrap();

        assert_eq!(rejected.reviewed_by.as_deref(), Some("admin1"));
        assert_eq!(rejected.reviewer_email.as_deref(), Some("admin@example.com"));
        assert!(rejected.reviewed_at.is_some());
        assert!(f.assets.find_by_id("asset1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_approve_deletes_asset_and_keeps_snapshot() {
        let f = setup().await;
        let request = f
            .service
            .submit(&f.owner, submit_input("asset1", "no longer needed by team"))
            .await
            .unwrap();

        let approved = f
            .service
            .approve(&f.admin, &request.id, comment("ok"))
            .await
            .unwrap();

        assert!(f.assets.find_by_id("asset1").await.unwrap().is_none());
        assert_eq!(approved.status, DeletionStatus::Approved);
        assert_eq!(approved.reviewed_by.as_deref(), Some("admin1"));
        assert_eq!(approved.reviewer_email.as_deref(), Some("admin@example.com"));
        assert!(approved.reviewed_at.is_some());
        assert_eq!(approved.review_comment.as_deref(), Some("ok"));
        assert_eq!(approved.asset_id, None);
        assert_eq!(approved.asset_name, "ThinkPad X1");
    }

    #[tokio::test]
    async fn test_approve_blank_comment_stored_as_none() {
        let f = setup().await;
        let request = f
            .service
            .submit(&f.owner, submit_input("asset1", "no longer needed by team"))
            .await
            .unwrap();

        let approved = f
            .service
            .approve(&f.admin, &request.id, comment("   "))
            .await
            .unwrap();

        assert!(approved.review_comment.is_none());
    }

    #[tokio::test]
    async fn test_review_requires_admin() {
        let f = setup().await;
        let request = f
            .service
            .submit(&f.owner, submit_input("asset1", "no longer needed by team"))
            .await
            .unwrap();

        assert!(matches!(
            f.service
                .approve(&f.owner, &request.id, ReviewInput::default())
                .await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            f.service.reject(&f.owner, &request.id, comment("nope")).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(f.assets.find_by_id("asset1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_review_missing_request_not_found() {
        let f = setup().await;

        assert!(matches!(
            f.service
                .approve(&f.admin, "missing", ReviewInput::default())
                .await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            f.service.reject(&f.admin, "missing", comment("reason")).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_terminal_requests_cannot_transition() {
        let f = setup().await;
        let request = f
            .service
            .submit(&f.owner, submit_input("asset1", "no longer needed by team"))
            .await
            .unwrap();
        f.service.cancel(&f.owner, &request.id).await.unwrap();

        assert!(matches!(
            f.service.cancel(&f.owner, &request.id).await,
            Err(AppError::InvalidState(_))
        ));
        assert!(matches!(
            f.service
                .approve(&f.admin, &request.id, ReviewInput::default())
                .await,
            Err(AppError::InvalidState(_))
        ));
        assert!(matches!(
            f.service.reject(&f.admin, &request.id, comment("late")).await,
            Err(AppError::InvalidState(_))
        ));
        // The asset survives an approve attempt on a cancelled request
        assert!(f.assets.find_by_id("asset1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_cancel_after_review_invalid_state() {
        let f = setup().await;
        let request = f
            .service
            .submit(&f.owner, submit_input("asset1", "no longer needed by team"))
            .await
            .unwrap();
        f.service
            .approve(&f.admin, &request.id, ReviewInput::default())
            .await
            .unwrap();

        assert!(matches!(
            f.service.cancel(&f.owner, &request.id).await,
            Err(AppError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn test_cancel_only_by_requester() {
        let f = setup().await;
        let request = f
            .service
            .submit(&f.owner, submit_input("asset1", "no longer needed by team"))
            .await
            .unwrap();

        assert!(matches!(
            f.service.cancel(&f.other, &request.id).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            f.service.cancel(&f.admin, &request.id).await,
            Err(AppError::Forbidden(_))
        ));

        let cancelled = f.service.cancel(&f.owner, &request.id).await.unwrap();
        assert_eq!(cancelled.status, DeletionStatus::Cancelled);
        assert!(cancelled.reviewed_by.is_none());
        assert!(cancelled.reviewer_email.is_none());
        assert!(cancelled.reviewed_at.is_none());
        assert!(cancelled.review_comment.is_none());
        assert!(cancelled.updated_at >= cancelled.created_at);
    }

    #[tokio::test]
    async fn test_stale_transition_reports_invalid_state() {
        let f = setup().await;
        let request = f
            .service
            .submit(&f.owner, submit_input("asset1", "no longer needed by team"))
            .await
            .unwrap();
        let repo = DeletionRequestRepository::new(f.db.connection());

        let first = deletion_request::ActiveModel {
            status: Set(DeletionStatus::Cancelled),
            ..Default::default()
        };
        assert_eq!(repo.transition(&request.id, first).await.unwrap(), 1);

        // A second writer working from the stale pending read loses
        let second = review_changes(&f.admin, DeletionStatus::Approved, None);
        assert_eq!(
            repo.approve_and_delete_asset(&request.id, second, Some("asset1"))
                .await
                .unwrap(),
            0
        );
        assert!(f.assets.find_by_id("asset1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_list_for_user_scoped_and_newest_first() {
        let f = setup().await;
        f.db.insert_asset("asset2", "owner1", "Monitor", 20_000).await.unwrap();
        f.db.insert_asset("asset3", "other1", "Keyboard", 5_000).await.unwrap();

        let first = f
            .service
            .submit(&f.owner, submit_input("asset1", "no longer needed by team"))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = f
            .service
            .submit(&f.owner, submit_input("asset2", "dead pixels everywhere"))
            .await
            .unwrap();
        f.service
            .submit(&f.other, submit_input("asset3", "keys are sticking badly"))
            .await
            .unwrap();

        let mine = f.service.list_for_user("owner1").await.unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].id, second.id);
        assert_eq!(mine[1].id, first.id);
        assert!(mine.iter().all(|r| r.requested_by == "owner1"));

        let theirs = f.service.list_for_user("other1").await.unwrap();
        assert_eq!(theirs.len(), 1);
    }

    #[tokio::test]
    async fn test_list_all_admin_only_with_status_filter() {
        let f = setup().await;
        f.db.insert_asset("asset3", "other1", "Keyboard", 5_000).await.unwrap();
        let mine = f
            .service
            .submit(&f.owner, submit_input("asset1", "no longer needed by team"))
            .await
            .unwrap();
        f.service
            .submit(&f.other, submit_input("asset3", "keys are sticking badly"))
            .await
            .unwrap();
        f.service.cancel(&f.owner, &mine.id).await.unwrap();

        assert!(matches!(
            f.service.list_all(&f.owner, None, 50, 0).await,
            Err(AppError::Forbidden(_))
        ));

        let all = f.service.list_all(&f.admin, None, 50, 0).await.unwrap();
        assert_eq!(all.len(), 2);

        let pending = f
            .service
            .list_all(&f.admin, Some(DeletionStatus::Pending), 50, 0)
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].requested_by, "other1");

        assert_eq!(f.service.count_pending(&f.admin).await.unwrap(), 1);
        assert!(matches!(
            f.service.count_pending(&f.other).await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_list_all_offset_past_the_end() {
        let f = setup().await;
        f.service
            .submit(&f.owner, submit_input("asset1", "no longer needed by team"))
            .await
            .unwrap();

        let page = f.service.list_all(&f.admin, None, 50, u64::MAX).await.unwrap();
        assert!(page.is_empty());

        let page = f.service.list_all(&f.admin, None, 50, 1).await.unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_get_visible_to_requester_and_admin_only() {
        let f = setup().await;
        let request = f
            .service
            .submit(&f.owner, submit_input("asset1", "no longer needed by team"))
            .await
            .unwrap();

        assert!(f.service.get(&f.owner, &request.id).await.is_ok());
        assert!(f.service.get(&f.admin, &request.id).await.is_ok());
        assert!(matches!(
            f.service.get(&f.other, &request.id).await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_direct_asset_deletion_keeps_request() {
        let f = setup().await;
        let request = f
            .service
            .submit(&f.owner, submit_input("asset1", "no longer needed by team"))
            .await
            .unwrap();

        let asset = f.assets.get_by_id("asset1").await.unwrap();
        f.assets.delete(asset).await.unwrap();

        let read = f.service.get(&f.owner, &request.id).await.unwrap();
        assert!(read.asset_id.is_none());
        assert_eq!(read.asset_name, "ThinkPad X1");

        // Approving once the asset is already gone still closes the request
        let approved = f
            .service
            .approve(&f.admin, &request.id, ReviewInput::default())
            .await
            .unwrap();
        assert_eq!(approved.status, DeletionStatus::Approved);
    }
}
