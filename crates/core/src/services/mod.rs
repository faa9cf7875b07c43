//! Business logic services.

#![allow(missing_docs)]

pub mod asset;
pub mod category;
pub mod deletion_request;
pub mod department;
pub mod user;

pub use asset::{AssetService, CreateAssetInput, ListAssetsInput, UpdateAssetInput};
pub use category::{CategoryService, CreateCategoryInput, RenameCategoryInput};
pub use deletion_request::{
    DeletionRequestService, DeletionStatus, ReviewInput, SubmitDeletionRequestInput,
};
pub use department::{CreateDepartmentInput, DepartmentService, RenameDepartmentInput};
pub use user::{CreateUserInput, UserService};

use assetdesk_common::{AppError, AppResult};
use assetdesk_db::entities::user as user_entity;

/// Default page size for paginated listings.
pub const DEFAULT_LIMIT: u64 = 50;

/// Upper bound on page size.
pub const MAX_LIMIT: u64 = 200;

/// Clamp a caller-supplied page size.
#[must_use]
pub fn clamp_limit(limit: Option<u64>) -> u64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Largest offset the store accepts; it binds offsets as signed 64-bit.
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// Clamp a caller-supplied offset into the range the store can bind.
#[must_use]
pub const fn clamp_offset(offset: u64) -> u64 {
    if offset > MAX_OFFSET { MAX_OFFSET } else { offset }
}

/// Reject callers without the admin capability.
pub(crate) fn require_admin(caller: &user_entity::Model, action: &str) -> AppResult<()> {
    if caller.is_admin {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!("Admin access required to {action}")))
    }
}
