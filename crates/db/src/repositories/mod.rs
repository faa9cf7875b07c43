//! Repository layer: typed queries over the entities.

pub mod asset;
pub mod category;
pub mod deletion_request;
pub mod department;
pub mod user;

pub use asset::{AssetFilter, AssetRepository};
pub use category::CategoryRepository;
pub use deletion_request::DeletionRequestRepository;
pub use department::DepartmentRepository;
pub use user::UserRepository;
