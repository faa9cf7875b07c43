//! Database entities.

pub mod asset;
pub mod category;
pub mod deletion_request;
pub mod department;
pub mod user;

pub use asset::Entity as Asset;
pub use category::Entity as Category;
pub use deletion_request::Entity as DeletionRequest;
pub use department::Entity as Department;
pub use user::Entity as User;
