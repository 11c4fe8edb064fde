//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods.
//! Read helpers take `&PgPool`; write helpers accept any [`sqlx::PgExecutor`]
//! so they can run either on the pool or inside a caller's transaction.

pub mod child_item_repo;
pub mod project_repo;

pub use child_item_repo::ChildItemRepo;
pub use project_repo::ProjectRepo;
