//! Database access layer.
//!
//! Repositories are free functions over `&PgPool`, one module per
//! aggregate. All queries go through sqlx; errors bubble up as
//! `sqlx::Error` and are converted to `AppError` at the service layer.

pub mod author_repo;
pub mod comment_repo;
pub mod follow_repo;
pub mod group_repo;
pub mod post_repo;
