//! `PostgreSQL` adapter for review persistence.
//!
//! The schema lives in `migrations/`. Open tasks are unique per restaurant
//! through a partial unique index, which backs the conditional claim update.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresReviewStore, ReviewPgPool};
