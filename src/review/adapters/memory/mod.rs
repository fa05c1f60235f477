//! In-memory review store for tests and single-process embedding.

mod store;

pub use store::InMemoryReviewStore;
