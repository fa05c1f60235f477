//! Errors shared by the review persistence ports.

use crate::review::domain::{RestaurantId, ReviewDomainError, ReviewStatus, TaskId, WorkerId};
use std::sync::Arc;
use thiserror::Error;

/// Result type for review repository operations.
pub type ReviewRepositoryResult<T> = Result<T, ReviewRepositoryError>;

/// Errors returned by review repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ReviewRepositoryError {
    /// The restaurant was not found.
    #[error("restaurant not found: {0}")]
    RestaurantNotFound(RestaurantId),

    /// The task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The worker was not found.
    #[error("worker not found: {0}")]
    WorkerNotFound(WorkerId),

    /// The conditional claim found the restaurant in another status.
    #[error("restaurant {restaurant_id} is already assigned ({status})")]
    AlreadyAssigned {
        /// Restaurant that was targeted.
        restaurant_id: RestaurantId,
        /// Status found in storage.
        status: ReviewStatus,
    },

    /// The conditional completion found the task already completed.
    #[error("task already completed: {0}")]
    TaskAlreadyCompleted(TaskId),

    /// The conditional review write found the restaurant no longer
    /// `pending`.
    #[error("review of restaurant {restaurant_id} is not open ({status})")]
    ReviewNotOpen {
        /// Restaurant that was targeted.
        restaurant_id: RestaurantId,
        /// Status found in storage.
        status: ReviewStatus,
    },

    /// A restaurant with the same identifier already exists.
    #[error("duplicate restaurant identifier: {0}")]
    DuplicateRestaurant(RestaurantId),

    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// A worker with the same identifier already exists.
    #[error("duplicate worker identifier: {0}")]
    DuplicateWorker(WorkerId),

    /// The username is taken.
    #[error("username already exists: {0}")]
    DuplicateUsername(String),

    /// A stored record violates an aggregate invariant.
    #[error("corrupt stored record: {0}")]
    Corrupt(#[source] ReviewDomainError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ReviewRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
