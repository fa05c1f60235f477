//! Service-boundary errors for review operations.
//!
//! Every failure is reported with one [`ReviewErrorKind`] so that callers
//! can tell invalid input, missing entities, lost claim races, ownership
//! violations, integrity faults, and transient storage faults apart.

use super::guard::AuthorizationError;
use crate::review::{
    domain::{RestaurantId, ReviewDomainError, ReviewStatus, TaskId, WorkerId},
    ports::ReviewRepositoryError,
};
use std::fmt;
use thiserror::Error;

/// Entity that a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundTarget {
    /// A restaurant.
    Restaurant(RestaurantId),
    /// A review task.
    Task(TaskId),
    /// A worker account.
    Worker(WorkerId),
}

impl fmt::Display for NotFoundTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Restaurant(id) => write!(f, "restaurant {id}"),
            Self::Task(id) => write!(f, "task {id}"),
            Self::Worker(id) => write!(f, "worker {id}"),
        }
    }
}

/// Coarse classification of a [`ReviewServiceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewErrorKind {
    /// Malformed or missing input.
    InvalidInput,
    /// A referenced entity does not exist.
    NotFound,
    /// The restaurant was claimed by someone else first.
    AlreadyAssigned,
    /// The principal lacks the required capability or ownership.
    Forbidden,
    /// Stored records contradict each other.
    DataIntegrity,
    /// Storage was unavailable; the whole operation may be retried.
    Transient,
}

/// Service-level errors for review operations.
#[derive(Debug, Error)]
pub enum ReviewServiceError {
    /// Input validation failed.
    #[error(transparent)]
    InvalidInput(ReviewDomainError),

    /// The requested username is taken.
    #[error("username already exists: {0}")]
    UsernameTaken(String),

    /// A referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(NotFoundTarget),

    /// The restaurant is no longer claimable.
    #[error("restaurant {restaurant_id} is already assigned ({status})")]
    AlreadyAssigned {
        /// Restaurant that was targeted.
        restaurant_id: RestaurantId,
        /// Status observed when the claim was rejected.
        status: ReviewStatus,
    },

    /// Authorization failed.
    #[error(transparent)]
    Forbidden(#[from] AuthorizationError),

    /// Stored records are inconsistent, typically after a failed cascade.
    #[error("data integrity violation: {0}")]
    DataIntegrity(String),

    /// Storage failed; the caller may retry the operation.
    #[error("transient storage failure")]
    Transient(#[source] ReviewRepositoryError),
}

impl ReviewServiceError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ReviewErrorKind {
        match self {
            Self::InvalidInput(_) | Self::UsernameTaken(_) => ReviewErrorKind::InvalidInput,
            Self::NotFound(_) => ReviewErrorKind::NotFound,
            Self::AlreadyAssigned { .. } => ReviewErrorKind::AlreadyAssigned,
            Self::Forbidden(_) => ReviewErrorKind::Forbidden,
            Self::DataIntegrity(_) => ReviewErrorKind::DataIntegrity,
            Self::Transient(_) => ReviewErrorKind::Transient,
        }
    }

    /// Returns `true` when retrying the whole operation may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

impl From<ReviewDomainError> for ReviewServiceError {
    fn from(err: ReviewDomainError) -> Self {
        match err {
            ReviewDomainError::NotClaimable {
                restaurant_id,
                status,
            } => Self::AlreadyAssigned {
                restaurant_id,
                status,
            },
            other if other.is_input_error() => Self::InvalidInput(other),
            other => Self::DataIntegrity(other.to_string()),
        }
    }
}

impl From<ReviewRepositoryError> for ReviewServiceError {
    fn from(err: ReviewRepositoryError) -> Self {
        match err {
            ReviewRepositoryError::RestaurantNotFound(id) => {
                Self::NotFound(NotFoundTarget::Restaurant(id))
            }
            ReviewRepositoryError::TaskNotFound(id) => Self::NotFound(NotFoundTarget::Task(id)),
            ReviewRepositoryError::WorkerNotFound(id) => Self::NotFound(NotFoundTarget::Worker(id)),
            ReviewRepositoryError::AlreadyAssigned {
                restaurant_id,
                status,
            } => Self::AlreadyAssigned {
                restaurant_id,
                status,
            },
            ReviewRepositoryError::DuplicateUsername(username) => Self::UsernameTaken(username),
            ReviewRepositoryError::Persistence(_) => Self::Transient(err),
            ReviewRepositoryError::TaskAlreadyCompleted(_)
            | ReviewRepositoryError::ReviewNotOpen { .. }
            | ReviewRepositoryError::DuplicateRestaurant(_)
            | ReviewRepositoryError::DuplicateTask(_)
            | ReviewRepositoryError::DuplicateWorker(_)
            | ReviewRepositoryError::Corrupt(_) => Self::DataIntegrity(err.to_string()),
        }
    }
}

/// Result type for review service operations.
pub type ReviewServiceResult<T> = Result<T, ReviewServiceError>;
