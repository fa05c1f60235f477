//! Error types for review domain validation and state transitions.

use super::{EvidenceSlot, RestaurantId, ReviewStatus, TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing review domain values or applying
/// lifecycle transitions.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ReviewDomainError {
    /// A coordinate was not supplied.
    #[error("missing {0} coordinate")]
    MissingCoordinate(&'static str),

    /// A coordinate could not be parsed as a number.
    #[error("{axis} coordinate '{raw}' is not numeric")]
    NonNumericCoordinate {
        /// Coordinate axis name.
        axis: &'static str,
        /// Raw value as received.
        raw: String,
    },

    /// A coordinate is not finite or lies outside its valid range.
    #[error("{axis} coordinate {value} is out of range")]
    CoordinateOutOfRange {
        /// Coordinate axis name.
        axis: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// An evidence image was not supplied.
    #[error("{0} image is required")]
    MissingEvidence(EvidenceSlot),

    /// An evidence image URL is not hosted by the trusted image store.
    #[error("{slot} image URL '{url}' is not hosted by the trusted image store")]
    UntrustedImageUrl {
        /// Evidence slot carrying the URL.
        slot: EvidenceSlot,
        /// Rejected URL.
        url: String,
    },

    /// The trusted image host prefix is empty or not an `https` URL.
    #[error("invalid trusted image host prefix '{0}'")]
    InvalidImageHost(String),

    /// A required restaurant profile field is empty after trimming.
    #[error("restaurant {0} must not be empty")]
    EmptyProfileField(&'static str),

    /// A worker username or display name is empty after trimming.
    #[error("worker {0} must not be empty")]
    EmptyWorkerField(&'static str),

    /// The restaurant cannot be claimed from its current status.
    #[error("restaurant {restaurant_id} is not claimable while {status}")]
    NotClaimable {
        /// Restaurant that was targeted.
        restaurant_id: RestaurantId,
        /// Status observed at claim time.
        status: ReviewStatus,
    },

    /// Evidence cannot be recorded from the restaurant's current status.
    #[error("cannot record evidence for restaurant {restaurant_id} while {status}")]
    EvidenceRejected {
        /// Restaurant that was targeted.
        restaurant_id: RestaurantId,
        /// Status observed when recording.
        status: ReviewStatus,
    },

    /// Administrative status overrides may only reset a review.
    #[error("status of restaurant {restaurant_id} cannot be forced to {requested}")]
    StatusOverrideRejected {
        /// Restaurant that was targeted.
        restaurant_id: RestaurantId,
        /// Requested status.
        requested: ReviewStatus,
    },

    /// The task has already left the given status.
    #[error("task {task_id} is {status}, expected pending")]
    TaskNotPending {
        /// Task that was targeted.
        task_id: TaskId,
        /// Status observed.
        status: TaskStatus,
    },

    /// Persisted fields violate an aggregate invariant.
    #[error("inconsistent persisted {entity}: {reason}")]
    InconsistentRecord {
        /// Aggregate kind.
        entity: &'static str,
        /// Violated invariant.
        reason: String,
    },
}

impl ReviewDomainError {
    /// Returns `true` when the error stems from caller-supplied input rather
    /// than from the lifecycle state of stored records.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::MissingCoordinate(_)
                | Self::NonNumericCoordinate { .. }
                | Self::CoordinateOutOfRange { .. }
                | Self::MissingEvidence(_)
                | Self::UntrustedImageUrl { .. }
                | Self::InvalidImageHost(_)
                | Self::EmptyProfileField(_)
                | Self::EmptyWorkerField(_)
                | Self::StatusOverrideRejected { .. }
        )
    }
}

/// Error returned while parsing review or task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown status: {0}")]
pub struct ParseStatusError(pub String);
