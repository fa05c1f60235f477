//! Review task aggregate: one worker's claim on one restaurant.

use super::{EvidenceImages, ParseStatusError, RestaurantId, ReviewDomainError, TaskId, WorkerId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// The worker holds the claim and has not submitted evidence yet.
    Pending,
    /// Evidence was submitted. Terminal.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseStatusError(value.to_owned())),
        }
    }
}

/// Review task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewTask {
    id: TaskId,
    worker_id: WorkerId,
    restaurant_id: RestaurantId,
    status: TaskStatus,
    review_date: Option<DateTime<Utc>>,
    evidence: Option<EvidenceImages>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted identifier.
    pub id: TaskId,
    /// Owning worker.
    pub worker_id: WorkerId,
    /// Target restaurant.
    pub restaurant_id: RestaurantId,
    /// Persisted status.
    pub status: TaskStatus,
    /// Completion timestamp, if completed.
    pub review_date: Option<DateTime<Utc>>,
    /// Submitted evidence, if completed.
    pub evidence: Option<EvidenceImages>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl ReviewTask {
    /// Creates the pending task recording `worker_id`'s claim on
    /// `restaurant_id`.
    #[must_use]
    pub fn claim(worker_id: WorkerId, restaurant_id: RestaurantId, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            worker_id,
            restaurant_id,
            status: TaskStatus::Pending,
            review_date: None,
            evidence: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::InconsistentRecord`] when a completed
    /// task lacks its review date or evidence, or a pending task has either.
    pub fn from_persisted(data: PersistedTaskData) -> Result<Self, ReviewDomainError> {
        let has_review = data.review_date.is_some() && data.evidence.is_some();
        let has_any_review = data.review_date.is_some() || data.evidence.is_some();
        let consistent = match data.status {
            TaskStatus::Completed => has_review,
            TaskStatus::Pending => !has_any_review,
        };
        if !consistent {
            return Err(ReviewDomainError::InconsistentRecord {
                entity: "task",
                reason: format!(
                    "task {} is {} but review date/evidence presence is {}/{}",
                    data.id,
                    data.status,
                    data.review_date.is_some(),
                    data.evidence.is_some()
                ),
            });
        }

        Ok(Self {
            id: data.id,
            worker_id: data.worker_id,
            restaurant_id: data.restaurant_id,
            status: data.status,
            review_date: data.review_date,
            evidence: data.evidence,
            created_at: data.created_at,
            updated_at: data.updated_at,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning worker.
    #[must_use]
    pub const fn worker_id(&self) -> WorkerId {
        self.worker_id
    }

    /// Returns the target restaurant.
    #[must_use]
    pub const fn restaurant_id(&self) -> RestaurantId {
        self.restaurant_id
    }

    /// Returns the task status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns when the review was submitted, if it has been.
    #[must_use]
    pub const fn review_date(&self) -> Option<DateTime<Utc>> {
        self.review_date
    }

    /// Returns the submitted evidence, if any.
    #[must_use]
    pub const fn evidence(&self) -> Option<&EvidenceImages> {
        self.evidence.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` once evidence has been submitted.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Completes the task with the submitted `images`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::TaskNotPending`] when the task was
    /// already completed.
    pub fn complete(
        &mut self,
        images: EvidenceImages,
        clock: &impl Clock,
    ) -> Result<(), ReviewDomainError> {
        if self.status != TaskStatus::Pending {
            return Err(ReviewDomainError::TaskNotPending {
                task_id: self.id,
                status: self.status,
            });
        }
        let timestamp = clock.utc();
        self.status = TaskStatus::Completed;
        self.review_date = Some(timestamp);
        self.evidence = Some(images);
        self.updated_at = timestamp;
        Ok(())
    }
}
