//! Repository port for worker accounts.

use super::ReviewRepositoryResult;
use crate::review::domain::{RestaurantId, Worker, WorkerId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Outcome of a cascading worker deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerRemoval {
    /// Number of tasks deleted with the worker.
    pub removed_tasks: usize,
    /// Restaurants whose open task was deleted and which are claimable again.
    pub released_restaurants: Vec<RestaurantId>,
}

/// Worker persistence contract.
#[async_trait]
pub trait WorkerRepository: Send + Sync {
    /// Stores a newly registered worker.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReviewRepositoryError::DuplicateWorker`] or
    /// [`super::ReviewRepositoryError::DuplicateUsername`] on conflicts.
    async fn store_worker(&self, worker: &Worker) -> ReviewRepositoryResult<()>;

    /// Persists profile changes such as approval.
    ///
    /// The completed-task counter is owned by
    /// [`super::TaskRepository::complete_review`] and is not written.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReviewRepositoryError::WorkerNotFound`] when the
    /// worker does not exist.
    async fn update_worker(&self, worker: &Worker) -> ReviewRepositoryResult<()>;

    /// Finds a worker by identifier.
    async fn find_worker(&self, id: WorkerId) -> ReviewRepositoryResult<Option<Worker>>;

    /// Returns every worker in registration order.
    async fn list_workers(&self) -> ReviewRepositoryResult<Vec<Worker>>;

    /// Deletes a worker and their tasks in one atomic step. Restaurants held
    /// by the worker's open tasks return to `not_started`, stamped with
    /// `released_at`.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReviewRepositoryError::WorkerNotFound`] when the
    /// worker does not exist.
    async fn delete_worker(
        &self,
        id: WorkerId,
        released_at: DateTime<Utc>,
    ) -> ReviewRepositoryResult<WorkerRemoval>;
}
