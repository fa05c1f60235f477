//! Repository port for review tasks, including the atomic claim primitive.

use super::ReviewRepositoryResult;
use crate::review::domain::{ReviewTask, TaskId, TaskStatus, WorkerId};
use async_trait::async_trait;

/// Review task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Atomically claims the task's restaurant and stores the task.
    ///
    /// Implementations must perform a single conditional update that moves
    /// the restaurant from `not_started` to `pending` and insert the task in
    /// the same atomic step. A plain read followed by an unconditional write
    /// is not an acceptable implementation.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReviewRepositoryError::RestaurantNotFound`] when the
    /// restaurant does not exist and
    /// [`super::ReviewRepositoryError::AlreadyAssigned`] when it is not
    /// `not_started` at the moment of the update.
    async fn claim(&self, task: &ReviewTask) -> ReviewRepositoryResult<()>;

    /// Completes a review in one atomic step and returns the owner's new
    /// completed-task counter.
    ///
    /// `task` must already carry its evidence and completion time. The
    /// stored task moves to `completed` only while it is still `pending`;
    /// in the same step its restaurant takes the evidence with the task
    /// owner as reviewer (only while the restaurant is `pending`) and the
    /// owner's counter is incremented. Either every write lands or none
    /// does.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReviewRepositoryError::TaskNotFound`],
    /// [`super::ReviewRepositoryError::RestaurantNotFound`] or
    /// [`super::ReviewRepositoryError::WorkerNotFound`] for missing records,
    /// [`super::ReviewRepositoryError::TaskAlreadyCompleted`] when another
    /// submission completed the task first, and
    /// [`super::ReviewRepositoryError::ReviewNotOpen`] when the restaurant
    /// is not `pending`.
    async fn complete_review(&self, task: &ReviewTask) -> ReviewRepositoryResult<u64>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_task(&self, id: TaskId) -> ReviewRepositoryResult<Option<ReviewTask>>;

    /// Returns the worker's tasks, optionally filtered by status, in
    /// creation order.
    async fn list_tasks_for_worker(
        &self,
        worker_id: WorkerId,
        status: Option<TaskStatus>,
    ) -> ReviewRepositoryResult<Vec<ReviewTask>>;
}
