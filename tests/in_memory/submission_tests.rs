//! Review submission: completion, idempotent replays, and ownership.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::helpers::{ReviewSystem, evidence, system};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fieldreview::{
    config::ReviewConfig,
    review::{
        adapters::memory::InMemoryReviewStore,
        domain::{
            EvidenceImages, EvidenceSubmission, Restaurant, RestaurantId, ReviewStatus,
            ReviewTask, TaskId, TaskStatus, TrustedImageHost, Worker, WorkerId,
        },
        ports::{
            RestaurantRepository, ReviewRepositoryError, ReviewRepositoryResult, TaskRepository,
            WorkerRemoval, WorkerRepository,
        },
        services::{ReviewErrorKind, SubmissionOutcome, TaskCoordinator},
    },
};
use mockable::DefaultClock;
use rstest::rstest;

/// When the one-shot failure of [`FlakyCompletionStore`] fires.
#[derive(Debug, Clone, Copy)]
enum CompletionFault {
    /// The store refuses before writing anything.
    BeforeCommit,
    /// The store commits, then the caller sees a connection error.
    AfterCommit,
}

/// In-memory store whose first `complete_review` call fails.
struct FlakyCompletionStore {
    inner: InMemoryReviewStore,
    fault: CompletionFault,
    armed: AtomicBool,
}

impl FlakyCompletionStore {
    const fn new(inner: InMemoryReviewStore, fault: CompletionFault) -> Self {
        Self {
            inner,
            fault,
            armed: AtomicBool::new(true),
        }
    }
}

fn connection_reset() -> ReviewRepositoryError {
    ReviewRepositoryError::persistence(std::io::Error::other("connection reset by peer"))
}

#[async_trait]
impl RestaurantRepository for FlakyCompletionStore {
    async fn store_restaurant(&self, restaurant: &Restaurant) -> ReviewRepositoryResult<()> {
        self.inner.store_restaurant(restaurant).await
    }

    async fn record_review(&self, restaurant: &Restaurant) -> ReviewRepositoryResult<()> {
        self.inner.record_review(restaurant).await
    }

    async fn find_restaurant(
        &self,
        id: RestaurantId,
    ) -> ReviewRepositoryResult<Option<Restaurant>> {
        self.inner.find_restaurant(id).await
    }

    async fn list_restaurants_by_status(
        &self,
        status: ReviewStatus,
        limit: usize,
    ) -> ReviewRepositoryResult<Vec<Restaurant>> {
        self.inner.list_restaurants_by_status(status, limit).await
    }

    async fn list_restaurants(&self) -> ReviewRepositoryResult<Vec<Restaurant>> {
        self.inner.list_restaurants().await
    }

    async fn reset_review(&self, restaurant: &Restaurant) -> ReviewRepositoryResult<Vec<TaskId>> {
        self.inner.reset_review(restaurant).await
    }

    async fn delete_restaurant(&self, id: RestaurantId) -> ReviewRepositoryResult<usize> {
        self.inner.delete_restaurant(id).await
    }
}

#[async_trait]
impl TaskRepository for FlakyCompletionStore {
    async fn claim(&self, task: &ReviewTask) -> ReviewRepositoryResult<()> {
        self.inner.claim(task).await
    }

    async fn complete_review(&self, task: &ReviewTask) -> ReviewRepositoryResult<u64> {
        if !self.armed.swap(false, Ordering::SeqCst) {
            return self.inner.complete_review(task).await;
        }
        match self.fault {
            CompletionFault::BeforeCommit => Err(connection_reset()),
            CompletionFault::AfterCommit => {
                self.inner.complete_review(task).await?;
                Err(connection_reset())
            }
        }
    }

    async fn find_task(&self, id: TaskId) -> ReviewRepositoryResult<Option<ReviewTask>> {
        self.inner.find_task(id).await
    }

    async fn list_tasks_for_worker(
        &self,
        worker_id: WorkerId,
        status: Option<TaskStatus>,
    ) -> ReviewRepositoryResult<Vec<ReviewTask>> {
        self.inner.list_tasks_for_worker(worker_id, status).await
    }
}

#[async_trait]
impl WorkerRepository for FlakyCompletionStore {
    async fn store_worker(&self, worker: &Worker) -> ReviewRepositoryResult<()> {
        self.inner.store_worker(worker).await
    }

    async fn update_worker(&self, worker: &Worker) -> ReviewRepositoryResult<()> {
        self.inner.update_worker(worker).await
    }

    async fn find_worker(&self, id: WorkerId) -> ReviewRepositoryResult<Option<Worker>> {
        self.inner.find_worker(id).await
    }

    async fn list_workers(&self) -> ReviewRepositoryResult<Vec<Worker>> {
        self.inner.list_workers().await
    }

    async fn delete_worker(
        &self,
        id: WorkerId,
        released_at: DateTime<Utc>,
    ) -> ReviewRepositoryResult<WorkerRemoval> {
        self.inner.delete_worker(id, released_at).await
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn claim_then_submit_completes_everything(system: ReviewSystem) -> eyre::Result<()> {
    let restaurant = system.add_restaurant("Vidyarthi Bhavan", 12.945, 77.571).await?;
    let worker = system.add_worker("asha").await?;
    let task = system
        .coordinator
        .claim_restaurant(&worker, restaurant.id())
        .await?;

    let outcome = system
        .coordinator
        .submit_task_review(&worker, task.id(), &evidence("vb"))
        .await?;

    eyre::ensure!(
        matches!(outcome, SubmissionOutcome::Completed(_)),
        "first submission should complete the task"
    );
    let completed = outcome.task();
    eyre::ensure!(completed.status() == TaskStatus::Completed, "task should be completed");
    eyre::ensure!(completed.review_date().is_some(), "review date should be set");

    let detail = system.coordinator.get_restaurant(restaurant.id()).await?;
    eyre::ensure!(
        detail.restaurant.review_status() == ReviewStatus::Completed,
        "restaurant should be completed"
    );
    eyre::ensure!(
        detail.restaurant.reviewed_by() == Some(worker.worker_id),
        "reviewer should be recorded"
    );
    eyre::ensure!(
        detail.restaurant.evidence() == completed.evidence(),
        "restaurant and task evidence should match"
    );
    eyre::ensure!(system.tasks_completed(&worker).await? == 1, "counter should be 1");

    let history = system.coordinator.list_completed_tasks(worker.worker_id).await?;
    eyre::ensure!(history.len() == 1, "one completed task expected");
    let pending = system.coordinator.list_pending_tasks(worker.worker_id).await?;
    eyre::ensure!(pending.is_empty(), "no pending tasks expected");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_submissions_count_once(system: ReviewSystem) -> eyre::Result<()> {
    let restaurant = system.add_restaurant("CTR", 13.0, 77.57).await?;
    let worker = system.add_worker("asha").await?;
    let task = system
        .coordinator
        .claim_restaurant(&worker, restaurant.id())
        .await?;

    for _ in 0..3 {
        system
            .coordinator
            .submit_task_review(&worker, task.id(), &evidence("ctr"))
            .await?;
    }

    eyre::ensure!(system.tasks_completed(&worker).await? == 1, "counter should stay 1");
    let detail = system.coordinator.get_restaurant(restaurant.id()).await?;
    eyre::ensure!(
        detail.restaurant.review_history().len() == 3,
        "history should hold one set of images"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_image_leaves_task_pending(system: ReviewSystem) -> eyre::Result<()> {
    let restaurant = system.add_restaurant("Brahmin's", 12.95, 77.57).await?;
    let worker = system.add_worker("asha").await?;
    let task = system
        .coordinator
        .claim_restaurant(&worker, restaurant.id())
        .await?;
    let incomplete = EvidenceSubmission {
        menu: None,
        ..evidence("brahmins")
    };

    let result = system
        .coordinator
        .submit_task_review(&worker, task.id(), &incomplete)
        .await;

    eyre::ensure!(
        result.as_ref().is_err_and(|err| err.kind() == ReviewErrorKind::InvalidInput),
        "expected InvalidInput, got {result:?}"
    );
    let pending = system.coordinator.list_pending_tasks(worker.worker_id).await?;
    eyre::ensure!(pending.len() == 1, "task should remain pending");
    eyre::ensure!(system.tasks_completed(&worker).await? == 0, "counter should stay 0");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn other_worker_cannot_submit(system: ReviewSystem) -> eyre::Result<()> {
    let restaurant = system.add_restaurant("Airlines", 12.97, 77.6).await?;
    let owner = system.add_worker("asha").await?;
    let intruder = system.add_worker("ravi").await?;
    let task = system
        .coordinator
        .claim_restaurant(&owner, restaurant.id())
        .await?;

    let result = system
        .coordinator
        .submit_task_review(&intruder, task.id(), &evidence("airlines"))
        .await;

    eyre::ensure!(
        result.as_ref().is_err_and(|err| err.kind() == ReviewErrorKind::Forbidden),
        "expected Forbidden, got {result:?}"
    );
    let detail = system.coordinator.get_restaurant(restaurant.id()).await?;
    eyre::ensure!(
        detail.restaurant.review_status() == ReviewStatus::Pending,
        "restaurant should stay pending"
    );
    eyre::ensure!(system.tasks_completed(&intruder).await? == 0, "intruder counter unchanged");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_resubmission_after_reset_leaves_the_new_claim_alone(
    system: ReviewSystem,
) -> eyre::Result<()> {
    let restaurant = system.add_restaurant("Rameshwaram Cafe", 12.98, 77.64).await?;
    let first = system.add_worker("asha").await?;
    let second = system.add_worker("ravi").await?;
    let stale = system
        .coordinator
        .claim_restaurant(&first, restaurant.id())
        .await?;
    system
        .coordinator
        .submit_task_review(&first, stale.id(), &evidence("first-visit"))
        .await?;
    system
        .admin
        .override_restaurant_status(
            &system.admin_principal,
            restaurant.id(),
            ReviewStatus::NotStarted,
        )
        .await?;
    let fresh = system
        .coordinator
        .claim_restaurant(&second, restaurant.id())
        .await?;

    let replay = system
        .coordinator
        .submit_task_review(&first, stale.id(), &evidence("first-visit"))
        .await?;

    eyre::ensure!(
        matches!(replay, SubmissionOutcome::AlreadyCompleted(_)),
        "stale resubmission should be a no-op"
    );
    let detail = system.coordinator.get_restaurant(restaurant.id()).await?;
    eyre::ensure!(
        detail.restaurant.review_status() == ReviewStatus::Pending,
        "restaurant should stay claimed by the second worker"
    );
    eyre::ensure!(
        detail.restaurant.reviewed_by().is_none(),
        "stale resubmission must not set a reviewer"
    );

    let outcome = system
        .coordinator
        .submit_task_review(&second, fresh.id(), &evidence("second-visit"))
        .await?;
    eyre::ensure!(
        matches!(outcome, SubmissionOutcome::Completed(_)),
        "second worker should complete the review"
    );
    let detail = system.coordinator.get_restaurant(restaurant.id()).await?;
    eyre::ensure!(
        detail.restaurant.reviewed_by() == Some(second.worker_id),
        "second worker should be the reviewer"
    );
    eyre::ensure!(system.tasks_completed(&first).await? == 1, "first counter should be 1");
    eyre::ensure!(system.tasks_completed(&second).await? == 1, "second counter should be 1");
    Ok(())
}

#[rstest]
#[case::before_commit(CompletionFault::BeforeCommit)]
#[case::after_commit(CompletionFault::AfterCommit)]
#[tokio::test(flavor = "multi_thread")]
async fn retried_submission_counts_exactly_once(
    system: ReviewSystem,
    #[case] fault: CompletionFault,
) -> eyre::Result<()> {
    let restaurant = system.add_restaurant("Taaza Thindi", 12.92, 77.58).await?;
    let worker = system.add_worker("asha").await?;
    let flaky = Arc::new(FlakyCompletionStore::new((*system.store).clone(), fault));
    let coordinator = TaskCoordinator::new(flaky, Arc::new(DefaultClock), ReviewConfig::default());
    let task = coordinator.claim_restaurant(&worker, restaurant.id()).await?;

    let first = coordinator
        .submit_task_review(&worker, task.id(), &evidence("taaza"))
        .await;
    eyre::ensure!(
        first.as_ref().is_err_and(|err| err.is_retryable()),
        "first attempt should fail transiently, got {first:?}"
    );
    coordinator
        .submit_task_review(&worker, task.id(), &evidence("taaza"))
        .await?;

    let completed = system.coordinator.list_completed_tasks(worker.worker_id).await?;
    eyre::ensure!(completed.len() == 1, "one completed task expected");
    eyre::ensure!(
        system.tasks_completed(&worker).await? == 1,
        "counter should match the completed task count"
    );
    let detail = system.coordinator.get_restaurant(restaurant.id()).await?;
    eyre::ensure!(
        detail.restaurant.review_status() == ReviewStatus::Completed,
        "restaurant should be completed"
    );
    eyre::ensure!(
        detail.restaurant.reviewed_by() == Some(worker.worker_id),
        "reviewer should be recorded"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completion_for_an_unknown_worker_writes_nothing(
    system: ReviewSystem,
) -> eyre::Result<()> {
    let restaurant = system.add_restaurant("Veena Stores", 13.0, 77.56).await?;
    let mut task = ReviewTask::claim(WorkerId::new(), restaurant.id(), &DefaultClock);
    system.store.claim(&task).await?;
    let images = EvidenceImages::validate(&evidence("veena"), &TrustedImageHost::default())?;
    task.complete(images, &DefaultClock)?;

    let result = system.store.complete_review(&task).await;

    eyre::ensure!(
        matches!(result, Err(ReviewRepositoryError::WorkerNotFound(id)) if id == task.worker_id()),
        "expected WorkerNotFound, got {result:?}"
    );
    let stored = system
        .store
        .find_task(task.id())
        .await?
        .ok_or_else(|| eyre::eyre!("task should still exist"))?;
    eyre::ensure!(stored.status() == TaskStatus::Pending, "task should stay pending");
    let detail = system.coordinator.get_restaurant(restaurant.id()).await?;
    eyre::ensure!(
        detail.restaurant.review_status() == ReviewStatus::Pending,
        "restaurant should stay pending"
    );
    eyre::ensure!(detail.restaurant.evidence().is_none(), "no evidence should land");
    Ok(())
}
