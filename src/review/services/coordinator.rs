//! Task coordinator: the claim and review-submission state machine.
//!
//! A restaurant moves `not_started → pending` when a worker claims it and
//! `pending → completed` when that worker submits evidence. The claim is a
//! single conditional update in the store, so of two racing claims exactly
//! one succeeds. Submission completes the task, records the evidence on the
//! restaurant and bumps the worker's counter in one store call, so a
//! completed task always has its evidence applied and counted exactly once.
//! Replaying a submission for a completed task writes nothing.

use super::{
    error::{NotFoundTarget, ReviewServiceError, ReviewServiceResult},
    guard::AuthorizationGuard,
    review_state::RestaurantReviewState,
    views::{AssignedTask, RestaurantDetail, attach_restaurants, restaurant_detail},
};
use crate::{
    config::ReviewConfig,
    review::{
        domain::{
            EvidenceImages, EvidenceSubmission, GeoPoint, Principal, RankedRestaurant,
            RestaurantId, ReviewDomainError, ReviewStatus, ReviewTask, TaskId, TaskStatus,
            TrustedImageHost, WorkerId, rank_by_distance,
        },
        ports::{ReviewRepositoryError, ReviewStore},
    },
};
use mockable::Clock;
use std::cmp::Reverse;
use std::sync::Arc;

/// Reference position for a nearby-restaurants query.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyRestaurantsQuery {
    origin: Result<GeoPoint, ReviewDomainError>,
}

impl NearbyRestaurantsQuery {
    /// Queries around a numeric position.
    #[must_use]
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            origin: GeoPoint::new(latitude, longitude),
        }
    }

    /// Queries around a position given as raw request parameters.
    ///
    /// Missing or non-numeric values are reported when the query runs.
    #[must_use]
    pub fn from_params(latitude: Option<&str>, longitude: Option<&str>) -> Self {
        Self {
            origin: GeoPoint::parse(latitude, longitude),
        }
    }

    /// Returns the validated reference point.
    ///
    /// # Errors
    ///
    /// Returns the coordinate validation error captured at construction.
    pub fn origin(&self) -> Result<GeoPoint, ReviewDomainError> {
        self.origin.clone()
    }
}

/// Outcome of a successful review submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The task was completed by this call.
    Completed(ReviewTask),
    /// The task had already been completed; nothing was counted again.
    AlreadyCompleted(ReviewTask),
}

impl SubmissionOutcome {
    /// Returns the completed task.
    #[must_use]
    pub const fn task(&self) -> &ReviewTask {
        match self {
            Self::Completed(task) | Self::AlreadyCompleted(task) => task,
        }
    }
}

/// Assignment state machine over restaurants, tasks, and workers.
#[derive(Clone)]
pub struct TaskCoordinator<S, C>
where
    S: ReviewStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    review_state: RestaurantReviewState<S, C>,
    image_host: TrustedImageHost,
    claimable_limit: usize,
}

impl<S, C> TaskCoordinator<S, C>
where
    S: ReviewStore,
    C: Clock + Send + Sync,
{
    /// Creates a coordinator over `store`.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>, config: ReviewConfig) -> Self {
        let review_state = RestaurantReviewState::new(Arc::clone(&store), Arc::clone(&clock));
        Self {
            store,
            clock,
            review_state,
            image_host: config.trusted_image_host,
            claimable_limit: config.claimable_limit,
        }
    }

    /// Returns the restaurant review state this coordinator drives.
    #[must_use]
    pub const fn review_state(&self) -> &RestaurantReviewState<S, C> {
        &self.review_state
    }

    /// Lists unclaimed restaurants nearest-first from the query position.
    ///
    /// At most the configured claimable limit of candidates is ranked.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::InvalidInput`] for missing or invalid
    /// coordinates.
    pub async fn list_claimable_restaurants(
        &self,
        query: &NearbyRestaurantsQuery,
    ) -> ReviewServiceResult<Vec<RankedRestaurant>> {
        let origin = query.origin()?;
        let candidates = self
            .store
            .list_restaurants_by_status(ReviewStatus::NotStarted, self.claimable_limit)
            .await?;
        tracing::debug!(
            latitude = origin.latitude(),
            longitude = origin.longitude(),
            candidates = candidates.len(),
            "ranking claimable restaurants"
        );
        Ok(rank_by_distance(origin, candidates))
    }

    /// Claims `restaurant_id` for the principal, creating a pending task.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::Forbidden`] for unapproved workers,
    /// [`ReviewServiceError::NotFound`] for unknown restaurants, and
    /// [`ReviewServiceError::AlreadyAssigned`] when the restaurant is not
    /// `not_started`. Callers should re-query and pick another candidate on
    /// `AlreadyAssigned`.
    pub async fn claim_restaurant(
        &self,
        principal: &Principal,
        restaurant_id: RestaurantId,
    ) -> ReviewServiceResult<ReviewTask> {
        AuthorizationGuard::require_approved_worker(principal)?;
        let restaurant = self.review_state.get_by_id(restaurant_id).await?;
        if !restaurant.is_claimable() {
            tracing::warn!(
                restaurant_id = %restaurant_id,
                worker_id = %principal.worker_id,
                status = %restaurant.review_status(),
                "claim rejected"
            );
            return Err(ReviewServiceError::AlreadyAssigned {
                restaurant_id,
                status: restaurant.review_status(),
            });
        }

        let task = ReviewTask::claim(principal.worker_id, restaurant_id, &*self.clock);
        if let Err(err) = self.store.claim(&task).await {
            if matches!(err, ReviewRepositoryError::AlreadyAssigned { .. }) {
                tracing::warn!(
                    restaurant_id = %restaurant_id,
                    worker_id = %principal.worker_id,
                    "claim lost to a concurrent claim"
                );
            }
            return Err(err.into());
        }

        tracing::info!(
            restaurant_id = %restaurant_id,
            worker_id = %principal.worker_id,
            task_id = %task.id(),
            "restaurant claimed"
        );
        Ok(task)
    }

    /// Submits the review evidence for `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::InvalidInput`] for missing or untrusted
    /// images, [`ReviewServiceError::NotFound`] for unknown tasks,
    /// [`ReviewServiceError::Forbidden`] when the principal is unapproved or
    /// does not own the task, and [`ReviewServiceError::DataIntegrity`] when
    /// the task's restaurant no longer exists or is not `pending`.
    pub async fn submit_task_review(
        &self,
        principal: &Principal,
        task_id: TaskId,
        submission: &EvidenceSubmission,
    ) -> ReviewServiceResult<SubmissionOutcome> {
        AuthorizationGuard::require_approved_worker(principal)?;
        let images = EvidenceImages::validate(submission, &self.image_host)?;

        let mut task = self.find_task(task_id).await?;
        if let Err(err) = AuthorizationGuard::authorize(principal.worker_id, &task) {
            tracing::warn!(
                task_id = %task_id,
                worker_id = %principal.worker_id,
                "review submission refused"
            );
            return Err(err.into());
        }

        let restaurant_id = task.restaurant_id();
        if self.store.find_restaurant(restaurant_id).await?.is_none() {
            tracing::warn!(
                task_id = %task_id,
                restaurant_id = %restaurant_id,
                "task references a missing restaurant"
            );
            return Err(ReviewServiceError::DataIntegrity(format!(
                "task {task_id} references missing restaurant {restaurant_id}"
            )));
        }

        if task.is_completed() {
            tracing::debug!(task_id = %task_id, "task already completed");
            return Ok(SubmissionOutcome::AlreadyCompleted(task));
        }

        task.complete(images, &*self.clock)?;
        let tasks_completed = match self.store.complete_review(&task).await {
            Ok(counter) => counter,
            Err(ReviewRepositoryError::TaskAlreadyCompleted(_)) => {
                let stored = self.find_task(task_id).await?;
                return Ok(SubmissionOutcome::AlreadyCompleted(stored));
            }
            Err(err) => {
                if let ReviewRepositoryError::ReviewNotOpen { status, .. } = &err {
                    tracing::warn!(
                        task_id = %task_id,
                        restaurant_id = %restaurant_id,
                        status = %status,
                        "open task targets a restaurant that is not pending"
                    );
                }
                return Err(err.into());
            }
        };

        tracing::info!(
            task_id = %task_id,
            restaurant_id = %restaurant_id,
            worker_id = %principal.worker_id,
            tasks_completed,
            "review submitted"
        );
        Ok(SubmissionOutcome::Completed(task))
    }

    /// Lists the worker's open tasks with restaurant summaries.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::DataIntegrity`] when a task's restaurant
    /// is missing, or [`ReviewServiceError::Transient`] on storage failure.
    pub async fn list_pending_tasks(
        &self,
        worker_id: WorkerId,
    ) -> ReviewServiceResult<Vec<AssignedTask>> {
        let tasks = self
            .store
            .list_tasks_for_worker(worker_id, Some(TaskStatus::Pending))
            .await?;
        attach_restaurants(&*self.store, tasks).await
    }

    /// Lists the worker's completed tasks, newest review first.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::DataIntegrity`] when a task's restaurant
    /// is missing, or [`ReviewServiceError::Transient`] on storage failure.
    pub async fn list_completed_tasks(
        &self,
        worker_id: WorkerId,
    ) -> ReviewServiceResult<Vec<AssignedTask>> {
        let mut tasks = self
            .store
            .list_tasks_for_worker(worker_id, Some(TaskStatus::Completed))
            .await?;
        tasks.sort_by_key(|task| Reverse(task.review_date()));
        attach_restaurants(&*self.store, tasks).await
    }

    /// Returns a restaurant's public review state.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::NotFound`] when it does not exist.
    pub async fn get_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> ReviewServiceResult<RestaurantDetail> {
        restaurant_detail(&*self.store, restaurant_id).await
    }

    async fn find_task(&self, task_id: TaskId) -> ReviewServiceResult<ReviewTask> {
        self.store
            .find_task(task_id)
            .await?
            .ok_or(ReviewServiceError::NotFound(NotFoundTarget::Task(task_id)))
    }
}
