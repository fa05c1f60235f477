//! Administrative operations over the roster and restaurant listings.
//!
//! Every operation requires an administrator principal. Status overrides go
//! through [`RestaurantReviewState::set_status`], and deletions are single
//! store calls that cascade to dependent tasks.

use super::{
    error::{NotFoundTarget, ReviewServiceError, ReviewServiceResult},
    guard::AuthorizationGuard,
    review_state::{RestaurantReviewState, StatusOverride},
    views::{AssignedTask, RestaurantDetail, attach_restaurants, restaurant_detail},
};
use crate::review::{
    domain::{Principal, Restaurant, RestaurantId, ReviewStatus, Worker, WorkerId},
    ports::{ReviewStore, WorkerRemoval},
};
use mockable::Clock;
use std::sync::Arc;

/// Administrator-only review operations.
#[derive(Clone)]
pub struct ReviewAdminService<S, C>
where
    S: ReviewStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    review_state: RestaurantReviewState<S, C>,
}

impl<S, C> ReviewAdminService<S, C>
where
    S: ReviewStore,
    C: Clock + Send + Sync,
{
    /// Creates a new admin service.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        let review_state = RestaurantReviewState::new(Arc::clone(&store), Arc::clone(&clock));
        Self {
            store,
            clock,
            review_state,
        }
    }

    /// Approves a worker account so it can claim restaurants.
    ///
    /// Approving an already approved account is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::Forbidden`] for non-admin principals and
    /// [`ReviewServiceError::NotFound`] for unknown workers.
    pub async fn approve_worker(
        &self,
        principal: &Principal,
        worker_id: WorkerId,
    ) -> ReviewServiceResult<Worker> {
        AuthorizationGuard::require_admin(principal)?;
        let mut worker = self.find_worker(worker_id).await?;
        if worker.approve(&*self.clock) {
            self.store.update_worker(&worker).await?;
            tracing::info!(
                worker_id = %worker_id,
                admin_id = %principal.worker_id,
                "worker approved"
            );
        }
        Ok(worker)
    }

    /// Lists every worker account.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::Forbidden`] for non-admin principals.
    pub async fn list_workers(&self, principal: &Principal) -> ReviewServiceResult<Vec<Worker>> {
        AuthorizationGuard::require_admin(principal)?;
        Ok(self.store.list_workers().await?)
    }

    /// Lists every task owned by `worker_id`, pending and completed.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::Forbidden`] for non-admin principals and
    /// [`ReviewServiceError::NotFound`] for unknown workers.
    pub async fn list_worker_tasks(
        &self,
        principal: &Principal,
        worker_id: WorkerId,
    ) -> ReviewServiceResult<Vec<AssignedTask>> {
        AuthorizationGuard::require_admin(principal)?;
        self.find_worker(worker_id).await?;
        let tasks = self.store.list_tasks_for_worker(worker_id, None).await?;
        attach_restaurants(&*self.store, tasks).await
    }

    /// Lists every restaurant regardless of status.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::Forbidden`] for non-admin principals.
    pub async fn list_restaurants(
        &self,
        principal: &Principal,
    ) -> ReviewServiceResult<Vec<Restaurant>> {
        AuthorizationGuard::require_admin(principal)?;
        Ok(self.store.list_restaurants().await?)
    }

    /// Returns one restaurant with its reviewer's username.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::Forbidden`] for non-admin principals and
    /// [`ReviewServiceError::NotFound`] for unknown restaurants.
    pub async fn get_restaurant(
        &self,
        principal: &Principal,
        restaurant_id: RestaurantId,
    ) -> ReviewServiceResult<RestaurantDetail> {
        AuthorizationGuard::require_admin(principal)?;
        restaurant_detail(&*self.store, restaurant_id).await
    }

    /// Resets a restaurant's review status.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::Forbidden`] for non-admin principals,
    /// [`ReviewServiceError::NotFound`] for unknown restaurants, and
    /// [`ReviewServiceError::InvalidInput`] for any status other than
    /// `not_started`.
    pub async fn override_restaurant_status(
        &self,
        principal: &Principal,
        restaurant_id: RestaurantId,
        status: ReviewStatus,
    ) -> ReviewServiceResult<StatusOverride> {
        AuthorizationGuard::require_admin(principal)?;
        self.review_state.set_status(restaurant_id, status).await
    }

    /// Deletes a restaurant and every task targeting it, returning the
    /// number of tasks removed.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::Forbidden`] for non-admin principals and
    /// [`ReviewServiceError::NotFound`] for unknown restaurants.
    pub async fn delete_restaurant(
        &self,
        principal: &Principal,
        restaurant_id: RestaurantId,
    ) -> ReviewServiceResult<usize> {
        AuthorizationGuard::require_admin(principal)?;
        let removed_tasks = self.store.delete_restaurant(restaurant_id).await?;
        tracing::info!(
            restaurant_id = %restaurant_id,
            admin_id = %principal.worker_id,
            removed_tasks,
            "restaurant deleted"
        );
        Ok(removed_tasks)
    }

    /// Deletes a worker and their tasks. Restaurants they were holding
    /// become claimable again.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::Forbidden`] for non-admin principals and
    /// [`ReviewServiceError::NotFound`] for unknown workers.
    pub async fn delete_worker(
        &self,
        principal: &Principal,
        worker_id: WorkerId,
    ) -> ReviewServiceResult<WorkerRemoval> {
        AuthorizationGuard::require_admin(principal)?;
        let removal = self
            .store
            .delete_worker(worker_id, self.clock.utc())
            .await?;
        tracing::info!(
            worker_id = %worker_id,
            admin_id = %principal.worker_id,
            removed_tasks = removal.removed_tasks,
            released_restaurants = removal.released_restaurants.len(),
            "worker deleted"
        );
        Ok(removal)
    }

    async fn find_worker(&self, worker_id: WorkerId) -> ReviewServiceResult<Worker> {
        self.store
            .find_worker(worker_id)
            .await?
            .ok_or(ReviewServiceError::NotFound(NotFoundTarget::Worker(worker_id)))
    }
}
