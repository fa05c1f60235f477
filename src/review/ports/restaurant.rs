//! Repository port for restaurant review state.

use super::ReviewRepositoryResult;
use crate::review::domain::{Restaurant, RestaurantId, ReviewStatus, TaskId};
use async_trait::async_trait;

/// Restaurant persistence contract.
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    /// Stores a newly registered restaurant.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReviewRepositoryError::DuplicateRestaurant`] when the
    /// identifier already exists.
    async fn store_restaurant(&self, restaurant: &Restaurant) -> ReviewRepositoryResult<()>;

    /// Saves a restaurant whose review was just recorded.
    ///
    /// The write is conditional on the stored restaurant still being
    /// `pending`, so a reset that lands after the caller's read is never
    /// overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReviewRepositoryError::RestaurantNotFound`] when the
    /// restaurant does not exist and
    /// [`super::ReviewRepositoryError::ReviewNotOpen`] when it is no longer
    /// `pending`.
    async fn record_review(&self, restaurant: &Restaurant) -> ReviewRepositoryResult<()>;

    /// Finds a restaurant by identifier.
    ///
    /// Returns `None` when the restaurant does not exist.
    async fn find_restaurant(&self, id: RestaurantId) -> ReviewRepositoryResult<Option<Restaurant>>;

    /// Returns at most `limit` restaurants in `status`, in registration
    /// order.
    async fn list_restaurants_by_status(
        &self,
        status: ReviewStatus,
        limit: usize,
    ) -> ReviewRepositoryResult<Vec<Restaurant>>;

    /// Returns every restaurant in registration order.
    async fn list_restaurants(&self) -> ReviewRepositoryResult<Vec<Restaurant>>;

    /// Saves a reset restaurant and removes its open task in one atomic step,
    /// returning the removed task identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReviewRepositoryError::RestaurantNotFound`] when the
    /// restaurant does not exist.
    async fn reset_review(&self, restaurant: &Restaurant) -> ReviewRepositoryResult<Vec<TaskId>>;

    /// Deletes a restaurant together with every task targeting it,
    /// returning how many tasks were removed.
    ///
    /// # Errors
    ///
    /// Returns [`super::ReviewRepositoryError::RestaurantNotFound`] when the
    /// restaurant does not exist.
    async fn delete_restaurant(&self, id: RestaurantId) -> ReviewRepositoryResult<usize>;
}
