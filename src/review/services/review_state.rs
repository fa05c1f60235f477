//! Restaurant review state: registration, lookup, evidence, and overrides.

use super::error::{NotFoundTarget, ReviewServiceError, ReviewServiceResult};
use crate::review::{
    domain::{
        EvidenceImages, GeoPoint, Restaurant, RestaurantId, RestaurantProfile, ReviewStatus,
        TaskId, WorkerId,
    },
    ports::RestaurantRepository,
};
use mockable::Clock;
use std::sync::Arc;

/// Request payload for registering a restaurant listing.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterRestaurantRequest {
    name: String,
    phone: String,
    address: String,
    latitude: f64,
    longitude: f64,
}

impl RegisterRestaurantRequest {
    /// Creates a request with every required field.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            address: address.into(),
            latitude,
            longitude,
        }
    }
}

/// Result of an administrative status override.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusOverride {
    /// Restaurant after the override.
    pub restaurant: Restaurant,
    /// Whether the stored status changed.
    pub changed: bool,
    /// Open tasks removed so the restaurant is claimable again.
    pub released_tasks: Vec<TaskId>,
}

/// Per-restaurant review state driven by the task coordinator.
#[derive(Clone)]
pub struct RestaurantReviewState<R, C>
where
    R: RestaurantRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> RestaurantReviewState<R, C>
where
    R: RestaurantRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new review state service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Registers a new, unclaimed restaurant.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::InvalidInput`] for blank profile fields
    /// or invalid coordinates.
    pub async fn register_restaurant(
        &self,
        request: RegisterRestaurantRequest,
    ) -> ReviewServiceResult<Restaurant> {
        let RegisterRestaurantRequest {
            name,
            phone,
            address,
            latitude,
            longitude,
        } = request;

        let profile = RestaurantProfile::new(name, phone, address)?;
        let location = GeoPoint::new(latitude, longitude)?;
        let restaurant = Restaurant::register(profile, location, &*self.clock);
        self.repository.store_restaurant(&restaurant).await?;
        tracing::info!(restaurant_id = %restaurant.id(), "restaurant registered");
        Ok(restaurant)
    }

    /// Loads a restaurant.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::NotFound`] when it does not exist.
    pub async fn get_by_id(&self, id: RestaurantId) -> ReviewServiceResult<Restaurant> {
        self.repository
            .find_restaurant(id)
            .await?
            .ok_or(ReviewServiceError::NotFound(NotFoundTarget::Restaurant(id)))
    }

    /// Completes a restaurant's review with validated `images`.
    ///
    /// Replaying the same evidence and reviewer is a no-op. The write only
    /// lands while the stored restaurant is still `pending`, so a reset
    /// racing this call wins.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::NotFound`] when the restaurant does not
    /// exist and [`ReviewServiceError::DataIntegrity`] when its status does
    /// not allow completion. Nothing is written on failure.
    pub async fn record_evidence(
        &self,
        id: RestaurantId,
        images: EvidenceImages,
        reviewer: WorkerId,
    ) -> ReviewServiceResult<Restaurant> {
        let mut restaurant = self.get_by_id(id).await?;
        let changed = restaurant.record_evidence(images, reviewer, &*self.clock)?;
        if changed {
            self.repository.record_review(&restaurant).await?;
            tracing::info!(restaurant_id = %id, reviewer = %reviewer, "review evidence recorded");
        }
        Ok(restaurant)
    }

    /// Forces a restaurant's status.
    ///
    /// Only a reset to `not_started` is accepted. The reset clears the
    /// evidence and reviewer and removes any open task in the same atomic
    /// store call, so a later claim cannot create a second open task.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::NotFound`] when the restaurant does not
    /// exist and [`ReviewServiceError::InvalidInput`] for `pending` or
    /// `completed`.
    pub async fn set_status(
        &self,
        id: RestaurantId,
        status: ReviewStatus,
    ) -> ReviewServiceResult<StatusOverride> {
        let mut restaurant = self.get_by_id(id).await?;
        let previous = restaurant.review_status();
        let changed = restaurant.force_status(status, &*self.clock)?;
        if !changed {
            return Ok(StatusOverride {
                restaurant,
                changed,
                released_tasks: Vec::new(),
            });
        }

        let released_tasks = self.repository.reset_review(&restaurant).await?;
        tracing::warn!(
            restaurant_id = %id,
            from = %previous,
            to = %status,
            released = released_tasks.len(),
            "restaurant status overridden"
        );
        Ok(StatusOverride {
            restaurant,
            changed,
            released_tasks,
        })
    }
}
