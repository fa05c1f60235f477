//! Shared fixtures for in-memory review integration tests.

use std::sync::Arc;

use fieldreview::{
    config::ReviewConfig,
    review::{
        adapters::memory::InMemoryReviewStore,
        domain::{EvidenceSubmission, Principal, Restaurant, WorkerId},
        services::{
            RegisterRestaurantRequest, RegisterWorkerRequest, ReviewAdminService,
            TaskCoordinator, WorkerRoster,
        },
    },
};
use mockable::DefaultClock;
use rstest::fixture;

/// Coordinator type exercised by the integration tests.
pub type Coordinator = TaskCoordinator<InMemoryReviewStore, DefaultClock>;

/// Services wired over one shared in-memory store.
pub struct ReviewSystem {
    pub store: Arc<InMemoryReviewStore>,
    pub coordinator: Coordinator,
    pub admin: ReviewAdminService<InMemoryReviewStore, DefaultClock>,
    pub roster: WorkerRoster<InMemoryReviewStore, DefaultClock>,
    pub admin_principal: Principal,
}

impl ReviewSystem {
    /// Registers a restaurant at the given position.
    ///
    /// # Errors
    ///
    /// Returns an error if registration fails.
    pub async fn add_restaurant(
        &self,
        name: &str,
        latitude: f64,
        longitude: f64,
    ) -> eyre::Result<Restaurant> {
        let restaurant = self
            .coordinator
            .review_state()
            .register_restaurant(RegisterRestaurantRequest::new(
                name,
                "+91 80 4000 0000",
                "Indiranagar, Bengaluru",
                latitude,
                longitude,
            ))
            .await?;
        Ok(restaurant)
    }

    /// Registers and approves a worker.
    ///
    /// # Errors
    ///
    /// Returns an error if registration or approval fails.
    pub async fn add_worker(&self, username: &str) -> eyre::Result<Principal> {
        let worker = self
            .roster
            .register_worker(RegisterWorkerRequest::new(username, username))
            .await?;
        let approved = self
            .admin
            .approve_worker(&self.admin_principal, worker.id())
            .await?;
        Ok(approved.principal())
    }

    /// Returns a worker's completed-task counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker cannot be loaded.
    pub async fn tasks_completed(&self, principal: &Principal) -> eyre::Result<u64> {
        let worker = self
            .roster
            .get_worker(principal.worker_id)
            .await?;
        Ok(worker.tasks_completed())
    }
}

/// Builds a review system acting for an administrator principal.
#[fixture]
pub fn system() -> ReviewSystem {
    let store = Arc::new(InMemoryReviewStore::new());
    let clock = Arc::new(DefaultClock);
    ReviewSystem {
        coordinator: TaskCoordinator::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            ReviewConfig::default(),
        ),
        admin: ReviewAdminService::new(Arc::clone(&store), Arc::clone(&clock)),
        roster: WorkerRoster::new(Arc::clone(&store), clock),
        store,
        admin_principal: Principal::admin(WorkerId::new()),
    }
}

/// Evidence URLs hosted by the default trusted image store.
#[must_use]
pub fn evidence(tag: &str) -> EvidenceSubmission {
    EvidenceSubmission::new(
        format!("https://res.cloudinary.com/fieldreview/{tag}/signage.jpg"),
        format!("https://res.cloudinary.com/fieldreview/{tag}/menu.jpg"),
        format!("https://res.cloudinary.com/fieldreview/{tag}/banner.jpg"),
    )
}
