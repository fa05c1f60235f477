//! Shared world state for review workflow BDD scenarios.

use std::{collections::HashMap, sync::Arc};

use fieldreview::{
    config::ReviewConfig,
    review::{
        adapters::memory::InMemoryReviewStore,
        domain::{Principal, RankedRestaurant, RestaurantId, ReviewTask, WorkerId},
        services::{
            ReviewAdminService, ReviewServiceError, SubmissionOutcome, TaskCoordinator,
            WorkerRoster,
        },
    },
};
use mockable::DefaultClock;
use rstest::fixture;

/// Coordinator type used by the BDD world.
pub type TestCoordinator = TaskCoordinator<InMemoryReviewStore, DefaultClock>;

/// Where scenario workers stand when they look for work.
pub const OFFICE: (f64, f64) = (12.9716, 77.5946);

/// Scenario world for review workflow behaviour tests.
pub struct ReviewWorld {
    pub coordinator: TestCoordinator,
    pub admin: ReviewAdminService<InMemoryReviewStore, DefaultClock>,
    pub roster: WorkerRoster<InMemoryReviewStore, DefaultClock>,
    pub admin_principal: Principal,
    pub workers: HashMap<String, Principal>,
    pub restaurants: HashMap<String, RestaurantId>,
    pub claimed_tasks: HashMap<String, ReviewTask>,
    pub last_ranking: Vec<RankedRestaurant>,
    pub last_claim: Option<Result<ReviewTask, ReviewServiceError>>,
    pub last_submission: Option<Result<SubmissionOutcome, ReviewServiceError>>,
}

impl ReviewWorld {
    /// Creates a world over an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        init_tracing();
        let store = Arc::new(InMemoryReviewStore::new());
        let clock = Arc::new(DefaultClock);
        Self {
            coordinator: TaskCoordinator::new(
                Arc::clone(&store),
                Arc::clone(&clock),
                ReviewConfig::default(),
            ),
            admin: ReviewAdminService::new(Arc::clone(&store), Arc::clone(&clock)),
            roster: WorkerRoster::new(store, clock),
            admin_principal: Principal::admin(WorkerId::new()),
            workers: HashMap::new(),
            restaurants: HashMap::new(),
            claimed_tasks: HashMap::new(),
            last_ranking: Vec::new(),
            last_claim: None,
            last_submission: None,
        }
    }

    /// Looks up a worker registered earlier in the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error if no worker with that username was registered.
    pub fn worker(&self, username: &str) -> eyre::Result<Principal> {
        self.workers
            .get(username)
            .copied()
            .ok_or_else(|| eyre::eyre!("unknown worker {username} in scenario world"))
    }

    /// Looks up a restaurant registered earlier in the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error if no restaurant with that name was registered.
    pub fn restaurant(&self, name: &str) -> eyre::Result<RestaurantId> {
        self.restaurants
            .get(name)
            .copied()
            .ok_or_else(|| eyre::eyre!("unknown restaurant {name} in scenario world"))
    }
}

impl Default for ReviewWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ReviewWorld {
    ReviewWorld::default()
}

/// Routes service logs to the test output, filtered by `RUST_LOG`.
fn init_tracing() {
    drop(
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init(),
    );
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
