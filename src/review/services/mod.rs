//! Application services for restaurant review assignment.
//!
//! [`TaskCoordinator`] owns the claim and submission state machine,
//! [`RestaurantReviewState`] the per-restaurant transitions,
//! [`AuthorizationGuard`] the capability checks, and [`WorkerRoster`] and
//! [`ReviewAdminService`] the account and administrative surface.

mod admin;
mod coordinator;
mod error;
mod guard;
mod review_state;
mod roster;
mod views;

pub use admin::ReviewAdminService;
pub use coordinator::{NearbyRestaurantsQuery, SubmissionOutcome, TaskCoordinator};
pub use error::{NotFoundTarget, ReviewErrorKind, ReviewServiceError, ReviewServiceResult};
pub use guard::{AuthorizationError, AuthorizationGuard};
pub use review_state::{RegisterRestaurantRequest, RestaurantReviewState, StatusOverride};
pub use roster::{RegisterWorkerRequest, WorkerRoster};
pub use views::{AssignedTask, RestaurantDetail};
