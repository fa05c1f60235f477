//! Domain model for restaurant field reviews.
//!
//! Restaurants move through `not_started → pending → completed` as workers
//! claim them and submit evidence. Tasks record each claim. All lifecycle
//! guards live on the aggregates; persistence stays outside this boundary.

mod error;
mod evidence;
mod geo;
mod ids;
mod restaurant;
mod task;
mod worker;

pub use error::{ParseStatusError, ReviewDomainError};
pub use evidence::{
    DEFAULT_TRUSTED_IMAGE_PREFIX, EvidenceImages, EvidenceSlot, EvidenceSubmission, EvidenceUrl,
    TrustedImageHost,
};
pub use geo::{EARTH_RADIUS_KM, GeoPoint, RankedRestaurant, haversine_km, rank_by_distance};
pub use ids::{RestaurantId, TaskId, WorkerId};
pub use restaurant::{
    PersistedRestaurantData, Restaurant, RestaurantProfile, RestaurantSummary, ReviewStatus,
};
pub use task::{PersistedTaskData, ReviewTask, TaskStatus};
pub use worker::{PersistedWorkerData, Principal, Worker, WorkerRole};
