//! Port contracts for review persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by review services.
//! Multi-entity operations (claim, review completion, reset, cascading
//! deletes) are single port calls so that each adapter can make them atomic.

mod error;
mod restaurant;
mod task;
mod worker;

pub use error::{ReviewRepositoryError, ReviewRepositoryResult};
pub use restaurant::RestaurantRepository;
pub use task::TaskRepository;
pub use worker::{WorkerRemoval, WorkerRepository};

/// Union of every review repository, implemented by adapters that keep all
/// three entity kinds in one store.
pub trait ReviewStore: RestaurantRepository + TaskRepository + WorkerRepository {}

impl<T> ReviewStore for T where T: RestaurantRepository + TaskRepository + WorkerRepository {}
