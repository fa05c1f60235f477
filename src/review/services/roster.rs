//! Worker roster: self-registration and profile lookup.

use super::error::{NotFoundTarget, ReviewServiceError, ReviewServiceResult};
use crate::review::{
    domain::{GeoPoint, Worker, WorkerId, WorkerRole},
    ports::WorkerRepository,
};
use mockable::Clock;
use std::sync::Arc;

/// Request payload for registering a worker account.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterWorkerRequest {
    name: String,
    username: String,
    home: Option<GeoPoint>,
}

impl RegisterWorkerRequest {
    /// Creates a request without a home location.
    #[must_use]
    pub fn new(name: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            username: username.into(),
            home: None,
        }
    }

    /// Sets the worker's home location.
    #[must_use]
    pub const fn with_home(mut self, home: GeoPoint) -> Self {
        self.home = Some(home);
        self
    }
}

/// Registers and looks up worker accounts.
#[derive(Clone)]
pub struct WorkerRoster<W, C>
where
    W: WorkerRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<W>,
    clock: Arc<C>,
}

impl<W, C> WorkerRoster<W, C>
where
    W: WorkerRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new roster service.
    #[must_use]
    pub const fn new(repository: Arc<W>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Registers a worker. New accounts cannot claim work until an
    /// administrator approves them.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::InvalidInput`] for blank fields and
    /// [`ReviewServiceError::UsernameTaken`] when the username is in use.
    pub async fn register_worker(
        &self,
        request: RegisterWorkerRequest,
    ) -> ReviewServiceResult<Worker> {
        let RegisterWorkerRequest {
            name,
            username,
            home,
        } = request;
        let worker = Worker::register(name, username, WorkerRole::Worker, home, &*self.clock)?;
        self.repository.store_worker(&worker).await?;
        tracing::info!(worker_id = %worker.id(), username = worker.username(), "worker registered");
        Ok(worker)
    }

    /// Returns a worker's own profile.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::NotFound`] when the account does not
    /// exist.
    pub async fn get_worker(&self, id: WorkerId) -> ReviewServiceResult<Worker> {
        self.repository
            .find_worker(id)
            .await?
            .ok_or(ReviewServiceError::NotFound(NotFoundTarget::Worker(id)))
    }
}
