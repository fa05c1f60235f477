//! Worker accounts and the principals resolved from them.

use super::{GeoPoint, ParseStatusError, ReviewDomainError, WorkerId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerRole {
    /// Back-office operator with override privileges.
    Admin,
    /// Field worker performing reviews.
    Worker,
}

impl WorkerRole {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Worker => "worker",
        }
    }
}

impl fmt::Display for WorkerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for WorkerRole {
    type Error = ParseStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "admin" => Ok(Self::Admin),
            "worker" => Ok(Self::Worker),
            _ => Err(ParseStatusError(value.to_owned())),
        }
    }
}

/// Identity of the caller as resolved by the external identity provider.
///
/// The core trusts these fields unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Principal {
    /// Caller's account identifier.
    pub worker_id: WorkerId,
    /// Caller's role.
    pub role: WorkerRole,
    /// Whether an administrator has approved the account.
    pub approved: bool,
}

impl Principal {
    /// Creates an approved field-worker principal.
    #[must_use]
    pub const fn approved_worker(worker_id: WorkerId) -> Self {
        Self {
            worker_id,
            role: WorkerRole::Worker,
            approved: true,
        }
    }

    /// Creates an administrator principal.
    #[must_use]
    pub const fn admin(worker_id: WorkerId) -> Self {
        Self {
            worker_id,
            role: WorkerRole::Admin,
            approved: true,
        }
    }
}

/// Worker account aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    id: WorkerId,
    name: String,
    username: String,
    role: WorkerRole,
    approved: bool,
    tasks_completed: u64,
    home: Option<GeoPoint>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted worker.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedWorkerData {
    /// Persisted identifier.
    pub id: WorkerId,
    /// Display name.
    pub name: String,
    /// Unique login name.
    pub username: String,
    /// Account role.
    pub role: WorkerRole,
    /// Approval flag.
    pub approved: bool,
    /// Completed-task counter.
    pub tasks_completed: u64,
    /// Home location, if known.
    pub home: Option<GeoPoint>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Worker {
    /// Registers a new, unapproved account.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::EmptyWorkerField`] when the name or
    /// username is blank, or the username contains whitespace.
    pub fn register(
        name: impl Into<String>,
        username: impl Into<String>,
        role: WorkerRole,
        home: Option<GeoPoint>,
        clock: &impl Clock,
    ) -> Result<Self, ReviewDomainError> {
        let display_name: String = name.into();
        let login: String = username.into();
        if display_name.trim().is_empty() {
            return Err(ReviewDomainError::EmptyWorkerField("name"));
        }
        let login_trimmed = login.trim();
        if login_trimmed.is_empty() || login_trimmed.chars().any(char::is_whitespace) {
            return Err(ReviewDomainError::EmptyWorkerField("username"));
        }

        let timestamp = clock.utc();
        Ok(Self {
            id: WorkerId::new(),
            name: display_name.trim().to_owned(),
            username: login_trimmed.to_owned(),
            role,
            approved: false,
            tasks_completed: 0,
            home,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a worker from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedWorkerData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            username: data.username,
            role: data.role,
            approved: data.approved,
            tasks_completed: data.tasks_completed,
            home: data.home,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the worker identifier.
    #[must_use]
    pub const fn id(&self) -> WorkerId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unique login name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the account role.
    #[must_use]
    pub const fn role(&self) -> WorkerRole {
        self.role
    }

    /// Returns whether the account has been approved.
    #[must_use]
    pub const fn is_approved(&self) -> bool {
        self.approved
    }

    /// Returns the number of reviews this worker has completed.
    #[must_use]
    pub const fn tasks_completed(&self) -> u64 {
        self.tasks_completed
    }

    /// Returns the home location, if known.
    #[must_use]
    pub const fn home(&self) -> Option<GeoPoint> {
        self.home
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the principal this account authenticates as.
    #[must_use]
    pub const fn principal(&self) -> Principal {
        Principal {
            worker_id: self.id,
            role: self.role,
            approved: self.approved,
        }
    }

    /// Marks the account approved. Returns `false` if it already was.
    pub fn approve(&mut self, clock: &impl Clock) -> bool {
        if self.approved {
            return false;
        }
        self.approved = true;
        self.updated_at = clock.utc();
        true
    }

    /// Counts one more completed review.
    pub fn record_completed_task(&mut self, clock: &impl Clock) {
        self.count_completed_task_at(clock.utc());
    }

    pub(crate) fn count_completed_task_at(&mut self, at: DateTime<Utc>) {
        self.tasks_completed = self.tasks_completed.saturating_add(1);
        self.updated_at = at;
    }

    /// Overwrites the counter with the authoritative stored value.
    pub(crate) const fn keep_tasks_completed(&mut self, stored: u64) {
        self.tasks_completed = stored;
    }
}
