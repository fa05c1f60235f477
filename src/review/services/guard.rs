//! Capability checks applied uniformly across review operations.

use crate::review::domain::{Principal, ReviewTask, TaskId, WorkerId, WorkerRole};
use thiserror::Error;

/// Reasons a principal may be refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthorizationError {
    /// The task belongs to another worker.
    #[error("worker {principal} is not authorized to review task {task_id}")]
    NotTaskOwner {
        /// Acting principal.
        principal: WorkerId,
        /// Task that was targeted.
        task_id: TaskId,
    },

    /// The account has not been approved by an administrator.
    #[error("worker {0} is not approved")]
    NotApproved(WorkerId),

    /// The operation requires an administrator.
    #[error("worker {0} is not an administrator")]
    NotAdmin(WorkerId),
}

/// Authorization guard consulted by the review services.
///
/// Read paths are scoped by querying with the principal's own identifier;
/// only mutations go through the guard.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationGuard;

impl AuthorizationGuard {
    /// Allows the principal to act on `task` only if they created it.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError::NotTaskOwner`] on a mismatch.
    pub fn authorize(principal_id: WorkerId, task: &ReviewTask) -> Result<(), AuthorizationError> {
        if task.worker_id() != principal_id {
            return Err(AuthorizationError::NotTaskOwner {
                principal: principal_id,
                task_id: task.id(),
            });
        }
        Ok(())
    }

    /// Allows approved accounts. Administrators always pass.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError::NotApproved`] for unapproved workers.
    pub const fn require_approved_worker(principal: &Principal) -> Result<(), AuthorizationError> {
        match principal.role {
            WorkerRole::Admin => Ok(()),
            WorkerRole::Worker if principal.approved => Ok(()),
            WorkerRole::Worker => Err(AuthorizationError::NotApproved(principal.worker_id)),
        }
    }

    /// Allows administrators only.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError::NotAdmin`] for any other role.
    pub const fn require_admin(principal: &Principal) -> Result<(), AuthorizationError> {
        match principal.role {
            WorkerRole::Admin => Ok(()),
            WorkerRole::Worker => Err(AuthorizationError::NotAdmin(principal.worker_id)),
        }
    }
}
