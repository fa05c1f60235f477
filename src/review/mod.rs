//! Restaurant field-review assignment.
//!
//! Approved workers claim unreviewed restaurants nearest to them, visit
//! them, and submit photographic evidence. A restaurant is held by at most
//! one open task at a time. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
