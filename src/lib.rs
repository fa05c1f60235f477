//! Fieldreview: restaurant field-review task assignment.
//!
//! Approved workers claim unreviewed restaurant listings, visit them, and
//! submit photographs of the signage, menu, and banner. The crate tracks
//! each restaurant through `not_started → pending → completed`, guarantees
//! that at most one worker holds a restaurant at a time, and ranks
//! unclaimed restaurants by distance from the worker.
//!
//! # Architecture
//!
//! Fieldreview follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//!
//! # Modules
//!
//! - [`review`]: Restaurants, review tasks, workers, and their services
//! - [`config`]: Runtime settings loaded from the environment

pub mod config;
pub mod review;
