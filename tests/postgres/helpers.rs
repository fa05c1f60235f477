//! Shared helpers for `PostgreSQL` review store tests.
//!
//! Tests run against the server named by `FIELDREVIEW_TEST_DATABASE_URL`
//! (a URL for an administrative database such as `postgres`). Each test gets
//! a fresh database with the migrations applied; when the variable is unset
//! the tests return early.

use std::sync::Arc;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use fieldreview::{
    config::ReviewConfig,
    review::{
        adapters::postgres::PostgresReviewStore,
        domain::{EvidenceSubmission, Principal, Restaurant, WorkerId},
        services::{
            RegisterRestaurantRequest, RegisterWorkerRequest, ReviewAdminService,
            TaskCoordinator, WorkerRoster,
        },
    },
};
use mockable::DefaultClock;
use uuid::Uuid;

/// Variable naming the administrative database URL.
pub const DATABASE_URL_ENV: &str = "FIELDREVIEW_TEST_DATABASE_URL";

/// SQL creating the review schema.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-10-16-000000_create_review_tables/up.sql");

/// Database created for one test and dropped afterwards.
pub struct TemporaryDatabase {
    admin_url: String,
    name: String,
    url: String,
}

impl TemporaryDatabase {
    fn create(admin_url: &str) -> eyre::Result<Self> {
        let name = format!("fieldreview_test_{}", Uuid::new_v4().simple());
        let (server, _) = admin_url
            .rsplit_once('/')
            .ok_or_else(|| eyre::eyre!("{DATABASE_URL_ENV} must end with a database name"))?;
        let url = format!("{server}/{name}");

        let mut admin = PgConnection::establish(admin_url)?;
        diesel::sql_query(format!("CREATE DATABASE \"{name}\"")).execute(&mut admin)?;

        let database = Self {
            admin_url: admin_url.to_owned(),
            name,
            url,
        };
        let mut conn = PgConnection::establish(&database.url)?;
        conn.batch_execute(CREATE_SCHEMA_SQL)?;
        Ok(database)
    }

    /// Connection URL of the temporary database.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for TemporaryDatabase {
    fn drop(&mut self) {
        let sql = format!("DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)", self.name);
        if let Ok(mut admin) = PgConnection::establish(&self.admin_url) {
            drop(diesel::sql_query(sql).execute(&mut admin));
        }
    }
}

/// Review services over a store backed by its own temporary database.
pub struct PgReviewSystem {
    pub store: Arc<PostgresReviewStore>,
    pub coordinator: TaskCoordinator<PostgresReviewStore, DefaultClock>,
    pub admin: ReviewAdminService<PostgresReviewStore, DefaultClock>,
    pub roster: WorkerRoster<PostgresReviewStore, DefaultClock>,
    pub admin_principal: Principal,
    /// Dropped after the store so the pool closes before the database goes.
    pub _database: TemporaryDatabase,
}

impl PgReviewSystem {
    /// Registers a restaurant in Jayanagar.
    ///
    /// # Errors
    ///
    /// Returns an error if registration fails.
    pub async fn add_restaurant(&self, name: &str) -> eyre::Result<Restaurant> {
        let restaurant = self
            .coordinator
            .review_state()
            .register_restaurant(RegisterRestaurantRequest::new(
                name,
                "+91 80 4111 0000",
                "Jayanagar, Bengaluru",
                12.925,
                77.593,
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
}

/// Creates a migrated database and wires the review services over it.
///
/// Returns `Ok(None)` when no test server is configured.
///
/// # Errors
///
/// Returns an error if the database cannot be created or migrated.
pub async fn pg_system() -> eyre::Result<Option<PgReviewSystem>> {
    let Ok(admin_url) = std::env::var(DATABASE_URL_ENV) else {
        tracing::warn!(variable = DATABASE_URL_ENV, "skipping PostgreSQL test");
        return Ok(None);
    };
    let database = tokio::task::spawn_blocking(move || TemporaryDatabase::create(&admin_url))
        .await??;
    let pool = Pool::builder()
        .max_size(4)
        .build(ConnectionManager::<PgConnection>::new(database.url()))?;

    let store = Arc::new(PostgresReviewStore::new(pool));
    let clock = Arc::new(DefaultClock);
    Ok(Some(PgReviewSystem {
        coordinator: TaskCoordinator::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            ReviewConfig::default(),
        ),
        admin: ReviewAdminService::new(Arc::clone(&store), Arc::clone(&clock)),
        roster: WorkerRoster::new(Arc::clone(&store), clock),
        store,
        _database: database,
        admin_principal: Principal::admin(WorkerId::new()),
    }))
}

/// Evidence URLs hosted by the default trusted image store.
#[must_use]
pub fn evidence(tag: &str) -> EvidenceSubmission {
    EvidenceSubmission::new(
        format!("https://res.cloudinary.com/pg/{tag}/signage.jpg"),
        format!("https://res.cloudinary.com/pg/{tag}/menu.jpg"),
        format!("https://res.cloudinary.com/pg/{tag}/banner.jpg"),
    )
}
