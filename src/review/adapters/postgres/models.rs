//! Diesel row models for review persistence.

use super::schema::{restaurants, review_tasks, workers};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for restaurants.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = restaurants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RestaurantRow {
    /// Restaurant identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Street address.
    pub address: String,
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
    /// Review status.
    pub review_status: String,
    /// Signage photo URL.
    pub signage_url: Option<String>,
    /// Menu photo URL.
    pub menu_url: Option<String>,
    /// Banner photo URL.
    pub banner_url: Option<String>,
    /// JSON array of recorded evidence URLs.
    pub review_history: Value,
    /// Reviewer identifier.
    pub reviewed_by: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for restaurants.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = restaurants)]
pub struct NewRestaurantRow {
    /// Restaurant identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Street address.
    pub address: String,
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
    /// Review status.
    pub review_status: String,
    /// Signage photo URL.
    pub signage_url: Option<String>,
    /// Menu photo URL.
    pub menu_url: Option<String>,
    /// Banner photo URL.
    pub banner_url: Option<String>,
    /// JSON array of recorded evidence URLs.
    pub review_history: Value,
    /// Reviewer identifier.
    pub reviewed_by: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Mutable restaurant columns written by updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = restaurants)]
#[diesel(treat_none_as_null = true)]
pub struct RestaurantChanges {
    /// Display name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Street address.
    pub address: String,
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
    /// Review status.
    pub review_status: String,
    /// Signage photo URL.
    pub signage_url: Option<String>,
    /// Menu photo URL.
    pub menu_url: Option<String>,
    /// Banner photo URL.
    pub banner_url: Option<String>,
    /// JSON array of recorded evidence URLs.
    pub review_history: Value,
    /// Reviewer identifier.
    pub reviewed_by: Option<uuid::Uuid>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<NewRestaurantRow> for RestaurantChanges {
    fn from(row: NewRestaurantRow) -> Self {
        let NewRestaurantRow {
            name,
            phone,
            address,
            latitude,
            longitude,
            review_status,
            signage_url,
            menu_url,
            banner_url,
            review_history,
            reviewed_by,
            updated_at,
            ..
        } = row;
        Self {
            name,
            phone,
            address,
            latitude,
            longitude,
            review_status,
            signage_url,
            menu_url,
            banner_url,
            review_history,
            reviewed_by,
            updated_at,
        }
    }
}

/// Query result row for review tasks.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = review_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReviewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning worker.
    pub worker_id: uuid::Uuid,
    /// Target restaurant.
    pub restaurant_id: uuid::Uuid,
    /// Task status.
    pub status: String,
    /// Completion timestamp.
    pub review_date: Option<DateTime<Utc>>,
    /// Submitted signage photo URL.
    pub signage_url: Option<String>,
    /// Submitted menu photo URL.
    pub menu_url: Option<String>,
    /// Submitted banner photo URL.
    pub banner_url: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for review tasks.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = review_tasks)]
pub struct NewReviewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning worker.
    pub worker_id: uuid::Uuid,
    /// Target restaurant.
    pub restaurant_id: uuid::Uuid,
    /// Task status.
    pub status: String,
    /// Completion timestamp.
    pub review_date: Option<DateTime<Utc>>,
    /// Submitted signage photo URL.
    pub signage_url: Option<String>,
    /// Submitted menu photo URL.
    pub menu_url: Option<String>,
    /// Submitted banner photo URL.
    pub banner_url: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for workers.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = workers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WorkerRow {
    /// Worker identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Unique login name.
    pub username: String,
    /// Account role.
    pub role: String,
    /// Approval flag.
    pub approved: bool,
    /// Completed-task counter.
    pub tasks_completed: i64,
    /// Home latitude.
    pub home_latitude: Option<f64>,
    /// Home longitude.
    pub home_longitude: Option<f64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for workers.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = workers)]
pub struct NewWorkerRow {
    /// Worker identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Unique login name.
    pub username: String,
    /// Account role.
    pub role: String,
    /// Approval flag.
    pub approved: bool,
    /// Completed-task counter.
    pub tasks_completed: i64,
    /// Home latitude.
    pub home_latitude: Option<f64>,
    /// Home longitude.
    pub home_longitude: Option<f64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
