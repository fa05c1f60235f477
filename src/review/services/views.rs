//! Read models returned by the review queries.

use super::error::{NotFoundTarget, ReviewServiceError, ReviewServiceResult};
use crate::review::{
    domain::{Restaurant, RestaurantId, RestaurantSummary, ReviewTask},
    ports::{RestaurantRepository, WorkerRepository},
};
use serde::Serialize;

/// A task together with the restaurant it targets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignedTask {
    /// The task.
    pub task: ReviewTask,
    /// Summary of the targeted restaurant.
    pub restaurant: RestaurantSummary,
}

/// Public review state of one restaurant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantDetail {
    /// The restaurant.
    pub restaurant: Restaurant,
    /// Username of the reviewer, when the review is complete and the account
    /// still exists.
    pub reviewer_username: Option<String>,
}

/// Pairs every task with its restaurant summary.
///
/// A missing restaurant means a cascade failed upstream and is reported as
/// [`ReviewServiceError::DataIntegrity`].
pub(crate) async fn attach_restaurants<R>(
    restaurants: &R,
    tasks: Vec<ReviewTask>,
) -> ReviewServiceResult<Vec<AssignedTask>>
where
    R: RestaurantRepository + ?Sized,
{
    let mut assigned = Vec::with_capacity(tasks.len());
    for task in tasks {
        let Some(restaurant) = restaurants.find_restaurant(task.restaurant_id()).await? else {
            tracing::warn!(
                task_id = %task.id(),
                restaurant_id = %task.restaurant_id(),
                "task references a missing restaurant"
            );
            return Err(ReviewServiceError::DataIntegrity(format!(
                "task {} references missing restaurant {}",
                task.id(),
                task.restaurant_id()
            )));
        };
        assigned.push(AssignedTask {
            restaurant: restaurant.summary(),
            task,
        });
    }
    Ok(assigned)
}

/// Loads a restaurant and resolves its reviewer's username.
pub(crate) async fn restaurant_detail<S>(
    store: &S,
    id: RestaurantId,
) -> ReviewServiceResult<RestaurantDetail>
where
    S: RestaurantRepository + WorkerRepository + ?Sized,
{
    let restaurant = store
        .find_restaurant(id)
        .await?
        .ok_or(ReviewServiceError::NotFound(NotFoundTarget::Restaurant(id)))?;
    let reviewer_username = match restaurant.reviewed_by() {
        Some(reviewer) => store
            .find_worker(reviewer)
            .await?
            .map(|worker| worker.username().to_owned()),
        None => None,
    };
    Ok(RestaurantDetail {
        restaurant,
        reviewer_username,
    })
}
