//! In-memory implementation of every review repository port.
//!
//! All entities live behind one lock, so the multi-entity primitives
//! (claim, review completion, reset, cascading deletes) are atomic with
//! respect to each other.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::review::{
    domain::{
        EvidenceImages, Restaurant, RestaurantId, ReviewDomainError, ReviewStatus, ReviewTask,
        TaskId, TaskStatus, Worker, WorkerId,
    },
    ports::{
        RestaurantRepository, ReviewRepositoryError, ReviewRepositoryResult, TaskRepository,
        WorkerRemoval, WorkerRepository,
    },
};

/// Thread-safe in-memory store for restaurants, tasks, and workers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReviewStore {
    state: Arc<RwLock<InMemoryReviewState>>,
}

#[derive(Debug, Default)]
struct InMemoryReviewState {
    restaurants: HashMap<RestaurantId, Restaurant>,
    restaurant_order: Vec<RestaurantId>,
    tasks: HashMap<TaskId, ReviewTask>,
    task_order: Vec<TaskId>,
    workers: HashMap<WorkerId, Worker>,
    worker_order: Vec<WorkerId>,
    username_index: HashMap<String, WorkerId>,
}

impl InMemoryReviewStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> ReviewRepositoryResult<RwLockReadGuard<'_, InMemoryReviewState>> {
        self.state.read().map_err(|err| {
            ReviewRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> ReviewRepositoryResult<RwLockWriteGuard<'_, InMemoryReviewState>> {
        self.state.write().map_err(|err| {
            ReviewRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

impl InMemoryReviewState {
    /// Removes the given tasks from both the map and the ordering index.
    fn remove_tasks(&mut self, doomed: &HashSet<TaskId>) {
        self.tasks.retain(|id, _| !doomed.contains(id));
        self.task_order.retain(|id| !doomed.contains(id));
    }

    fn pending_tasks_for(&self, restaurant_id: RestaurantId) -> HashSet<TaskId> {
        self.tasks
            .values()
            .filter(|task| {
                task.restaurant_id() == restaurant_id && task.status() == TaskStatus::Pending
            })
            .map(ReviewTask::id)
            .collect()
    }

    fn ordered_tasks<'a>(
        &'a self,
        mut keep: impl FnMut(&ReviewTask) -> bool + 'a,
    ) -> impl Iterator<Item = &'a ReviewTask> + 'a {
        self.task_order
            .iter()
            .filter_map(|id| self.tasks.get(id))
            .filter(move |task| keep(task))
    }
}

#[async_trait]
impl RestaurantRepository for InMemoryReviewStore {
    async fn store_restaurant(&self, restaurant: &Restaurant) -> ReviewRepositoryResult<()> {
        let mut state = self.write()?;
        if state.restaurants.contains_key(&restaurant.id()) {
            return Err(ReviewRepositoryError::DuplicateRestaurant(restaurant.id()));
        }
        state.restaurant_order.push(restaurant.id());
        state.restaurants.insert(restaurant.id(), restaurant.clone());
        Ok(())
    }

    async fn record_review(&self, restaurant: &Restaurant) -> ReviewRepositoryResult<()> {
        let mut state = self.write()?;
        let slot = state
            .restaurants
            .get_mut(&restaurant.id())
            .ok_or(ReviewRepositoryError::RestaurantNotFound(restaurant.id()))?;
        require_open_review(slot)?;
        *slot = restaurant.clone();
        Ok(())
    }

    async fn find_restaurant(
        &self,
        id: RestaurantId,
    ) -> ReviewRepositoryResult<Option<Restaurant>> {
        let state = self.read()?;
        Ok(state.restaurants.get(&id).cloned())
    }

    async fn list_restaurants_by_status(
        &self,
        status: ReviewStatus,
        limit: usize,
    ) -> ReviewRepositoryResult<Vec<Restaurant>> {
        let state = self.read()?;
        Ok(state
            .restaurant_order
            .iter()
            .filter_map(|id| state.restaurants.get(id))
            .filter(|restaurant| restaurant.review_status() == status)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn list_restaurants(&self) -> ReviewRepositoryResult<Vec<Restaurant>> {
        let state = self.read()?;
        Ok(state
            .restaurant_order
            .iter()
            .filter_map(|id| state.restaurants.get(id))
            .cloned()
            .collect())
    }

    async fn reset_review(&self, restaurant: &Restaurant) -> ReviewRepositoryResult<Vec<TaskId>> {
        let mut state = self.write()?;
        if !state.restaurants.contains_key(&restaurant.id()) {
            return Err(ReviewRepositoryError::RestaurantNotFound(restaurant.id()));
        }
        let doomed = state.pending_tasks_for(restaurant.id());
        state.remove_tasks(&doomed);
        state.restaurants.insert(restaurant.id(), restaurant.clone());
        let mut removed: Vec<TaskId> = doomed.into_iter().collect();
        removed.sort();
        Ok(removed)
    }

    async fn delete_restaurant(&self, id: RestaurantId) -> ReviewRepositoryResult<usize> {
        let mut state = self.write()?;
        if state.restaurants.remove(&id).is_none() {
            return Err(ReviewRepositoryError::RestaurantNotFound(id));
        }
        state.restaurant_order.retain(|existing| *existing != id);
        let doomed: HashSet<TaskId> = state
            .tasks
            .values()
            .filter(|task| task.restaurant_id() == id)
            .map(ReviewTask::id)
            .collect();
        state.remove_tasks(&doomed);
        Ok(doomed.len())
    }
}

#[async_trait]
impl TaskRepository for InMemoryReviewStore {
    async fn claim(&self, task: &ReviewTask) -> ReviewRepositoryResult<()> {
        let mut state = self.write()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(ReviewRepositoryError::DuplicateTask(task.id()));
        }
        let restaurant = state
            .restaurants
            .get_mut(&task.restaurant_id())
            .ok_or(ReviewRepositoryError::RestaurantNotFound(task.restaurant_id()))?;
        let observed = restaurant.review_status();
        restaurant
            .claim_at(task.created_at())
            .map_err(|_| ReviewRepositoryError::AlreadyAssigned {
                restaurant_id: task.restaurant_id(),
                status: observed,
            })?;

        state.task_order.push(task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn complete_review(&self, task: &ReviewTask) -> ReviewRepositoryResult<u64> {
        let images = submitted_evidence(task)?;
        let completed_at = task.updated_at();
        let mut state = self.write()?;
        let stored = state
            .tasks
            .get(&task.id())
            .ok_or(ReviewRepositoryError::TaskNotFound(task.id()))?;
        if stored.is_completed() {
            return Err(ReviewRepositoryError::TaskAlreadyCompleted(task.id()));
        }

        // Every check runs before the first write so a failure leaves no trace.
        let mut restaurant = state
            .restaurants
            .get(&task.restaurant_id())
            .cloned()
            .ok_or(ReviewRepositoryError::RestaurantNotFound(task.restaurant_id()))?;
        require_open_review(&restaurant)?;
        let mut worker = state
            .workers
            .get(&task.worker_id())
            .cloned()
            .ok_or(ReviewRepositoryError::WorkerNotFound(task.worker_id()))?;
        restaurant
            .record_evidence_at(images, task.worker_id(), completed_at)
            .map_err(ReviewRepositoryError::Corrupt)?;
        worker.count_completed_task_at(completed_at);
        let tasks_completed = worker.tasks_completed();

        state.tasks.insert(task.id(), task.clone());
        state.restaurants.insert(restaurant.id(), restaurant);
        state.workers.insert(worker.id(), worker);
        Ok(tasks_completed)
    }

    async fn find_task(&self, id: TaskId) -> ReviewRepositoryResult<Option<ReviewTask>> {
        let state = self.read()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list_tasks_for_worker(
        &self,
        worker_id: WorkerId,
        status: Option<TaskStatus>,
    ) -> ReviewRepositoryResult<Vec<ReviewTask>> {
        let state = self.read()?;
        Ok(state
            .ordered_tasks(move |task| {
                task.worker_id() == worker_id && status.is_none_or(|wanted| task.status() == wanted)
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl WorkerRepository for InMemoryReviewStore {
    async fn store_worker(&self, worker: &Worker) -> ReviewRepositoryResult<()> {
        let mut state = self.write()?;
        if state.workers.contains_key(&worker.id()) {
            return Err(ReviewRepositoryError::DuplicateWorker(worker.id()));
        }
        if state.username_index.contains_key(worker.username()) {
            return Err(ReviewRepositoryError::DuplicateUsername(
                worker.username().to_owned(),
            ));
        }
        state
            .username_index
            .insert(worker.username().to_owned(), worker.id());
        state.worker_order.push(worker.id());
        state.workers.insert(worker.id(), worker.clone());
        Ok(())
    }

    async fn update_worker(&self, worker: &Worker) -> ReviewRepositoryResult<()> {
        let mut state = self.write()?;
        let (old_username, stored_counter) = state
            .workers
            .get(&worker.id())
            .map(|stored| (stored.username().to_owned(), stored.tasks_completed()))
            .ok_or(ReviewRepositoryError::WorkerNotFound(worker.id()))?;

        if old_username != worker.username() {
            if let Some(&owner) = state.username_index.get(worker.username())
                && owner != worker.id()
            {
                return Err(ReviewRepositoryError::DuplicateUsername(
                    worker.username().to_owned(),
                ));
            }
            state.username_index.remove(&old_username);
            state
                .username_index
                .insert(worker.username().to_owned(), worker.id());
        }

        // The counter is only ever changed by `complete_review`.
        let mut updated = worker.clone();
        updated.keep_tasks_completed(stored_counter);
        state.workers.insert(worker.id(), updated);
        Ok(())
    }

    async fn find_worker(&self, id: WorkerId) -> ReviewRepositoryResult<Option<Worker>> {
        let state = self.read()?;
        Ok(state.workers.get(&id).cloned())
    }

    async fn list_workers(&self) -> ReviewRepositoryResult<Vec<Worker>> {
        let state = self.read()?;
        Ok(state
            .worker_order
            .iter()
            .filter_map(|id| state.workers.get(id))
            .cloned()
            .collect())
    }

    async fn delete_worker(
        &self,
        id: WorkerId,
        released_at: DateTime<Utc>,
    ) -> ReviewRepositoryResult<WorkerRemoval> {
        let mut state = self.write()?;
        let worker = state
            .workers
            .remove(&id)
            .ok_or(ReviewRepositoryError::WorkerNotFound(id))?;
        state.username_index.remove(worker.username());
        state.worker_order.retain(|existing| *existing != id);

        let owned: Vec<ReviewTask> = state
            .ordered_tasks(move |task| task.worker_id() == id)
            .cloned()
            .collect();
        let mut released_restaurants = Vec::new();
        for task in owned.iter().filter(|task| !task.is_completed()) {
            if let Some(restaurant) = state.restaurants.get_mut(&task.restaurant_id())
                && restaurant.review_status() == ReviewStatus::Pending
                && restaurant
                    .force_status_at(ReviewStatus::NotStarted, released_at)
                    .is_ok()
            {
                released_restaurants.push(task.restaurant_id());
            }
        }
        let doomed: HashSet<TaskId> = owned.iter().map(ReviewTask::id).collect();
        state.remove_tasks(&doomed);

        Ok(WorkerRemoval {
            removed_tasks: doomed.len(),
            released_restaurants,
        })
    }
}

fn require_open_review(restaurant: &Restaurant) -> ReviewRepositoryResult<()> {
    match restaurant.review_status() {
        ReviewStatus::Pending => Ok(()),
        status => Err(ReviewRepositoryError::ReviewNotOpen {
            restaurant_id: restaurant.id(),
            status,
        }),
    }
}

fn submitted_evidence(task: &ReviewTask) -> ReviewRepositoryResult<EvidenceImages> {
    task.evidence().cloned().ok_or_else(|| {
        ReviewRepositoryError::Corrupt(ReviewDomainError::InconsistentRecord {
            entity: "task",
            reason: format!("task {} was submitted without evidence", task.id()),
        })
    })
}
