//! `PostgreSQL` implementation of every review repository port.

use super::{
    models::{
        NewRestaurantRow, NewReviewTaskRow, NewWorkerRow, RestaurantChanges, RestaurantRow,
        ReviewTaskRow, WorkerRow,
    },
    schema::{restaurants, review_tasks, workers},
};
use crate::review::{
    domain::{
        EvidenceImages, EvidenceUrl, GeoPoint, PersistedRestaurantData, PersistedTaskData,
        PersistedWorkerData, Restaurant, RestaurantId, RestaurantProfile, ReviewDomainError,
        ReviewStatus, ReviewTask, TaskId, TaskStatus, Worker, WorkerId, WorkerRole,
    },
    ports::{
        RestaurantRepository, ReviewRepositoryError, ReviewRepositoryResult, TaskRepository,
        WorkerRemoval, WorkerRepository,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by the review store.
pub type ReviewPgPool = Pool<ConnectionManager<PgConnection>>;

const OPEN_TASK_INDEX: &str = "idx_review_tasks_open_per_restaurant";
const USERNAME_CONSTRAINT: &str = "workers_username_unique";

/// `PostgreSQL`-backed store for restaurants, tasks, and workers.
#[derive(Debug, Clone)]
pub struct PostgresReviewStore {
    pool: ReviewPgPool,
}

impl PostgresReviewStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ReviewPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ReviewRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ReviewRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ReviewRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ReviewRepositoryError::persistence)?
    }
}

impl From<DieselError> for ReviewRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl RestaurantRepository for PostgresReviewStore {
    async fn store_restaurant(&self, restaurant: &Restaurant) -> ReviewRepositoryResult<()> {
        let restaurant_id = restaurant.id();
        let row = to_restaurant_row(restaurant)?;
        self.run_blocking(move |connection| {
            diesel::insert_into(restaurants::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ReviewRepositoryError::DuplicateRestaurant(restaurant_id)
                    }
                    _ => ReviewRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn record_review(&self, restaurant: &Restaurant) -> ReviewRepositoryResult<()> {
        let restaurant_id = restaurant.id();
        let row = to_restaurant_row(restaurant)?;
        self.run_blocking(move |connection| {
            if write_restaurant(connection, row, Some(ReviewStatus::Pending))? > 0 {
                return Ok(());
            }
            Err(match observed_status(connection, restaurant_id)? {
                None => ReviewRepositoryError::RestaurantNotFound(restaurant_id),
                Some(status) => ReviewRepositoryError::ReviewNotOpen {
                    restaurant_id,
                    status,
                },
            })
        })
        .await
    }

    async fn find_restaurant(
        &self,
        id: RestaurantId,
    ) -> ReviewRepositoryResult<Option<Restaurant>> {
        self.run_blocking(move |connection| {
            let row = restaurants::table
                .filter(restaurants::id.eq(id.into_inner()))
                .select(RestaurantRow::as_select())
                .first::<RestaurantRow>(connection)
                .optional()?;
            row.map(row_to_restaurant).transpose()
        })
        .await
    }

    async fn list_restaurants_by_status(
        &self,
        status: ReviewStatus,
        limit: usize,
    ) -> ReviewRepositoryResult<Vec<Restaurant>> {
        let row_limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.run_blocking(move |connection| {
            let rows = restaurants::table
                .filter(restaurants::review_status.eq(status.as_str()))
                .order((restaurants::created_at.asc(), restaurants::id.asc()))
                .limit(row_limit)
                .select(RestaurantRow::as_select())
                .load::<RestaurantRow>(connection)?;
            rows.into_iter().map(row_to_restaurant).collect()
        })
        .await
    }

    async fn list_restaurants(&self) -> ReviewRepositoryResult<Vec<Restaurant>> {
        self.run_blocking(move |connection| {
            let rows = restaurants::table
                .order((restaurants::created_at.asc(), restaurants::id.asc()))
                .select(RestaurantRow::as_select())
                .load::<RestaurantRow>(connection)?;
            rows.into_iter().map(row_to_restaurant).collect()
        })
        .await
    }

    async fn reset_review(&self, restaurant: &Restaurant) -> ReviewRepositoryResult<Vec<TaskId>> {
        let restaurant_id = restaurant.id();
        let row = to_restaurant_row(restaurant)?;
        self.run_blocking(move |connection| {
            connection.transaction::<_, ReviewRepositoryError, _>(|tx| {
                if write_restaurant(tx, row, None)? == 0 {
                    return Err(ReviewRepositoryError::RestaurantNotFound(restaurant_id));
                }
                let mut removed: Vec<TaskId> = diesel::delete(
                    review_tasks::table
                        .filter(review_tasks::restaurant_id.eq(restaurant_id.into_inner()))
                        .filter(review_tasks::status.eq(TaskStatus::Pending.as_str())),
                )
                .returning(review_tasks::id)
                .get_results::<uuid::Uuid>(tx)?
                .into_iter()
                .map(TaskId::from_uuid)
                .collect();
                removed.sort();
                Ok(removed)
            })
        })
        .await
    }

    async fn delete_restaurant(&self, id: RestaurantId) -> ReviewRepositoryResult<usize> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, ReviewRepositoryError, _>(|tx| {
                let removed_tasks = diesel::delete(
                    review_tasks::table.filter(review_tasks::restaurant_id.eq(id.into_inner())),
                )
                .execute(tx)?;
                let deleted =
                    diesel::delete(restaurants::table.filter(restaurants::id.eq(id.into_inner())))
                        .execute(tx)?;
                if deleted == 0 {
                    return Err(ReviewRepositoryError::RestaurantNotFound(id));
                }
                Ok(removed_tasks)
            })
        })
        .await
    }
}

#[async_trait]
impl TaskRepository for PostgresReviewStore {
    async fn claim(&self, task: &ReviewTask) -> ReviewRepositoryResult<()> {
        let task_id = task.id();
        let restaurant_id = task.restaurant_id();
        let claimed_at = task.created_at();
        let row = to_task_row(task);
        self.run_blocking(move |connection| {
            connection.transaction::<_, ReviewRepositoryError, _>(|tx| {
                let updated = diesel::update(
                    restaurants::table
                        .filter(restaurants::id.eq(restaurant_id.into_inner()))
                        .filter(restaurants::review_status.eq(ReviewStatus::NotStarted.as_str())),
                )
                .set((
                    restaurants::review_status.eq(ReviewStatus::Pending.as_str()),
                    restaurants::updated_at.eq(claimed_at),
                ))
                .execute(tx)?;

                if updated == 0 {
                    return Err(match observed_status(tx, restaurant_id)? {
                        None => ReviewRepositoryError::RestaurantNotFound(restaurant_id),
                        Some(status) => ReviewRepositoryError::AlreadyAssigned {
                            restaurant_id,
                            status,
                        },
                    });
                }

                diesel::insert_into(review_tasks::table)
                    .values(&row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                            if is_constraint(info.as_ref(), OPEN_TASK_INDEX) =>
                        {
                            ReviewRepositoryError::AlreadyAssigned {
                                restaurant_id,
                                status: ReviewStatus::Pending,
                            }
                        }
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            ReviewRepositoryError::DuplicateTask(task_id)
                        }
                        _ => ReviewRepositoryError::persistence(err),
                    })?;
                Ok(())
            })
        })
        .await
    }

    async fn complete_review(&self, task: &ReviewTask) -> ReviewRepositoryResult<u64> {
        let task_id = task.id();
        let restaurant_id = task.restaurant_id();
        let worker_id = task.worker_id();
        let review_date = task.review_date();
        let completed_at = task.updated_at();
        let images = submitted_evidence(task)?;
        let (signage_url, menu_url, banner_url) = evidence_columns(Some(&images));
        self.run_blocking(move |connection| {
            connection.transaction::<_, ReviewRepositoryError, _>(|tx| {
                // Restaurant row first, matching the lock order of claim and reset.
                let locked = restaurants::table
                    .filter(restaurants::id.eq(restaurant_id.into_inner()))
                    .select(RestaurantRow::as_select())
                    .for_update()
                    .first::<RestaurantRow>(tx)
                    .optional()?;

                let updated = diesel::update(
                    review_tasks::table
                        .filter(review_tasks::id.eq(task_id.into_inner()))
                        .filter(review_tasks::status.eq(TaskStatus::Pending.as_str())),
                )
                .set((
                    review_tasks::status.eq(TaskStatus::Completed.as_str()),
                    review_tasks::review_date.eq(review_date),
                    review_tasks::signage_url.eq(signage_url),
                    review_tasks::menu_url.eq(menu_url),
                    review_tasks::banner_url.eq(banner_url),
                    review_tasks::updated_at.eq(completed_at),
                ))
                .execute(tx)?;
                if updated == 0 {
                    let exists = review_tasks::table
                        .filter(review_tasks::id.eq(task_id.into_inner()))
                        .count()
                        .get_result::<i64>(tx)?;
                    return Err(if exists == 0 {
                        ReviewRepositoryError::TaskNotFound(task_id)
                    } else {
                        ReviewRepositoryError::TaskAlreadyCompleted(task_id)
                    });
                }

                let mut restaurant = locked
                    .map(row_to_restaurant)
                    .transpose()?
                    .ok_or(ReviewRepositoryError::RestaurantNotFound(restaurant_id))?;
                let status = restaurant.review_status();
                if status != ReviewStatus::Pending {
                    return Err(ReviewRepositoryError::ReviewNotOpen {
                        restaurant_id,
                        status,
                    });
                }
                restaurant
                    .record_evidence_at(images, worker_id, completed_at)
                    .map_err(ReviewRepositoryError::Corrupt)?;
                let row = to_restaurant_row(&restaurant)?;
                if write_restaurant(tx, row, Some(ReviewStatus::Pending))? == 0 {
                    return Err(ReviewRepositoryError::ReviewNotOpen {
                        restaurant_id,
                        status,
                    });
                }

                let counter =
                    diesel::update(workers::table.filter(workers::id.eq(worker_id.into_inner())))
                        .set((
                            workers::tasks_completed.eq(workers::tasks_completed + 1),
                            workers::updated_at.eq(completed_at),
                        ))
                        .returning(workers::tasks_completed)
                        .get_result::<i64>(tx)
                        .optional()?
                        .ok_or(ReviewRepositoryError::WorkerNotFound(worker_id))?;
                u64::try_from(counter).map_err(ReviewRepositoryError::persistence)
            })
        })
        .await
    }

    async fn find_task(&self, id: TaskId) -> ReviewRepositoryResult<Option<ReviewTask>> {
        self.run_blocking(move |connection| {
            let row = review_tasks::table
                .filter(review_tasks::id.eq(id.into_inner()))
                .select(ReviewTaskRow::as_select())
                .first::<ReviewTaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_tasks_for_worker(
        &self,
        worker_id: WorkerId,
        status: Option<TaskStatus>,
    ) -> ReviewRepositoryResult<Vec<ReviewTask>> {
        self.run_blocking(move |connection| {
            let mut query = review_tasks::table
                .filter(review_tasks::worker_id.eq(worker_id.into_inner()))
                .order((review_tasks::created_at.asc(), review_tasks::id.asc()))
                .select(ReviewTaskRow::as_select())
                .into_boxed();
            if let Some(wanted) = status {
                query = query.filter(review_tasks::status.eq(wanted.as_str()));
            }
            let rows = query.load::<ReviewTaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

#[async_trait]
impl WorkerRepository for PostgresReviewStore {
    async fn store_worker(&self, worker: &Worker) -> ReviewRepositoryResult<()> {
        let worker_id = worker.id();
        let username = worker.username().to_owned();
        let row = to_worker_row(worker)?;
        self.run_blocking(move |connection| {
            diesel::insert_into(workers::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_constraint(info.as_ref(), USERNAME_CONSTRAINT) =>
                    {
                        ReviewRepositoryError::DuplicateUsername(username.clone())
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ReviewRepositoryError::DuplicateWorker(worker_id)
                    }
                    _ => ReviewRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update_worker(&self, worker: &Worker) -> ReviewRepositoryResult<()> {
        let worker_id = worker.id();
        let NewWorkerRow {
            name,
            username,
            role,
            approved,
            home_latitude,
            home_longitude,
            updated_at,
            ..
        } = to_worker_row(worker)?;
        self.run_blocking(move |connection| {
            let target = workers::table.filter(workers::id.eq(worker_id.into_inner()));
            let updated = diesel::update(target)
                .set((
                    workers::name.eq(name),
                    workers::username.eq(&username),
                    workers::role.eq(role),
                    workers::approved.eq(approved),
                    workers::home_latitude.eq(home_latitude),
                    workers::home_longitude.eq(home_longitude),
                    workers::updated_at.eq(updated_at),
                ))
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_constraint(info.as_ref(), USERNAME_CONSTRAINT) =>
                    {
                        ReviewRepositoryError::DuplicateUsername(username.clone())
                    }
                    _ => ReviewRepositoryError::persistence(err),
                })?;
            if updated == 0 {
                return Err(ReviewRepositoryError::WorkerNotFound(worker_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_worker(&self, id: WorkerId) -> ReviewRepositoryResult<Option<Worker>> {
        self.run_blocking(move |connection| {
            let row = workers::table
                .filter(workers::id.eq(id.into_inner()))
                .select(WorkerRow::as_select())
                .first::<WorkerRow>(connection)
                .optional()?;
            row.map(row_to_worker).transpose()
        })
        .await
    }

    async fn list_workers(&self) -> ReviewRepositoryResult<Vec<Worker>> {
        self.run_blocking(move |connection| {
            let rows = workers::table
                .order((workers::created_at.asc(), workers::id.asc()))
                .select(WorkerRow::as_select())
                .load::<WorkerRow>(connection)?;
            rows.into_iter().map(row_to_worker).collect()
        })
        .await
    }

    async fn delete_worker(
        &self,
        id: WorkerId,
        released_at: DateTime<Utc>,
    ) -> ReviewRepositoryResult<WorkerRemoval> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, ReviewRepositoryError, _>(|tx| {
                let held: Vec<uuid::Uuid> = review_tasks::table
                    .filter(review_tasks::worker_id.eq(id.into_inner()))
                    .filter(review_tasks::status.eq(TaskStatus::Pending.as_str()))
                    .select(review_tasks::restaurant_id)
                    .load(tx)?;

                let released_restaurants = diesel::update(
                    restaurants::table
                        .filter(restaurants::id.eq_any(held))
                        .filter(restaurants::review_status.eq(ReviewStatus::Pending.as_str())),
                )
                .set((
                    restaurants::review_status.eq(ReviewStatus::NotStarted.as_str()),
                    restaurants::updated_at.eq(released_at),
                ))
                .returning(restaurants::id)
                .get_results::<uuid::Uuid>(tx)?
                .into_iter()
                .map(RestaurantId::from_uuid)
                .collect();

                let removed_tasks = diesel::delete(
                    review_tasks::table.filter(review_tasks::worker_id.eq(id.into_inner())),
                )
                .execute(tx)?;
                let deleted = diesel::delete(workers::table.filter(workers::id.eq(id.into_inner())))
                    .execute(tx)?;
                if deleted == 0 {
                    return Err(ReviewRepositoryError::WorkerNotFound(id));
                }

                Ok(WorkerRemoval {
                    removed_tasks,
                    released_restaurants,
                })
            })
        })
        .await
    }
}

/// Overwrites every mutable restaurant column, returning the affected row
/// count. With `only_if`, rows in any other stored status are left alone.
fn write_restaurant(
    connection: &mut PgConnection,
    row: NewRestaurantRow,
    only_if: Option<ReviewStatus>,
) -> ReviewRepositoryResult<usize> {
    let id = row.id;
    let changes = RestaurantChanges::from(row);
    let target = restaurants::table.filter(restaurants::id.eq(id));
    let updated = match only_if {
        None => diesel::update(target).set(&changes).execute(connection)?,
        Some(expected) => diesel::update(
            target.filter(restaurants::review_status.eq(expected.as_str())),
        )
        .set(&changes)
        .execute(connection)?,
    };
    Ok(updated)
}

fn observed_status(
    connection: &mut PgConnection,
    restaurant_id: RestaurantId,
) -> ReviewRepositoryResult<Option<ReviewStatus>> {
    restaurants::table
        .filter(restaurants::id.eq(restaurant_id.into_inner()))
        .select(restaurants::review_status)
        .first::<String>(connection)
        .optional()?
        .map(|status| parse_review_status(&status))
        .transpose()
}

fn submitted_evidence(task: &ReviewTask) -> ReviewRepositoryResult<EvidenceImages> {
    task.evidence().cloned().ok_or_else(|| {
        ReviewRepositoryError::Corrupt(ReviewDomainError::InconsistentRecord {
            entity: "task",
            reason: format!("task {} was submitted without evidence", task.id()),
        })
    })
}

fn to_restaurant_row(restaurant: &Restaurant) -> ReviewRepositoryResult<NewRestaurantRow> {
    let history: Vec<&str> = restaurant
        .review_history()
        .iter()
        .map(EvidenceUrl::as_str)
        .collect();
    let review_history =
        serde_json::to_value(history).map_err(ReviewRepositoryError::persistence)?;
    let (signage_url, menu_url, banner_url) = evidence_columns(restaurant.evidence());
    let profile = restaurant.profile();

    Ok(NewRestaurantRow {
        id: restaurant.id().into_inner(),
        name: profile.name().to_owned(),
        phone: profile.phone().to_owned(),
        address: profile.address().to_owned(),
        latitude: restaurant.location().latitude(),
        longitude: restaurant.location().longitude(),
        review_status: restaurant.review_status().as_str().to_owned(),
        signage_url,
        menu_url,
        banner_url,
        review_history,
        reviewed_by: restaurant.reviewed_by().map(WorkerId::into_inner),
        created_at: restaurant.created_at(),
        updated_at: restaurant.updated_at(),
    })
}

fn row_to_restaurant(row: RestaurantRow) -> ReviewRepositoryResult<Restaurant> {
    let RestaurantRow {
        id,
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
        created_at,
        updated_at,
    } = row;

    let profile =
        RestaurantProfile::new(name, phone, address).map_err(ReviewRepositoryError::Corrupt)?;
    let location = GeoPoint::new(latitude, longitude).map_err(ReviewRepositoryError::Corrupt)?;
    let history = serde_json::from_value::<Vec<String>>(review_history)
        .map_err(ReviewRepositoryError::persistence)?;

    let data = PersistedRestaurantData {
        id: RestaurantId::from_uuid(id),
        profile,
        location,
        review_status: parse_review_status(&review_status)?,
        evidence: evidence_from_columns("restaurant", signage_url, menu_url, banner_url)?,
        review_history: history.into_iter().map(EvidenceUrl::from_persisted).collect(),
        reviewed_by: reviewed_by.map(WorkerId::from_uuid),
        created_at,
        updated_at,
    };
    Restaurant::from_persisted(data).map_err(ReviewRepositoryError::Corrupt)
}

fn to_task_row(task: &ReviewTask) -> NewReviewTaskRow {
    let (signage_url, menu_url, banner_url) = evidence_columns(task.evidence());
    NewReviewTaskRow {
        id: task.id().into_inner(),
        worker_id: task.worker_id().into_inner(),
        restaurant_id: task.restaurant_id().into_inner(),
        status: task.status().as_str().to_owned(),
        review_date: task.review_date(),
        signage_url,
        menu_url,
        banner_url,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: ReviewTaskRow) -> ReviewRepositoryResult<ReviewTask> {
    let ReviewTaskRow {
        id,
        worker_id,
        restaurant_id,
        status,
        review_date,
        signage_url,
        menu_url,
        banner_url,
        created_at,
        updated_at,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        worker_id: WorkerId::from_uuid(worker_id),
        restaurant_id: RestaurantId::from_uuid(restaurant_id),
        status: TaskStatus::try_from(status.as_str()).map_err(ReviewRepositoryError::persistence)?,
        review_date,
        evidence: evidence_from_columns("task", signage_url, menu_url, banner_url)?,
        created_at,
        updated_at,
    };
    ReviewTask::from_persisted(data).map_err(ReviewRepositoryError::Corrupt)
}

fn to_worker_row(worker: &Worker) -> ReviewRepositoryResult<NewWorkerRow> {
    let tasks_completed =
        i64::try_from(worker.tasks_completed()).map_err(ReviewRepositoryError::persistence)?;
    Ok(NewWorkerRow {
        id: worker.id().into_inner(),
        name: worker.name().to_owned(),
        username: worker.username().to_owned(),
        role: worker.role().as_str().to_owned(),
        approved: worker.is_approved(),
        tasks_completed,
        home_latitude: worker.home().map(GeoPoint::latitude),
        home_longitude: worker.home().map(GeoPoint::longitude),
        created_at: worker.created_at(),
        updated_at: worker.updated_at(),
    })
}

fn row_to_worker(row: WorkerRow) -> ReviewRepositoryResult<Worker> {
    let WorkerRow {
        id,
        name,
        username,
        role,
        approved,
        tasks_completed,
        home_latitude,
        home_longitude,
        created_at,
        updated_at,
    } = row;

    let home = match (home_latitude, home_longitude) {
        (Some(latitude), Some(longitude)) => {
            Some(GeoPoint::new(latitude, longitude).map_err(ReviewRepositoryError::Corrupt)?)
        }
        (None, None) => None,
        _ => {
            return Err(ReviewRepositoryError::Corrupt(
                ReviewDomainError::InconsistentRecord {
                    entity: "worker",
                    reason: format!("worker {id} has only one home coordinate"),
                },
            ));
        }
    };

    Ok(Worker::from_persisted(PersistedWorkerData {
        id: WorkerId::from_uuid(id),
        name,
        username,
        role: WorkerRole::try_from(role.as_str()).map_err(ReviewRepositoryError::persistence)?,
        approved,
        tasks_completed: u64::try_from(tasks_completed)
            .map_err(ReviewRepositoryError::persistence)?,
        home,
        created_at,
        updated_at,
    }))
}

fn evidence_columns(
    images: Option<&EvidenceImages>,
) -> (Option<String>, Option<String>, Option<String>) {
    images.map_or((None, None, None), |found| {
        (
            Some(found.signage().as_str().to_owned()),
            Some(found.menu().as_str().to_owned()),
            Some(found.banner().as_str().to_owned()),
        )
    })
}

fn evidence_from_columns(
    entity: &'static str,
    signage: Option<String>,
    menu: Option<String>,
    banner: Option<String>,
) -> ReviewRepositoryResult<Option<EvidenceImages>> {
    match (signage, menu, banner) {
        (Some(signage_url), Some(menu_url), Some(banner_url)) => {
            Ok(Some(EvidenceImages::from_persisted(
                EvidenceUrl::from_persisted(signage_url),
                EvidenceUrl::from_persisted(menu_url),
                EvidenceUrl::from_persisted(banner_url),
            )))
        }
        (None, None, None) => Ok(None),
        _ => Err(ReviewRepositoryError::Corrupt(
            ReviewDomainError::InconsistentRecord {
                entity,
                reason: "evidence must have all three images or none".to_owned(),
            },
        )),
    }
}

fn parse_review_status(raw: &str) -> ReviewRepositoryResult<ReviewStatus> {
    ReviewStatus::try_from(raw).map_err(ReviewRepositoryError::persistence)
}

fn is_constraint(info: &dyn DatabaseErrorInformation, name: &str) -> bool {
    info.constraint_name()
        .is_some_and(|constraint| constraint == name)
}
