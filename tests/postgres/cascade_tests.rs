//! Multi-table resets and deletions against a real database.

use super::helpers::{evidence, pg_system};
use fieldreview::review::{
    domain::{EvidenceImages, ReviewStatus, TaskStatus, TrustedImageHost},
    ports::{RestaurantRepository, ReviewRepositoryError, TaskRepository},
    services::{RegisterWorkerRequest, ReviewErrorKind, SubmissionOutcome},
};
use mockable::DefaultClock;

#[tokio::test(flavor = "multi_thread")]
async fn reset_removes_open_task_and_allows_reclaim() -> eyre::Result<()> {
    let Some(system) = pg_system().await? else {
        return Ok(());
    };
    let restaurant = system.add_restaurant("Mavalli Tiffin Rooms").await?;
    let first = system.add_worker("asha").await?;
    let second = system.add_worker("ravi").await?;
    let task = system
        .coordinator
        .claim_restaurant(&first, restaurant.id())
        .await?;

    let reset = system
        .admin
        .override_restaurant_status(
            &system.admin_principal,
            restaurant.id(),
            ReviewStatus::NotStarted,
        )
        .await?;
    eyre::ensure!(reset.released_tasks == vec![task.id()], "open task should be released");
    eyre::ensure!(
        system.store.find_task(task.id()).await?.is_none(),
        "released task should be deleted"
    );

    let retry = system
        .coordinator
        .claim_restaurant(&second, restaurant.id())
        .await?;
    eyre::ensure!(retry.status() == TaskStatus::Pending, "reclaim should succeed");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_worker_releases_held_restaurants() -> eyre::Result<()> {
    let Some(system) = pg_system().await? else {
        return Ok(());
    };
    let held = system.add_restaurant("Meghana Foods").await?;
    let reviewed = system.add_restaurant("Truffles").await?;
    let worker = system.add_worker("asha").await?;
    let done = system
        .coordinator
        .claim_restaurant(&worker, reviewed.id())
        .await?;
    system
        .coordinator
        .submit_task_review(&worker, done.id(), &evidence("truffles"))
        .await?;
    system
        .coordinator
        .claim_restaurant(&worker, held.id())
        .await?;

    let removal = system
        .admin
        .delete_worker(&system.admin_principal, worker.worker_id)
        .await?;

    eyre::ensure!(removal.removed_tasks == 2, "both tasks should be removed");
    eyre::ensure!(
        removal.released_restaurants == vec![held.id()],
        "only the held restaurant should be released"
    );
    let released = system.coordinator.get_restaurant(held.id()).await?;
    eyre::ensure!(
        released.restaurant.review_status() == ReviewStatus::NotStarted,
        "held restaurant should be claimable again"
    );
    let kept = system.coordinator.get_restaurant(reviewed.id()).await?;
    eyre::ensure!(
        kept.restaurant.review_status() == ReviewStatus::Completed,
        "completed review should survive"
    );
    eyre::ensure!(
        kept.reviewer_username.is_none(),
        "deleted reviewer has no username"
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_restaurant_removes_its_tasks() -> eyre::Result<()> {
    let Some(system) = pg_system().await? else {
        return Ok(());
    };
    let restaurant = system.add_restaurant("Koshy's").await?;
    let worker = system.add_worker("asha").await?;
    let task = system
        .coordinator
        .claim_restaurant(&worker, restaurant.id())
        .await?;

    let removed = system
        .admin
        .delete_restaurant(&system.admin_principal, restaurant.id())
        .await?;

    eyre::ensure!(removed == 1, "one task should be removed");
    eyre::ensure!(
        system.store.find_task(task.id()).await?.is_none(),
        "task should be gone"
    );
    let lookup = system.coordinator.get_restaurant(restaurant.id()).await;
    eyre::ensure!(
        lookup.as_ref().is_err_and(|err| err.kind() == ReviewErrorKind::NotFound),
        "expected NotFound, got {lookup:?}"
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_username_is_rejected() -> eyre::Result<()> {
    let Some(system) = pg_system().await? else {
        return Ok(());
    };
    system.add_worker("asha").await?;

    let result = system
        .roster
        .register_worker(RegisterWorkerRequest::new("Asha Again", "asha"))
        .await;

    eyre::ensure!(
        result.as_ref().is_err_and(|err| err.kind() == ReviewErrorKind::InvalidInput),
        "expected InvalidInput, got {result:?}"
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn stale_resubmission_after_reset_leaves_the_new_claim_alone() -> eyre::Result<()> {
    let Some(system) = pg_system().await? else {
        return Ok(());
    };
    let restaurant = system.add_restaurant("Rameshwaram Cafe").await?;
    let first = system.add_worker("asha").await?;
    let second = system.add_worker("ravi").await?;
    let stale = system
        .coordinator
        .claim_restaurant(&first, restaurant.id())
        .await?;
    system
        .coordinator
        .submit_task_review(&first, stale.id(), &evidence("first-visit"))
        .await?;
    system
        .admin
        .override_restaurant_status(
            &system.admin_principal,
            restaurant.id(),
            ReviewStatus::NotStarted,
        )
        .await?;
    let fresh = system
        .coordinator
        .claim_restaurant(&second, restaurant.id())
        .await?;

    let replay = system
        .coordinator
        .submit_task_review(&first, stale.id(), &evidence("first-visit"))
        .await?;
    eyre::ensure!(
        matches!(replay, SubmissionOutcome::AlreadyCompleted(_)),
        "stale resubmission should be a no-op"
    );
    let detail = system.coordinator.get_restaurant(restaurant.id()).await?;
    eyre::ensure!(
        detail.restaurant.review_status() == ReviewStatus::Pending,
        "restaurant should stay claimed by the second worker"
    );

    system
        .coordinator
        .submit_task_review(&second, fresh.id(), &evidence("second-visit"))
        .await?;
    let detail = system.coordinator.get_restaurant(restaurant.id()).await?;
    eyre::ensure!(
        detail.reviewer_username.as_deref() == Some("ravi"),
        "second worker should be the reviewer"
    );
    let profile = system.roster.get_worker(second.worker_id).await?;
    eyre::ensure!(profile.tasks_completed() == 1, "second counter should be 1");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn evidence_recorded_from_a_stale_read_cannot_undo_a_reset() -> eyre::Result<()> {
    let Some(system) = pg_system().await? else {
        return Ok(());
    };
    let restaurant = system.add_restaurant("Nagarjuna").await?;
    let worker = system.add_worker("asha").await?;
    system
        .coordinator
        .claim_restaurant(&worker, restaurant.id())
        .await?;
    let mut reviewed = system
        .store
        .find_restaurant(restaurant.id())
        .await?
        .ok_or_else(|| eyre::eyre!("restaurant should be stored"))?;
    let images = EvidenceImages::validate(&evidence("nagarjuna"), &TrustedImageHost::default())?;
    let changed = reviewed.record_evidence(images, worker.worker_id, &DefaultClock)?;
    eyre::ensure!(changed, "pending restaurant should accept evidence");
    system
        .admin
        .override_restaurant_status(
            &system.admin_principal,
            restaurant.id(),
            ReviewStatus::NotStarted,
        )
        .await?;

    let result = system.store.record_review(&reviewed).await;

    eyre::ensure!(
        matches!(
            result,
            Err(ReviewRepositoryError::ReviewNotOpen {
                status: ReviewStatus::NotStarted,
                ..
            })
        ),
        "expected ReviewNotOpen, got {result:?}"
    );
    let stored = system
        .store
        .find_restaurant(restaurant.id())
        .await?
        .ok_or_else(|| eyre::eyre!("restaurant should be stored"))?;
    eyre::ensure!(
        stored.review_status() == ReviewStatus::NotStarted,
        "reset should survive the late write"
    );
    Ok(())
}
