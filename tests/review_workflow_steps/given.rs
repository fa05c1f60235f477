//! Given steps for review workflow BDD scenarios.

use super::world::{ReviewWorld, run_async};
use eyre::WrapErr;
use fieldreview::review::services::{RegisterRestaurantRequest, RegisterWorkerRequest};
use rstest_bdd_macros::given;

fn register_restaurant(
    world: &mut ReviewWorld,
    name: String,
    latitude: f64,
    longitude: f64,
) -> Result<(), eyre::Report> {
    let restaurant = run_async(world.coordinator.review_state().register_restaurant(
        RegisterRestaurantRequest::new(
            name.clone(),
            "+91 80 2222 0000",
            "Bengaluru",
            latitude,
            longitude,
        ),
    ))
    .wrap_err("register restaurant for scenario")?;
    world.restaurants.insert(name, restaurant.id());
    Ok(())
}

#[given(r#"an approved worker "{username}""#)]
fn approved_worker(world: &mut ReviewWorld, username: String) -> Result<(), eyre::Report> {
    let worker = run_async(
        world
            .roster
            .register_worker(RegisterWorkerRequest::new(username.clone(), username.clone())),
    )
    .wrap_err("register worker for scenario")?;
    let approved = run_async(world.admin.approve_worker(&world.admin_principal, worker.id()))
        .wrap_err("approve worker for scenario")?;
    world.workers.insert(username, approved.principal());
    Ok(())
}

#[given(r#"an unapproved worker "{username}""#)]
fn unapproved_worker(world: &mut ReviewWorld, username: String) -> Result<(), eyre::Report> {
    let worker = run_async(
        world
            .roster
            .register_worker(RegisterWorkerRequest::new(username.clone(), username.clone())),
    )
    .wrap_err("register worker for scenario")?;
    world.workers.insert(username, worker.principal());
    Ok(())
}

#[given(r#"a restaurant "{name}" near the office"#)]
fn restaurant_near_office(world: &mut ReviewWorld, name: String) -> Result<(), eyre::Report> {
    register_restaurant(world, name, 12.9756, 77.6006)
}

#[given(r#"a restaurant "{name}" far from the office"#)]
fn restaurant_far_from_office(world: &mut ReviewWorld, name: String) -> Result<(), eyre::Report> {
    register_restaurant(world, name, 12.9698, 77.75)
}

#[given(r#""{username}" has claimed "{name}""#)]
fn worker_has_claimed(
    world: &mut ReviewWorld,
    username: String,
    name: String,
) -> Result<(), eyre::Report> {
    let principal = world.worker(&username)?;
    let restaurant_id = world.restaurant(&name)?;
    let task = run_async(world.coordinator.claim_restaurant(&principal, restaurant_id))
        .wrap_err("claim restaurant in scenario setup")?;
    world.claimed_tasks.insert(username, task);
    Ok(())
}
