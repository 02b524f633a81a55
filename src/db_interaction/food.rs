use std::{error::Error, fmt::Debug};

use anyhow::Context;
use chrono::{DateTime, Utc};
use diesel::{Connection, ExpressionMethods, QueryDsl, RunQueryDsl};
use thiserror::Error;

use crate::models::Food;
use crate::schema::foods;
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::{error_fmt_chain, DbConnection};

// Error associated with inserting offers
#[derive(Error)]
pub enum FoodInsertError{
    #[error("Failed due to threadpool error")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to insert into foods table")]
    InsertError(#[from] diesel::result::Error)
}

impl Debug for FoodInsertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Inserting an offer into the database",
    skip_all
)]
pub async fn insert_food(
    mut conn: DbConnection,
    food: Food
) -> Result<(), FoodInsertError> {
    spawn_blocking_with_tracing(move || {
        diesel::insert_into(foods::table)
            .values(food)
            .execute(&mut conn)
    })
    .await??;

    Ok(())
}

// Batch insert used by the menu importers; all offers of one scrape land
// together or not at all.
#[tracing::instrument(
    "Inserting a batch of scraped offers",
    skip_all
)]
pub async fn insert_foods(
    mut conn: DbConnection,
    batch: Vec<Food>
) -> Result<usize, FoodInsertError> {
    let inserted = spawn_blocking_with_tracing(move || {
        conn.transaction::<usize, diesel::result::Error, _>(|conn| {
            diesel::insert_into(foods::table)
                .values(&batch)
                .execute(conn)
        })
    })
    .await??;

    Ok(inserted)
}

// Offers whose availability window covers the given instant
pub async fn available_foods(
    mut conn: DbConnection,
    now: DateTime<Utc>
) -> Result<Vec<Food>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        foods::table
            .filter(foods::available_from.le(now))
            .filter(foods::available_to.ge(now))
            .order(foods::description.asc())
            .load::<Food>(&mut conn)
            .context("Failed to load available foods")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

pub async fn list_foods(
    mut conn: DbConnection
) -> Result<Vec<Food>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        foods::table
            .order(foods::available_from.desc())
            .load::<Food>(&mut conn)
            .context("Failed to load foods")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}
