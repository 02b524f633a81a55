use std::{error::Error, fmt::Debug};

use anyhow::Context;
use chrono::{DateTime, Utc};
use diesel::{Connection, ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{PizzaChoice, PizzaEvent};
use crate::schema::{pizza_choices, pizza_events};
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::{error_fmt_chain, DbConnection};

// Error associated with the pizza event lifecycle
#[derive(Error)]
pub enum PizzaError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("another pizza event is already open")]
    EventAlreadyOpen,
    #[error("no open pizza event")]
    NoOpenEvent,
    #[error("the event is closed")]
    EventClosed,
    #[error("the ordering deadline has passed")]
    DeadlinePassed,
    #[error("only the creator may close the event")]
    NotCreator
}

impl Debug for PizzaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

// Open a new group order. At most one event may be open at a time, checked
// inside the insert transaction.
#[tracing::instrument(
    "Opening a pizza event",
    skip_all
)]
pub async fn open_event(
    mut conn: DbConnection,
    event: PizzaEvent
) -> Result<Uuid, PizzaError> {
    let res = spawn_blocking_with_tracing(move || {
        conn.transaction::<Uuid, PizzaError, _>(|conn| {
            let open_count: i64 = pizza_events::table
                .filter(pizza_events::closed.eq(false))
                .count()
                .get_result::<i64>(conn)?;

            if open_count > 0 {
                return Err(PizzaError::EventAlreadyOpen);
            }

            diesel::insert_into(pizza_events::table)
                .values(&event)
                .execute(conn)?;

            Ok(event.event_id)
        })
    })
    .await??;

    Ok(res)
}

// The open event with its choices, if any
pub async fn active_event(
    mut conn: DbConnection
) -> Result<Option<(PizzaEvent, Vec<PizzaChoice>)>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        let event = pizza_events::table
            .filter(pizza_events::closed.eq(false))
            .first::<PizzaEvent>(&mut conn)
            .optional()
            .context("Failed to load the open pizza event")?;

        match event {
            Some(event) => {
                let choices = pizza_choices::table
                    .filter(pizza_choices::event_id.eq(event.event_id))
                    .order(pizza_choices::created_at.asc())
                    .load::<PizzaChoice>(&mut conn)
                    .context("Failed to load pizza choices")?;
                Ok::<_, anyhow::Error>(Some((event, choices)))
            },
            None => Ok(None)
        }
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

// Record one user's (item, size) pick against the open event
#[tracing::instrument(
    "Adding a pizza choice",
    skip_all
)]
pub async fn add_choice(
    mut conn: DbConnection,
    user_id: Uuid,
    item: String,
    size: Option<String>,
    now: DateTime<Utc>
) -> Result<Uuid, PizzaError> {
    let res = spawn_blocking_with_tracing(move || {
        conn.transaction::<Uuid, PizzaError, _>(|conn| {
            let event = pizza_events::table
                .filter(pizza_events::closed.eq(false))
                .first::<PizzaEvent>(conn)
                .optional()?
                .ok_or(PizzaError::NoOpenEvent)?;

            if now > event.deadline {
                return Err(PizzaError::DeadlinePassed);
            }

            let choice = PizzaChoice{
                choice_id: Uuid::new_v4(),
                event_id: event.event_id,
                user_id,
                item,
                size,
                created_at: now
            };

            diesel::insert_into(pizza_choices::table)
                .values(&choice)
                .execute(conn)?;

            Ok(choice.choice_id)
        })
    })
    .await??;

    Ok(res)
}

#[tracing::instrument(
    "Closing a pizza event",
    skip(conn)
)]
pub async fn close_event(
    mut conn: DbConnection,
    event_id: Uuid,
    user_id: Uuid
) -> Result<(), PizzaError> {
    spawn_blocking_with_tracing(move || {
        conn.transaction::<(), PizzaError, _>(|conn| {
            let event = pizza_events::table
                .filter(pizza_events::event_id.eq(event_id))
                .first::<PizzaEvent>(conn)
                .optional()?
                .ok_or(PizzaError::NoOpenEvent)?;

            if event.closed {
                return Err(PizzaError::EventClosed);
            }

            if event.created_by != user_id {
                return Err(PizzaError::NotCreator);
            }

            diesel::update(pizza_events::table)
                .filter(pizza_events::event_id.eq(event_id))
                .set(pizza_events::closed.eq(true))
                .execute(conn)?;

            Ok(())
        })
    })
    .await??;

    Ok(())
}
