use std::{error::Error, fmt::Debug};

use anyhow::Context;
use diesel::upsert::excluded;
use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::ProviderIdentity;
use crate::models::User;
use crate::schema::users;
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::{error_fmt_chain, DbConnection};

// Mirror the provider identity into the local users table. The first login
// creates the row; later logins refresh email and display name but keep the
// locally managed flags (active, is_admin, reminder preference).
#[tracing::instrument(
    "Upserting user from provider identity",
    skip(conn)
)]
pub async fn upsert_user_from_identity(
    mut conn: DbConnection,
    identity: ProviderIdentity
) -> Result<User, anyhow::Error> {
    let user = User{
        user_id: Uuid::new_v4(),
        provider_subject: identity.sub,
        email: identity.email,
        name: identity.name,
        active: true,
        is_admin: false,
        wants_daily_reminder: false
    };

    let res = spawn_blocking_with_tracing(move || {
        diesel::insert_into(users::table)
            .values(&user)
            .on_conflict(users::provider_subject)
            .do_update()
            .set((
                users::email.eq(excluded(users::email)),
                users::name.eq(excluded(users::name))
            ))
            .get_result::<User>(&mut conn)
            .context("Failed to upsert user from provider identity")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

// Function to query a single user row
pub async fn get_user(
    mut conn: DbConnection,
    user_id: Uuid
) -> Result<User, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        users::table
            .filter(users::user_id.eq(user_id))
            .first::<User>(&mut conn)
            .context("Failed to get user by id")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

pub async fn list_users(
    mut conn: DbConnection
) -> Result<Vec<User>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        users::table
            .order(users::name.asc())
            .load::<User>(&mut conn)
            .context("Failed to load users")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

// Error associated with updating user flags
#[derive(Error)]
pub enum UserUpdateError{
    #[error("Failed due to threadpool error")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("user_id: {0} doesn't exist")]
    NoUserIdError(Uuid)
}

impl Debug for UserUpdateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Toggling whether user may place orders",
    skip(conn)
)]
pub async fn set_user_active(
    mut conn: DbConnection,
    user_id: Uuid,
    active: bool
) -> Result<(), UserUpdateError> {
    spawn_blocking_with_tracing(move || {
        let affected_rows = diesel::update(users::table)
            .filter(users::user_id.eq(user_id))
            .set(users::active.eq(active))
            .execute(&mut conn)?;

        if affected_rows == 0 {
            return Err(UserUpdateError::NoUserIdError(user_id));
        }

        Ok(())
    })
    .await??;

    Ok(())
}

#[tracing::instrument(
    "Updating daily reminder preference",
    skip(conn)
)]
pub async fn set_daily_reminder_preference(
    mut conn: DbConnection,
    user_id: Uuid,
    wants_daily_reminder: bool
) -> Result<(), UserUpdateError> {
    spawn_blocking_with_tracing(move || {
        let affected_rows = diesel::update(users::table)
            .filter(users::user_id.eq(user_id))
            .set(users::wants_daily_reminder.eq(wants_daily_reminder))
            .execute(&mut conn)?;

        if affected_rows == 0 {
            return Err(UserUpdateError::NoUserIdError(user_id));
        }

        Ok(())
    })
    .await??;

    Ok(())
}

// Active subscribers of the daily reminder email
pub async fn daily_reminder_subscribers(
    mut conn: DbConnection
) -> Result<Vec<User>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        users::table
            .filter(users::wants_daily_reminder.eq(true))
            .filter(users::active.eq(true))
            .load::<User>(&mut conn)
            .context("Failed to load daily reminder subscribers")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}
