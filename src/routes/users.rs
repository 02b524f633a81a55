use actix_web::{error::{ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::db_interaction::{list_users, set_daily_reminder_preference, set_user_active, UserUpdateError};
use crate::utils::{get_pooled_connection, DbPool};

#[tracing::instrument(
    "Listing users",
    skip(pool)
)]
pub async fn list_all_users(
    pool: web::Data<DbPool>
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let users = list_users(conn)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(users))
}

#[derive(Deserialize, Debug)]
pub struct UserActiveForm{
    pub user_id: Uuid,
    pub active: bool
}

// Block or unblock a user from placing orders
#[tracing::instrument(
    "Toggling a user's active flag",
    skip(pool)
)]
pub async fn toggle_user_active(
    pool: web::Data<DbPool>,
    form: web::Form<UserActiveForm>
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    set_user_active(conn, form.user_id, form.active)
        .await
        .map_err(|e| {
            match e {
                UserUpdateError::NoUserIdError(_) => ErrorNotFound(e),
                _ => ErrorInternalServerError(e)
            }
        })?;

    Ok(HttpResponse::Ok().finish())
}

#[derive(Deserialize, Debug)]
pub struct ReminderPreferenceForm{
    pub wants_daily_reminder: bool
}

// The caller opting in or out of the daily reminder email
#[tracing::instrument(
    "Updating the caller's reminder preference",
    skip(pool, uid)
)]
pub async fn set_reminder_preference(
    pool: web::Data<DbPool>,
    form: web::Form<ReminderPreferenceForm>,
    uid: CurrentUser
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    set_daily_reminder_preference(conn, uid.user_id, form.wants_daily_reminder)
        .await
        .map_err(|e| {
            match e {
                UserUpdateError::NoUserIdError(_) => ErrorNotFound(e),
                _ => ErrorInternalServerError(e)
            }
        })?;

    Ok(HttpResponse::Ok().finish())
}
