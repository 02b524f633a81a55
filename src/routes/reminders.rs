use actix_web::{error::ErrorInternalServerError, web, HttpResponse};
use anyhow::Context;
use chrono::Utc;
use serde::Serialize;

use crate::db_interaction::{daily_reminder_subscribers, load_config, user_ids_with_orders_on};
use crate::email_client::EmailClient;
use crate::notifications;
use crate::startup::BaseUrl;
use crate::utils::DbPool;

#[derive(Serialize)]
pub struct ReminderReport{
    pub sent: usize
}

// Remind everyone subscribed who has not ordered yet today. Shared between
// the admin endpoint and the fixed-time timer in startup.
pub async fn run_daily_reminder(
    pool: &DbPool,
    email_client: &EmailClient,
    base_url: &str
) -> Result<usize, anyhow::Error> {
    let conn = pool.get().context("Failed to get connection from pool")?;
    let subscribers = daily_reminder_subscribers(conn).await?;

    let conn = pool.get().context("Failed to get connection from pool")?;
    let already_ordered = user_ids_with_orders_on(conn, Utc::now().date_naive()).await?;

    let recipients: Vec<_> = subscribers
        .into_iter()
        .filter(|user| !already_ordered.contains(&user.user_id))
        .collect();

    let conn = pool.get().context("Failed to get connection from pool")?;
    let config = load_config(conn).await?;

    notifications::send_daily_reminder(email_client, &recipients, &config, base_url).await
}

#[tracing::instrument(
    "Sending the daily reminder",
    skip_all
)]
pub async fn send_daily_reminder(
    pool: web::Data<DbPool>,
    email_client: web::Data<EmailClient>,
    base_url: web::Data<BaseUrl>
) -> Result<HttpResponse, actix_web::Error> {
    let sent = run_daily_reminder(&pool, &email_client, &base_url.0)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(ReminderReport{ sent }))
}
