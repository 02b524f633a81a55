use anyhow::Context;
use diesel::prelude::AsChangeset;
use diesel::{ExpressionMethods, RunQueryDsl};
use serde::Deserialize;

use crate::models::AppConfig;
use crate::schema::app_config;
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::DbConnection;

// The configuration lives in a single seeded record. Every accessor
// addresses "the one row" so nothing in the crate depends on a well-known
// primary key value.

pub async fn load_config(
    mut conn: DbConnection
) -> Result<AppConfig, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        app_config::table
            .first::<AppConfig>(&mut conn)
            .context("Failed to load the application configuration record")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

// Editable notification texts; mirrors the admin mail-text form
#[derive(AsChangeset, Deserialize, Clone, Debug)]
#[diesel(table_name = app_config)]
pub struct MailTextUpdate{
    pub daily_reminder_subject: String,
    pub daily_reminder: String,
    pub monthly_pay_summary: String,
    pub pay_reminder: String,
    pub pay_slacker_reminder: String,
    pub info_page_text: String,
    pub blocked_user_text: String,
    pub ordering_blocked_text: String
}

#[tracing::instrument(
    "Updating notification texts",
    skip_all
)]
pub async fn update_mail_texts(
    mut conn: DbConnection,
    update: MailTextUpdate
) -> Result<(), anyhow::Error> {
    spawn_blocking_with_tracing(move || {
        diesel::update(app_config::table)
            .set(update)
            .execute(&mut conn)
            .context("Failed to update notification texts")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(())
}

#[tracing::instrument(
    "Flipping the ordering gate",
    skip(conn)
)]
pub async fn set_ordering_allowed(
    mut conn: DbConnection,
    allowed: bool
) -> Result<(), anyhow::Error> {
    spawn_blocking_with_tracing(move || {
        diesel::update(app_config::table)
            .set(app_config::ordering_allowed.eq(allowed))
            .execute(&mut conn)
            .context("Failed to update the ordering gate")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(())
}
