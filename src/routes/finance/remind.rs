use actix_web::{error::ErrorInternalServerError, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::db_interaction::{get_user, load_config, unpaid_month_count};
use crate::email_client::EmailClient;
use crate::notifications;
use crate::utils::{get_pooled_connection, DbPool};

// Somebody owing for more than one month gets the blunter text
const SLACKER_THRESHOLD: i64 = 2;

#[derive(Deserialize, Debug)]
pub struct RemindForm{
    pub user_id: Uuid
}

#[tracing::instrument(
    "Sending a payment reminder",
    skip(pool, email_client)
)]
pub async fn send_payment_reminder(
    pool: web::Data<DbPool>,
    email_client: web::Data<EmailClient>,
    form: web::Form<RemindForm>
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;
    let user = get_user(conn, form.user_id)
        .await
        .map_err(ErrorInternalServerError)?;

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;
    let config = load_config(conn)
        .await
        .map_err(ErrorInternalServerError)?;

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;
    let unpaid_months = unpaid_month_count(conn, form.user_id)
        .await
        .map_err(ErrorInternalServerError)?;

    notifications::send_payment_reminder(
        &email_client,
        &user,
        &config,
        unpaid_months >= SLACKER_THRESHOLD
    )
    .await
    .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().finish())
}
