use actix_web::{error::{ErrorBadRequest, ErrorInternalServerError}, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::db_interaction::{load_config, payment_board, PaymentFilter};
use crate::email_client::EmailClient;
use crate::notifications;
use crate::utils::{get_pooled_connection, DbPool};

#[derive(Deserialize, Debug)]
pub struct MailAllForm{
    pub year: i32,
    pub month: u32
}

#[derive(Serialize)]
pub struct MailAllReport{
    pub sent: usize
}

// Email every user who ordered in the month their lunch total
#[tracing::instrument(
    "Mailing the monthly summary to everyone",
    skip(pool, email_client)
)]
pub async fn send_monthly_summary_to_all(
    pool: web::Data<DbPool>,
    email_client: web::Data<EmailClient>,
    form: web::Form<MailAllForm>
) -> Result<HttpResponse, actix_web::Error> {
    if !(1..=12).contains(&form.month) {
        return Err(ErrorBadRequest("month must be between 1 and 12"));
    }

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;
    let board = payment_board(conn, form.year, form.month, PaymentFilter::All)
        .await
        .map_err(ErrorInternalServerError)?;

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;
    let config = load_config(conn)
        .await
        .map_err(ErrorInternalServerError)?;

    let sent = notifications::send_monthly_summary(
        &email_client,
        &board,
        &config,
        form.year,
        form.month
    )
    .await
    .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(MailAllReport{ sent }))
}
