use actix_web::{error::{ErrorBadRequest, ErrorInternalServerError}, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::db_interaction;
use crate::utils::{get_pooled_connection, DbPool};

#[derive(Deserialize, Debug)]
pub struct PaymentStatusForm{
    pub user_id: Uuid,
    pub year: i32,
    pub month: u32,
    pub did_user_pay: bool
}

#[tracing::instrument(
    "Setting a user's payment status",
    skip(pool)
)]
pub async fn set_payment_status(
    pool: web::Data<DbPool>,
    form: web::Form<PaymentStatusForm>
) -> Result<HttpResponse, actix_web::Error> {
    if !(1..=12).contains(&form.month) {
        return Err(ErrorBadRequest("month must be between 1 and 12"));
    }

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    db_interaction::set_payment_status(conn, form.user_id, form.year, form.month, form.did_user_pay)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().finish())
}
