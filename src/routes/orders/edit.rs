use actix_web::{error::{ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::db_interaction::{self, OrderChanges, OrderUpdateError};
use crate::routes::orders::post::ArrivalTime;
use crate::utils::{day_bounds, get_pooled_connection, DbPool};

#[derive(Deserialize, Debug)]
pub struct OrderEditForm{
    pub order_id: Uuid,
    pub description: String,
    pub cost: i32,
    pub company_id: Uuid,
    pub arrival_time: ArrivalTime,
    pub ordered_for: NaiveDate
}

#[tracing::instrument(
    "Rewriting an order on a user's behalf",
    skip(pool)
)]
pub async fn update_order(
    pool: web::Data<DbPool>,
    form: web::Form<OrderEditForm>
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let (ordered_for, _) = day_bounds(form.ordered_for);
    let changes = OrderChanges{
        description: form.description.clone(),
        cost: form.cost,
        company_id: form.company_id,
        arrival_time: form.arrival_time.as_str().to_string(),
        ordered_for
    };

    db_interaction::update_order(conn, form.order_id, changes)
        .await
        .map_err(|e| {
            match e {
                OrderUpdateError::NoOrderIdError(_) => ErrorNotFound(e),
                _ => ErrorInternalServerError(e)
            }
        })?;

    Ok(HttpResponse::Ok().finish())
}
