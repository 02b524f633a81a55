use actix_web::{error::{ErrorBadRequest, ErrorInternalServerError}, web, HttpResponse};
use serde::Deserialize;

use crate::db_interaction::{payment_board, PaymentFilter};
use crate::utils::{get_pooled_connection, DbPool};

#[derive(Deserialize, Debug)]
pub struct BoardQuery{
    #[serde(default = "default_filter")]
    pub filter: PaymentFilter
}

fn default_filter() -> PaymentFilter {
    PaymentFilter::All
}

// Who ordered in the month, what they owe and whether they paid
#[tracing::instrument(
    "Showing the payment board",
    skip(pool)
)]
pub async fn finance_board(
    pool: web::Data<DbPool>,
    path: web::Path<(i32, u32)>,
    query: web::Query<BoardQuery>
) -> Result<HttpResponse, actix_web::Error> {
    let (year, month) = path.into_inner();
    if !(1..=12).contains(&month) {
        return Err(ErrorBadRequest("month must be between 1 and 12"));
    }

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let board = payment_board(conn, year, month, query.filter)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(board))
}
