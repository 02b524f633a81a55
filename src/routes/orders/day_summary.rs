use actix_web::{error::ErrorInternalServerError, web, HttpResponse};
use chrono::Utc;

use crate::db_interaction;
use crate::utils::{get_pooled_connection, DbPool};

// Today's orders bucketed by (company, arrival time) with cost totals,
// the admin's packing list for the delivery calls
#[tracing::instrument(
    "Summarizing today's orders",
    skip(pool)
)]
pub async fn day_summary(
    pool: web::Data<DbPool>
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let buckets = db_interaction::day_summary(conn, Utc::now().date_naive())
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(buckets))
}
