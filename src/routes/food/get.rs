use actix_web::{error::ErrorInternalServerError, web, HttpResponse};
use chrono::Utc;

use crate::db_interaction::{available_foods, list_foods};
use crate::utils::{get_pooled_connection, DbPool};

// What can be ordered right now; backs the order form
#[tracing::instrument(
    "Listing the offers available today",
    skip(pool)
)]
pub async fn available_foods_today(
    pool: web::Data<DbPool>
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let foods = available_foods(conn, Utc::now())
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(foods))
}

#[tracing::instrument(
    "Listing every offer",
    skip(pool)
)]
pub async fn list_all_foods(
    pool: web::Data<DbPool>
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let foods = list_foods(conn)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(foods))
}
