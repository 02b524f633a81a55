use actix_web::{error::ErrorInternalServerError, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::db_interaction::{load_config, set_ordering_allowed};
use crate::utils::{get_pooled_connection, DbPool};

#[derive(Deserialize, Debug)]
pub struct OrderingGateForm{
    pub allowed: bool
}

#[derive(Serialize)]
pub struct OrderingGateStatus{
    pub allowed: bool
}

// Flip the persisted gate that decides whether new orders may be placed
#[tracing::instrument(
    "Flipping the ordering gate",
    skip(pool)
)]
pub async fn set_ordering_gate(
    pool: web::Data<DbPool>,
    form: web::Form<OrderingGateForm>
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    set_ordering_allowed(conn, form.allowed)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().finish())
}

#[tracing::instrument(
    "Reading the ordering gate",
    skip(pool)
)]
pub async fn get_ordering_gate(
    pool: web::Data<DbPool>
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let config = load_config(conn)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(OrderingGateStatus{ allowed: config.ordering_allowed }))
}
