use actix_web::{error::ErrorInternalServerError, web, HttpResponse};

use crate::db_interaction;
use crate::utils::{get_pooled_connection, DbPool};

#[tracing::instrument(
    "Listing companies",
    skip(pool)
)]
pub async fn list_companies(
    pool: web::Data<DbPool>
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let companies = db_interaction::list_companies(conn)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(companies))
}
