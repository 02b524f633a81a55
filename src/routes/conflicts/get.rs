use actix_web::{error::ErrorInternalServerError, web, HttpResponse};

use crate::db_interaction::open_conflicts;
use crate::utils::{get_pooled_connection, DbPool};

#[tracing::instrument(
    "Listing open conflicts",
    skip(pool)
)]
pub async fn list_open_conflicts(
    pool: web::Data<DbPool>
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let conflicts = open_conflicts(conn)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(conflicts))
}
