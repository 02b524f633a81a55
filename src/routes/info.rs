use actix_web::{error::ErrorInternalServerError, web, HttpResponse};
use serde::Serialize;

use crate::db_interaction::load_config;
use crate::utils::{get_pooled_connection, DbPool};

#[derive(Serialize)]
pub struct InfoPage{
    pub info_page_text: String
}

// The admin-editable info page text
#[tracing::instrument(
    "Showing the info page",
    skip(pool)
)]
pub async fn info(
    pool: web::Data<DbPool>
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let config = load_config(conn)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(InfoPage{ info_page_text: config.info_page_text }))
}
