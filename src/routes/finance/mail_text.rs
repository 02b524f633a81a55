use actix_web::{error::ErrorInternalServerError, web, HttpResponse};

use crate::db_interaction::{self, load_config, MailTextUpdate};
use crate::utils::{get_pooled_connection, DbPool};

#[tracing::instrument(
    "Reading the notification texts",
    skip(pool)
)]
pub async fn get_mail_texts(
    pool: web::Data<DbPool>
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let config = load_config(conn)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(config))
}

#[tracing::instrument(
    "Rewriting the notification texts",
    skip(pool, form)
)]
pub async fn update_mail_texts(
    pool: web::Data<DbPool>,
    form: web::Form<MailTextUpdate>
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    db_interaction::update_mail_texts(conn, form.into_inner())
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().finish())
}
