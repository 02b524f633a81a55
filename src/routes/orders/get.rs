use actix_web::{error::ErrorInternalServerError, web, HttpResponse};

use crate::auth::CurrentUser;
use crate::db_interaction::orders_for_user;
use crate::utils::{get_pooled_connection, DbPool};

#[tracing::instrument(
    "Listing the caller's orders",
    skip(pool, uid)
)]
pub async fn my_orders(
    pool: web::Data<DbPool>,
    uid: CurrentUser
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let orders = orders_for_user(conn, uid.user_id)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(orders))
}
