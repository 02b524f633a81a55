use actix_web::{error::{ErrorConflict, ErrorForbidden, ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::db_interaction::{close_event, PizzaError};
use crate::utils::{get_pooled_connection, DbPool};

#[derive(Deserialize, Debug)]
pub struct CloseEventForm{
    pub event_id: Uuid
}

#[tracing::instrument(
    "Closing a pizza event",
    skip(pool, uid)
)]
pub async fn close_pizza_event(
    pool: web::Data<DbPool>,
    form: web::Form<CloseEventForm>,
    uid: CurrentUser
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    close_event(conn, form.event_id, uid.user_id)
        .await
        .map_err(|e| {
            match e {
                PizzaError::NoOpenEvent => ErrorNotFound(e),
                PizzaError::EventClosed => ErrorConflict(e),
                PizzaError::NotCreator => ErrorForbidden(e),
                _ => ErrorInternalServerError(e)
            }
        })?;

    Ok(HttpResponse::Ok().finish())
}
