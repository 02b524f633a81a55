use actix_web::{error::{ErrorConflict, ErrorInternalServerError}, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::db_interaction::{open_event, PizzaError};
use crate::models::PizzaEvent;
use crate::utils::{get_pooled_connection, DbPool};

#[derive(Deserialize, Debug)]
pub struct OpenEventForm{
    pub event_name: String,
    pub company: String,
    pub deadline: DateTime<Utc>,
    pub eta: Option<DateTime<Utc>>
}

// Open a group order; the whole office shares one at a time
#[tracing::instrument(
    "Opening a pizza event",
    skip(pool, uid)
)]
pub async fn open_pizza_event(
    pool: web::Data<DbPool>,
    form: web::Form<OpenEventForm>,
    uid: CurrentUser
) -> Result<HttpResponse, actix_web::Error> {
    let event = PizzaEvent{
        event_id: Uuid::new_v4(),
        created_by: uid.user_id,
        event_name: form.event_name.clone(),
        company: form.company.clone(),
        created_at: Utc::now(),
        deadline: form.deadline,
        eta: form.eta,
        closed: false
    };

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let event_id = open_event(conn, event)
        .await
        .map_err(|e| {
            match e {
                PizzaError::EventAlreadyOpen => ErrorConflict(e),
                _ => ErrorInternalServerError(e)
            }
        })?;

    Ok(HttpResponse::Created().json(event_id))
}
