use actix_web::{error::{ErrorConflict, ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::db_interaction::{add_choice, PizzaError};
use crate::utils::{get_pooled_connection, DbPool};

#[derive(Deserialize, Debug)]
pub struct ChoiceForm{
    pub item: String,
    pub size: Option<String>
}

#[tracing::instrument(
    "Adding a pizza choice",
    skip(pool, uid)
)]
pub async fn add_pizza_choice(
    pool: web::Data<DbPool>,
    form: web::Form<ChoiceForm>,
    uid: CurrentUser
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let choice_id = add_choice(
        conn,
        uid.user_id,
        form.item.clone(),
        form.size.clone(),
        Utc::now()
    )
    .await
    .map_err(|e| {
        match e {
            PizzaError::NoOpenEvent => ErrorNotFound(e),
            PizzaError::DeadlinePassed | PizzaError::EventClosed => ErrorConflict(e),
            _ => ErrorInternalServerError(e)
        }
    })?;

    Ok(HttpResponse::Created().json(choice_id))
}
