use std::collections::HashMap;

use actix_web::{error::{ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use serde::Serialize;
use uuid::Uuid;

use crate::db_interaction::active_event;
use crate::models::PizzaEvent;
use crate::utils::{get_pooled_connection, DbPool};

#[derive(Serialize)]
pub struct PizzaChoiceView{
    pub item: String,
    pub size: Option<String>
}

// The open event with choices folded per participant
#[derive(Serialize)]
pub struct PizzaEventView{
    #[serde(flatten)]
    pub event: PizzaEvent,
    pub choices: HashMap<Uuid, Vec<PizzaChoiceView>>
}

#[tracing::instrument(
    "Showing the open pizza event",
    skip(pool)
)]
pub async fn active_pizza_event(
    pool: web::Data<DbPool>
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let (event, choices) = active_event(conn)
        .await
        .map_err(ErrorInternalServerError)?
        .ok_or_else(|| ErrorNotFound("No open pizza event"))?;

    let mut per_user: HashMap<Uuid, Vec<PizzaChoiceView>> = HashMap::new();
    for choice in choices {
        per_user
            .entry(choice.user_id)
            .or_default()
            .push(PizzaChoiceView{ item: choice.item, size: choice.size });
    }

    Ok(HttpResponse::Ok().json(PizzaEventView{ event, choices: per_user }))
}
