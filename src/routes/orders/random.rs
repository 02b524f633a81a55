use actix_web::{error::{ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use chrono::Utc;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::db_interaction::{available_foods, top_descriptions_for_day};
use crate::utils::{get_pooled_connection, DbPool};

#[derive(Serialize)]
pub struct MealSuggestion{
    pub suggestion: String
}

// Suggest a meal: prefer what colleagues keep ordering today (at most the
// three most frequent descriptions), otherwise anything currently on offer.
#[tracing::instrument(
    "Suggesting a random meal",
    skip(pool)
)]
pub async fn random_meal(
    pool: web::Data<DbPool>
) -> Result<HttpResponse, actix_web::Error> {
    let now = Utc::now();

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let mut candidates = top_descriptions_for_day(conn, now.date_naive())
        .await
        .map_err(ErrorInternalServerError)?;

    if candidates.is_empty() {
        let conn = get_pooled_connection(&pool)
            .await
            .map_err(ErrorInternalServerError)?;
        candidates = available_foods(conn, now)
            .await
            .map_err(ErrorInternalServerError)?
            .into_iter()
            .map(|food| food.description)
            .collect();
    }

    let suggestion = candidates
        .choose(&mut rand::thread_rng())
        .cloned()
        .ok_or_else(|| ErrorNotFound("Nothing to suggest today"))?;

    Ok(HttpResponse::Ok().json(MealSuggestion{ suggestion }))
}
