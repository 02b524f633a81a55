use actix_web::{error::ErrorInternalServerError, web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::db_interaction::insert_food;
use crate::models::Food;
use crate::utils::{day_bounds, get_pooled_connection, DbPool};

#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum FoodType{
    Daily,
    Weekly,
    Menu
}

impl FoodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FoodType::Daily => "daily",
            FoodType::Weekly => "weekly",
            FoodType::Menu => "menu"
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct AddFoodForm{
    pub company_id: Uuid,
    pub description: String,
    pub cost: i32,
    pub available_from: NaiveDate,
    pub available_to: NaiveDate,
    pub food_type: FoodType
}

#[tracing::instrument(
    "Adding an offer",
    skip(pool)
)]
pub async fn add_food(
    pool: web::Data<DbPool>,
    form: web::Form<AddFoodForm>
) -> Result<HttpResponse, actix_web::Error> {
    let (available_from, _) = day_bounds(form.available_from);
    // availability runs through the end of the last day
    let (_, available_to) = day_bounds(form.available_to);

    let food = Food{
        food_id: Uuid::new_v4(),
        company_id: form.company_id,
        description: form.description.clone(),
        cost: form.cost,
        available_from,
        available_to,
        food_type: form.food_type.as_str().to_string()
    };

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let food_id = food.food_id;
    insert_food(conn, food)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Created().json(food_id))
}
