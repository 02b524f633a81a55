use actix_web::{error::{ErrorBadGateway, ErrorInternalServerError, ErrorUnprocessableEntity}, web, HttpResponse};
use chrono::{Datelike, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::db_interaction::{get_company_by_name, insert_foods};
use crate::menus::{
    parse_daily_specials, parse_weekly_menu, MenuClient, MenuError, KOZIOLEK_COMPANY,
    TOMAS_COMPANY,
};
use crate::models::Food;
use crate::utils::{day_bounds, get_pooled_connection, DbPool};

#[derive(Serialize)]
pub struct ImportReport{
    pub company: String,
    pub inserted: usize
}

fn menu_error_to_response(e: MenuError) -> actix_web::Error {
    match e {
        MenuError::RequestError(_) => ErrorBadGateway(e),
        MenuError::UnexpectedPageShape(_) => ErrorUnprocessableEntity(e)
    }
}

// Scrape the Pod Koziołkiem page and file today's specials as daily offers
#[tracing::instrument(
    "Importing the daily specials from Pod Koziołkiem",
    skip_all
)]
pub async fn import_koziolek_menu(
    pool: web::Data<DbPool>,
    menu_client: web::Data<MenuClient>
) -> Result<HttpResponse, actix_web::Error> {
    let page = menu_client
        .fetch_koziolek_page()
        .await
        .map_err(menu_error_to_response)?;

    let menu = parse_daily_specials(&page).map_err(menu_error_to_response)?;

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;
    let company = get_company_by_name(conn, KOZIOLEK_COMPANY.to_string())
        .await
        .map_err(ErrorInternalServerError)?
        .ok_or_else(|| {
            ErrorUnprocessableEntity(format!("company {} is not registered", KOZIOLEK_COMPANY))
        })?;

    let (available_from, available_to) = day_bounds(Utc::now().date_naive());
    let batch: Vec<Food> = menu
        .offers()
        .into_iter()
        .map(|description| Food{
            food_id: Uuid::new_v4(),
            company_id: company.company_id,
            description,
            cost: 0,
            available_from,
            available_to,
            food_type: "daily".to_string()
        })
        .collect();

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;
    let inserted = insert_foods(conn, batch)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(ImportReport{
        company: company.name,
        inserted
    }))
}

// Scrape the Tomas page and file the week's soup + main combinations as
// weekly offers, one weekday each
#[tracing::instrument(
    "Importing the weekly menu from Tomas",
    skip_all
)]
pub async fn import_tomas_menu(
    pool: web::Data<DbPool>,
    menu_client: web::Data<MenuClient>
) -> Result<HttpResponse, actix_web::Error> {
    let page = menu_client
        .fetch_tomas_page()
        .await
        .map_err(menu_error_to_response)?;

    let menu = parse_weekly_menu(&page).map_err(menu_error_to_response)?;

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;
    let company = get_company_by_name(conn, TOMAS_COMPANY.to_string())
        .await
        .map_err(ErrorInternalServerError)?
        .ok_or_else(|| {
            ErrorUnprocessableEntity(format!("company {} is not registered", TOMAS_COMPANY))
        })?;

    let today = Utc::now().date_naive();
    let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);

    let mut batch: Vec<Food> = Vec::new();
    for (offset, day_menu) in menu.days.iter().enumerate() {
        let day = monday + Duration::days(offset as i64);
        let (available_from, available_to) = day_bounds(day);

        for combo in day_menu.combos() {
            batch.push(Food{
                food_id: Uuid::new_v4(),
                company_id: company.company_id,
                description: combo,
                cost: 0,
                available_from,
                available_to,
                food_type: "weekly".to_string()
            });
        }
    }

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;
    let inserted = insert_foods(conn, batch)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(ImportReport{
        company: company.name,
        inserted
    }))
}
