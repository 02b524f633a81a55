use actix_web::{error::{ErrorBadRequest, ErrorInternalServerError}, web, HttpResponse};
use serde::Serialize;
use uuid::Uuid;

use crate::db_interaction::{company_summary, month_orders, year_summary};
use crate::models::Order;
use crate::utils::{get_pooled_connection, DbPool};

#[derive(Serialize)]
pub struct MonthOrderList{
    pub orders: Vec<Order>,
    pub total_cost: i64
}

#[tracing::instrument(
    "Listing a user's orders for one month",
    skip(pool)
)]
pub async fn order_list_month(
    pool: web::Data<DbPool>,
    path: web::Path<(Uuid, i32, u32)>
) -> Result<HttpResponse, actix_web::Error> {
    let (user_id, year, month) = path.into_inner();
    if !(1..=12).contains(&month) {
        return Err(ErrorBadRequest("month must be between 1 and 12"));
    }

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let (orders, total_cost) = month_orders(conn, user_id, year, month)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(MonthOrderList{ orders, total_cost }))
}

#[tracing::instrument(
    "Listing a user's per-month totals for one year",
    skip(pool)
)]
pub async fn order_list_year(
    pool: web::Data<DbPool>,
    path: web::Path<(Uuid, i32)>
) -> Result<HttpResponse, actix_web::Error> {
    let (user_id, year) = path.into_inner();

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let summary = year_summary(conn, user_id, year)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(summary))
}

#[tracing::instrument(
    "Summarizing a month's orders per company",
    skip(pool)
)]
pub async fn company_summary_month(
    pool: web::Data<DbPool>,
    path: web::Path<(i32, u32)>
) -> Result<HttpResponse, actix_web::Error> {
    let (year, month) = path.into_inner();
    if !(1..=12).contains(&month) {
        return Err(ErrorBadRequest("month must be between 1 and 12"));
    }

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let summary = company_summary(conn, year, month)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(summary))
}
