use actix_web::{error::{ErrorForbidden, ErrorInternalServerError}, web, HttpResponse};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::db_interaction::{get_company, get_user, insert_order, OrderInsertError};
use crate::email_client::EmailClient;
use crate::models::Order;
use crate::notifications::send_order_copy;
use crate::utils::{day_bounds, get_pooled_connection, DbPool};

#[derive(Deserialize, Debug, Clone, Copy)]
pub enum ArrivalTime{
    #[serde(rename = "12:00")]
    Noon,
    #[serde(rename = "13:00")]
    One
}

impl ArrivalTime {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArrivalTime::Noon => "12:00",
            ArrivalTime::One => "13:00"
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct OrderForm{
    pub description: String,
    pub cost: i32,
    pub company_id: Uuid,
    pub arrival_time: ArrivalTime,
    // defaults to today when the form leaves it out
    pub ordered_for: Option<NaiveDate>,
    #[serde(default)]
    pub send_me_a_copy: bool
}

#[tracing::instrument(
    "Placing an order",
    skip(pool, email_client, uid)
)]
pub async fn create_order(
    pool: web::Data<DbPool>,
    email_client: web::Data<EmailClient>,
    form: web::Form<OrderForm>,
    uid: CurrentUser
) -> Result<HttpResponse, actix_web::Error> {
    let day = form.ordered_for.unwrap_or_else(|| Utc::now().date_naive());
    let (ordered_for, _) = day_bounds(day);

    let order = Order{
        order_id: Uuid::new_v4(),
        user_id: uid.user_id,
        company_id: form.company_id,
        description: form.description.clone(),
        cost: form.cost,
        arrival_time: form.arrival_time.as_str().to_string(),
        ordered_for
    };

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let order = insert_order(conn, order)
        .await
        .map_err(|e| {
            match e {
                OrderInsertError::OrderingBlocked(text) => ErrorForbidden(text),
                OrderInsertError::UserBlocked(text) => ErrorForbidden(text),
                _ => ErrorInternalServerError(e)
            }
        })?;

    if form.send_me_a_copy {
        let conn = get_pooled_connection(&pool)
            .await
            .map_err(ErrorInternalServerError)?;
        let user = get_user(conn, uid.user_id)
            .await
            .map_err(ErrorInternalServerError)?;

        let conn = get_pooled_connection(&pool)
            .await
            .map_err(ErrorInternalServerError)?;
        let company = get_company(conn, order.company_id)
            .await
            .map_err(ErrorInternalServerError)?;

        send_order_copy(&email_client, &user.email, &order, &company.name)
            .await
            .map_err(ErrorInternalServerError)?;
    }

    Ok(HttpResponse::Created().json(order.order_id))
}
