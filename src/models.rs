use chrono::{DateTime, Utc};
use diesel::prelude::{Insertable, Queryable};
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::schema::{
    app_config, companies, conflicts, finance, foods, orders, pizza_choices, pizza_events, users,
};

#[derive(Queryable, Insertable, Serialize, Deserialize, Clone, Debug)]
#[diesel(table_name = users)]
pub struct User{
    pub user_id: Uuid,
    pub provider_subject: String,
    pub email: String,
    pub name: String,
    pub active: bool,
    pub is_admin: bool,
    pub wants_daily_reminder: bool
}

#[derive(Queryable, Insertable, Serialize, Deserialize, Clone, Debug)]
#[diesel(table_name = companies)]
pub struct Company{
    pub company_id: Uuid,
    pub name: String,
    pub web_page: Option<String>,
    pub address: Option<String>,
    pub telephone: Option<String>
}

#[derive(Queryable, Insertable, Serialize, Deserialize, Clone, Debug)]
#[diesel(table_name = foods)]
pub struct Food{
    pub food_id: Uuid,
    pub company_id: Uuid,
    pub description: String,
    pub cost: i32,
    pub available_from: DateTime<Utc>,
    pub available_to: DateTime<Utc>,
    pub food_type: String
}

#[derive(Queryable, Insertable, Serialize, Deserialize, Clone, Debug)]
#[diesel(table_name = orders)]
pub struct Order{
    pub order_id: Uuid,
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub description: String,
    pub cost: i32,
    pub arrival_time: String,
    pub ordered_for: DateTime<Utc>
}

#[derive(Queryable, Insertable, Serialize, Deserialize, Clone, Debug)]
#[diesel(table_name = finance)]
pub struct FinanceRecord{
    pub finance_id: Uuid,
    pub user_id: Uuid,
    pub year: i32,
    pub month: i32,
    pub did_user_pay: bool
}

// The unique configuration record; replaces the original magic id=1 rows
#[derive(Queryable, Insertable, Serialize, Deserialize, Clone, Debug)]
#[diesel(table_name = app_config)]
pub struct AppConfig{
    pub config_id: Uuid,
    pub ordering_allowed: bool,
    pub daily_reminder_subject: String,
    pub daily_reminder: String,
    pub monthly_pay_summary: String,
    pub pay_reminder: String,
    pub pay_slacker_reminder: String,
    pub info_page_text: String,
    pub blocked_user_text: String,
    pub ordering_blocked_text: String
}

#[derive(Queryable, Insertable, Serialize, Deserialize, Clone, Debug)]
#[diesel(table_name = pizza_events)]
pub struct PizzaEvent{
    pub event_id: Uuid,
    pub created_by: Uuid,
    pub event_name: String,
    pub company: String,
    pub created_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub eta: Option<DateTime<Utc>>,
    pub closed: bool
}

#[derive(Queryable, Insertable, Serialize, Deserialize, Clone, Debug)]
#[diesel(table_name = pizza_choices)]
pub struct PizzaChoice{
    pub choice_id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub item: String,
    pub size: Option<String>,
    pub created_at: DateTime<Utc>
}

#[derive(Queryable, Insertable, Serialize, Deserialize, Clone, Debug)]
#[diesel(table_name = conflicts)]
pub struct Conflict{
    pub conflict_id: Uuid,
    pub created_by: Uuid,
    pub order_id: Uuid,
    pub accused_user: Option<Uuid>,
    pub did_order_come: bool,
    pub i_know_who: bool,
    pub resolved: bool,
    pub resolved_by: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>
}
