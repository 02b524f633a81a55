use std::collections::HashMap;
use std::{error::Error, fmt::Debug};

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::{Connection, ExpressionMethods, JoinOnDsl, QueryDsl, RunQueryDsl};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::Order;
use crate::schema::{app_config, companies, orders, users};
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::{day_bounds, error_fmt_chain, month_bounds, DbConnection};

// Error associated with placing an order
#[derive(Error)]
pub enum OrderInsertError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    // carries the admin-editable texts so handlers can surface them verbatim
    #[error("Ordering is currently blocked: {0}")]
    OrderingBlocked(String),
    #[error("User is blocked from ordering: {0}")]
    UserBlocked(String)
}

impl Debug for OrderInsertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

// Place an order. The ordering gate and the user's active flag are read in
// the same transaction as the insert so a mid-flight admin toggle cannot
// let a blocked order slip through.
#[tracing::instrument(
    "Creating order after checking the ordering gate",
    skip_all
)]
pub async fn insert_order(
    mut conn: DbConnection,
    order: Order
) -> Result<Order, OrderInsertError> {
    let res = spawn_blocking_with_tracing(move || {
        conn.transaction::<Order, OrderInsertError, _>(|conn| {
            let (ordering_allowed, ordering_blocked_text, blocked_user_text) =
                app_config::table
                    .select((
                        app_config::ordering_allowed,
                        app_config::ordering_blocked_text,
                        app_config::blocked_user_text
                    ))
                    .first::<(bool, String, String)>(conn)?;

            if !ordering_allowed {
                return Err(OrderInsertError::OrderingBlocked(ordering_blocked_text));
            }

            let user_active = users::table
                .select(users::active)
                .filter(users::user_id.eq(order.user_id))
                .first::<bool>(conn)?;

            if !user_active {
                return Err(OrderInsertError::UserBlocked(blocked_user_text));
            }

            diesel::insert_into(orders::table)
                .values(&order)
                .execute(conn)?;

            Ok(order)
        })
    })
    .await??;

    Ok(res)
}

// The caller's own orders, newest first
pub async fn orders_for_user(
    mut conn: DbConnection,
    user_id: Uuid
) -> Result<Vec<Order>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        orders::table
            .filter(orders::user_id.eq(user_id))
            .order(orders::ordered_for.desc())
            .load::<Order>(&mut conn)
            .context("Failed to load orders for user")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

// Fields an admin may rewrite on an existing order
#[derive(Deserialize, Debug, Clone)]
pub struct OrderChanges{
    pub description: String,
    pub cost: i32,
    pub company_id: Uuid,
    pub arrival_time: String,
    pub ordered_for: DateTime<Utc>
}

// Error associated with editing an order
#[derive(Error)]
pub enum OrderUpdateError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("order_id: {0} doesn't exist")]
    NoOrderIdError(Uuid)
}

impl Debug for OrderUpdateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Updating order fields",
    skip(conn, changes)
)]
pub async fn update_order(
    mut conn: DbConnection,
    order_id: Uuid,
    changes: OrderChanges
) -> Result<(), OrderUpdateError> {
    spawn_blocking_with_tracing(move || {
        let affected_rows = diesel::update(orders::table)
            .filter(orders::order_id.eq(order_id))
            .set((
                orders::description.eq(changes.description),
                orders::cost.eq(changes.cost),
                orders::company_id.eq(changes.company_id),
                orders::arrival_time.eq(changes.arrival_time),
                orders::ordered_for.eq(changes.ordered_for)
            ))
            .execute(&mut conn)?;

        if affected_rows == 0 {
            return Err(OrderUpdateError::NoOrderIdError(order_id));
        }

        Ok(())
    })
    .await??;

    Ok(())
}

// One (company, arrival time) bucket of the day's orders
#[derive(Serialize, Deserialize, Debug)]
pub struct DaySummaryBucket{
    pub company: String,
    pub arrival_time: String,
    pub orders: Vec<Order>,
    pub total_cost: i64
}

#[tracing::instrument(
    "Summarizing the day's orders by company and arrival time",
    skip(conn)
)]
pub async fn day_summary(
    mut conn: DbConnection,
    day: NaiveDate
) -> Result<Vec<DaySummaryBucket>, anyhow::Error> {
    let (start, end) = day_bounds(day);

    let rows: Vec<(Order, String)> = spawn_blocking_with_tracing(move || {
        orders::table
            .inner_join(companies::table.on(companies::company_id.eq(orders::company_id)))
            .filter(orders::ordered_for.ge(start))
            .filter(orders::ordered_for.lt(end))
            .select((orders::all_columns, companies::name))
            .order((companies::name.asc(), orders::arrival_time.asc()))
            .load::<(Order, String)>(&mut conn)
            .context("Failed to load the day's orders")
    })
    .await
    .context("Failed due to threadpool error")??;

    let mut buckets: Vec<DaySummaryBucket> = Vec::new();
    for (order, company) in rows {
        let found = buckets.iter_mut().find(|b| {
            b.company == company && b.arrival_time == order.arrival_time
        });

        match found {
            Some(bucket) => {
                bucket.total_cost += order.cost as i64;
                bucket.orders.push(order);
            },
            None => {
                buckets.push(DaySummaryBucket{
                    company,
                    arrival_time: order.arrival_time.clone(),
                    total_cost: order.cost as i64,
                    orders: vec![order]
                });
            }
        }
    }

    Ok(buckets)
}

#[tracing::instrument(
    "Loading a user's orders for one month",
    skip(conn)
)]
pub async fn month_orders(
    mut conn: DbConnection,
    user_id: Uuid,
    year: i32,
    month: u32
) -> Result<(Vec<Order>, i64), anyhow::Error> {
    let (start, end) = month_bounds(year, month);

    let rows = spawn_blocking_with_tracing(move || {
        orders::table
            .filter(orders::user_id.eq(user_id))
            .filter(orders::ordered_for.ge(start))
            .filter(orders::ordered_for.lt(end))
            .order(orders::ordered_for.asc())
            .load::<Order>(&mut conn)
            .context("Failed to load month orders")
    })
    .await
    .context("Failed due to threadpool error")??;

    let total = rows.iter().map(|o| o.cost as i64).sum();
    Ok((rows, total))
}

// Per-month cost totals of one user's year
#[derive(Serialize, Deserialize, Debug)]
pub struct MonthTotal{
    pub month: u32,
    pub total_cost: i64
}

#[tracing::instrument(
    "Aggregating a user's orders per month of a year",
    skip(conn)
)]
pub async fn year_summary(
    mut conn: DbConnection,
    user_id: Uuid,
    year: i32
) -> Result<Vec<MonthTotal>, anyhow::Error> {
    let (start, _) = month_bounds(year, 1);
    let (_, end) = month_bounds(year, 12);

    let rows = spawn_blocking_with_tracing(move || {
        orders::table
            .filter(orders::user_id.eq(user_id))
            .filter(orders::ordered_for.ge(start))
            .filter(orders::ordered_for.lt(end))
            .load::<Order>(&mut conn)
            .context("Failed to load year orders")
    })
    .await
    .context("Failed due to threadpool error")??;

    let mut totals: HashMap<u32, i64> = HashMap::new();
    for order in rows {
        use chrono::Datelike;
        *totals.entry(order.ordered_for.month()).or_insert(0) += order.cost as i64;
    }

    let mut summary: Vec<MonthTotal> = totals
        .into_iter()
        .map(|(month, total_cost)| MonthTotal{ month, total_cost })
        .collect();
    summary.sort_by_key(|entry| entry.month);

    Ok(summary)
}

// Per-company cost totals of one month
#[derive(Serialize, Deserialize, Debug)]
pub struct CompanyTotal{
    pub company: String,
    pub total_cost: i64
}

#[tracing::instrument(
    "Aggregating a month's orders per company",
    skip(conn)
)]
pub async fn company_summary(
    mut conn: DbConnection,
    year: i32,
    month: u32
) -> Result<Vec<CompanyTotal>, anyhow::Error> {
    let (start, end) = month_bounds(year, month);

    let rows: Vec<(String, i32)> = spawn_blocking_with_tracing(move || {
        orders::table
            .inner_join(companies::table.on(companies::company_id.eq(orders::company_id)))
            .filter(orders::ordered_for.ge(start))
            .filter(orders::ordered_for.lt(end))
            .select((companies::name, orders::cost))
            .load::<(String, i32)>(&mut conn)
            .context("Failed to load month orders with companies")
    })
    .await
    .context("Failed due to threadpool error")??;

    let mut totals: HashMap<String, i64> = HashMap::new();
    for (company, cost) in rows {
        *totals.entry(company).or_insert(0) += cost as i64;
    }

    let mut summary: Vec<CompanyTotal> = totals
        .into_iter()
        .map(|(company, total_cost)| CompanyTotal{ company, total_cost })
        .collect();
    summary.sort_by(|a, b| a.company.cmp(&b.company));

    Ok(summary)
}

// Descriptions ordered today, most frequent first, capped at three
#[tracing::instrument(
    "Ranking today's order descriptions by frequency",
    skip(conn)
)]
pub async fn top_descriptions_for_day(
    mut conn: DbConnection,
    day: NaiveDate
) -> Result<Vec<String>, anyhow::Error> {
    let (start, end) = day_bounds(day);

    let descriptions: Vec<String> = spawn_blocking_with_tracing(move || {
        orders::table
            .filter(orders::ordered_for.ge(start))
            .filter(orders::ordered_for.lt(end))
            .select(orders::description)
            .load::<String>(&mut conn)
            .context("Failed to load today's order descriptions")
    })
    .await
    .context("Failed due to threadpool error")??;

    let mut counts: HashMap<String, usize> = HashMap::new();
    for description in descriptions {
        *counts.entry(description).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    Ok(ranked.into_iter().take(3).map(|entry| entry.0).collect())
}

// Users who already placed an order on the given day
pub async fn user_ids_with_orders_on(
    mut conn: DbConnection,
    day: NaiveDate
) -> Result<Vec<Uuid>, anyhow::Error> {
    let (start, end) = day_bounds(day);

    let res = spawn_blocking_with_tracing(move || {
        orders::table
            .filter(orders::ordered_for.ge(start))
            .filter(orders::ordered_for.lt(end))
            .select(orders::user_id)
            .distinct()
            .load::<Uuid>(&mut conn)
            .context("Failed to load the day's ordering users")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}
