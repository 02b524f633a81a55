use std::collections::HashMap;

use anyhow::Context;
use diesel::{ExpressionMethods, JoinOnDsl, QueryDsl, RunQueryDsl};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::FinanceRecord;
use crate::schema::{finance, orders, users};
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::{month_bounds, DbConnection};

// Which slice of the payment board to show
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFilter{
    All,
    Paid,
    Unpaid
}

// One row of the payment board: a user with orders in the month, their
// total and whether they settled up
#[derive(Serialize, Deserialize, Debug)]
pub struct PaymentStatus{
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub total_cost: i64,
    pub did_user_pay: bool
}

#[tracing::instrument(
    "Marking whether a user paid for a month",
    skip(conn)
)]
pub async fn set_payment_status(
    mut conn: DbConnection,
    user_id: Uuid,
    year: i32,
    month: u32,
    did_user_pay: bool
) -> Result<(), anyhow::Error> {
    let record = FinanceRecord{
        finance_id: Uuid::new_v4(),
        user_id,
        year,
        month: month as i32,
        did_user_pay
    };

    spawn_blocking_with_tracing(move || {
        diesel::insert_into(finance::table)
            .values(&record)
            .on_conflict((finance::user_id, finance::year, finance::month))
            .do_update()
            .set(finance::did_user_pay.eq(record.did_user_pay))
            .execute(&mut conn)
            .context("Failed to upsert finance record")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(())
}

// Every user with orders in the month, joined with their payment flag.
// Users without a finance row count as unpaid.
#[tracing::instrument(
    "Building the payment board for a month",
    skip(conn)
)]
pub async fn payment_board(
    mut conn: DbConnection,
    year: i32,
    month: u32,
    filter: PaymentFilter
) -> Result<Vec<PaymentStatus>, anyhow::Error> {
    let (start, end) = month_bounds(year, month);

    let (order_rows, finance_rows) = spawn_blocking_with_tracing(move || {
        let order_rows: Vec<(Uuid, String, String, i32)> = orders::table
            .inner_join(users::table.on(users::user_id.eq(orders::user_id)))
            .filter(orders::ordered_for.ge(start))
            .filter(orders::ordered_for.lt(end))
            .select((users::user_id, users::name, users::email, orders::cost))
            .load::<(Uuid, String, String, i32)>(&mut conn)
            .context("Failed to load the month's orders with users")?;

        let finance_rows: Vec<FinanceRecord> = finance::table
            .filter(finance::year.eq(year))
            .filter(finance::month.eq(month as i32))
            .load::<FinanceRecord>(&mut conn)
            .context("Failed to load the month's finance records")?;

        Ok::<_, anyhow::Error>((order_rows, finance_rows))
    })
    .await
    .context("Failed due to threadpool error")??;

    let paid: HashMap<Uuid, bool> = finance_rows
        .into_iter()
        .map(|record| (record.user_id, record.did_user_pay))
        .collect();

    let mut board: HashMap<Uuid, PaymentStatus> = HashMap::new();
    for (user_id, name, email, cost) in order_rows {
        board
            .entry(user_id)
            .or_insert_with(|| PaymentStatus{
                user_id,
                name,
                email,
                total_cost: 0,
                did_user_pay: paid.get(&user_id).copied().unwrap_or(false)
            })
            .total_cost += cost as i64;
    }

    let mut rows: Vec<PaymentStatus> = board
        .into_values()
        .filter(|row| match filter {
            PaymentFilter::All => true,
            PaymentFilter::Paid => row.did_user_pay,
            PaymentFilter::Unpaid => !row.did_user_pay
        })
        .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(rows)
}

// How many earlier months the user left unpaid; drives the slacker variant
// of the payment reminder
#[tracing::instrument(
    "Counting unpaid months for user",
    skip(conn)
)]
pub async fn unpaid_month_count(
    mut conn: DbConnection,
    user_id: Uuid
) -> Result<i64, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        finance::table
            .filter(finance::user_id.eq(user_id))
            .filter(finance::did_user_pay.eq(false))
            .count()
            .get_result::<i64>(&mut conn)
            .context("Failed to count unpaid months")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}
