use std::{error::Error, fmt::Debug};

use actix_web::web;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use diesel::{r2d2::ConnectionManager, PgConnection};
use r2d2::{Pool, PooledConnection};
use thiserror::Error;

use crate::telemetry::spawn_blocking_with_tracing;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<PgConnection>>;

pub fn error_fmt_chain(f: &mut std::fmt::Formatter<'_>, source: &Option<impl Error>) -> std::fmt::Result{
    if let Some(error) = source{
        write!(f, "\n\tCaused By:\n\t")?;
        write!(f, "{:?}", &error)?;
        error_fmt_chain(f, &error.source())
    } else {
        Ok(())
    }
}

pub async fn get_pooled_connection(
    pool: &web::Data<DbPool>
) -> Result<DbConnection, PoolGetError>{
    let pool_clone = pool.clone();

    let res = spawn_blocking_with_tracing(move || {
        pool_clone.get()
    })
    .await??;

    Ok(res)
}

#[derive(Error)]
pub enum PoolGetError{
    #[error("Failed due to threadpool error")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to get connection from pool")]
    DbPoolError(#[from] r2d2::Error),
}

impl Debug for PoolGetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

// (year, month) following the given one
pub fn next_month(year: i32, month: u32) -> (i32, u32){
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

// (year, month) preceding the given one
pub fn previous_month(year: i32, month: u32) -> (i32, u32){
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

// Half-open [start, end) range covering one calendar day
pub fn day_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>){
    let start = Utc.from_utc_datetime(&day.and_hms_opt(0, 0, 0).unwrap());
    let end = start + chrono::Duration::days(1);
    (start, end)
}

// Half-open [start, end) range covering one calendar month
pub fn month_bounds(year: i32, month: u32) -> (DateTime<Utc>, DateTime<Utc>){
    let start_day = NaiveDate::from_ymd_opt(year, month, 1)
        .expect("Invalid year / month pair");
    let (next_year, next) = next_month(year, month);
    let end_day = NaiveDate::from_ymd_opt(next_year, next, 1).unwrap();

    let start = Utc.from_utc_datetime(&start_day.and_hms_opt(0, 0, 0).unwrap());
    let end = Utc.from_utc_datetime(&end_day.and_hms_opt(0, 0, 0).unwrap());
    (start, end)
}

// English month name used in the monthly summary emails
pub fn month_name(month: u32) -> &'static str{
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown"
    }
}
