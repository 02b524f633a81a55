use std::{error::Error, fmt::Debug};

use anyhow::Context;
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl};
use thiserror::Error;
use uuid::Uuid;

use crate::models::Company;
use crate::schema::companies;
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::{error_fmt_chain, DbConnection};

// Error associated with inserting a company
#[derive(Error)]
pub enum CompanyInsertError{
    #[error("company name is not unique")]
    NameNotUnique(#[source] diesel::result::Error),
    #[error("Failed due to threadpool error")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to insert into companies table")]
    InsertError(#[from] diesel::result::Error)
}

impl Debug for CompanyInsertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Inserting a company into the database",
    skip_all
)]
pub async fn insert_company(
    mut conn: DbConnection,
    company: Company
) -> Result<(), CompanyInsertError> {
    spawn_blocking_with_tracing(move || {
        diesel::insert_into(companies::table)
            .values(company)
            .execute(&mut conn)
            .map_err(|e| {
                match e {
                    diesel::result::Error::DatabaseError(
                        diesel::result::DatabaseErrorKind::UniqueViolation,
                        _
                    ) => CompanyInsertError::NameNotUnique(e),
                    _ => CompanyInsertError::InsertError(e)
                }
            })
    })
    .await??;

    Ok(())
}

pub async fn list_companies(
    mut conn: DbConnection
) -> Result<Vec<Company>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        companies::table
            .order(companies::name.asc())
            .load::<Company>(&mut conn)
            .context("Failed to load companies")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

pub async fn get_company(
    mut conn: DbConnection,
    company_id: Uuid
) -> Result<Company, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        companies::table
            .filter(companies::company_id.eq(company_id))
            .first::<Company>(&mut conn)
            .context("Failed to get company by id")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

// Used by the menu importers to attach scraped offers to their vendor
pub async fn get_company_by_name(
    mut conn: DbConnection,
    name: String
) -> Result<Option<Company>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        companies::table
            .filter(companies::name.eq(name))
            .first::<Company>(&mut conn)
            .optional()
            .context("Failed to get company by name")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}
