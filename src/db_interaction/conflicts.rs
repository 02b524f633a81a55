use std::{error::Error, fmt::Debug};

use anyhow::Context;
use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};
use thiserror::Error;
use uuid::Uuid;

use crate::models::Conflict;
use crate::schema::conflicts;
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::{error_fmt_chain, DbConnection};

// Error associated with the conflict workflow
#[derive(Error)]
pub enum ConflictError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("the disputed order doesn't exist")]
    OrderMissing(#[source] diesel::result::Error),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("conflict_id: {0} doesn't exist")]
    NoConflictIdError(Uuid)
}

impl Debug for ConflictError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Recording a conflict about an order",
    skip_all
)]
pub async fn insert_conflict(
    mut conn: DbConnection,
    conflict: Conflict
) -> Result<Uuid, ConflictError> {
    let res = spawn_blocking_with_tracing(move || {
        diesel::insert_into(conflicts::table)
            .values(&conflict)
            .execute(&mut conn)
            .map_err(|e| {
                match e {
                    diesel::result::Error::DatabaseError(
                        diesel::result::DatabaseErrorKind::ForeignKeyViolation,
                        _
                    ) => ConflictError::OrderMissing(e),
                    _ => ConflictError::RunQueryError(e)
                }
            })?;

        Ok::<Uuid, ConflictError>(conflict.conflict_id)
    })
    .await??;

    Ok(res)
}

// Unresolved disputes, oldest first
pub async fn open_conflicts(
    mut conn: DbConnection
) -> Result<Vec<Conflict>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        conflicts::table
            .filter(conflicts::resolved.eq(false))
            .order(conflicts::created_at.asc())
            .load::<Conflict>(&mut conn)
            .context("Failed to load open conflicts")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[tracing::instrument(
    "Resolving a conflict",
    skip(conn, notes)
)]
pub async fn resolve_conflict(
    mut conn: DbConnection,
    conflict_id: Uuid,
    resolved_by: Uuid,
    notes: Option<String>
) -> Result<(), ConflictError> {
    spawn_blocking_with_tracing(move || {
        let affected_rows = diesel::update(conflicts::table)
            .filter(conflicts::conflict_id.eq(conflict_id))
            .filter(conflicts::resolved.eq(false))
            .set((
                conflicts::resolved.eq(true),
                conflicts::resolved_by.eq(resolved_by),
                conflicts::notes.eq(notes)
            ))
            .execute(&mut conn)?;

        if affected_rows == 0 {
            return Err(ConflictError::NoConflictIdError(conflict_id));
        }

        Ok(())
    })
    .await??;

    Ok(())
}
