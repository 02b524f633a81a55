use actix_web::{error::{ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::db_interaction::{self, ConflictError};
use crate::utils::{get_pooled_connection, DbPool};

#[derive(Deserialize, Debug)]
pub struct ResolveForm{
    pub conflict_id: Uuid,
    pub notes: Option<String>
}

#[tracing::instrument(
    "Resolving a conflict",
    skip(pool, uid)
)]
pub async fn resolve_conflict(
    pool: web::Data<DbPool>,
    form: web::Form<ResolveForm>,
    uid: CurrentUser
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    db_interaction::resolve_conflict(conn, form.conflict_id, uid.user_id, form.notes.clone())
        .await
        .map_err(|e| {
            match e {
                ConflictError::NoConflictIdError(_) => ErrorNotFound(e),
                _ => ErrorInternalServerError(e)
            }
        })?;

    Ok(HttpResponse::Ok().finish())
}
