use actix_web::{error::{ErrorInternalServerError, ErrorNotFound}, web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::db_interaction::{insert_conflict, ConflictError};
use crate::models::Conflict;
use crate::utils::{get_pooled_connection, DbPool};

#[derive(Deserialize, Debug)]
pub struct ConflictForm{
    pub order_id: Uuid,
    pub did_order_come: bool,
    #[serde(default)]
    pub i_know_who: bool,
    pub accused_user: Option<Uuid>,
    pub notes: Option<String>
}

// Report that an order never arrived, or arrived and somebody else ate it
#[tracing::instrument(
    "Reporting a conflict",
    skip(pool, uid)
)]
pub async fn report_conflict(
    pool: web::Data<DbPool>,
    form: web::Form<ConflictForm>,
    uid: CurrentUser
) -> Result<HttpResponse, actix_web::Error> {
    let conflict = Conflict{
        conflict_id: Uuid::new_v4(),
        created_by: uid.user_id,
        order_id: form.order_id,
        accused_user: form.accused_user,
        did_order_come: form.did_order_come,
        i_know_who: form.i_know_who,
        resolved: false,
        resolved_by: None,
        notes: form.notes.clone(),
        created_at: Utc::now()
    };

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let conflict_id = insert_conflict(conn, conflict)
        .await
        .map_err(|e| {
            match e {
                ConflictError::OrderMissing(_) => ErrorNotFound(e),
                _ => ErrorInternalServerError(e)
            }
        })?;

    Ok(HttpResponse::Created().json(conflict_id))
}
