use actix_web::{error::{ErrorBadRequest, ErrorInternalServerError, ErrorUnauthorized}, web, HttpResponse};
use anyhow::Context;
use serde::Deserialize;

use crate::auth::OAuthClient;
use crate::db_interaction::upsert_user_from_identity;
use crate::session_state::TypedSession;
use crate::startup::BaseUrl;
use crate::utils::{get_pooled_connection, DbPool};

#[derive(Deserialize, Debug)]
pub struct CallbackQuery{
    pub code: String,
    pub state: String
}

// Finish the provider dance: verify the state nonce, trade the code for an
// access token, mirror the identity locally and log the session in.
#[tracing::instrument(
    "Handling the identity provider callback",
    skip(pool, oauth_client, base_url, session, query)
)]
pub async fn oauth_callback(
    pool: web::Data<DbPool>,
    oauth_client: web::Data<OAuthClient>,
    base_url: web::Data<BaseUrl>,
    session: TypedSession,
    query: web::Query<CallbackQuery>
) -> Result<HttpResponse, actix_web::Error>{
    let expected_state = session.get_oauth_state()
        .context("Failed to read oauth state from the session")
        .map_err(ErrorInternalServerError)?;

    match expected_state {
        Some(expected) if expected == query.state => {},
        _ => return Err(ErrorUnauthorized("Invalid oauth state"))
    }

    let redirect_uri = format!("{}auth/callback", base_url.0);

    let token = oauth_client
        .exchange_code(&query.code, &redirect_uri)
        .await
        .map_err(ErrorBadRequest)?;

    let identity = oauth_client
        .fetch_identity(&token.access_token)
        .await
        .map_err(ErrorBadRequest)?;

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let user = upsert_user_from_identity(conn, identity)
        .await
        .map_err(ErrorInternalServerError)?;

    session.renew();
    session.insert_user_id(user.user_id)
        .context("Failed to insert user_id into the session")
        .map_err(ErrorInternalServerError)?;
    session.insert_is_admin(user.is_admin)
        .context("Failed to insert admin flag into the session")
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().body("Successfully logged in"))
}
