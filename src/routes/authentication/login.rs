use actix_web::{error::ErrorInternalServerError, http::header, web, HttpResponse};
use anyhow::Context;

use crate::auth::OAuthClient;
use crate::session_state::TypedSession;
use crate::startup::BaseUrl;

// Kick off the provider dance: bind a fresh state nonce to the session and
// bounce the browser to the authorize endpoint.
#[tracing::instrument(
    "Redirecting to the identity provider",
    skip_all
)]
pub async fn login(
    oauth_client: web::Data<OAuthClient>,
    base_url: web::Data<BaseUrl>,
    session: TypedSession
) -> Result<HttpResponse, actix_web::Error>{
    let state = OAuthClient::generate_state();

    session.renew();
    session.insert_oauth_state(&state)
        .context("Failed to bind oauth state to the session")
        .map_err(ErrorInternalServerError)?;

    let redirect_uri = format!("{}auth/callback", base_url.0);
    let authorize_url = oauth_client.authorize_url(&state, &redirect_uri);

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, authorize_url))
        .finish())
}
