use std::{error::Error, fmt::Debug, time::Duration};

use rand::{distributions::Alphanumeric, Rng};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::configuration::OAuthSettings;
use crate::utils::error_fmt_chain;

// Client for the external identity provider. All authentication is
// delegated: we never see credentials, only the provider's codes and the
// userinfo document mirrored into the local users table.
#[derive(Clone)]
pub struct OAuthClient {
    http_client: Client,
    authorize_uri: String,
    api_uri: String,
    client_id: String,
    client_secret: SecretString,
}

// Identity claims fetched from the provider's userinfo endpoint
#[derive(Deserialize, Debug, Clone)]
pub struct ProviderIdentity {
    pub sub: String,
    pub email: String,
    pub name: String,
}

#[derive(Deserialize, Debug)]
pub struct TokenResponse {
    pub access_token: String,
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    grant_type: &'a str,
    code: &'a str,
    redirect_uri: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

#[derive(Error)]
pub enum OAuthError {
    #[error("Failed to call the identity provider")]
    RequestError(#[from] reqwest::Error),
    #[error("The identity provider rejected the authorization code")]
    CodeRejected(#[source] reqwest::Error),
}

impl Debug for OAuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl OAuthClient {
    pub fn new(settings: &OAuthSettings) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap();

        Self {
            http_client,
            authorize_uri: settings.authorize_uri.clone(),
            api_uri: settings.api_uri.clone(),
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
        }
    }

    // Random nonce bound to the session for the duration of the dance
    pub fn generate_state() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect()
    }

    pub fn authorize_url(&self, state: &str, redirect_uri: &str) -> String {
        format!(
            "{}?response_type=code&client_id={}&redirect_uri={}&scope=openid%20email%20profile&state={}",
            self.authorize_uri, self.client_id, redirect_uri, state
        )
    }

    #[tracing::instrument(
        "Exchanging authorization code for access token",
        skip(self, code)
    )]
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse, OAuthError> {
        let url = format!("{}/oauth/token", self.api_uri);
        let body = TokenRequest {
            grant_type: "authorization_code",
            code,
            redirect_uri,
            client_id: &self.client_id,
            client_secret: self.client_secret.expose_secret(),
        };

        let response = self
            .http_client
            .post(url)
            .form(&body)
            .send()
            .await?
            .error_for_status()
            .map_err(OAuthError::CodeRejected)?;

        Ok(response.json::<TokenResponse>().await?)
    }

    #[tracing::instrument(
        "Fetching identity from userinfo endpoint",
        skip(self, access_token)
    )]
    pub async fn fetch_identity(
        &self,
        access_token: &str,
    ) -> Result<ProviderIdentity, OAuthError> {
        let url = format!("{}/userinfo", self.api_uri);

        let response = self
            .http_client
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<ProviderIdentity>().await?)
    }
}
