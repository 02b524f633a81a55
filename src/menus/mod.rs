use std::{error::Error, fmt::Debug, time::Duration};

use reqwest::Client;
use thiserror::Error;

use crate::configuration::MenuSettings;
use crate::utils::error_fmt_chain;

pub mod koziolek;
pub mod tomas;

pub use koziolek::{parse_daily_specials, KoziolekMenu};
pub use tomas::{parse_weekly_menu, TomasMenu};

// Vendor names the scraped offers are filed under
pub const KOZIOLEK_COMPANY: &str = "Pod Koziołkiem";
pub const TOMAS_COMPANY: &str = "Tomas";

#[derive(Error)]
pub enum MenuError{
    #[error("Failed to fetch the restaurant page")]
    RequestError(#[from] reqwest::Error),
    #[error("The restaurant page did not have the expected shape: {0}")]
    UnexpectedPageShape(String)
}

impl Debug for MenuError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

// Fetches the two restaurant pages the menu importers parse. The pages are
// plain public HTML; failures surface as-is, there is no retry policy.
#[derive(Clone)]
pub struct MenuClient {
    http_client: Client,
    koziolek_url: String,
    tomas_url: String,
}

impl MenuClient {
    pub fn new(settings: &MenuSettings) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap();

        Self {
            http_client,
            koziolek_url: settings.koziolek_url.clone(),
            tomas_url: settings.tomas_url.clone(),
        }
    }

    #[tracing::instrument("Fetching the Pod Koziołkiem page", skip(self))]
    pub async fn fetch_koziolek_page(&self) -> Result<String, MenuError> {
        let body = self
            .http_client
            .get(&self.koziolek_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }

    #[tracing::instrument("Fetching the Tomas page", skip(self))]
    pub async fn fetch_tomas_page(&self) -> Result<String, MenuError> {
        let body = self
            .http_client
            .get(&self.tomas_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}
