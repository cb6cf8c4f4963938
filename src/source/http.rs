//! Card collections served over HTTP.
use super::CardSource;
use super::json::parse_cards;
use crate::error::{Error, Result};
use crate::models::Card;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};

#[derive(Clone, Debug)]
pub struct HttpSource {
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl CardSource for HttpSource {
    /// Fetches once. Failures are reported as-is; there is no retry.
    fn load(&self) -> Result<Vec<Card>> {
        let response = Client::new()
            .get(&self.url)
            .header(USER_AGENT, concat!("flipcards/", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|e| Error::unavailable(&self.url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::unavailable(&self.url, format!("HTTP {status}")));
        }

        let body = response
            .text()
            .map_err(|e| Error::unavailable(&self.url, e))?;
        let cards = parse_cards(&body, &self.url)?;
        tracing::info!(cards = cards.len(), url = %self.url, "fetched cards");
        Ok(cards)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
