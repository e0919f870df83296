//! Minimal blocking Stripe client for the charge-listing endpoint.
//!
//! Only implements what the revenue snapshot needs: `GET /v1/charges` with a
//! creation-time lower bound, consumed as a lazy cursor-paginated stream.
//! Page N+1 is requested only after page N has been drained, so arbitrarily
//! large windows never materialize in memory at once.

use crate::error::ReportError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::VecDeque;
use std::time::Duration;

const API_TIMEOUT: Duration = Duration::from_secs(15);
const PAGE_SIZE: u32 = 100;

/// A single charge record, reduced to the fields the report consumes.
/// Stripe sends many more; serde ignores the rest.
#[derive(Debug, Clone, Deserialize)]
pub struct Charge {
    pub id: String,
    #[serde(default)]
    pub paid: bool,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub amount_refunded: i64,
}

#[derive(Debug, Deserialize)]
struct ChargePage {
    data: Vec<Charge>,
    has_more: bool,
}

#[derive(Debug)]
pub struct StripeClient {
    agent: ureq::Agent,
    api_key: String,
    base_url: String,
}

impl StripeClient {
    /// Builds a client against the given API base (see `config::resolve_api_base`).
    pub fn new(api_key: &str, base_url: String) -> Result<Self, ReportError> {
        if !base_url.starts_with("https://") && !base_url.starts_with("http://") {
            return Err(ReportError::ClientUnavailable(format!(
                "invalid API base URL: {base_url}"
            )));
        }

        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(API_TIMEOUT))
            .build()
            .into();

        Ok(Self {
            agent,
            api_key: api_key.to_string(),
            base_url,
        })
    }

    /// Returns a lazy iterator over all charges created at or after
    /// `cutoff_epoch` (seconds). Upstream failures surface as the iterator's
    /// error items; the first one ends the stream.
    pub fn charges_since(&self, cutoff_epoch: i64) -> ChargeIter<'_> {
        ChargeIter {
            client: self,
            cutoff_epoch,
            buffered: VecDeque::new(),
            cursor: None,
            exhausted: false,
            pages_fetched: 0,
        }
    }

    fn fetch_page(&self, cutoff_epoch: i64, cursor: Option<&str>) -> Result<ChargePage> {
        let mut request = self
            .agent
            .get(format!("{}/charges", self.base_url))
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .query("limit", PAGE_SIZE.to_string())
            .query("created[gte]", cutoff_epoch.to_string());

        if let Some(cursor) = cursor {
            request = request.query("starting_after", cursor);
        }

        let body: String = request
            .call()
            .context("Stripe charge list request failed")?
            .body_mut()
            .read_to_string()
            .context("Failed to read charge list response")?;

        serde_json::from_str(&body).context("Unexpected charge list payload")
    }
}

/// Lazy iterator over a paginated charge listing.
pub struct ChargeIter<'a> {
    client: &'a StripeClient,
    cutoff_epoch: i64,
    buffered: VecDeque<Charge>,
    cursor: Option<String>,
    exhausted: bool,
    pages_fetched: u32,
}

impl Iterator for ChargeIter<'_> {
    type Item = Result<Charge>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(charge) = self.buffered.pop_front() {
                return Some(Ok(charge));
            }
            if self.exhausted {
                return None;
            }

            match self
                .client
                .fetch_page(self.cutoff_epoch, self.cursor.as_deref())
            {
                Ok(page) => {
                    self.pages_fetched += 1;
                    log::debug!(
                        "Fetched charge page {} ({} records, has_more={})",
                        self.pages_fetched,
                        page.data.len(),
                        page.has_more
                    );
                    self.cursor = page.data.last().map(|c| c.id.clone());
                    self.exhausted = !page.has_more || page.data.is_empty();
                    self.buffered.extend(page.data);
                    if self.buffered.is_empty() {
                        return None;
                    }
                }
                Err(e) => {
                    self.exhausted = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
