// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use reqwest::Url;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::fetch::JsonFetcher;
use crate::error::{GatewayError, Result};
use crate::models::non_empty_str;

/// Latest exchange rates from ExchangeRate-API. The key travels in the path.
#[derive(Clone)]
pub struct ExchangeRateClient {
    fetcher: Arc<dyn JsonFetcher>,
    api_key: String,
    base_url: Url,
}

impl ExchangeRateClient {
    pub fn new(fetcher: Arc<dyn JsonFetcher>, api_key: impl Into<String>, base_url: Url) -> Self {
        Self {
            fetcher,
            api_key: api_key.into(),
            base_url,
        }
    }

    /// Fetch the full latest rate table for `from_currency`.
    ///
    /// `to_currency` is required but not sent upstream: callers pick their
    /// target out of the returned `conversion_rates`.
    pub async fn get_exchange_rate(
        &self,
        from_currency: Option<&Value>,
        to_currency: Option<&Value>,
    ) -> Result<Value> {
        let from = non_empty_str(from_currency);
        let to = non_empty_str(to_currency);

        let (Some(from), Some(to)) = (from, to) else {
            let mut missing = Vec::new();
            if from.is_none() {
                missing.push("fromCurrency");
            }
            if to.is_none() {
                missing.push("toCurrency");
            }
            return Err(GatewayError::MissingCurrencies(missing));
        };

        debug!(from, to, "Fetching exchange rates");
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend([self.api_key.as_str(), "latest", from]);
        }
        self.fetcher.fetch_json(&url).await
    }
}
