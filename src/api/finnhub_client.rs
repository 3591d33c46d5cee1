// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use reqwest::Url;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use urlencoding::encode;

use super::fetch::JsonFetcher;
use crate::error::{GatewayError, Result};
use crate::models::{is_truthy, non_empty_str, query_text};

/// Stock quote, candle and company profile lookups against Finnhub.
///
/// Payloads come back exactly as Finnhub sent them.
#[derive(Clone)]
pub struct FinnhubClient {
    fetcher: Arc<dyn JsonFetcher>,
    api_key: String,
    base_url: Url,
}

impl FinnhubClient {
    pub fn new(fetcher: Arc<dyn JsonFetcher>, api_key: impl Into<String>, base_url: Url) -> Self {
        Self {
            fetcher,
            api_key: api_key.into(),
            base_url,
        }
    }

    pub async fn get_quote(&self, symbol: Option<&Value>) -> Result<Value> {
        let symbol = non_empty_str(symbol).ok_or(GatewayError::MissingSymbol)?;

        debug!(symbol, "Fetching quote");
        let url = self.endpoint(&["quote"], &[("symbol", symbol.to_string())]);
        self.fetcher.fetch_json(&url).await
    }

    pub async fn get_candles(
        &self,
        symbol: Option<&Value>,
        resolution: Option<&Value>,
        from: Option<&Value>,
        to: Option<&Value>,
    ) -> Result<Value> {
        let mut missing = Vec::new();
        if non_empty_str(symbol).is_none() {
            missing.push("symbol");
        }
        for (name, value) in [("resolution", resolution), ("from", from), ("to", to)] {
            if !is_truthy(value) {
                missing.push(name);
            }
        }

        if !missing.is_empty() {
            return Err(GatewayError::MissingCandleParams(missing));
        }
        let (Some(symbol), Some(resolution), Some(from), Some(to)) =
            (non_empty_str(symbol), resolution, from, to)
        else {
            return Err(GatewayError::MissingCandleParams(missing));
        };

        debug!(symbol, "Fetching candles");
        let url = self.endpoint(
            &["stock", "candle"],
            &[
                ("symbol", symbol.to_string()),
                ("resolution", query_text(resolution)),
                ("from", query_text(from)),
                ("to", query_text(to)),
            ],
        );
        self.fetcher.fetch_json(&url).await
    }

    pub async fn get_company_profile(&self, symbol: Option<&Value>) -> Result<Value> {
        let symbol = non_empty_str(symbol).ok_or(GatewayError::MissingSymbol)?;

        debug!(symbol, "Fetching company profile");
        let url = self.endpoint(&["stock", "profile2"], &[("symbol", symbol.to_string())]);
        self.fetcher.fetch_json(&url).await
    }

    fn endpoint(&self, path: &[&str], params: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(path);
        }
        // Percent-encoded (space as %20), not form-encoded
        let query = params
            .iter()
            .map(|(key, value)| (*key, value.as_str()))
            .chain([("token", self.api_key.as_str())])
            .map(|(key, value)| format!("{}={}", key, encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        url.set_query(Some(&query));
        url
    }
}
