// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::{ExchangeRateClient, FinnhubClient, HttpFetcher, JsonFetcher};
use crate::config::Config;
use crate::error::{GatewayError, Result};
use crate::models::{Action, Event, GatewayRequest, Response};

/// Routes one invocation event to the matching provider adapter and wraps
/// the outcome in a response envelope. Holds no per-request state.
pub struct Gateway {
    config: Config,
    finnhub: FinnhubClient,
    exchange_rates: ExchangeRateClient,
}

impl Gateway {
    pub fn new(config: Config) -> Self {
        Self::with_fetcher(config, Arc::new(HttpFetcher::new()))
    }

    pub fn with_fetcher(config: Config, fetcher: Arc<dyn JsonFetcher>) -> Self {
        let finnhub = FinnhubClient::new(
            fetcher.clone(),
            config.finnhub_api_key.clone(),
            config.finnhub_base_url.clone(),
        );
        let exchange_rates = ExchangeRateClient::new(
            fetcher,
            config.exchange_rate_api_key.clone(),
            config.exchange_rate_base_url.clone(),
        );

        Self {
            config,
            finnhub,
            exchange_rates,
        }
    }

    /// Handle a single invocation. Never fails: every error becomes an
    /// envelope with an `{"error": ...}` body.
    pub async fn handle(&self, event: &Event) -> Response {
        // Checked per request, before the body is even looked at
        if !self.config.has_api_keys() {
            warn!("Rejecting request: provider API keys are not configured");
            return Response::error(&GatewayError::MissingApiKeys);
        }

        match self.dispatch(event).await {
            Ok(payload) => Response::ok(&payload),
            Err(err) => {
                warn!(kind = ?err.kind(), error = %err, "Request failed");
                Response::error(&err)
            }
        }
    }

    async fn dispatch(&self, event: &Event) -> Result<Value> {
        let body = event
            .body
            .as_deref()
            .ok_or_else(|| GatewayError::MalformedBody("request body is missing".to_string()))?;
        let request = GatewayRequest::parse(body)?;

        let action: Action = request
            .action
            .as_ref()
            .and_then(Value::as_str)
            .ok_or(GatewayError::InvalidAction)?
            .parse()?;

        info!(%action, "Dispatching request");
        match action {
            Action::Quote => self.finnhub.get_quote(request.symbol.as_ref()).await,
            Action::Candles => {
                self.finnhub
                    .get_candles(
                        request.symbol.as_ref(),
                        request.resolution.as_ref(),
                        request.from.as_ref(),
                        request.to.as_ref(),
                    )
                    .await
            }
            Action::Profile => {
                self.finnhub
                    .get_company_profile(request.symbol.as_ref())
                    .await
            }
            Action::Exchange => {
                self.exchange_rates
                    .get_exchange_rate(
                        request.from_currency.as_ref(),
                        request.to_currency.as_ref(),
                    )
                    .await
            }
        }
    }
}

#[cfg(test)]
#[path = "handler_test.rs"]
mod tests;
