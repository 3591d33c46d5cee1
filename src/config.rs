// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_FINNHUB_BASE_URL: &str = "https://finnhub.io/api/v1";
pub const DEFAULT_EXCHANGE_RATE_BASE_URL: &str = "https://v6.exchangerate-api.com/v6";

/// Upstream base URLs, as written in `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub finnhub_base_url: String,
    pub exchange_rate_base_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            finnhub_base_url: DEFAULT_FINNHUB_BASE_URL.to_string(),
            exchange_rate_base_url: DEFAULT_EXCHANGE_RATE_BASE_URL.to_string(),
        }
    }
}

/// Process-wide configuration, built once and handed to the dispatcher.
///
/// Missing keys are stored as empty strings rather than rejected here; the
/// dispatcher checks them on every request.
#[derive(Debug, Clone)]
pub struct Config {
    pub finnhub_api_key: String,
    pub exchange_rate_api_key: String,
    pub finnhub_base_url: Url,
    pub exchange_rate_base_url: Url,
}

impl Config {
    pub fn new(
        finnhub_api_key: impl Into<String>,
        exchange_rate_api_key: impl Into<String>,
        endpoints: &Endpoints,
    ) -> Result<Self> {
        Ok(Self {
            finnhub_api_key: finnhub_api_key.into(),
            exchange_rate_api_key: exchange_rate_api_key.into(),
            finnhub_base_url: parse_base_url(&endpoints.finnhub_base_url)?,
            exchange_rate_base_url: parse_base_url(&endpoints.exchange_rate_base_url)?,
        })
    }

    /// Build the configuration from the optional config file and the process
    /// environment, the latter taking precedence.
    pub fn from_env() -> Result<Self> {
        let config_path = get_config_path();
        let mut endpoints = if config_path.exists() {
            load_endpoints(&config_path)?
        } else {
            Endpoints::default()
        };

        if let Ok(url) = env::var("FINNHUB_BASE_URL") {
            endpoints.finnhub_base_url = url;
        }
        if let Ok(url) = env::var("EXCHANGE_RATE_BASE_URL") {
            endpoints.exchange_rate_base_url = url;
        }

        Self::new(
            env::var("FINNHUB_API_KEY").unwrap_or_default(),
            env::var("EXCHANGE_RATE_API_KEY").unwrap_or_default(),
            &endpoints,
        )
    }

    pub fn has_api_keys(&self) -> bool {
        !self.finnhub_api_key.is_empty() && !self.exchange_rate_api_key.is_empty()
    }
}

fn get_config_path() -> PathBuf {
    env::var("MARKET_GATEWAY_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"))
}

pub fn load_endpoints(path: &Path) -> Result<Endpoints> {
    let config_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let endpoints: Endpoints = toml::from_str(&config_str)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(endpoints)
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("Invalid base URL: {}", raw))?;
    if url.cannot_be_a_base() {
        anyhow::bail!("Base URL cannot carry a path: {}", raw);
    }
    Ok(url)
}
