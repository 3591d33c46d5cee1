// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Error taxonomy for the gateway.
//!
//! Every failure a request can hit maps to exactly one variant, and every
//! variant carries its own HTTP status, so turning an error into a response
//! envelope never depends on a default.

use thiserror::Error;

/// Coarse category of a [`GatewayError`], stable across message changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    MalformedRequest,
    InvalidAction,
    Validation,
    Network,
    Parse,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// One of the provider API keys is empty
    #[error("APIキーが設定されていません")]
    MissingApiKeys,

    /// Request body is not JSON (or is JSON `null`)
    #[error("{0}")]
    MalformedBody(String),

    /// `action` is absent or not a string
    #[error("無効なアクションです")]
    InvalidAction,

    #[error("不明なアクションです: {0}")]
    UnknownAction(String),

    #[error("シンボルは必須です")]
    MissingSymbol,

    /// Names of the candle parameters that were missing or falsy
    #[error("必須パラメータが不足しています: {}", .0.join(", "))]
    MissingCandleParams(Vec<&'static str>),

    #[error("通貨コードは必須です: {}", .0.join(", "))]
    MissingCurrencies(Vec<&'static str>),

    /// Transport failure talking to an upstream provider
    #[error("ネットワークエラー: {0}")]
    Network(String),

    /// Upstream answered with something that is not JSON
    #[error("JSONパースエラー: {0}")]
    Parse(String),
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::MissingApiKeys => ErrorKind::Configuration,
            GatewayError::MalformedBody(_) => ErrorKind::MalformedRequest,
            GatewayError::InvalidAction | GatewayError::UnknownAction(_) => {
                ErrorKind::InvalidAction
            }
            GatewayError::MissingSymbol
            | GatewayError::MissingCandleParams(_)
            | GatewayError::MissingCurrencies(_) => ErrorKind::Validation,
            GatewayError::Network(_) => ErrorKind::Network,
            GatewayError::Parse(_) => ErrorKind::Parse,
        }
    }

    /// HTTP status used for the response envelope.
    ///
    /// Only action selection is reported as a client error; adapter
    /// validation failures surface as 500 like every other failure.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::InvalidAction => 400,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
