use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::GatewayError;

/// Invocation event handed to the gateway by its host.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Event {
    /// JSON-encoded request body
    #[serde(default)]
    pub body: Option<String>,
}

impl Event {
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
        }
    }
}

/// Parsed request body. Fields stay as raw JSON because each adapter applies
/// its own presence rules.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayRequest {
    pub action: Option<Value>,
    pub symbol: Option<Value>,
    pub resolution: Option<Value>,
    pub from: Option<Value>,
    pub to: Option<Value>,
    pub from_currency: Option<Value>,
    pub to_currency: Option<Value>,
}

impl GatewayRequest {
    /// Parse a raw body. Non-object JSON yields an empty request, `null`
    /// and invalid JSON are malformed.
    pub fn parse(body: &str) -> Result<Self, GatewayError> {
        let value: Value =
            serde_json::from_str(body).map_err(|e| GatewayError::MalformedBody(e.to_string()))?;

        match value {
            Value::Null => Err(GatewayError::MalformedBody(
                "request body must not be null".to_string(),
            )),
            Value::Object(_) => serde_json::from_value(value)
                .map_err(|e| GatewayError::MalformedBody(e.to_string())),
            _ => Ok(Self::default()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quote,
    Candles,
    Profile,
    Exchange,
}

impl FromStr for Action {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quote" => Ok(Action::Quote),
            "candles" => Ok(Action::Candles),
            "profile" => Ok(Action::Profile),
            "exchange" => Ok(Action::Exchange),
            other => Err(GatewayError::UnknownAction(other.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Quote => "quote",
            Action::Candles => "candles",
            Action::Profile => "profile",
            Action::Exchange => "exchange",
        };
        f.write_str(name)
    }
}

/// Response envelope returned for every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    /// Always JSON text
    pub body: String,
}

impl Response {
    pub fn ok(payload: &Value) -> Self {
        Self {
            status_code: 200,
            body: payload.to_string(),
        }
    }

    pub fn error(err: &GatewayError) -> Self {
        Self {
            status_code: err.status_code(),
            body: json!({ "error": err.to_string() }).to_string(),
        }
    }
}

/// Non-empty JSON string, or `None`.
pub fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Loose truthiness: absent, `null`, `false`, zero and `""` are falsy.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(true, |f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Plain text form of a value for use in a query string.
///
/// Whole-valued floats lose their fraction (`1700000000.0` becomes
/// `1700000000`); Finnhub expects integer UNIX seconds.
pub fn query_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            // Below 1e21 Display prints plain digits, no exponent
            Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{}", f),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request() {
        let request = GatewayRequest::parse(
            r#"{"action":"candles","symbol":"AAPL","resolution":"D","from":1,"to":2,"fromCurrency":"USD"}"#,
        )
        .unwrap();
        assert_eq!(request.action, Some(json!("candles")));
        assert_eq!(request.from, Some(json!(1)));
        assert_eq!(request.from_currency, Some(json!("USD")));
        assert!(request.to_currency.is_none());
    }

    #[test]
    fn test_parse_request_edge_cases() {
        assert!(matches!(
            GatewayRequest::parse("{not json"),
            Err(GatewayError::MalformedBody(_))
        ));
        assert!(matches!(
            GatewayRequest::parse("null"),
            Err(GatewayError::MalformedBody(_))
        ));
        // Arrays have no fields, so no action
        let request = GatewayRequest::parse("[1,2]").unwrap();
        assert!(request.action.is_none());
    }

    #[test]
    fn test_action_from_str() {
        assert_eq!("quote".parse::<Action>(), Ok(Action::Quote));
        assert_eq!("exchange".parse::<Action>(), Ok(Action::Exchange));
        assert_eq!(
            "Quote".parse::<Action>(),
            Err(GatewayError::UnknownAction("Quote".to_string()))
        );
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&Value::Null)));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(0.0))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(!is_truthy(Some(&json!(false))));
        assert!(is_truthy(Some(&json!("0"))));
        assert!(is_truthy(Some(&json!(1700000000))));
        assert!(is_truthy(Some(&json!([]))));
    }

    #[test]
    fn test_non_empty_str() {
        assert_eq!(non_empty_str(Some(&json!("AAPL"))), Some("AAPL"));
        assert_eq!(non_empty_str(Some(&json!(""))), None);
        assert_eq!(non_empty_str(Some(&json!(42))), None);
        assert_eq!(non_empty_str(None), None);
    }

    #[test]
    fn test_query_text() {
        assert_eq!(query_text(&json!("D")), "D");
        assert_eq!(query_text(&json!(60)), "60");
        assert_eq!(query_text(&json!(1700000000.0)), "1700000000");
        assert_eq!(query_text(&json!(-5.0)), "-5");
        assert_eq!(query_text(&json!(1.5)), "1.5");

        let value: Value = serde_json::from_str("1.7006e9").unwrap();
        assert_eq!(query_text(&value), "1700600000");
    }

    #[test]
    fn test_response_envelopes() {
        let ok = Response::ok(&json!({"c": 190.5, "a": 1}));
        assert_eq!(ok.status_code, 200);
        // Upstream key order is kept
        assert_eq!(ok.body, r#"{"c":190.5,"a":1}"#);

        let err = Response::error(&GatewayError::InvalidAction);
        assert_eq!(err.status_code, 400);
        assert_eq!(err.body, r#"{"error":"無効なアクションです"}"#);

        let serialized = serde_json::to_string(&err).unwrap();
        assert!(serialized.starts_with(r#"{"statusCode":400,"body":"#));
    }
}
