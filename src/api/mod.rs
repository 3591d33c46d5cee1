pub mod exchange_rate_client;
pub mod fetch;
pub mod finnhub_client;

pub use exchange_rate_client::ExchangeRateClient;
pub use fetch::{HttpFetcher, JsonFetcher};
pub use finnhub_client::FinnhubClient;
