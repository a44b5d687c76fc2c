use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use vigil_core::common::Interval;
use vigil_core::common::time::{RealTimeProvider, TimeProvider};
use vigil_core::market::entity::PriceBar;
use vigil_core::market::error::FetchError;
use vigil_core::market::port::PriceSource;
use vigil_core::market::series::normalize_series;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// # Summary
/// Yahoo Finance chart API price source.
///
/// # Invariants
/// - Stateless apart from the pooled HTTP client; shared by all workers.
/// - "now" for the request window comes from `clock`.
#[derive(Clone)]
pub struct YahooProvider {
    // Pooled HTTP client
    client: Client,
    // Scheme and host, without trailing slash
    base_url: String,
    clock: Arc<dyn TimeProvider>,
}

impl YahooProvider {
    /// # Summary
    /// Creates a provider pointed at the public Yahoo endpoint.
    ///
    /// # Logic
    /// 1. Install the rustls crypto provider.
    /// 2. 10 second timeout, browser-like User-Agent to reduce throttling.
    ///
    /// # Returns
    /// The provider, or `FetchError::Network` if the client cannot be built.
    pub fn new() -> Result<Self, FetchError> {
        vigil_core::install_crypto_provider();

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_UA));

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            clock: Arc::new(RealTimeProvider),
        })
    }

    /// Points the provider at another host, e.g. a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replaces the clock used to compute the request window.
    pub fn with_clock(mut self, clock: Arc<dyn TimeProvider>) -> Self {
        self.clock = clock;
        self
    }
}

/// # Summary
/// Top-level response of the v8 chart endpoint.
#[derive(Deserialize, Debug)]
struct YahooResponse {
    chart: YahooChart,
}

#[derive(Deserialize, Debug)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Deserialize, Debug)]
struct YahooError {
    description: String,
}

/// # Summary
/// One time series. `timestamp` is absent when the window holds no trades.
#[derive(Deserialize, Debug)]
struct YahooResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

#[derive(Deserialize, Debug)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

/// # Summary
/// Column-oriented OHLC values; `null` marks a missing print.
#[derive(Deserialize, Debug)]
struct YahooQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// # Summary
/// Zips the columnar payload into bars.
///
/// # Logic
/// Rows missing any of open/high/low/close, or with an unrepresentable
/// timestamp, are skipped. Volume is ignored: FX rows usually lack it.
fn rows_to_bars(timestamps: &[i64], quote: &YahooQuote) -> Vec<PriceBar> {
    fn cell(column: &[Option<f64>], i: usize) -> Option<f64> {
        column.get(i).copied().flatten()
    }

    timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let time: DateTime<Utc> = Utc.timestamp_opt(ts, 0).single()?;
            Some(PriceBar {
                time,
                open: cell(&quote.open, i)?,
                high: cell(&quote.high, i)?,
                low: cell(&quote.low, i)?,
                close: cell(&quote.close, i)?,
            })
        })
        .collect()
}

#[async_trait]
impl PriceSource for YahooProvider {
    /// # Summary
    /// Downloads the lookback window of `symbol` from the chart endpoint.
    ///
    /// # Logic
    /// 1. Window is `[now - interval.lookback(), now]`.
    /// 2. Non-2xx status, transport and decoding failures map onto `FetchError`.
    /// 3. An `error` object in the payload becomes `FetchError::Provider`.
    /// 4. Rows are zipped into bars and normalized.
    async fn fetch(&self, symbol: &str, interval: Interval) -> Result<Vec<PriceBar>, FetchError> {
        let end = self.clock.now();
        let start = end - interval.lookback();
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let period1 = start.timestamp().to_string();
        let period2 = end.timestamp().to_string();

        debug!(symbol, %interval, %start, %end, "requesting chart");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.as_str()),
                ("period2", period2.as_str()),
                ("interval", interval.provider_code()),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            // unknown symbols come back as 404 with a chart error body
            let described = resp
                .json::<YahooResponse>()
                .await
                .ok()
                .and_then(|body| body.chart.error);
            return Err(match described {
                Some(err) => FetchError::Provider(err.description),
                None => FetchError::Http(status.as_u16()),
            });
        }

        let json: YahooResponse = resp
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        if let Some(err) = json.chart.error {
            return Err(FetchError::Provider(err.description));
        }

        let result = json
            .chart
            .result
            .and_then(|mut results| results.pop())
            .ok_or(FetchError::Empty)?;

        let quote = result
            .indicators
            .quote
            .first()
            .ok_or_else(|| FetchError::Parse("No quote data".into()))?;

        let bars = normalize_series(rows_to_bars(&result.timestamp, quote))?;
        debug!(symbol, bars = bars.len(), "chart received");
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_with_gaps_are_skipped() {
        let quote = YahooQuote {
            open: vec![Some(1.0), None, Some(3.0)],
            high: vec![Some(1.5), Some(2.5), Some(3.5)],
            low: vec![Some(0.5), Some(1.5), Some(2.5)],
            close: vec![Some(1.2), Some(2.2)],
        };
        let bars = rows_to_bars(&[100, 200, 300], &quote);
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].time.timestamp(), 100);
        assert_eq!(bars[0].close, 1.2);
    }

    #[test]
    fn test_payload_decodes_without_volume() {
        let body = r#"{"chart":{"result":[{"meta":{"symbol":"EURUSD=X"},
            "timestamp":[1700000000],
            "indicators":{"quote":[{"open":[1.08],"high":[1.09],"low":[1.07],"close":[1.085],"volume":[0]}]}}],
            "error":null}}"#;
        let parsed: YahooResponse = serde_json::from_str(body).unwrap();
        let result = parsed.chart.result.unwrap().pop().unwrap();
        let bars = rows_to_bars(&result.timestamp, &result.indicators.quote[0]);
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].open, 1.08);
    }
}
