#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/filings/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! sec-api.io provider for filing search and statement facts.
//!
//! This crate provides access to two sec-api.io endpoints:
//!
//! - The Query API, to list a company's periodic filings newest first
//! - The XBRL-to-JSON converter, to read the statement sections of one filing
//!
//! # Example
//!
//! ```no_run
//! use filings_core::{FactSource, FilingSearch, FormType, StatementKind, Symbol};
//! use filings_secapi::SecApiClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SecApiClient::new("your_api_key");
//!
//!     let filings = client
//!         .search_filings(&Symbol::new("AAPL"), &FormType::ALL, 20)
//!         .await?;
//!     for accession in &filings {
//!         let facts = client.fetch_facts(accession).await?;
//!         let income = facts.section(StatementKind::Income);
//!         println!("{accession}: {} income tags", income.map_or(0, |s| s.len()));
//!     }
//!
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use filings_core::{
    AccessionNumber, FactSource, Fact, FilingFacts, FilingProvider, FilingSearch, FilingsError,
    FormType, Period, Result, Segment, StatementKind, Symbol, TagFacts, Value,
};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

/// sec-api.io base URL. The Query API is served from the root.
pub const SEC_API_BASE_URL: &str = "https://api.sec-api.io";

/// Provider name used in errors and logs.
const PROVIDER_NAME: &str = "sec-api.io";

/// Minimum spacing between requests.
const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(100);

/// Request timeout for the default HTTP client.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Rate limiter spacing consecutive requests
#[derive(Debug)]
struct RateLimiter {
    last_request: Instant,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Instant::now() - min_interval,
            min_interval,
        }
    }

    async fn wait(&mut self) {
        let elapsed = self.last_request.elapsed();
        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }
        self.last_request = Instant::now();
    }
}

/// sec-api.io client.
///
/// Implements [`FilingSearch`] over the Query API and [`FactSource`] over the
/// XBRL-to-JSON converter. Each call is a single attempt; retrying transient
/// failures is left to the caller.
#[derive(Clone)]
pub struct SecApiClient {
    client: Client,
    api_key: String,
    base_url: String,
    rate_limiter: Arc<Mutex<RateLimiter>>,
}

impl fmt::Debug for SecApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecApiClient")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl SecApiClient {
    /// Create a new client with the given API key.
    ///
    /// # Example
    /// ```
    /// use filings_secapi::SecApiClient;
    ///
    /// let client = SecApiClient::new("your_api_key");
    /// ```
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self::with_client(client, api_key)
    }

    /// Create a new client with a pre-configured HTTP client.
    #[must_use]
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: SEC_API_BASE_URL.to_string(),
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(DEFAULT_RATE_LIMIT))),
        }
    }

    /// Point the client at another host (a proxy or a local stub).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Query API endpoint.
    fn query_url(&self) -> String {
        format!("{}?token={}", self.base_url, self.api_key)
    }

    /// XBRL-to-JSON endpoint for one filing.
    fn xbrl_url(&self, accession: &AccessionNumber) -> String {
        format!(
            "{}/xbrl-to-json?accession-no={}&token={}",
            self.base_url, accession, self.api_key
        )
    }

    /// Send a request and decode the JSON body.
    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        self.rate_limiter.lock().await.wait().await;

        let response = request
            .send()
            .await
            .map_err(|e| FilingsError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FilingsError::RateLimited {
                provider: PROVIDER_NAME.to_string(),
                retry_after: retry_after(response.headers()),
            });
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FilingsError::AuthenticationFailed(PROVIDER_NAME.to_string()));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(FilingsError::Network(format!("HTTP {status}: {text}")));
        }

        let text = response
            .text()
            .await
            .map_err(|e| FilingsError::Network(e.to_string()))?;

        serde_json::from_str(&text).map_err(|e| FilingsError::Parse(format!("{e}: {text}")))
    }
}

fn retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
        .map(Duration::from_secs)
}

/// Builds the Query API request body.
fn query_body(symbol: &Symbol, forms: &[FormType], limit: usize) -> serde_json::Value {
    let forms = forms
        .iter()
        .map(|f| format!("formType:\"{f}\""))
        .collect::<Vec<_>>()
        .join(" OR ");

    serde_json::json!({
        "query": {
            "query_string": {
                "query": format!("({forms}) AND ticker:{symbol}")
            }
        },
        "from": "0",
        "size": limit.to_string(),
        "sort": [{ "filedAt": { "order": "desc" } }]
    })
}

impl FilingProvider for SecApiClient {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn description(&self) -> &str {
        "sec-api.io filing search and XBRL-to-JSON conversion for 10-Q and 10-K filings"
    }
}

#[async_trait]
impl FilingSearch for SecApiClient {
    async fn search_filings(
        &self,
        symbol: &Symbol,
        forms: &[FormType],
        limit: usize,
    ) -> Result<Vec<AccessionNumber>> {
        if symbol.as_str().is_empty() {
            return Err(FilingsError::InvalidParameter("Empty ticker".to_string()));
        }
        if forms.is_empty() {
            return Err(FilingsError::InvalidParameter(
                "No form types requested".to_string(),
            ));
        }

        debug!(%symbol, limit, "Searching filings");
        let body = query_body(symbol, forms, limit);
        let response: QueryResponse = self
            .send(self.client.post(self.query_url()).json(&body))
            .await?;

        let accessions = response.accessions(forms, limit);
        if accessions.is_empty() {
            return Err(FilingsError::SymbolNotFound(symbol.to_string()));
        }

        debug!(%symbol, count = accessions.len(), "Found filings");
        Ok(accessions)
    }
}

#[async_trait]
impl FactSource for SecApiClient {
    async fn fetch_facts(&self, accession: &AccessionNumber) -> Result<FilingFacts> {
        debug!(%accession, "Fetching XBRL facts");
        let response: XbrlResponse = self.send(self.client.get(self.xbrl_url(accession))).await?;
        response.into_filing_facts(accession)
    }
}

// ============================================================================
// Query API response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    filings: Vec<FilingHit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FilingHit {
    accession_no: String,
    #[serde(default)]
    form_type: Option<String>,
}

impl QueryResponse {
    /// Accession numbers in response order, restricted to the requested forms.
    fn accessions(self, forms: &[FormType], limit: usize) -> Vec<AccessionNumber> {
        self.filings
            .into_iter()
            .filter(|hit| match hit.form_type.as_deref().map(str::parse::<FormType>) {
                Some(Ok(form)) => forms.contains(&form),
                Some(Err(_)) => false,
                None => true,
            })
            .map(|hit| AccessionNumber::new(hit.accession_no))
            .take(limit)
            .collect()
    }
}

// ============================================================================
// XBRL-to-JSON response types
// ============================================================================

/// Top-level sections by name; only the statement sections are decoded further.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct XbrlResponse {
    sections: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawFact {
    period: RawPeriod,
    #[serde(default)]
    value: Option<serde_json::Value>,
    #[serde(default)]
    segment: Option<RawSegment>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPeriod {
    Instant {
        instant: String,
    },
    Range {
        #[serde(rename = "startDate")]
        start_date: String,
        #[serde(rename = "endDate")]
        end_date: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSegment {
    One(RawDimension),
    Many(Vec<RawDimension>),
}

#[derive(Debug, Deserialize)]
struct RawDimension {
    dimension: String,
    value: String,
}

impl RawPeriod {
    fn to_period(&self) -> Result<Period> {
        match self {
            Self::Instant { instant } => instant.parse(),
            Self::Range {
                start_date,
                end_date,
            } => format!("{start_date}-{end_date}").parse(),
        }
    }
}

impl RawSegment {
    /// Any segment marks the fact as segmented; only the first dimension is kept.
    fn into_segment(self) -> Segment {
        let first = match self {
            Self::One(d) => Some(d),
            Self::Many(ds) => ds.into_iter().next(),
        };
        match first {
            Some(d) => Segment::new(d.dimension, d.value),
            None => Segment::new("", ""),
        }
    }
}

fn parse_value(raw: serde_json::Value) -> Result<Option<Value>> {
    match raw {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => s.parse().map(Some),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(v) => Ok(Some(Value::Integer(v))),
            None => n
                .as_f64()
                .map(|v| Some(Value::Decimal(v)))
                .ok_or_else(|| FilingsError::Parse(format!("Invalid numeric value {n}"))),
        },
        other => Err(FilingsError::Parse(format!("Invalid numeric value {other}"))),
    }
}

impl RawFact {
    fn into_fact(self) -> Result<Fact> {
        let period = self.period.to_period()?;
        let value = match self.value {
            Some(raw) => parse_value(raw)?,
            None => None,
        };
        Ok(Fact {
            period,
            value,
            segment: self.segment.map(RawSegment::into_segment),
        })
    }
}

impl XbrlResponse {
    /// Converts the three statement sections; facts that cannot be decoded are skipped.
    fn into_filing_facts(mut self, accession: &AccessionNumber) -> Result<FilingFacts> {
        let mut facts = FilingFacts::new().with_accession(accession.clone());

        for kind in StatementKind::ALL {
            let Some(raw) = self.sections.remove(kind.section_key()) else {
                debug!(%accession, statement = %kind, "Section not reported");
                continue;
            };
            let section: BTreeMap<String, Vec<RawFact>> = serde_json::from_value(raw)
                .map_err(|e| FilingsError::Parse(format!("Invalid {kind} section: {e}")))?;

            let mut tags = TagFacts::new();
            for (tag, raw_facts) in section {
                let converted = tags.entry(tag.clone()).or_insert_with(Vec::new);
                for raw in raw_facts {
                    match raw.into_fact() {
                        Ok(fact) => converted.push(fact),
                        Err(e) => warn!(%accession, %tag, error = %e, "Skipping undecodable fact"),
                    }
                }
            }
            facts = facts.with_section(kind, tags);
        }

        Ok(facts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const XBRL_FIXTURE: &str = r#"{
        "CoverPage": { "DocumentType": "10-Q" },
        "BalanceSheets": {
            "Assets": [
                { "decimals": "-6", "unitRef": "usd", "period": { "instant": "2020-06-27" }, "value": "317344000000" },
                { "decimals": "-6", "unitRef": "usd", "period": { "instant": "2019-09-28" }, "value": "338516000000" }
            ],
            "InventoryNet": [
                { "period": { "instant": "2020-06-27" } }
            ]
        },
        "StatementsOfIncome": {
            "RevenueFromContractWithCustomerExcludingAssessedTax": [
                { "period": { "startDate": "2020-03-29", "endDate": "2020-06-27" }, "value": "59685000000" },
                {
                    "period": { "startDate": "2020-03-29", "endDate": "2020-06-27" },
                    "segment": { "dimension": "srt:ProductOrServiceAxis", "value": "us-gaap:ProductMember" },
                    "value": "47051000000"
                },
                {
                    "period": { "startDate": "2020-03-29", "endDate": "2020-06-27" },
                    "segment": [
                        { "dimension": "srt:ProductOrServiceAxis", "value": "aapl:IPhoneMember" },
                        { "dimension": "us-gaap:StatementBusinessSegmentsAxis", "value": "aapl:AmericasSegmentMember" }
                    ],
                    "value": "26418000000"
                }
            ],
            "EarningsPerShareBasic": [
                { "period": { "startDate": "2020-03-29", "endDate": "2020-06-27" }, "value": "2.61" },
                { "period": { "startDate": "2020-03-29", "endDate": "2020-06-27" }, "value": "not a number" }
            ]
        }
    }"#;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn decode() -> FilingFacts {
        let response: XbrlResponse = serde_json::from_str(XBRL_FIXTURE).unwrap();
        response
            .into_filing_facts(&AccessionNumber::new("0000320193-20-000062"))
            .unwrap()
    }

    #[test]
    fn test_decode_instant_facts() {
        let facts = decode();
        let bs = facts.section(StatementKind::BalanceSheet).unwrap();

        let assets = &bs["Assets"];
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].period, Period::Instant(date("2020-06-27")));
        assert_eq!(assets[0].value, Some(Value::Integer(317_344_000_000)));
        assert!(!assets[0].is_segmented());

        assert_eq!(bs["InventoryNet"][0].value, None);
    }

    #[test]
    fn test_decode_range_and_segments() {
        let facts = decode();
        let income = facts.section(StatementKind::Income).unwrap();
        let revenue = &income["RevenueFromContractWithCustomerExcludingAssessedTax"];
        let quarter = Period::range(date("2020-03-29"), date("2020-06-27"));

        assert_eq!(revenue.len(), 3);
        assert_eq!(revenue[0].period, quarter);
        assert!(!revenue[0].is_segmented());
        assert_eq!(
            revenue[1].segment,
            Some(Segment::new("srt:ProductOrServiceAxis", "us-gaap:ProductMember"))
        );
        assert_eq!(
            revenue[2].segment.as_ref().map(|s| s.member.as_str()),
            Some("aapl:IPhoneMember")
        );
    }

    #[test]
    fn test_undecodable_fact_skipped() {
        let facts = decode();
        let eps = &facts.section(StatementKind::Income).unwrap()["EarningsPerShareBasic"];
        assert_eq!(eps.len(), 1);
        assert_eq!(eps[0].value, Some(Value::Decimal(2.61)));
    }

    #[test]
    fn test_missing_section() {
        let facts = decode();
        assert!(facts.section(StatementKind::CashFlow).is_none());
        assert_eq!(
            facts.accession.as_ref().map(AccessionNumber::as_str),
            Some("0000320193-20-000062")
        );
    }

    #[test]
    fn test_malformed_section() {
        let json = r#"{ "CoverPage": {}, "BalanceSheets": { "Assets": [ { "value": "1" } ] } }"#;
        let response: XbrlResponse = serde_json::from_str(json).unwrap();
        let err = response
            .into_filing_facts(&AccessionNumber::new("0000320193-20-000062"))
            .unwrap_err();
        assert!(matches!(err, FilingsError::Parse(msg) if msg.contains("Balance sheet")));
    }

    #[test]
    fn test_numeric_json_values() {
        assert_eq!(
            parse_value(serde_json::json!(42)).unwrap(),
            Some(Value::Integer(42))
        );
        assert_eq!(
            parse_value(serde_json::json!(0.5)).unwrap(),
            Some(Value::Decimal(0.5))
        );
        assert_eq!(parse_value(serde_json::Value::Null).unwrap(), None);
        assert!(parse_value(serde_json::json!(true)).is_err());
    }

    #[test]
    fn test_query_body() {
        let body = query_body(&Symbol::new("aapl"), &FormType::ALL, 20);
        assert_eq!(
            body["query"]["query_string"]["query"],
            "(formType:\"10-Q\" OR formType:\"10-K\") AND ticker:AAPL"
        );
        assert_eq!(body["size"], "20");
        assert_eq!(body["sort"][0]["filedAt"]["order"], "desc");
    }

    #[test]
    fn test_query_response_order_and_forms() {
        let json = r#"{
            "total": { "value": 4 },
            "filings": [
                { "accessionNo": "0000320193-20-000062", "formType": "10-Q", "filedAt": "2020-07-31T06:03:04-04:00" },
                { "accessionNo": "0000320193-20-000052", "formType": "10-Q/A" },
                { "accessionNo": "0000320193-20-000010", "formType": "10-Q" },
                { "accessionNo": "0000320193-19-000119", "formType": "10-K" }
            ]
        }"#;
        let response: QueryResponse = serde_json::from_str(json).unwrap();
        let accessions = response.accessions(&FormType::ALL, 20);

        let ids: Vec<&str> = accessions.iter().map(AccessionNumber::as_str).collect();
        assert_eq!(
            ids,
            vec![
                "0000320193-20-000062",
                "0000320193-20-000010",
                "0000320193-19-000119"
            ]
        );
    }

    #[test]
    fn test_urls() {
        let client = SecApiClient::new("test_key").with_base_url("http://localhost:8080/");
        assert_eq!(client.query_url(), "http://localhost:8080?token=test_key");
        assert_eq!(
            client.xbrl_url(&AccessionNumber::new("0000320193-20-000062")),
            "http://localhost:8080/xbrl-to-json?accession-no=0000320193-20-000062&token=test_key"
        );
    }

    #[test]
    fn test_provider_metadata() {
        let client = SecApiClient::new("test_key");
        assert_eq!(client.name(), "sec-api.io");
        assert!(!client.description().is_empty());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let client = SecApiClient::new("secret_key_12345");
        let debug_str = format!("{client:?}");
        assert!(!debug_str.contains("secret_key_12345"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn test_empty_ticker_rejected() {
        let client = SecApiClient::new("test_key");
        let result = client
            .search_filings(&Symbol::new(""), &FormType::ALL, 20)
            .await;
        assert!(matches!(result, Err(FilingsError::InvalidParameter(_))));
    }
}
