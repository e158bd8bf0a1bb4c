//! Dataset Module
//!
//! This module provides the token dataset model and the single startup fetch
//! for the vinetop explorer. It includes:
//!
//! - `Token`: one tradeable asset with its market metrics
//! - `Dataset`: the fetched snapshot (optional `lastUpdated` + token list)
//! - `fetch_dataset`: one-shot load from a local path or an http(s) URL
//! - Formatting helpers shared by the views and the headless check mode
//!
//! The snapshot is immutable once fetched. There is no retry policy: a failed
//! fetch is reported to the caller, which logs it and starts with an empty
//! dataset.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Budget for the one startup fetch, matching the connect timeout used by the
/// headless check mode.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Placeholder rendered for any absent metric.
pub const NOT_AVAILABLE: &str = "N/A";

/// One token record. Identity is `address`; uniqueness across the list is
/// assumed, not enforced. Market metrics are optional in the source data and
/// deserialize to `None` rather than failing the whole snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct Token {
    pub address: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub holders: u64,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub volume_24h: Option<f64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub supply: Option<f64>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// The fetched snapshot. `last_updated` is an opaque display string carried
/// through from the envelope form of the resource, when present.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub last_updated: Option<String>,
    pub tokens: Vec<Token>,
}

/// The resource is either a bare array of tokens or an envelope object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDataset {
    Envelope {
        #[serde(rename = "lastUpdated")]
        #[serde(default)]
        last_updated: Option<String>,
        tokens: Vec<Token>,
    },
    List(Vec<Token>),
}

impl From<RawDataset> for Dataset {
    fn from(raw: RawDataset) -> Self {
        match raw {
            RawDataset::Envelope {
                last_updated,
                tokens,
            } => Dataset {
                last_updated,
                tokens,
            },
            RawDataset::List(tokens) => Dataset {
                last_updated: None,
                tokens,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },
    #[error("{url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("malformed token data: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Decode a snapshot from raw JSON bytes, accepting both resource shapes.
pub fn parse_dataset(bytes: &[u8]) -> Result<Dataset, DataError> {
    let raw: RawDataset = serde_json::from_slice(bytes)?;
    Ok(raw.into())
}

/// Fetch the dataset once from `source`: an http(s) URL or a local path.
pub async fn fetch_dataset(source: &str) -> Result<Dataset, DataError> {
    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_remote(source).await?
    } else {
        tokio::fs::read(source)
            .await
            .map_err(|source_err| DataError::Read {
                path: source.to_string(),
                source: source_err,
            })?
    };
    parse_dataset(&bytes)
}

async fn fetch_remote(url: &str) -> Result<Vec<u8>, DataError> {
    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|source| DataError::Http {
            url: url.to_string(),
            source,
        })?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| DataError::Http {
            url: url.to_string(),
            source,
        })?;

    if !response.status().is_success() {
        return Err(DataError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }

    let bytes = response.bytes().await.map_err(|source| DataError::Http {
        url: url.to_string(),
        source,
    })?;
    Ok(bytes.to_vec())
}

// Helper functions for display

/// Thousands-grouped integer, e.g. 1234567 -> "1,234,567".
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Thousands-grouped amount, "N/A" when absent. Fractional parts are dropped
/// for whole values and kept to two places otherwise.
pub fn format_amount(value: Option<f64>) -> String {
    match value {
        Some(v) => {
            let whole = v.trunc().abs() as u64;
            let grouped = format_count(whole);
            let sign = if v < 0.0 { "-" } else { "" };
            if v.fract() == 0.0 {
                format!("{}{}", sign, grouped)
            } else {
                let cents = (v.fract().abs() * 100.0).round() as u64;
                format!("{}{}.{:02}", sign, grouped, cents)
            }
        }
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Six-decimal price, "N/A" when absent.
pub fn format_price(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.6}", v),
        None => NOT_AVAILABLE.to_string(),
    }
}
