//! Station list retrieval.
//!
//! [`fetch_stations`] never returns an error: every failure becomes a
//! [`FetchOutcome::Unavailable`] so the scheduler decides what to do with it.

mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::error::FetchFailure;
use crate::station::Station;

/// Stations decoded from one response.
#[derive(Debug, Default)]
pub struct StationList {
    pub stations: Vec<Station>,
    /// Array elements that were not station objects of the expected shape.
    pub rejected: usize,
}

/// Result of one fetch attempt.
#[derive(Debug)]
pub enum FetchOutcome {
    Stations(StationList),
    Unavailable(FetchFailure),
}

/// Scheme, host and path of `url`. The query string may carry the API key.
pub fn redact_url(url: &str) -> String {
    match reqwest::Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_query(None);
            parsed.set_fragment(None);
            let _ = parsed.set_password(None);
            parsed.to_string()
        }
        Err(_) => "<invalid url>".to_string(),
    }
}

/// Issues one GET against `url` and decodes the body as a JSON array of stations.
///
/// An array with no usable station counts as [`FetchFailure::Empty`].
#[tracing::instrument(skip_all, fields(url = %redact_url(url)))]
pub async fn fetch_stations<C: HttpClient>(client: &C, url: &str) -> FetchOutcome {
    match try_fetch(client, url).await {
        Ok(list) => {
            debug!(
                stations = list.stations.len(),
                rejected = list.rejected,
                "Station list received"
            );
            FetchOutcome::Stations(list)
        }
        Err(failure) => {
            warn!(kind = failure.kind(), error = %failure, "Station fetch failed");
            FetchOutcome::Unavailable(failure)
        }
    }
}

async fn try_fetch<C: HttpClient>(client: &C, url: &str) -> Result<StationList, FetchFailure> {
    let url = reqwest::Url::parse(url).map_err(|e| FetchFailure::InvalidUrl(e.to_string()))?;
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client.execute(req).await.map_err(|e| FetchFailure::Transport(e.without_url()))?;
    if resp.status() != StatusCode::OK {
        return Err(FetchFailure::Status(resp.status()));
    }

    let bytes = resp.bytes().await.map_err(|e| FetchFailure::Transport(e.without_url()))?;
    let list = decode_stations(&bytes)?;
    if list.stations.is_empty() {
        return Err(FetchFailure::Empty);
    }
    Ok(list)
}

/// Decodes a JSON array element by element so one bad record does not sink the rest.
fn decode_stations(bytes: &[u8]) -> Result<StationList, FetchFailure> {
    let items: Vec<serde_json::Value> =
        serde_json::from_slice(bytes).map_err(|e| FetchFailure::Decode(e.to_string()))?;

    let mut list = StationList {
        stations: Vec::with_capacity(items.len()),
        rejected: 0,
    };
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Station>(item) {
            Ok(station) => list.stations.push(station),
            Err(e) => {
                warn!(index, error = %e, "Rejecting malformed station record");
                list.rejected += 1;
            }
        }
    }
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_url_drops_query() {
        assert_eq!(
            redact_url("https://api.jcdecaux.com/vls/v3/stations?apiKey=secret"),
            "https://api.jcdecaux.com/vls/v3/stations"
        );
        assert_eq!(redact_url("nope"), "<invalid url>");
    }

    #[test]
    fn test_decode_skips_wrong_typed_record() {
        let body = br#"[
            {"contractName": "PARIS", "totalStands": {"availabilities": {"bikes": 5}}},
            {"contractName": "PARIS", "number": "not-a-number"},
            42
        ]"#;

        let list = decode_stations(body).unwrap();
        assert_eq!(list.stations.len(), 1);
        assert_eq!(list.rejected, 2);
        assert_eq!(list.stations[0].bikes().unwrap(), 5);
    }

    #[test]
    fn test_decode_rejects_non_array_body() {
        let err = decode_stations(br#"{"error": "nope"}"#).unwrap_err();
        assert!(matches!(err, FetchFailure::Decode(_)));
    }

    #[test]
    fn test_decode_empty_array() {
        let list = decode_stations(b"[]").unwrap();
        assert!(list.stations.is_empty());
        assert_eq!(list.rejected, 0);
    }
}
