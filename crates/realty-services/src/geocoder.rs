//! Address geocoding over the Google Geocoding JSON API.

use anyhow::Context;
use async_trait::async_trait;
use realty_core::models::GeoPoint;
use serde::Deserialize;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;
use thiserror::Error;

/// Shortest trimmed address worth sending to the provider.
const MIN_ADDRESS_LEN: usize = 3;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("{0}")]
    Validation(String),

    #[error("No results found for address: {0}")]
    NotFound(String),

    #[error("Google API Error: {0}")]
    Upstream(String),
}

/// A resolved address.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedAddress {
    pub location: GeoPoint,
    pub formatted_address: String,
    /// Falls back to the caller's input when the provider gives no formatted address
    pub display_name: String,
    pub place_id: Option<String>,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, address: &str) -> Result<GeocodedAddress, GeocodeError>;
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    formatted_address: Option<String>,
    #[serde(default)]
    place_id: Option<String>,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(default)]
    location: Option<LatLng>,
}

/// Either coordinate may be missing or null in a degraded provider result.
#[derive(Debug, Deserialize)]
struct LatLng {
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lng: Option<f64>,
}

/// Google Geocoding client. One HTTP request per [`Geocoder::resolve`] call.
pub struct GoogleGeocoder {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl Debug for GoogleGeocoder {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GoogleGeocoder")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GoogleGeocoder {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client for Google Geocoding API")?;

        Ok(Self {
            http_client,
            api_key,
            base_url,
        })
    }

    fn into_address(input: &str, response: GeocodeResponse) -> Result<GeocodedAddress, GeocodeError> {
        match response.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => return Err(GeocodeError::NotFound(input.to_string())),
            other => {
                let detail = response
                    .error_message
                    .map(|m| format!("{} - {}", other, m))
                    .unwrap_or_else(|| other.to_string());
                return Err(GeocodeError::Upstream(detail));
            }
        }

        let first = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NotFound(input.to_string()))?;

        let location = first
            .geometry
            .and_then(|geometry| geometry.location)
            .and_then(|LatLng { lat, lng }| GeoPoint::new(lng?, lat?))
            .ok_or_else(|| {
                GeocodeError::Validation(format!(
                    "Geocoder returned invalid coordinates for address: {}",
                    input
                ))
            })?;

        let formatted_address = first.formatted_address.unwrap_or_default();
        let display_name = if formatted_address.trim().is_empty() {
            input.to_string()
        } else {
            formatted_address.clone()
        };

        Ok(GeocodedAddress {
            location,
            formatted_address,
            display_name,
            place_id: first.place_id,
        })
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    #[tracing::instrument(skip(self))]
    async fn resolve(&self, address: &str) -> Result<GeocodedAddress, GeocodeError> {
        let address = address.trim();
        if address.chars().count() < MIN_ADDRESS_LEN {
            return Err(GeocodeError::Validation(format!(
                "Address must be at least {} characters",
                MIN_ADDRESS_LEN
            )));
        }

        let start = std::time::Instant::now();

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| GeocodeError::Upstream(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(
                status = status.as_u16(),
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Geocoding request rejected"
            );
            return Err(GeocodeError::Upstream(format!("HTTP {}", status)));
        }

        let body: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Upstream(format!("invalid response body: {}", e)))?;

        tracing::debug!(
            provider_status = %body.status,
            results = body.results.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Geocoding response received"
        );

        Self::into_address(address, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn geocoder(server: &mockito::ServerGuard) -> GoogleGeocoder {
        GoogleGeocoder::new(
            "test-key".to_string(),
            format!("{}/json", server.url()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_resolve_ok() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("address".into(), "1 George St Sydney".into()),
                Matcher::UrlEncoded("key".into(), "test-key".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"status":"OK","results":[{"formatted_address":"1 George St, Sydney NSW 2000, Australia","place_id":"abc","geometry":{"location":{"lat":-33.86,"lng":151.21}}}]}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let resolved = geocoder(&server).resolve("  1 George St Sydney ").await.unwrap();

        mock.assert_async().await;
        assert_eq!(resolved.location.longitude, 151.21);
        assert_eq!(resolved.location.latitude, -33.86);
        assert_eq!(resolved.display_name, "1 George St, Sydney NSW 2000, Australia");
        assert_eq!(resolved.place_id.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_zero_results_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"status":"ZERO_RESULTS","results":[]}"#)
            .create_async()
            .await;

        let err = geocoder(&server).resolve("nowhere at all").await.unwrap_err();
        assert!(matches!(err, GeocodeError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_provider_denial_is_upstream() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"status":"REQUEST_DENIED","error_message":"bad key","results":[]}"#)
            .create_async()
            .await;

        let err = geocoder(&server).resolve("1 George St").await.unwrap_err();
        match err {
            GeocodeError::Upstream(msg) => assert!(msg.contains("REQUEST_DENIED")),
            other => panic!("Expected Upstream, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_failure_is_upstream() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/json")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let err = geocoder(&server).resolve("1 George St").await.unwrap_err();
        assert!(matches!(err, GeocodeError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_short_input_makes_no_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/json")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let err = geocoder(&server).resolve("  ab  ").await.unwrap_err();
        assert!(matches!(err, GeocodeError::Validation(_)));
        mock.assert_async().await;
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        let response: GeocodeResponse = serde_json::from_str(
            r#"{"status":"OK","results":[{"geometry":{"location":{"lat":123.0,"lng":10.0}}}]}"#,
        )
        .unwrap();
        let err = GoogleGeocoder::into_address("somewhere", response).unwrap_err();
        assert!(matches!(err, GeocodeError::Validation(_)));
    }

    #[tokio::test]
    async fn test_result_without_coordinates_is_validation_error() {
        for body in [
            r#"{"status":"OK","results":[{"geometry":{}}]}"#,
            r#"{"status":"OK","results":[{"formatted_address":"x"}]}"#,
            r#"{"status":"OK","results":[{"geometry":{"location":{"lat":null,"lng":null}}}]}"#,
            r#"{"status":"OK","results":[{"geometry":{"location":{"lat":-33.8}}}]}"#,
        ] {
            let mut server = mockito::Server::new_async().await;
            let _mock = server
                .mock("GET", "/json")
                .match_query(Matcher::Any)
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(body)
                .create_async()
                .await;

            let err = geocoder(&server).resolve("1 George St").await.unwrap_err();
            assert!(
                matches!(err, GeocodeError::Validation(_)),
                "{} -> {:?}",
                body,
                err
            );
        }
    }

    #[test]
    fn test_display_name_falls_back_to_input() {
        let response: GeocodeResponse = serde_json::from_str(
            r#"{"status":"OK","results":[{"geometry":{"location":{"lat":1.0,"lng":2.0}}}]}"#,
        )
        .unwrap();
        let resolved = GoogleGeocoder::into_address("12 Short Rd", response).unwrap();
        assert_eq!(resolved.display_name, "12 Short Rd");
        assert!(resolved.formatted_address.is_empty());
    }
}
