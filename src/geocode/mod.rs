use reqwest::Client;
use serde::Deserialize;
use tracing::{instrument, Level};
use url::Url;

use crate::error::{Error, Result};
use crate::fetch;

static FIND_PLACE_URL: &str = "https://maps.googleapis.com/maps/api/place/findplacefromtext/json";

/// Fields requested from the lookup service. Geometry is requested alongside
/// the address to match the upstream query shape, though only the address is
/// read back.
static FIELDS: &str = "formatted_address,geometry";

/// A `candidates` key is required: a response without one is malformed and
/// surfaces as a fatal decode error rather than a miss.
#[derive(Debug, Deserialize)]
struct FindPlaceResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    formatted_address: Option<String>,
}

/// Text-search client for the place-lookup service.
#[derive(Debug, Clone)]
pub struct PlacesClient {
    client: Client,
    api_key: String,
    endpoint: Url,
}

impl PlacesClient {
    pub fn new(client: Client, api_key: String) -> Self {
        let endpoint = Url::parse(FIND_PLACE_URL).expect("endpoint url should be valid");
        Self {
            client,
            api_key,
            endpoint,
        }
    }

    /// Points the client at a different lookup endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Resolves a free-text business query to a formatted address.
    ///
    /// `None` means the service failed at the HTTP layer or returned no
    /// candidates; both are expected misses. Anything wrong past the HTTP
    /// layer (unparsable body, first candidate without an address) is a real
    /// error and halts the run.
    #[instrument(skip(self), level = Level::DEBUG)]
    pub async fn find_address(&self, query: &str) -> Result<Option<String>> {
        fetch::throttle().await;
        let request = self.client.get(self.endpoint.clone()).query(&[
            ("input", query),
            ("inputtype", "textquery"),
            ("fields", FIELDS),
            ("key", self.api_key.as_str()),
        ]);

        let response = match request.send().await.and_then(|r| r.error_for_status()) {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Place lookup failed for {query:?}: {e}");
                return Ok(None);
            }
        };
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                log::warn!("Reading place lookup response failed for {query:?}: {e}");
                return Ok(None);
            }
        };

        let parsed: FindPlaceResponse = serde_json::from_str(&body)?;
        let Some(first) = parsed.candidates.first() else {
            log::debug!("No candidates for {query:?}");
            return Ok(None);
        };
        first
            .formatted_address
            .clone()
            .map(Some)
            .ok_or_else(|| Error::Geocode(format!("candidate for {query:?} has no address")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> PlacesClient {
        PlacesClient::new(crate::fetch::make_client(), "test-key".into())
            .with_endpoint(Url::parse(&format!("{}/findplace", server.uri())).unwrap())
    }

    #[tokio::test]
    async fn test_first_candidate_address() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/findplace"))
            .and(query_param("input", "Acme Coffee, California, USA"))
            .and(query_param("inputtype", "textquery"))
            .and(query_param("fields", "formatted_address,geometry"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "OK",
                "candidates": [
                    {
                        "formatted_address": "1 Main St, Los Angeles, CA 90001, USA",
                        "geometry": { "location": { "lat": 34.05, "lng": -118.24 } }
                    },
                    { "formatted_address": "2 Other St, Fresno, CA 93650, USA" }
                ]
            })))
            .mount(&server)
            .await;

        let address = client_for(&server)
            .find_address("Acme Coffee, California, USA")
            .await
            .unwrap();
        assert_eq!(
            address.as_deref(),
            Some("1 Main St, Los Angeles, CA 90001, USA")
        );
    }

    #[tokio::test]
    async fn test_empty_candidates_is_a_miss() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/findplace"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "ZERO_RESULTS",
                "candidates": []
            })))
            .mount(&server)
            .await;

        let address = client_for(&server)
            .find_address("Nowhere Coffee, Texas, USA")
            .await
            .unwrap();
        assert_eq!(address, None);
    }

    #[tokio::test]
    async fn test_http_error_is_a_miss() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/findplace"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let address = client_for(&server)
            .find_address("Acme Coffee, California, USA")
            .await
            .unwrap();
        assert_eq!(address, None);
    }

    #[tokio::test]
    async fn test_malformed_body_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/findplace"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .find_address("Acme Coffee, California, USA")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[tokio::test]
    async fn test_candidate_without_address_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/findplace"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "OK",
                "candidates": [ { "geometry": { "location": { "lat": 0.0, "lng": 0.0 } } } ]
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .find_address("Acme Coffee, California, USA")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Geocode(_)));
    }
}
