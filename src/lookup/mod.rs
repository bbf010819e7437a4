// lookup/mod.rs - Third-party Lookup Adapters
// Each adapter issues one GET, reads one or two JSON fields and formats a
// reply. Errors are logged and replaced with a fallback; nothing is retried.

pub mod gifstuff;
pub mod urban;
pub mod webster;
pub mod whois;

use crate::error::LookupError;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

pub use gifstuff::GifEffect;

const LMGTFY_URL: &str = "https://letmegooglethat.com/";

/// Base URLs of the external APIs.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub urban_dictionary: String,
    pub webster: String,
    pub geolocation: String,
    pub gifstuff: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            urban_dictionary: "https://api.urbandictionary.com/v0/define".to_string(),
            webster: "https://api.dictionaryapi.dev/api/v2/entries/en".to_string(),
            geolocation: "https://geolocation-db.com/json".to_string(),
            gifstuff: "https://gifstuffapi.com".to_string(),
        }
    }
}

/// Shared HTTP client for every lookup adapter.
pub struct LookupClient {
    http: Client,
    endpoints: Endpoints,
}

impl LookupClient {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            http: Client::new(),
            endpoints,
        }
    }

    async fn fetch_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, LookupError> {
        let response = request.send().await?;
        log::debug!("{} -> {}", response.url(), response.status());
        Ok(response.json::<T>().await?)
    }

    fn endpoint_url(base: &str) -> Result<Url, LookupError> {
        Url::parse(base).map_err(|_| LookupError::Endpoint(base.to_string()))
    }

    /// `base` with `segment` appended as one percent-encoded path segment.
    fn url_with_segment(base: &str, segment: &str) -> Result<Url, LookupError> {
        let mut url = Self::endpoint_url(base)?;
        url.path_segments_mut()
            .map_err(|_| LookupError::Endpoint(base.to_string()))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }
}

/// "Let me google that for you" link for `query`.
pub fn lmgtfy_link(query: &str) -> Result<String, LookupError> {
    let url = Url::parse_with_params(LMGTFY_URL, &[("q", query)])
        .map_err(|_| LookupError::Endpoint(LMGTFY_URL.to_string()))?;
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lmgtfy_link_encodes_query() {
        let link = lmgtfy_link("how to rust & cargo?").unwrap();
        assert_eq!(link, "https://letmegooglethat.com/?q=how+to+rust+%26+cargo%3F");
    }

    #[test]
    fn test_url_with_segment_encodes() {
        let url = LookupClient::url_with_segment("https://example.com/api/en/", "ice cream").unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/en/ice%20cream");

        let url = LookupClient::url_with_segment("https://example.com/api/en", "a/b").unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/en/a%2Fb");
    }

    #[test]
    fn test_bad_endpoint_is_reported() {
        assert!(matches!(
            LookupClient::url_with_segment("not a url", "x"),
            Err(LookupError::Endpoint(_))
        ));
    }
}
