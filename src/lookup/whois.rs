use super::LookupClient;
use crate::error::LookupError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static IPV4_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$")
        .expect("Invalid IPv4 regex pattern")
});

/// Dotted-quad IPv4 address with every octet in 0..=255.
pub fn is_valid_ipv4(ip: &str) -> bool {
    IPV4_PATTERN.is_match(ip)
}

#[derive(Debug, Deserialize)]
struct Geolocation {
    country_name: Option<String>,
    state: Option<String>,
    city: Option<String>,
    #[serde(rename = "IPv4")]
    ipv4: Option<String>,
}

impl LookupClient {
    /// Country, state and city for an IPv4 address. Callers validate `ip`
    /// with [`is_valid_ipv4`] first.
    pub async fn whois(&self, ip: &str) -> String {
        match self.geolocate(ip).await {
            Ok(location) => format_location(ip, location),
            Err(e) => {
                log::error!("Error looking up IP address {}: {}", ip, e);
                "An error occurred while looking up the IP address.".to_string()
            }
        }
    }

    async fn geolocate(&self, ip: &str) -> Result<Geolocation, LookupError> {
        let base = self.endpoints.geolocation.trim_end_matches('/');
        let url = Self::endpoint_url(&format!("{}/{}&position=true", base, ip))?;
        self.fetch_json(self.http.get(url)).await
    }
}

fn format_location(ip: &str, location: Geolocation) -> String {
    let Some(country) = non_empty(location.country_name) else {
        return format!("No WHOIS data found for IP address \"{}\".", ip);
    };

    format!(
        "**IP Address**: {}\n**Country**: {}\n**State**: {}\n**City**: {}",
        non_empty(location.ipv4).unwrap_or_else(|| ip.to_string()),
        country,
        non_empty(location.state).unwrap_or_else(|| "N/A".to_string()),
        non_empty(location.city).unwrap_or_else(|| "N/A".to_string())
    )
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
