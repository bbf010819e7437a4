// gifstuffapi.com: QR codes and animated avatar effects. Every endpoint
// answers with `{ "url": ... }` on success and `{ "error": ... }` otherwise.

use super::LookupClient;
use crate::error::LookupError;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GifEffect {
    PetPet,
    Swirl,
    Pizza,
    Money,
}

impl GifEffect {
    fn path(self) -> &'static str {
        match self {
            GifEffect::PetPet => "petpet",
            GifEffect::Swirl => "swirl",
            GifEffect::Pizza => "pizza",
            GifEffect::Money => "money",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GifEffect::PetPet => "PetPet",
            GifEffect::Swirl => "Swirl",
            GifEffect::Pizza => "Pizza",
            GifEffect::Money => "Money",
        }
    }
}

#[derive(Debug, Deserialize)]
struct GifstuffResponse {
    url: Option<String>,
    error: Option<serde_json::Value>,
}

impl GifstuffResponse {
    fn into_url(self) -> Result<String, LookupError> {
        if let Some(error) = self.error.filter(|error| !error.is_null()) {
            log::warn!("gifstuffapi reported an error: {}", error);
            return Err(LookupError::Shape("gifstuffapi returned an error"));
        }
        self.url
            .filter(|url| !url.is_empty())
            .ok_or(LookupError::Shape("no url in gifstuffapi response"))
    }
}

impl LookupClient {
    /// Image URL of a QR code encoding `target`.
    pub async fn qr_code(&self, target: &str) -> Option<String> {
        self.gifstuff("qr", ("url", target))
            .await
            .map_err(|e| log::error!("Error generating QR code for '{}': {}", target, e))
            .ok()
    }

    /// URL of `effect` applied to the image at `avatar_url`.
    pub async fn gif_effect(&self, effect: GifEffect, avatar_url: &str) -> Option<String> {
        self.gifstuff(effect.path(), ("image", avatar_url))
            .await
            .map_err(|e| log::error!("Error generating {} GIF: {}", effect.label(), e))
            .ok()
    }

    async fn gifstuff(&self, route: &str, param: (&str, &str)) -> Result<String, LookupError> {
        let base = self.endpoints.gifstuff.trim_end_matches('/');
        let request = self
            .http
            .get(format!("{}/{}/", base, route))
            .query(&[param]);
        let response: GifstuffResponse = self.fetch_json(request).await?;
        response.into_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::Endpoints;
    use mockito::Matcher;

    fn client_for(server: &mockito::Server) -> LookupClient {
        LookupClient::new(Endpoints {
            gifstuff: server.url(),
            ..Endpoints::default()
        })
    }

    #[tokio::test]
    async fn test_qr_code_returns_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/qr/")
            .match_query(Matcher::UrlEncoded("url".into(), "https://example.com/a b".into()))
            .with_body(r#"{"url": "https://gifstuffapi.com/out/qr123.png"}"#)
            .create_async()
            .await;

        let url = client_for(&server).qr_code("https://example.com/a b").await;
        assert_eq!(url.as_deref(), Some("https://gifstuffapi.com/out/qr123.png"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_qr_code_without_url_is_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/qr/")
            .match_query(Matcher::Any)
            .with_body(r#"{"status": "busy"}"#)
            .create_async()
            .await;

        assert!(client_for(&server).qr_code("x").await.is_none());
    }

    #[tokio::test]
    async fn test_gif_effect_uses_effect_route() {
        let mut server = mockito::Server::new_async().await;
        let avatar = "https://cdn.discordapp.com/avatars/1/abc.png";
        let mock = server
            .mock("GET", "/swirl/")
            .match_query(Matcher::UrlEncoded("image".into(), avatar.into()))
            .with_body(r#"{"url": "https://gifstuffapi.com/out/swirl.gif"}"#)
            .create_async()
            .await;

        let url = client_for(&server).gif_effect(GifEffect::Swirl, avatar).await;
        assert_eq!(url.as_deref(), Some("https://gifstuffapi.com/out/swirl.gif"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_gif_effect_error_is_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/money/")
            .match_query(Matcher::Any)
            .with_body(r#"{"error": "image too large", "url": "https://ignored"}"#)
            .create_async()
            .await;

        let url = client_for(&server)
            .gif_effect(GifEffect::Money, "https://cdn.example/a.png")
            .await;
        assert!(url.is_none());
    }
}
