use super::LookupClient;
use crate::error::LookupError;
use serde::Deserialize;

/// dictionaryapi.dev answers with an array of entries, or with an object
/// carrying a `title` when the word is unknown.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WebsterResponse {
    Entries(Vec<Entry>),
    Message { title: String },
}

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    meanings: Vec<Meaning>,
}

#[derive(Debug, Deserialize)]
struct Meaning {
    #[serde(default)]
    definitions: Vec<Definition>,
}

#[derive(Debug, Deserialize)]
struct Definition {
    definition: String,
    example: Option<String>,
}

impl LookupClient {
    /// First dictionary definition of `term`, formatted for a chat message.
    pub async fn define(&self, term: &str) -> String {
        match self.first_definition(term).await {
            Ok(Some(definition)) => format!(
                "**{}**\n**Definition**: {}\n**Example**: {}",
                term,
                definition.definition,
                definition
                    .example
                    .filter(|example| !example.is_empty())
                    .unwrap_or_else(|| "No example available.".to_string())
            ),
            Ok(None) => format!("No results found for \"{}\" on Webster's Dictionary.", term),
            Err(e) => {
                log::error!("Error looking up term '{}' on Webster's Dictionary: {}", term, e);
                "An error occurred while looking up the term on Webster's Dictionary.".to_string()
            }
        }
    }

    async fn first_definition(&self, term: &str) -> Result<Option<Definition>, LookupError> {
        let url = Self::url_with_segment(&self.endpoints.webster, term)?;
        let response: WebsterResponse = self.fetch_json(self.http.get(url)).await?;

        match response {
            WebsterResponse::Entries(entries) => entries
                .into_iter()
                .next()
                .and_then(|entry| entry.meanings.into_iter().next())
                .and_then(|meaning| meaning.definitions.into_iter().next())
                .map(Some)
                .ok_or(LookupError::Shape("entry without definitions")),
            WebsterResponse::Message { title } => {
                log::debug!("dictionaryapi.dev answered '{}' for '{}'", title, term);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::lookup::{Endpoints, LookupClient};

    fn client_for(server: &mockito::Server) -> LookupClient {
        LookupClient::new(Endpoints {
            webster: format!("{}/api/v2/entries/en", server.url()),
            ..Endpoints::default()
        })
    }

    #[tokio::test]
    async fn test_define_formats_first_definition() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v2/entries/en/hello")
            .with_body(r#"[{"word": "hello", "meanings": [{"partOfSpeech": "noun", "definitions": [{"definition": "A greeting.", "example": "hello, everyone."}, {"definition": "Other."}]}]}]"#)
            .create_async()
            .await;

        let result = client_for(&server).define("hello").await;
        assert_eq!(result, "**hello**\n**Definition**: A greeting.\n**Example**: hello, everyone.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_define_without_example() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v2/entries/en/ice%20cream")
            .with_body(r#"[{"meanings": [{"definitions": [{"definition": "A frozen dessert."}]}]}]"#)
            .create_async()
            .await;

        let result = client_for(&server).define("ice cream").await;
        assert!(result.ends_with("**Example**: No example available."));
    }

    #[tokio::test]
    async fn test_define_unknown_word() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v2/entries/en/qwzx")
            .with_status(404)
            .with_body(r#"{"title": "No Definitions Found", "message": "Sorry pal", "resolution": "Try again"}"#)
            .create_async()
            .await;

        let result = client_for(&server).define("qwzx").await;
        assert_eq!(result, "No results found for \"qwzx\" on Webster's Dictionary.");
    }

    #[tokio::test]
    async fn test_define_empty_entries_falls_back() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v2/entries/en/odd")
            .with_body("[]")
            .create_async()
            .await;

        let result = client_for(&server).define("odd").await;
        assert_eq!(
            result,
            "An error occurred while looking up the term on Webster's Dictionary."
        );
    }
}
