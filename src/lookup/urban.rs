use super::LookupClient;
use crate::error::LookupError;
use chrono::DateTime;
use serde::Deserialize;

const DETAILED_LIMIT: usize = 4;

#[derive(Debug, Deserialize)]
struct UrbanResponse {
    #[serde(default)]
    result_type: Option<String>,
    #[serde(default)]
    list: Vec<UrbanDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UrbanDefinition {
    pub definition: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub thumbs_up: i64,
    #[serde(default)]
    pub thumbs_down: i64,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub written_on: String,
}

impl LookupClient {
    /// All definitions for `term`, in API order. Empty when there are none.
    pub async fn urban_definitions(&self, term: &str) -> Result<Vec<UrbanDefinition>, LookupError> {
        let request = self
            .http
            .get(&self.endpoints.urban_dictionary)
            .query(&[("term", term)]);
        let response: UrbanResponse = self.fetch_json(request).await?;

        if response.result_type.as_deref() == Some("no_results") {
            return Ok(Vec::new());
        }
        Ok(response.list)
    }

    /// Top definition of `term`, formatted for a chat message.
    pub async fn urban_lookup(&self, term: &str) -> String {
        match self.urban_definitions(term).await {
            Ok(definitions) => match definitions.first() {
                Some(top) => format_urban(term, top),
                None => format!("No results found for \"{}\" on Urban Dictionary.", term),
            },
            Err(e) => {
                log::error!("Error looking up term '{}' on Urban Dictionary: {}", term, e);
                "An error occurred while looking up the term.".to_string()
            }
        }
    }
}

fn format_urban(term: &str, definition: &UrbanDefinition) -> String {
    format!(
        "**{}**\n**Definition**: {}\n**Example**: {}",
        term, definition.definition, definition.example
    )
}

/// Up to four definitions, most liked first, with Urban Dictionary's
/// `[link]` brackets removed. `None` when the list is empty.
pub fn format_detailed(term: &str, definitions: &[UrbanDefinition]) -> Option<String> {
    if definitions.is_empty() {
        return None;
    }

    let mut ranked: Vec<&UrbanDefinition> = definitions.iter().collect();
    ranked.sort_by(|a, b| b.thumbs_up.cmp(&a.thumbs_up));

    let blocks: Vec<String> = ranked
        .iter()
        .take(DETAILED_LIMIT)
        .enumerate()
        .map(|(index, definition)| {
            format!(
                "**Definition {}:**\n{}\n\n**Example:**\n{}\n\nLikes: {}, Dislikes: {}, Author: {}, Date: {}\n------------------------------------------",
                index + 1,
                strip_brackets(&definition.definition),
                strip_brackets(&definition.example),
                definition.thumbs_up,
                definition.thumbs_down,
                definition.author,
                format_date(&definition.written_on)
            )
        })
        .collect();

    Some(format!("**Urban Dictionary: {}**\n\n{}", term, blocks.join("\n")))
}

fn strip_brackets(text: &str) -> String {
    text.chars().filter(|c| *c != '[' && *c != ']').collect()
}

fn format_date(written_on: &str) -> String {
    match DateTime::parse_from_rfc3339(written_on) {
        Ok(date) => date.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => written_on.to_string(),
    }
}
