// config.rs - Bot Configuration
// Reads botconfig.txt (KEY=VALUE lines) from the first location that has one.

use crate::error::ConfigError;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

const CONFIG_PATHS: [&str; 4] = [
    "botconfig.txt",
    "../botconfig.txt",
    "../../botconfig.txt",
    "src/botconfig.txt",
];

const PLACEHOLDER_TOKEN: &str = "YOUR_BOT_TOKEN_HERE";

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub discord_token: String,
    /// Directory holding CommandCenter.config.json
    pub storage_dir: PathBuf,
    /// Overwrite the global slash command list on startup
    pub register_commands: bool,
}

impl BotConfig {
    /// Load configuration from botconfig.txt with multi-path fallback
    pub fn load() -> Result<Self, ConfigError> {
        for config_path in &CONFIG_PATHS {
            match fs::read_to_string(config_path) {
                Ok(content) => {
                    log::info!("Configuration loaded from {}", config_path);
                    return Self::parse(&content);
                }
                Err(_) => continue,
            }
        }

        Err(ConfigError::NotFound)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let values = parse_key_values(content);

        let discord_token = match values.get("DISCORD_TOKEN") {
            Some(token) if token == PLACEHOLDER_TOKEN => return Err(ConfigError::PlaceholderToken),
            Some(token) if !token.is_empty() => token.clone(),
            _ => return Err(ConfigError::MissingToken),
        };

        let storage_dir = values
            .get("STORAGE_DIR")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let register_commands = match values.get("REGISTER_COMMANDS") {
            None => true,
            Some(value) => parse_bool("REGISTER_COMMANDS", value)?,
        };

        Ok(Self {
            discord_token,
            storage_dir,
            register_commands,
        })
    }
}

fn parse_key_values(content: &str) -> HashMap<String, String> {
    // Remove BOM if present
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut values = HashMap::new();

    for line in content.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            values.insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    values
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let content = "\u{feff}# bot settings\nDISCORD_TOKEN = abc.def\n\nSTORAGE_DIR=/var/lib/cc\nREGISTER_COMMANDS=false\n";
        let config = BotConfig::parse(content).unwrap();

        assert_eq!(config.discord_token, "abc.def");
        assert_eq!(config.storage_dir, PathBuf::from("/var/lib/cc"));
        assert!(!config.register_commands);
    }

    #[test]
    fn test_parse_defaults() {
        let config = BotConfig::parse("DISCORD_TOKEN=token").unwrap();
        assert_eq!(config.storage_dir, PathBuf::from("."));
        assert!(config.register_commands);
    }

    #[test]
    fn test_token_with_equals_sign_is_kept_whole() {
        let config = BotConfig::parse("DISCORD_TOKEN=a=b=c").unwrap();
        assert_eq!(config.discord_token, "a=b=c");
    }

    #[test]
    fn test_missing_and_placeholder_tokens_are_rejected() {
        assert!(matches!(
            BotConfig::parse("STORAGE_DIR=."),
            Err(ConfigError::MissingToken)
        ));
        assert!(matches!(
            BotConfig::parse("DISCORD_TOKEN="),
            Err(ConfigError::MissingToken)
        ));
        assert!(matches!(
            BotConfig::parse("DISCORD_TOKEN=YOUR_BOT_TOKEN_HERE"),
            Err(ConfigError::PlaceholderToken)
        ));
    }

    #[test]
    fn test_bad_boolean_is_rejected() {
        let result = BotConfig::parse("DISCORD_TOKEN=t\nREGISTER_COMMANDS=maybe");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }
}
