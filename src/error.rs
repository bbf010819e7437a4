use thiserror::Error;

/// Problems reading `botconfig.txt`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("botconfig.txt file not found in any expected location (., .., ../.., src/)")]
    NotFound,
    #[error("DISCORD_TOKEN not found in botconfig.txt")]
    MissingToken,
    #[error("DISCORD_TOKEN in botconfig.txt is set to the placeholder value")]
    PlaceholderToken,
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}

/// Failures of the custom-command configuration store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("config file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures talking to one of the third-party lookup APIs.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid endpoint URL '{0}'")]
    Endpoint(String),
    #[error("unexpected response: {0}")]
    Shape(&'static str),
}

/// Rejected reminder delay tokens. The messages are shown to users verbatim.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DelayError {
    #[error("Invalid time format. Use '10m' for minutes or '1h' for hours.")]
    InvalidFormat,
    #[error("Invalid time unit. Use 'm' for minutes or 'h' for hours.")]
    InvalidUnit,
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Discord request failed: {0}")]
    Discord(#[from] serenity::Error),
}

/// Errors that abort a slash command handler.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Discord request failed: {0}")]
    Discord(#[from] serenity::Error),
}

pub type CommandResult = Result<(), CommandError>;
