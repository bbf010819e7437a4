// custom_commands.rs - Prefix-triggered Custom Commands
// Holds the prefix/command table, rewrites outgoing messages that invoke a
// custom command, and persists every edit to CommandCenter.config.json.

use crate::error::StoreError;
use crate::messenger::{OutgoingMessage, MAX_MESSAGE_LENGTH};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

pub const CONFIG_FILE_NAME: &str = "CommandCenter.config.json";
pub const DEFAULT_PREFIX: &str = "./";

const DEFAULT_COMMANDS: [(&str, &str); 4] = [
    ("hello", "Hello, world!"),
    (
        "rules",
        "**Server Rules:**\n1. **Be Respectful** - Treat everyone with respect. No harassment or hate speech.\n2. **No Spamming** - Avoid excessive messages or disruptive content.\n3. **Stay On Topic** - Keep discussions relevant to the channel.\n4. **Follow Discord TOS** - Ensure your actions align with Discord's Terms of Service.",
    ),
    ("bye", "Goodbye, cruel world!"),
    ("triforce", "\u{200c} \u{200c}  ▲\n▲\u{200c} ▲"),
];

// ============================================================================
// COMMAND TABLE
// ============================================================================

/// Command name to response text. Lookups are exact; entry order is only
/// used when listing or saving the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandTable {
    entries: Vec<(String, String)>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, response)| response.as_str())
    }

    /// Replaces the response in place when `name` already exists.
    pub fn insert(&mut self, name: impl Into<String>, response: impl Into<String>) {
        let name = name.into();
        let response = response.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = response,
            None => self.entries.push((name, response)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, response)| (name.as_str(), response.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for CommandTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, response) in &self.entries {
            map.serialize_entry(name, response)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CommandTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = CommandTable;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of command names to response strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut table = CommandTable::new();
                while let Some((name, response)) = access.next_entry::<String, String>()? {
                    table.insert(name, response);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomCommandConfig {
    pub prefix: String,
    pub commands: CommandTable,
}

impl Default for CustomCommandConfig {
    fn default() -> Self {
        let mut commands = CommandTable::new();
        for (name, response) in DEFAULT_COMMANDS {
            commands.insert(name, response);
        }
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            commands,
        }
    }
}

/// On-disk shape; absent fields keep their current value.
#[derive(Debug, Deserialize)]
struct StoredConfig {
    prefix: Option<String>,
    commands: Option<CommandTable>,
}

/// A matched custom command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite<'a> {
    pub command: &'a str,
    /// Text after the command token. Not interpolated into the response.
    pub args: &'a str,
    pub response: &'a str,
}

impl CustomCommandConfig {
    /// Matches `<prefix><name>` as the first whitespace-delimited token.
    pub fn rewrite<'a>(&'a self, content: &'a str) -> Option<Rewrite<'a>> {
        let token = content.split(char::is_whitespace).next().unwrap_or_default();
        let command = token.strip_prefix(self.prefix.as_str())?;
        let response = self.commands.get(command)?;

        Some(Rewrite {
            command,
            args: content[token.len()..].trim(),
            response,
        })
    }

    /// Overlay the file on the current in-memory config, not on the defaults.
    /// On a reload, fields missing from the file keep their live values.
    fn merge(&mut self, stored: StoredConfig) {
        if let Some(prefix) = stored.prefix {
            if is_valid_prefix(&prefix) {
                self.prefix = prefix;
            } else {
                log::warn!("Ignoring invalid prefix '{}' in config file", prefix);
            }
        }
        if let Some(commands) = stored.commands {
            self.commands = commands;
        }
    }
}

fn is_valid_prefix(prefix: &str) -> bool {
    !prefix.is_empty() && !prefix.contains(char::is_whitespace)
}

// ============================================================================
// NOTICES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// User-visible outcome of a configuration operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: &'static str,
    pub body: String,
}

impl Notice {
    fn success(body: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: "Success",
            body: body.into(),
        }
    }

    fn info(title: &'static str, body: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title,
            body: body.into(),
        }
    }

    fn error(body: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: "Error",
            body: body.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }

    /// Write the notice to the log at a level matching its severity.
    pub fn log(&self) {
        match self.level {
            NoticeLevel::Error => log::error!("{}: {}", self.title, self.body),
            _ => log::info!("{}: {}", self.title, self.body),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let icon = match self.level {
            NoticeLevel::Success => "✅",
            NoticeLevel::Info => "ℹ️",
            NoticeLevel::Error => "❌",
        };
        write!(f, "{} **{}**: {}", icon, self.title, self.body)
    }
}

// ============================================================================
// PERSISTENCE
// ============================================================================

/// Raw access to the persisted configuration document.
pub trait ConfigStore: Send + Sync {
    /// `Ok(None)` when nothing has been persisted yet.
    fn read(&self) -> Result<Option<String>, StoreError>;
    fn write(&self, contents: &str) -> Result<(), StoreError>;
}

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<dir>/CommandCenter.config.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(CONFIG_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for JsonFileStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&self.path)?))
    }

    fn write(&self, contents: &str) -> Result<(), StoreError> {
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

// ============================================================================
// SERVICE
// ============================================================================

pub struct CustomCommandsService {
    store: Box<dyn ConfigStore>,
    config: RwLock<CustomCommandConfig>,
}

impl CustomCommandsService {
    /// Starts from the built-in defaults; call `load` to read the store.
    pub fn new(store: Box<dyn ConfigStore>) -> Self {
        Self {
            store,
            config: RwLock::new(CustomCommandConfig::default()),
        }
    }

    /// Read the persisted configuration, creating it when absent.
    pub async fn load(&self) -> Option<Notice> {
        let contents = match self.store.read() {
            Ok(Some(contents)) => contents,
            Ok(None) => return Some(self.create_default().await),
            Err(e) => {
                log::error!("Failed to read custom command config: {}", e);
                return Some(Notice::error("Failed to load commands from file."));
            }
        };

        match serde_json::from_str::<StoredConfig>(&contents) {
            Ok(stored) => {
                let mut config = self.config.write().await;
                config.merge(stored);
                log::info!(
                    "Loaded {} custom commands with prefix '{}'",
                    config.commands.len(),
                    config.prefix
                );
                None
            }
            Err(e) => {
                log::error!("Failed to parse custom command config: {}", e);
                Some(Notice::error("Failed to load commands from file."))
            }
        }
    }

    async fn create_default(&self) -> Notice {
        let defaults = CustomCommandConfig::default();
        match self.persist(&defaults) {
            Ok(()) => Notice::info(
                "Custom Commands",
                format!(
                    "Default config file created. {} can be edited in a text editor as well. Have fun!",
                    CONFIG_FILE_NAME
                ),
            ),
            Err(e) => {
                log::error!("Failed to write default custom command config: {}", e);
                Notice::error("Failed to create default config.")
            }
        }
    }

    pub async fn snapshot(&self) -> CustomCommandConfig {
        self.config.read().await.clone()
    }

    pub async fn set_prefix(&self, prefix: &str) -> Notice {
        let prefix = prefix.trim();
        if !is_valid_prefix(prefix) {
            return Notice::error("The prefix must be non-empty and contain no spaces.");
        }

        let mut config = self.config.write().await;
        config.prefix = prefix.to_string();
        self.save(&config, "Prefix updated successfully!")
    }

    /// Add a command, or replace the response of an existing one.
    pub async fn upsert_command(&self, name: &str, response: &str) -> Notice {
        let mut config = self.config.write().await;

        let name = name.trim();
        let name = name.strip_prefix(config.prefix.as_str()).unwrap_or(name);
        let response = response.trim();

        if name.is_empty() || name.contains(char::is_whitespace) {
            return Notice::error("Command names must be non-empty and contain no spaces.");
        }
        if response.is_empty() {
            return Notice::error("The response cannot be empty.");
        }
        if response.chars().count() > MAX_MESSAGE_LENGTH {
            return Notice::error(format!(
                "The response cannot be longer than {} characters.",
                MAX_MESSAGE_LENGTH
            ));
        }

        config.commands.insert(name, response);
        self.save(&config, "Commands saved successfully!")
    }

    pub async fn remove_command(&self, name: &str) -> Notice {
        let mut config = self.config.write().await;

        let name = name.trim();
        let name = name.strip_prefix(config.prefix.as_str()).unwrap_or(name);
        if config.commands.remove(name).is_none() {
            return Notice::error(format!("There is no custom command named `{}`.", name));
        }

        self.save(&config, "Command deleted!")
    }

    /// Rewrite `message` in place when it invokes a custom command.
    pub async fn intercept(&self, message: &mut OutgoingMessage) -> bool {
        let config = self.config.read().await;
        let Some(rewrite) = config.rewrite(&message.content) else {
            return false;
        };

        log::debug!(
            "Custom command '{}' matched in channel {} (args: '{}')",
            rewrite.command,
            message.channel_id,
            rewrite.args
        );
        let response = rewrite.response.to_string();
        drop(config);

        message.content = response;
        true
    }

    // The in-memory change is kept even when the write fails.
    fn save(&self, config: &CustomCommandConfig, success: &str) -> Notice {
        match self.persist(config) {
            Ok(()) => Notice::success(success),
            Err(e) => {
                log::error!("Failed to save custom command config: {}", e);
                Notice::error("Failed to save commands.")
            }
        }
    }

    fn persist(&self, config: &CustomCommandConfig) -> Result<(), StoreError> {
        let data = serde_json::to_string_pretty(config)?;
        self.store.write(&data)
    }
}
