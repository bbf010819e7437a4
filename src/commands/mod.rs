// commands/mod.rs - Slash Command Registry
// Declares every slash command the bot offers, registers them with Discord
// and routes incoming interactions to their handlers.

pub mod avatar;
pub mod custom;
pub mod lookup;
pub mod remind;

use crate::center::CommandCenter;
use crate::error::CommandResult;
use crate::messenger::truncate_message;
use serenity::{
    client::Context,
    http::Http,
    model::{
        application::{
            command::{Command, CommandOptionType},
            interaction::{
                application_command::{ApplicationCommandInteraction, CommandDataOptionValue},
                InteractionResponseType,
            },
        },
        user::User,
        Permissions,
    },
};

// ============================================================================
// COMMAND DESCRIPTORS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    String,
    User,
}

impl OptionKind {
    fn option_type(self) -> CommandOptionType {
        match self {
            OptionKind::String => CommandOptionType::String,
            OptionKind::User => CommandOptionType::User,
        }
    }
}

#[derive(Debug)]
pub struct CommandOption {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: OptionKind,
    pub required: bool,
}

/// Static description of one slash command.
#[derive(Debug)]
pub struct SlashCommand {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub options: &'static [CommandOption],
    /// Restricted to members with Manage Server by default
    pub admin: bool,
}

const fn user_option(description: &'static str) -> CommandOption {
    CommandOption {
        name: "user",
        description,
        kind: OptionKind::User,
        required: true,
    }
}

const fn string_option(name: &'static str, description: &'static str) -> CommandOption {
    CommandOption {
        name,
        description,
        kind: OptionKind::String,
        required: true,
    }
}

pub const SLASH_COMMANDS: &[SlashCommand] = &[
    SlashCommand {
        id: "Avatar-Command",
        name: "avatar",
        description: "Get the avatar URL for a user",
        options: &[user_option("The user whose avatar to show")],
        admin: false,
    },
    SlashCommand {
        id: "UrbanDictionary-Lookup",
        name: "urbanlookup",
        description: "Look up a term on Urban Dictionary",
        options: &[string_option("term", "The term to look up on Urban Dictionary")],
        admin: false,
    },
    SlashCommand {
        id: "UrbanDictionary-Lookup-Detailed",
        name: "urban2",
        description: "Look up a term on Urban Dictionary and show detailed definitions privately",
        options: &[string_option("term", "The term to look up on Urban Dictionary")],
        admin: false,
    },
    SlashCommand {
        id: "Lmgtfy-Link",
        name: "lmgtfy",
        description: "Generate a \"Let Me Google That For You\" link",
        options: &[string_option("query", "The search query")],
        admin: false,
    },
    SlashCommand {
        id: "PetPet-Generator",
        name: "petpet",
        description: "Generate a PetPet GIF from the user avatar",
        options: &[user_option("The user to generate the PetPet GIF for")],
        admin: false,
    },
    SlashCommand {
        id: "Swirl-Generator",
        name: "swirl",
        description: "Generate a Swirl GIF from the user avatar",
        options: &[user_option("The user to generate the Swirl GIF for")],
        admin: false,
    },
    SlashCommand {
        id: "WebsterDictionary-Lookup",
        name: "define",
        description: "Look up a term on Webster's Dictionary",
        options: &[string_option("term", "The term to look up on Webster's Dictionary")],
        admin: false,
    },
    SlashCommand {
        id: "Whois-Lookup",
        name: "whois",
        description: "Look up WHOIS information for an IP address",
        options: &[string_option("ip", "The IP address to look up WHOIS information for")],
        admin: false,
    },
    SlashCommand {
        id: "Rainbow-Command",
        name: "rainbow",
        description: "Post a rainbow video URL",
        options: &[],
        admin: false,
    },
    SlashCommand {
        id: "QRCode-Generator",
        name: "qr",
        description: "Generate a QR code for the given URL",
        options: &[string_option("url", "The URL to generate a QR code for")],
        admin: false,
    },
    SlashCommand {
        id: "Pizza-Generator",
        name: "pizza",
        description: "Generate a Pizza GIF from the user avatar",
        options: &[user_option("The user to generate the Pizza GIF for")],
        admin: false,
    },
    SlashCommand {
        id: "Money-Generator",
        name: "money",
        description: "Generate a Money GIF from the user avatar",
        options: &[user_option("The user to generate the Money GIF for")],
        admin: false,
    },
    SlashCommand {
        id: "Remind-Command",
        name: "remind",
        description: "Set a reminder for a user",
        options: &[
            user_option("The user to remind"),
            string_option("time", "The time to wait before reminding (e.g., 10m, 1h)"),
            string_option("message", "The message to remind the user of"),
        ],
        admin: false,
    },
    SlashCommand {
        id: "CustomCommands-Prefix",
        name: "prefix",
        description: "Change the prefix that triggers custom commands",
        options: &[string_option("prefix", "The new prefix, e.g. ./")],
        admin: true,
    },
    SlashCommand {
        id: "CustomCommands-Add",
        name: "addcommand",
        description: "Add a custom command or change its response",
        options: &[
            string_option("name", "Command name without the prefix"),
            string_option("response", "Text sent when the command is used"),
        ],
        admin: true,
    },
    SlashCommand {
        id: "CustomCommands-Remove",
        name: "removecommand",
        description: "Remove a custom command",
        options: &[string_option("name", "Command name without the prefix")],
        admin: true,
    },
    SlashCommand {
        id: "CustomCommands-List",
        name: "commands",
        description: "List the custom commands and their responses",
        options: &[],
        admin: false,
    },
    SlashCommand {
        id: "CustomCommands-Reload",
        name: "reloadcommands",
        description: "Reload custom commands from the config file",
        options: &[],
        admin: true,
    },
];

// ============================================================================
// REGISTRATION AND DISPATCH
// ============================================================================

/// Replace the bot's global slash commands with `SLASH_COMMANDS`.
pub async fn register_slash_commands(http: &Http) -> Result<Vec<Command>, serenity::Error> {
    Command::set_global_application_commands(http, |commands| {
        for descriptor in SLASH_COMMANDS {
            commands.create_application_command(|command| {
                command.name(descriptor.name).description(descriptor.description);
                if descriptor.admin {
                    command.default_member_permissions(Permissions::MANAGE_GUILD);
                }
                for option in descriptor.options {
                    command.create_option(|o| {
                        o.name(option.name)
                            .description(option.description)
                            .kind(option.kind.option_type())
                            .required(option.required)
                    });
                }
                command
            });
        }
        commands
    })
    .await
}

/// Route a slash command interaction to its handler.
pub async fn handle_slash_command(
    ctx: &Context,
    command: &ApplicationCommandInteraction,
    center: &CommandCenter,
) -> CommandResult {
    log::info!(
        "Slash command /{} from {} ({}) in channel {}",
        command.data.name,
        command.user.name,
        command.user.id,
        command.channel_id
    );

    match command.data.name.as_str() {
        "avatar" => avatar::avatar(ctx, command).await,
        "petpet" => avatar::effect(ctx, command, center, crate::lookup::GifEffect::PetPet).await,
        "swirl" => avatar::effect(ctx, command, center, crate::lookup::GifEffect::Swirl).await,
        "pizza" => avatar::effect(ctx, command, center, crate::lookup::GifEffect::Pizza).await,
        "money" => avatar::effect(ctx, command, center, crate::lookup::GifEffect::Money).await,
        "rainbow" => avatar::rainbow(ctx, command).await,
        "urbanlookup" => lookup::urban(ctx, command, center).await,
        "urban2" => lookup::urban_detailed(ctx, command, center).await,
        "define" => lookup::define(ctx, command, center).await,
        "whois" => lookup::whois(ctx, command, center).await,
        "lmgtfy" => lookup::lmgtfy(ctx, command).await,
        "qr" => lookup::qr(ctx, command, center).await,
        "remind" => remind::remind(ctx, command, center).await,
        "prefix" => custom::set_prefix(ctx, command, center).await,
        "addcommand" => custom::add_command(ctx, command, center).await,
        "removecommand" => custom::remove_command(ctx, command, center).await,
        "commands" => custom::list_commands(ctx, command, center).await,
        "reloadcommands" => custom::reload_commands(ctx, command, center).await,
        other => respond(ctx, command, format!("Unknown slash command: {}", other), true).await,
    }
}

// ============================================================================
// INTERACTION HELPERS
// ============================================================================

/// Value of a string option, ignoring blank input.
pub(crate) fn string_arg<'a>(command: &'a ApplicationCommandInteraction, name: &str) -> Option<&'a str> {
    command
        .data
        .options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| option.value.as_ref())
        .and_then(|value| value.as_str())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Resolved user behind a user option.
pub(crate) fn user_arg<'a>(command: &'a ApplicationCommandInteraction, name: &str) -> Option<&'a User> {
    command
        .data
        .options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| option.resolved.as_ref())
        .and_then(|resolved| match resolved {
            CommandDataOptionValue::User(user, _) => Some(user),
            _ => None,
        })
}

/// Answer the interaction immediately.
pub(crate) async fn respond(
    ctx: &Context,
    command: &ApplicationCommandInteraction,
    content: impl Into<String>,
    ephemeral: bool,
) -> CommandResult {
    let content = truncate_message(content.into());
    command
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| message.content(content).ephemeral(ephemeral))
        })
        .await?;
    Ok(())
}

/// Acknowledge now and answer later with `edit_response`.
pub(crate) async fn defer(ctx: &Context, command: &ApplicationCommandInteraction, ephemeral: bool) -> CommandResult {
    command
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::DeferredChannelMessageWithSource)
                .interaction_response_data(|message| message.ephemeral(ephemeral))
        })
        .await?;
    Ok(())
}

pub(crate) async fn edit_response(
    ctx: &Context,
    command: &ApplicationCommandInteraction,
    content: impl Into<String>,
) -> CommandResult {
    let content = truncate_message(content.into());
    command
        .edit_original_interaction_response(&ctx.http, |response| response.content(content))
        .await?;
    Ok(())
}

/// Replace a deferred public response with a reply only the caller sees.
pub(crate) async fn fail_privately(
    ctx: &Context,
    command: &ApplicationCommandInteraction,
    content: impl Into<String>,
) -> CommandResult {
    let content = truncate_message(content.into());
    command.delete_original_interaction_response(&ctx.http).await?;
    command
        .create_followup_message(&ctx.http, |message| message.content(content).ephemeral(true))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_command_names_and_ids_are_unique() {
        let names: HashSet<_> = SLASH_COMMANDS.iter().map(|c| c.name).collect();
        let ids: HashSet<_> = SLASH_COMMANDS.iter().map(|c| c.id).collect();
        assert_eq!(names.len(), SLASH_COMMANDS.len());
        assert_eq!(ids.len(), SLASH_COMMANDS.len());
    }

    #[test]
    fn test_descriptors_fit_discord_limits() {
        for command in SLASH_COMMANDS {
            assert!(
                !command.name.is_empty()
                    && command.name.len() <= 32
                    && command
                        .name
                        .chars()
                        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()),
                "bad name {}",
                command.name
            );
            assert!(
                !command.description.is_empty() && command.description.chars().count() <= 100,
                "bad description for {}",
                command.name
            );
            assert!(command.options.len() <= 25);
            for option in command.options {
                assert!(option.name.len() <= 32 && option.name.chars().all(|c| c.is_ascii_lowercase()));
                assert!(option.description.chars().count() <= 100);
            }
        }
    }

    #[test]
    fn test_remind_option_order() {
        let remind = SLASH_COMMANDS.iter().find(|c| c.name == "remind").unwrap();
        let names: Vec<_> = remind.options.iter().map(|o| o.name).collect();
        assert_eq!(names, vec!["user", "time", "message"]);
        assert_eq!(remind.options[0].kind, OptionKind::User);
    }

    #[test]
    fn test_only_config_edits_are_admin() {
        let admin: Vec<_> = SLASH_COMMANDS.iter().filter(|c| c.admin).map(|c| c.name).collect();
        assert_eq!(admin, vec!["prefix", "addcommand", "removecommand", "reloadcommands"]);
    }
}
