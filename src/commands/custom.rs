// commands/custom.rs - Custom Command Management
// Edits the prefix and the command table. Every outcome is shown only to the
// member who ran the command.

use super::{respond, string_arg};
use crate::center::CommandCenter;
use crate::custom_commands::{CustomCommandConfig, Notice};
use crate::error::CommandResult;
use serenity::{
    client::Context,
    model::application::interaction::application_command::ApplicationCommandInteraction,
};

async fn reply_notice(ctx: &Context, command: &ApplicationCommandInteraction, notice: Notice) -> CommandResult {
    notice.log();
    respond(ctx, command, notice.to_string(), true).await
}

pub async fn set_prefix(ctx: &Context, command: &ApplicationCommandInteraction, center: &CommandCenter) -> CommandResult {
    let prefix = string_arg(command, "prefix").unwrap_or_default();
    let notice = center.custom_commands.set_prefix(prefix).await;
    reply_notice(ctx, command, notice).await
}

pub async fn add_command(ctx: &Context, command: &ApplicationCommandInteraction, center: &CommandCenter) -> CommandResult {
    let name = string_arg(command, "name").unwrap_or_default();
    let response = string_arg(command, "response").unwrap_or_default();
    let notice = center.custom_commands.upsert_command(name, response).await;
    reply_notice(ctx, command, notice).await
}

pub async fn remove_command(
    ctx: &Context,
    command: &ApplicationCommandInteraction,
    center: &CommandCenter,
) -> CommandResult {
    let name = string_arg(command, "name").unwrap_or_default();
    let notice = center.custom_commands.remove_command(name).await;
    reply_notice(ctx, command, notice).await
}

pub async fn list_commands(
    ctx: &Context,
    command: &ApplicationCommandInteraction,
    center: &CommandCenter,
) -> CommandResult {
    let config = center.custom_commands.snapshot().await;
    respond(ctx, command, format_listing(&config), true).await
}

pub async fn reload_commands(
    ctx: &Context,
    command: &ApplicationCommandInteraction,
    center: &CommandCenter,
) -> CommandResult {
    match center.custom_commands.load().await {
        Some(notice) => reply_notice(ctx, command, notice).await,
        None => {
            let config = center.custom_commands.snapshot().await;
            let body = format!(
                "✅ **Success**: Reloaded {} custom commands with prefix `{}`.",
                config.commands.len(),
                config.prefix
            );
            respond(ctx, command, body, true).await
        }
    }
}

fn format_listing(config: &CustomCommandConfig) -> String {
    if config.commands.is_empty() {
        return format!("Prefix: `{}`\nNo custom commands are defined.", config.prefix);
    }

    let mut listing = format!("Prefix: `{}`\n", config.prefix);
    for (name, response) in config.commands.iter() {
        listing.push_str(&format!("`{}{}` → {}\n", config.prefix, name, response));
    }
    listing.trim_end().to_string()
}
