// commands/remind.rs - /remind
// Validates the delay and hands the reminder to the scheduler. The reminder
// is posted later in the channel the command was used in.

use super::{respond, string_arg, user_arg};
use crate::center::CommandCenter;
use crate::error::CommandResult;
use crate::reminder::parse_delay;
use serenity::{
    client::Context,
    model::application::interaction::application_command::ApplicationCommandInteraction,
};

pub async fn remind(ctx: &Context, command: &ApplicationCommandInteraction, center: &CommandCenter) -> CommandResult {
    let Some(user) = user_arg(command, "user") else {
        return respond(ctx, command, "User not found!", true).await;
    };
    let Some(message) = string_arg(command, "message") else {
        return respond(ctx, command, "Please provide a reminder message.", true).await;
    };

    let delay = match parse_delay(string_arg(command, "time").unwrap_or_default()) {
        Ok(delay) => delay,
        Err(e) => return respond(ctx, command, e.to_string(), true).await,
    };

    center
        .reminders
        .schedule(user.id, delay.duration(), message, Some(command.channel_id))
        .await;

    respond(
        ctx,
        command,
        format!("Reminder set for <@{}> in {}.", user.id.0, delay),
        false,
    )
    .await
}
