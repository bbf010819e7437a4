// commands/lookup.rs - Lookup Commands
// Dictionary, WHOIS, QR and LMGTFY commands. Anything that calls out to an
// HTTP API defers first so Discord's three second window never expires.

use super::{defer, edit_response, fail_privately, respond, string_arg};
use crate::center::CommandCenter;
use crate::error::{CommandResult, LookupError};
use crate::lookup::urban::{format_detailed, UrbanDefinition};
use crate::lookup::{lmgtfy_link, whois::is_valid_ipv4};
use serenity::{
    client::Context,
    model::application::interaction::application_command::ApplicationCommandInteraction,
};

pub async fn urban(ctx: &Context, command: &ApplicationCommandInteraction, center: &CommandCenter) -> CommandResult {
    let Some(term) = string_arg(command, "term") else {
        return respond(ctx, command, "Please provide a term to look up.", true).await;
    };

    defer(ctx, command, false).await?;
    let reply = center.lookup.urban_lookup(term).await;
    edit_response(ctx, command, reply).await
}

/// Up to four definitions, shown only to the caller.
pub async fn urban_detailed(
    ctx: &Context,
    command: &ApplicationCommandInteraction,
    center: &CommandCenter,
) -> CommandResult {
    let Some(term) = string_arg(command, "term") else {
        return respond(ctx, command, "Please provide a term to look up.", true).await;
    };

    defer(ctx, command, true).await?;
    let reply = detailed_reply(term, center.lookup.urban_definitions(term).await);
    edit_response(ctx, command, reply).await
}

fn detailed_reply(term: &str, definitions: Result<Vec<UrbanDefinition>, LookupError>) -> String {
    match definitions {
        Ok(definitions) => format_detailed(term, &definitions)
            .unwrap_or_else(|| format!("No definition found for \"{}\" on Urban Dictionary.", term)),
        Err(e) => {
            log::error!("Error fetching detailed definitions for '{}': {}", term, e);
            "An error occurred while looking up the term.".to_string()
        }
    }
}

pub async fn define(ctx: &Context, command: &ApplicationCommandInteraction, center: &CommandCenter) -> CommandResult {
    let Some(term) = string_arg(command, "term") else {
        return respond(ctx, command, "Please provide a term to look up.", true).await;
    };

    defer(ctx, command, false).await?;
    let reply = center.lookup.define(term).await;
    edit_response(ctx, command, reply).await
}

pub async fn whois(ctx: &Context, command: &ApplicationCommandInteraction, center: &CommandCenter) -> CommandResult {
    let ip = string_arg(command, "ip").unwrap_or_default();
    if !is_valid_ipv4(ip) {
        return respond(ctx, command, "Please provide a valid IPv4 address.", true).await;
    }

    defer(ctx, command, true).await?;
    let reply = center.lookup.whois(ip).await;
    edit_response(ctx, command, reply).await
}

pub async fn lmgtfy(ctx: &Context, command: &ApplicationCommandInteraction) -> CommandResult {
    let Some(query) = string_arg(command, "query") else {
        return respond(ctx, command, "Please provide a search query.", true).await;
    };

    match lmgtfy_link(query) {
        Ok(link) => respond(ctx, command, link, false).await,
        Err(e) => {
            log::error!("Error building LMGTFY link for '{}': {}", query, e);
            respond(ctx, command, "An error occurred while generating the link.", true).await
        }
    }
}

pub async fn qr(ctx: &Context, command: &ApplicationCommandInteraction, center: &CommandCenter) -> CommandResult {
    let Some(target) = string_arg(command, "url") else {
        return respond(ctx, command, "Please provide a URL.", true).await;
    };

    defer(ctx, command, false).await?;
    match center.lookup.qr_code(target).await {
        Some(url) => edit_response(ctx, command, url).await,
        None => fail_privately(ctx, command, "Failed to generate QR code.").await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detailed_reply_fallbacks() {
        assert_eq!(
            detailed_reply("yeet", Err(LookupError::Shape("not json"))),
            "An error occurred while looking up the term."
        );
        assert_eq!(
            detailed_reply("qwzx", Ok(Vec::new())),
            "No definition found for \"qwzx\" on Urban Dictionary."
        );
    }
}
