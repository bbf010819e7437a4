// commands/avatar.rs - Avatar Commands
// /avatar posts a user's avatar link; /petpet, /swirl, /pizza and /money
// run it through a gifstuffapi effect. /rainbow lives here too since it
// only posts a fixed link.

use super::{defer, edit_response, respond, user_arg};
use crate::center::CommandCenter;
use crate::error::CommandResult;
use crate::lookup::GifEffect;
use serenity::{
    client::Context,
    model::{application::interaction::application_command::ApplicationCommandInteraction, user::User},
};

const RAINBOW_URL: &str = "https://tehurn.com/media/RainbowTroloload.webm";
const USER_NOT_FOUND: &str = "User not found!";

/// Static PNG avatar link, or Discord's default avatar when none is set.
pub fn avatar_png_url(user: &User) -> String {
    match &user.avatar {
        Some(hash) => format!("https://cdn.discordapp.com/avatars/{}/{}.png", user.id.0, hash),
        None => user.default_avatar_url(),
    }
}

pub async fn avatar(ctx: &Context, command: &ApplicationCommandInteraction) -> CommandResult {
    let Some(user) = user_arg(command, "user") else {
        return respond(ctx, command, USER_NOT_FOUND, true).await;
    };
    respond(ctx, command, avatar_png_url(user), false).await
}

pub async fn effect(
    ctx: &Context,
    command: &ApplicationCommandInteraction,
    center: &CommandCenter,
    effect: GifEffect,
) -> CommandResult {
    let Some(user) = user_arg(command, "user") else {
        return respond(ctx, command, USER_NOT_FOUND, true).await;
    };

    defer(ctx, command, false).await?;
    let reply = match center.lookup.gif_effect(effect, &avatar_png_url(user)).await {
        Some(url) => url,
        None => format!("Failed to generate {} GIF.", effect.label()),
    };
    edit_response(ctx, command, reply).await
}

pub async fn rainbow(ctx: &Context, command: &ApplicationCommandInteraction) -> CommandResult {
    respond(ctx, command, RAINBOW_URL, false).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serenity::model::id::UserId;

    fn user(avatar: Option<&str>) -> User {
        let mut user = User::default();
        user.id = UserId(80351110224678912);
        user.discriminator = 1337;
        user.avatar = avatar.map(str::to_string);
        user
    }

    #[test]
    fn test_avatar_url_is_png() {
        assert_eq!(
            avatar_png_url(&user(Some("a_1269e74af4df7417b13759eae50c83dc"))),
            "https://cdn.discordapp.com/avatars/80351110224678912/a_1269e74af4df7417b13759eae50c83dc.png"
        );
    }

    #[test]
    fn test_missing_avatar_uses_default() {
        let user = user(None);
        let url = avatar_png_url(&user);
        assert_eq!(url, user.default_avatar_url());
        assert!(url.starts_with("https://cdn.discordapp.com/embed/avatars/"));
    }
}
