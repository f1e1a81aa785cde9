pub mod poll;

use serenity::model::application::command::Command;
use serenity::model::id::GuildId;
use serenity::prelude::*;

/// Registers the slash commands for one guild, or globally when `guild_id` is `None`.
///
/// Guild commands show up immediately, global ones can take a while.
pub async fn register_commands(ctx: &Context, guild_id: Option<GuildId>) -> Result<(), serenity::Error> {
    match guild_id {
        Some(guild_id) => {
            guild_id
                .set_application_commands(&ctx.http, |commands| {
                    commands.create_application_command(|command| poll::create_poll_command(command))
                })
                .await?;
        }
        None => {
            Command::set_global_application_commands(&ctx.http, |commands| {
                commands.create_application_command(|command| poll::create_poll_command(command))
            })
            .await?;
        }
    }

    Ok(())
}
