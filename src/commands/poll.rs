use crate::db::PollStore;
use crate::error::PollError;
use crate::manager::PollManager;
use log::error;
use serenity::builder::{CreateApplicationCommand, CreateApplicationCommandOption};
use serenity::model::application::command::CommandOptionType;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::*;

/// Discord refuses message content longer than this.
const MAX_REPLY_CHARS: usize = 2000;
const MAX_TITLE_LEN: u16 = 100;
const MAX_OPTION_LEN: u16 = 100;
const MAX_INDEX_LEN: u16 = 10;

pub fn create_poll_command(command: &mut CreateApplicationCommand) -> &mut CreateApplicationCommand {
    command
        .name("poll")
        .description("Create, run and vote in polls")
        .create_option(|option| subcommand(option, "list", "List all polls"))
        .create_option(|option| {
            subcommand(option, "new", "Create a new poll")
                .create_sub_option(|sub_option| text_argument(sub_option, "title", "Title of the poll", MAX_TITLE_LEN))
        })
        .create_option(|option| {
            subcommand(option, "remove", "Remove a poll")
                .create_sub_option(|sub_option| text_argument(sub_option, "title", "Title of the poll", MAX_TITLE_LEN))
        })
        .create_option(|option| {
            subcommand(option, "start", "Start a saved poll")
                .create_sub_option(|sub_option| text_argument(sub_option, "title", "Title of the poll", MAX_TITLE_LEN))
        })
        .create_option(|option| subcommand(option, "stop", "Stop the currently running poll"))
        .create_option(|option| {
            subcommand(option, "option", "Add an option to the currently running poll")
                .create_sub_option(|sub_option| text_argument(sub_option, "text", "The new option", MAX_OPTION_LEN))
        })
        .create_option(|option| subcommand(option, "show", "Show the currently running poll"))
        .create_option(|option| {
            subcommand(option, "vote", "Vote in the currently running poll")
                .create_sub_option(|sub_option| text_argument(sub_option, "number", "Number of the option", MAX_INDEX_LEN))
        })
}

fn subcommand<'a>(
    option: &'a mut CreateApplicationCommandOption,
    name: &str,
    description: &str,
) -> &'a mut CreateApplicationCommandOption {
    option
        .name(name)
        .description(description)
        .kind(CommandOptionType::SubCommand)
}

fn text_argument<'a>(
    option: &'a mut CreateApplicationCommandOption,
    name: &str,
    description: &str,
    max_length: u16,
) -> &'a mut CreateApplicationCommandOption {
    option
        .name(name)
        .description(description)
        .kind(CommandOptionType::String)
        .required(true)
        .min_length(1)
        .max_length(max_length)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub content: String,
    pub ephemeral: bool,
}

impl Reply {
    fn public(content: impl Into<String>) -> Self {
        Self {
            content: fit_message(content.into()),
            ephemeral: false,
        }
    }

    fn error(content: impl Into<String>) -> Self {
        Self {
            content: fit_message(content.into()),
            ephemeral: true,
        }
    }
}

/// Cuts `content` to Discord's message limit, marking the cut with `…`.
/// A trailing code fence survives the cut.
fn fit_message(content: String) -> String {
    if content.chars().count() <= MAX_REPLY_CHARS {
        return content;
    }

    let fence = if content.ends_with("```") { "\n```" } else { "" };
    let keep = MAX_REPLY_CHARS - fence.chars().count() - 1;

    let mut cut: String = content.chars().take(keep).collect();
    cut.push('…');
    cut.push_str(fence);
    cut
}

// Keeps the bars aligned in Discord
fn code_block(text: &str) -> String {
    // A zero-width space after each backtick stops user text from closing the fence.
    format!("```\n{}\n```", text.replace('`', "`\u{200b}"))
}

// Stops user text like `@everyone` from turning into a ping.
fn escape_mentions(text: &str) -> String {
    text.replace('@', "@\u{200b}")
}

/// Runs one `/poll` subcommand and builds the reply for the channel.
pub async fn run_subcommand<S: PollStore>(
    manager: &PollManager<S>,
    name: &str,
    argument: &str,
    user_id: &str,
) -> Reply {
    let argument = argument.trim();

    let result = match name {
        "list" => list_polls(manager).await,
        "new" => manager
            .create_poll(argument)
            .await
            .map(|()| "Poll created. Use /poll option to add options.".to_string()),
        "remove" => manager
            .remove_poll(argument)
            .await
            .map(|()| "Poll removed.".to_string()),
        "start" => manager.start_poll(argument).await.map(|poll| code_block(&poll)),
        "stop" => manager
            .stop_poll()
            .await
            .map(|results| format!("Poll finished, final results:\n{}", code_block(&results))),
        "option" => manager.add_option(argument).await.map(|poll| code_block(&poll)),
        "show" => manager.show_active_poll().await.map(|poll| code_block(&poll)),
        "vote" => manager.vote(user_id, argument).await.map(|poll| code_block(&poll)),
        _ => return Reply::error("Unknown subcommand"),
    };

    match result {
        Ok(content) => Reply::public(content),
        Err(PollError::EmptyTitle) => Reply::error(format!("usage: /poll {} <poll_title>", name)),
        Err(e) => {
            if e.is_internal() {
                error!("Poll storage failed during '/poll {}': {:?}", name, e);
            }
            Reply::error(e.to_string())
        }
    }
}

async fn list_polls<S: PollStore>(manager: &PollManager<S>) -> Result<String, PollError> {
    let polls = manager.list_polls().await?;
    if polls.is_empty() {
        return Ok("No polls found. Use /poll new to add one.".to_string());
    }

    let lines: Vec<String> = polls
        .into_iter()
        .map(|poll| {
            let title = escape_mentions(&poll.title);
            if poll.active { format!("{} *", title) } else { title }
        })
        .collect();
    Ok(format!("All Polls:\n{}", lines.join("\n")))
}

pub async fn handle_poll_command<S: PollStore>(
    manager: &PollManager<S>,
    ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Bare `/poll` lists the polls
    let (name, argument) = match command.data.options.first() {
        Some(subcommand) => {
            let argument = subcommand
                .options
                .first()
                .and_then(|option| option.value.as_ref())
                .and_then(|value| value.as_str())
                .unwrap_or_default();
            (subcommand.name.as_str(), argument)
        }
        None => ("list", ""),
    };

    let user_id = command.user.id.to_string();
    let reply = run_subcommand(manager, name, argument, &user_id).await;

    command
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| {
                    message
                        .content(&reply.content)
                        .ephemeral(reply.ephemeral)
                        .allowed_mentions(|mentions| mentions.empty_parse())
                })
        })
        .await?;

    Ok(())
}
