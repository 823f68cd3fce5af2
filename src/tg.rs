use crate::caption::{MovieCard, CAPTION_LIMIT};
use crate::commands::{parse_query, Command, MovieQuery};
use crate::tmdb::{TmdbClient, TmdbError};
use std::sync::Arc;
use teloxide::{
    dispatching::{Dispatcher, UpdateFilterExt, UpdateHandler},
    prelude::*,
    types::{InputFile, ParseMode, ReplyParameters},
    utils::command::BotCommands,
};
use tracing::{error, info, warn};

pub const USAGE: &str = "❌ Usage: /movieinfo <movie name> [year]";
const FETCH_FAILED: &str = "❌ Failed to fetch movie info.";

/// Per-bot settings shared by every handler invocation.
#[derive(Clone)]
pub struct Ctx {
    pub tmdb: TmdbClient,
    pub footer: Option<Arc<str>>,
}

/// Update tree for the bot; expects a [`Ctx`] among the dependencies.
pub fn schema() -> UpdateHandler<teloxide::RequestError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(on_command))
}

pub async fn run(bot: Bot, ctx: Ctx) {
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![ctx])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn on_command(bot: Bot, msg: Message, cmd: Command, ctx: Ctx) -> ResponseResult<()> {
    match cmd {
        Command::Help | Command::Start => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string()).await?;
        }
        Command::MovieInfo(args) => match parse_query(&args) {
            Some(query) => on_movie_info(&bot, &msg, query, &ctx).await?,
            None => reply_plain(&bot, &msg, USAGE).await?,
        },
    }
    Ok(())
}

/// What to send back for one `/movieinfo` query.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Card { caption: String, image_url: Option<String> },
}

/// Search → details/credits → image. Upstream failures end up as text replies.
pub async fn movie_info_reply(tmdb: &TmdbClient, query: &MovieQuery, footer: Option<&str>) -> Reply {
    info!(name = %query.name, year = ?query.year, "searching movie");
    let found = match tmdb.search_movie(&query.name, query.year).await {
        Ok(found) => found,
        Err(e) => {
            warn!(error = %e, "movie search failed");
            return Reply::Text(FETCH_FAILED.to_string());
        }
    };
    let Some(movie) = found.first() else {
        info!(name = %query.name, "no search results");
        let year = query.year.map(|y| y.to_string()).unwrap_or_default();
        return Reply::Text(format!("❌ No results found for {} ({})", query.name, year));
    };

    info!(movie_id = movie.id, title = %movie.title, "using first search result");
    let (details, credits) = match fetch_card_data(tmdb, movie.id).await {
        Ok(v) => v,
        Err(e) => {
            warn!(movie_id = movie.id, error = %e, "movie details failed");
            return Reply::Text(FETCH_FAILED.to_string());
        }
    };
    let image_url = tmdb.best_image_url(movie.id).await;
    let caption = MovieCard::new(&details, &credits).render(footer, CAPTION_LIMIT);
    Reply::Card { caption, image_url }
}

async fn fetch_card_data(
    tmdb: &TmdbClient,
    id: u64,
) -> Result<(crate::tmdb::MovieDetails, crate::tmdb::Credits), TmdbError> {
    let details = tmdb.movie_details(id).await?;
    let credits = tmdb.movie_credits(id).await?;
    Ok((details, credits))
}

async fn on_movie_info(bot: &Bot, msg: &Message, query: MovieQuery, ctx: &Ctx) -> ResponseResult<()> {
    info!(chat_id = %msg.chat.id, name = %query.name, "movieinfo requested");
    let (caption, image_url) = match movie_info_reply(&ctx.tmdb, &query, ctx.footer.as_deref()).await {
        Reply::Text(text) => return reply_plain(bot, msg, &text).await,
        Reply::Card { caption, image_url } => (caption, image_url),
    };

    match send_card(bot, msg, &caption, image_url.as_deref()).await {
        Ok(()) => {
            info!(chat_id = %msg.chat.id, name = %query.name, with_image = image_url.is_some(), "movieinfo sent");
            Ok(())
        }
        Err(e) => {
            error!(chat_id = %msg.chat.id, error = %e, "failed to send movieinfo");
            reply_plain(bot, msg, &format!("❌ Error: {e}")).await
        }
    }
}

async fn send_card(bot: &Bot, msg: &Message, caption: &str, image_url: Option<&str>) -> ResponseResult<()> {
    let photo = image_url.and_then(|u| match reqwest::Url::parse(u) {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(url = u, error = %e, "unusable image url");
            None
        }
    });
    match photo {
        Some(url) => {
            bot.send_photo(msg.chat.id, InputFile::url(url))
                .caption(caption)
                .parse_mode(ParseMode::Html)
                .reply_parameters(ReplyParameters::new(msg.id))
                .await?;
        }
        None => {
            bot.send_message(msg.chat.id, caption)
                .parse_mode(ParseMode::Html)
                .reply_parameters(ReplyParameters::new(msg.id))
                .await?;
        }
    }
    Ok(())
}

async fn reply_plain(bot: &Bot, msg: &Message, text: &str) -> ResponseResult<()> {
    bot.send_message(msg.chat.id, text)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
    Ok(())
}
