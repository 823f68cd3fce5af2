mod caption;
mod commands;
mod config;
mod images;
mod tg;
mod tmdb;

use dotenvy::dotenv;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = config::Config::from_env()?;
    let tmdb = tmdb::TmdbClient::new(cfg.tmdb_api_key, cfg.tmdb_api_base, cfg.http_timeout)?;

    let bot = Bot::from_env();
    info!("movieinfo bot starting");
    tg::run(bot, tg::Ctx { tmdb, footer: cfg.caption_footer.map(Into::into) }).await;
    Ok(())
}
