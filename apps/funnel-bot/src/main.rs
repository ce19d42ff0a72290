use dotenvy::dotenv;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod bot;
mod broadcast;
mod config;
mod funnel;
mod http;
mod messenger;
mod referral;
mod reviews;
mod session;
mod state;

use crate::config::Config;
use crate::messenger::Messenger;
use crate::reviews::ReviewCarousel;
use crate::session::SessionStore;
use crate::state::AppState;
use funnel_db::repositories::user_repo::UserRepository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "funnel_bot=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting funnel bot...");

    let config = Arc::new(Config::load()?);

    let pool = funnel_db::connect(&config.database_url).await?;
    let users = UserRepository::new(pool);

    let carousel = Arc::new(ReviewCarousel::load(
        &config.reviews_file,
        &config.reviews_dir,
    ));

    let bot = Bot::new(config.bot_token.clone());
    let state = AppState {
        config: config.clone(),
        users,
        sessions: SessionStore::new(),
        carousel,
        messenger: Messenger::new(bot.clone()),
    };

    let app = http::router(state.clone());
    let addr = SocketAddr::from(([0, 0, 0, 0], config.listen_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Status API listening on {}", addr);
    tokio::select! {
        res = axum::serve(listener, app).into_future() => {
            if let Err(e) = res {
                tracing::error!("Status API server exited: {}", e);
            }
        }
        _ = bot::run_bot(bot, state) => {
            tracing::info!("Bot dispatcher stopped");
        }
    }

    Ok(())
}
