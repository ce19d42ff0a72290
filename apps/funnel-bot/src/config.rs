use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Admin chat allowed to trigger broadcasts. Overridable via ADMIN_CHAT_ID.
const DEFAULT_ADMIN_CHAT_ID: i64 = 6083294005;

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub database_url: String,
    pub listen_port: u16,
    pub admin_chat_id: i64,
    pub reviews_file: PathBuf,
    pub reviews_dir: PathBuf,
    pub photo_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Self {
            bot_token: env::var("BOT_TOKEN").context("BOT_TOKEN is not set")?,
            database_url: env::var("DATABASE_URL").context("DATABASE_URL is not set")?,
            listen_port: env::var("LISTEN_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            admin_chat_id: env::var("ADMIN_CHAT_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_ADMIN_CHAT_ID),
            reviews_file: env::var("REVIEWS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("reviews.txt")),
            reviews_dir: env::var("REVIEWS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("reviews")),
            photo_dir: env::var("PHOTO_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("photo")),
        })
    }

    pub fn welcome_photo(&self) -> PathBuf {
        self.photo_dir.join("1.webp")
    }

    pub fn promo_photo(&self) -> PathBuf {
        self.photo_dir.join("2.webp")
    }
}
