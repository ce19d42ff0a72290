use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::models::user::{FunnelStatus, User};

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &PgRow) -> User {
        User {
            id: row.try_get::<i64, _>("id").unwrap_or_default(),
            telegram_id: row.try_get::<i64, _>("telegram_id").unwrap_or_default(),
            username: row.try_get::<String, _>("username").unwrap_or_default(),
            click_id: row
                .try_get::<String, _>("click_id")
                .unwrap_or_else(|_| "none".to_string()),
            link: row.try_get::<String, _>("link").unwrap_or_default(),
            complete: row.try_get::<Vec<String>, _>("complete").unwrap_or_default(),
            status: row
                .try_get::<String, _>("status")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(FunnelStatus::Messaged),
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .unwrap_or_else(|_| Utc::now()),
        }
    }

    /// Insert-or-update keyed by telegram id. `click_id` and `link` are
    /// overwritten on every call: re-entry through a different referral
    /// link must re-attribute the user.
    pub async fn upsert(
        &self,
        telegram_id: i64,
        username: &str,
        click_id: &str,
        link: &str,
    ) -> Result<User> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (telegram_id, username, click_id, link)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (telegram_id) DO UPDATE SET
                username = excluded.username,
                click_id = excluded.click_id,
                link = excluded.link
            RETURNING *
            "#,
        )
        .bind(telegram_id)
        .bind(username)
        .bind(click_id)
        .bind(link)
        .fetch_one(&self.pool)
        .await
        .context("Failed to upsert user")?;

        Ok(Self::row_to_user(&row))
    }

    pub async fn get_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE telegram_id = $1")
            .bind(telegram_id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user by telegram ID")?;
        Ok(row.map(|r| Self::row_to_user(&r)))
    }

    /// Overwrite the funnel status. Returns `None` when no such user exists.
    /// Monotonicity is not enforced: the postback side may replay statuses.
    pub async fn set_status(
        &self,
        telegram_id: i64,
        status: FunnelStatus,
    ) -> Result<Option<User>> {
        let row = sqlx::query("UPDATE users SET status = $1 WHERE telegram_id = $2 RETURNING *")
            .bind(status.as_str())
            .bind(telegram_id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to update user status")?;
        Ok(row.map(|r| Self::row_to_user(&r)))
    }

    /// Users eligible for a promo broadcast: everyone who has not deposited.
    pub async fn get_broadcast_targets(&self) -> Result<Vec<User>> {
        let rows = sqlx::query("SELECT * FROM users WHERE status IN ('mes', 'reg') ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch broadcast targets")?;
        Ok(rows.iter().map(Self::row_to_user).collect())
    }

    pub async fn push_complete(&self, telegram_id: i64, summary: &str) -> Result<()> {
        sqlx::query("UPDATE users SET complete = array_append(complete, $1) WHERE telegram_id = $2")
            .bind(summary)
            .bind(telegram_id)
            .execute(&self.pool)
            .await
            .context("Failed to record quiz completion")?;
        Ok(())
    }
}
