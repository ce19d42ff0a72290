//! Admin-triggered promo broadcast to users who have not deposited yet.
//! One slow pass over the directory; individual failures are counted and
//! never abort the batch.

use std::time::Duration;
use teloxide::types::{ChatId, ReplyMarkup};
use tracing::{error, info};

use funnel_db::models::user::FunnelStatus;

use crate::bot::keyboards::link_keyboard;
use crate::state::AppState;

pub const BROADCAST_COMMAND: &str = "/broadcast";

/// Pause between sends to stay under the Bot API rate ceiling.
const SEND_PAUSE: Duration = Duration::from_millis(150);

const CAPTION_MESSAGED: &str = "🔥 Ваша стратегия заработка всё ещё ждёт вас!\n\n\
    💼 Сотни людей уже получают доход каждый день.\n\
    Активируйте доступ по кнопке ниже — это займёт пару минут.";

const CAPTION_REGISTERED: &str = "💸 Вы в одном шаге от первого дохода!\n\n\
    Осталось активировать пакет за 1₽ — и стратегия начнёт работать на вас.\n\
    ⏳ Доступ ограничен по времени, не откладывайте.";

fn caption_for(status: FunnelStatus) -> &'static str {
    match status {
        FunnelStatus::Messaged => CAPTION_MESSAGED,
        FunnelStatus::Registered | FunnelStatus::Deposited => CAPTION_REGISTERED,
    }
}

pub fn spawn_broadcast(state: AppState, admin: ChatId) {
    tokio::spawn(async move {
        run_broadcast(state, admin).await;
    });
}

async fn run_broadcast(state: AppState, admin: ChatId) {
    let users = match state.users.get_broadcast_targets().await {
        Ok(users) => users,
        Err(e) => {
            error!("Broadcast aborted, failed to fetch targets: {}", e);
            let _ = state
                .messenger
                .send_text(admin, "❌ Рассылка не запущена: ошибка базы данных", None)
                .await;
            return;
        }
    };

    info!("Broadcast starting: {} recipients", users.len());
    let _ = state
        .messenger
        .send_text(
            admin,
            &format!("📣 Рассылка запущена: {} получателей", users.len()),
            None,
        )
        .await;

    let photo = state.config.welcome_photo();
    let mut sent = 0usize;
    let mut failed = 0usize;

    for user in &users {
        let markup = link_keyboard(&user.link).map(ReplyMarkup::InlineKeyboard);
        let delivered = state
            .messenger
            .send_photo(
                ChatId(user.telegram_id),
                &photo,
                caption_for(user.status),
                markup,
            )
            .await;
        match delivered {
            Some(_) => sent += 1,
            None => failed += 1,
        }
        tokio::time::sleep(SEND_PAUSE).await;
    }

    info!("Broadcast complete: {} sent, {} failed", sent, failed);
    let _ = state
        .messenger
        .send_text(
            admin,
            &format!("✅ Рассылка завершена: отправлено {}, не доставлено {}", sent, failed),
            None,
        )
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caption_depends_on_funnel_stage() {
        assert!(caption_for(FunnelStatus::Messaged).contains("Активируйте"));
        assert!(caption_for(FunnelStatus::Registered).contains("1₽"));
        assert_ne!(
            caption_for(FunnelStatus::Messaged),
            caption_for(FunnelStatus::Registered)
        );
    }
}
