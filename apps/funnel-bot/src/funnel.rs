//! The simulated "analysis" sequence after the quiz and the final
//! call-to-action. Runs on its own task per chat; once started it is not
//! cancellable, further input is simply ignored by the state guards.

use std::time::Duration;
use teloxide::types::{ChatId, MessageId, ReplyMarkup};
use tracing::error;

use crate::bot::keyboards::{final_menu, link_keyboard};
use crate::state::AppState;

pub const ANALYSIS_STEPS: [&str; 7] = [
    "Анализируем ваш профиль…",
    "Изучаем ваши ответы…",
    "Ищем подходящую стратегию…",
    "Идёт подбор индивидуального решения…",
    "Сверяем с актуальными возможностями…",
    "Формируем персональный результат…",
    "Готово ✅",
];

const ANALYSIS_STEP_DELAY: Duration = Duration::from_secs(2);

const CTA_TEXT: &str = "🎉 Отлично! Мы подобрали для вас подходящую стратегию.\n\n\
    💰 Потенциальный доход: 8000₽ в день";

pub const REDEMPTION_CAPTION: &str = "📝 Что нужно сделать:\n\n\
    1. Перейдите на сайт: ПЕРЕЙТИ по кнопке ниже\n\
    2. Оплатите 1₽ для активации пакета по заработку на 5дн\n\
    3. Следуйте инструкции и зарабатывайте 💸\n\n\
    ⏳ Важно: доступ ограничен по времени!";

pub fn spawn_analysis(state: AppState, chat: ChatId) {
    tokio::spawn(async move {
        run_analysis(state, chat).await;
    });
}

/// One status phrase visible at a time: each step deletes the previous
/// message before the next is sent. A failed send leaves nothing to delete
/// and the chain keeps going, so the final call-to-action still fires.
async fn run_analysis(state: AppState, chat: ChatId) {
    let mut last: Option<MessageId> = None;

    for phrase in ANALYSIS_STEPS {
        if let Some(id) = last.take() {
            state.messenger.delete_message(chat, id).await;
        }
        last = state
            .messenger
            .send_text(chat, phrase, None)
            .await
            .map(|m| m.id);
        tokio::time::sleep(ANALYSIS_STEP_DELAY).await;
    }

    if let Some(id) = last.take() {
        state.messenger.delete_message(chat, id).await;
    }

    let _ = state
        .messenger
        .send_text(chat, CTA_TEXT, Some(ReplyMarkup::Keyboard(final_menu())))
        .await;

    send_redemption(&state, chat).await;
}

/// The durable record is authoritative for the outbound link; the session's
/// derived link is only a fallback for users the database never saw.
pub async fn resolve_link(state: &AppState, chat: ChatId) -> String {
    match state.users.get_by_telegram_id(chat.0).await {
        Ok(Some(user)) if !user.link.is_empty() => user.link,
        Ok(_) => state.sessions.get(chat).referral.link,
        Err(e) => {
            error!("Failed to load user {} for link resolution: {}", chat, e);
            state.sessions.get(chat).referral.link
        }
    }
}

pub async fn send_redemption(state: &AppState, chat: ChatId) {
    let link = resolve_link(state, chat).await;
    let markup = link_keyboard(&link).map(ReplyMarkup::InlineKeyboard);
    let _ = state
        .messenger
        .send_photo(chat, &state.config.promo_photo(), REDEMPTION_CAPTION, markup)
        .await;
}
