use teloxide::prelude::*;
use teloxide::types::ReplyMarkup;
use tracing::{error, info};

use crate::bot::keyboards::{welcome_keyboard, BTN_HOW_TO_GET, BTN_REVIEWS};
use crate::broadcast::{self, BROADCAST_COMMAND};
use crate::funnel;
use crate::referral::build_link;
use crate::reviews::MediaKind;
use crate::session::QuizState;
use crate::state::AppState;

pub async fn message_handler(
    _bot: Bot,
    msg: Message,
    state: AppState,
) -> Result<(), teloxide::RequestError> {
    let chat_id = msg.chat.id;
    let Some(text) = msg.text() else {
        return Ok(());
    };
    info!("Received message from {}: {:?}", chat_id, text);

    if text.starts_with("/start") {
        let param = text.split_whitespace().nth(1);
        handle_start(&msg, &state, param).await;
        return Ok(());
    }

    match text {
        BTN_REVIEWS => send_next_review(&state, chat_id).await,
        BTN_HOW_TO_GET => funnel::send_redemption(&state, chat_id).await,
        BROADCAST_COMMAND if chat_id.0 == state.config.admin_chat_id => {
            broadcast::spawn_broadcast(state.clone(), chat_id);
        }
        _ => {
            // Ignore anything else
        }
    }

    Ok(())
}

/// Entry command: re-derives the referral attribution on every invocation,
/// overwrites the durable record, resets the quiz, and shows the welcome.
async fn handle_start(msg: &Message, state: &AppState, param: Option<&str>) {
    let chat_id = msg.chat.id;
    let referral = build_link(param, chat_id.0);

    let display_name = msg
        .from
        .as_ref()
        .map(|u| u.first_name.clone())
        .filter(|n| !n.is_empty())
        .or_else(|| msg.from.as_ref().and_then(|u| u.username.clone()))
        .unwrap_or_else(|| "Друзья".to_string());

    state.sessions.with(chat_id, |s| {
        s.quiz = QuizState::Idle;
        s.last_prompt = None;
        s.referral = referral.clone();
    });

    // A transient storage failure must not break the funnel entry; the
    // session keeps the attribution until the next /start.
    if let Err(e) = state
        .users
        .upsert(chat_id.0, &display_name, &referral.click_id, &referral.link)
        .await
    {
        error!("Failed to upsert user {}: {}", chat_id, e);
    }

    let caption = format!(
        "{}, приветствуем 👋\n\n\
        🧠 Мы подберём для вас стратегию заработка, исходя из ваших ответов.\n\
        Ответьте на 3 коротких вопроса — и узнайте, сколько сможете зарабатывать!\n\n\
        ✅ У нас уже есть готовые проверенные методики под любой бюджет\n\
        💼 С нами уже зарабатывают сотни людей ежедневно!",
        display_name
    );

    let _ = state
        .messenger
        .send_photo(
            chat_id,
            &state.config.welcome_photo(),
            &caption,
            Some(ReplyMarkup::InlineKeyboard(welcome_keyboard())),
        )
        .await;
}

async fn send_next_review(state: &AppState, chat_id: ChatId) {
    let cursor = state.sessions.get(chat_id).review_cursor;
    let Some(entry) = state.carousel.get(cursor) else {
        let _ = state
            .messenger
            .send_text(chat_id, "Пока нет отзывов", None)
            .await;
        return;
    };

    match entry.kind {
        MediaKind::Photo => {
            let _ = state
                .messenger
                .send_photo(chat_id, &entry.path, &entry.caption, None)
                .await;
        }
        MediaKind::Video => {
            let _ = state
                .messenger
                .send_video(chat_id, &entry.path, &entry.caption, None)
                .await;
        }
    }

    let len = state.carousel.len();
    state
        .sessions
        .with(chat_id, |s| s.review_cursor = (cursor + 1) % len);
}
