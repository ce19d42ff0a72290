use teloxide::prelude::*;
use teloxide::types::ReplyMarkup;
use tracing::{error, info};

use crate::bot::keyboards::{q1_keyboard, q2_keyboard, q3_keyboard};
use crate::funnel;
use crate::session::{Advance, QuizState};
use crate::state::AppState;

const QUESTION_PHONE: &str = "Какой у вас телефон?";
const QUESTION_WORK_TIME: &str = "Сколько планируете работать?";
const QUESTION_INCOME: &str = "Сколько хотите зарабатывать?";

pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    state: AppState,
) -> Result<(), teloxide::RequestError> {
    info!("Received callback: {:?}", q.data);
    let callback_id = q.id.clone();

    let (Some(data), Some(message)) = (q.data.as_deref(), q.message.as_ref()) else {
        return Ok(());
    };
    let chat_id = message.chat().id;

    if data == "get_money" {
        // Welcome button always (re)starts the quiz.
        state.messenger.delete_message(chat_id, message.id()).await;
        state.sessions.with(chat_id, |s| {
            s.quiz = QuizState::AwaitingPhone;
            s.last_prompt = None;
        });

        let prompt = state
            .messenger
            .send_text(
                chat_id,
                QUESTION_PHONE,
                Some(ReplyMarkup::InlineKeyboard(q1_keyboard())),
            )
            .await;
        state
            .sessions
            .with(chat_id, |s| s.last_prompt = prompt.map(|m| m.id));

        let _ = bot.answer_callback_query(callback_id).await;
        return Ok(());
    }

    let session = state.sessions.get(chat_id);
    match session.quiz.advance(data) {
        Some(Advance::Next(next)) => {
            if let Some(id) = session.last_prompt {
                state.messenger.delete_message(chat_id, id).await;
            }

            let (question, keyboard) = match &next {
                QuizState::AwaitingIncome { .. } => (QUESTION_INCOME, q3_keyboard()),
                _ => (QUESTION_WORK_TIME, q2_keyboard()),
            };
            state.sessions.with(chat_id, |s| {
                s.quiz = next.clone();
                s.last_prompt = None;
            });

            let prompt = state
                .messenger
                .send_text(
                    chat_id,
                    question,
                    Some(ReplyMarkup::InlineKeyboard(keyboard)),
                )
                .await;
            state
                .sessions
                .with(chat_id, |s| s.last_prompt = prompt.map(|m| m.id));
        }

        Some(Advance::Completed {
            phone,
            work_time,
            income,
        }) => {
            if let Some(id) = session.last_prompt {
                state.messenger.delete_message(chat_id, id).await;
            }
            state.sessions.with(chat_id, |s| {
                s.quiz = QuizState::Idle;
                s.last_prompt = None;
            });

            let summary = format!("{} | {} | {}", phone, work_time, income);
            if let Err(e) = state.users.push_complete(chat_id.0, &summary).await {
                error!("Failed to record quiz answers for {}: {}", chat_id, e);
            }

            funnel::spawn_analysis(state.clone(), chat_id);
        }

        // Stale, replayed or out-of-order button press: no transition, no reply.
        None => return Ok(()),
    }

    let _ = bot.answer_callback_query(callback_id).await;
    Ok(())
}
