//! Safe messaging facade. Every send is best-effort: delivery failures are
//! classified, logged and absorbed here, and callers get `None` instead of
//! an error. A `None` result means "not delivered, there is no message id
//! to reference."

use std::path::Path;
use teloxide::prelude::*;
use teloxide::types::{InputFile, Message, MessageId, ReplyMarkup};
use teloxide::{ApiError, RequestError};
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendFailure {
    /// The recipient blocked the bot or is permanently unreachable.
    Blocked,
    Other,
}

/// Single classification point for transport errors. New error shapes get
/// handled here, not at call sites.
pub fn classify_send_error(err: &RequestError) -> SendFailure {
    match err {
        RequestError::Api(ApiError::BotBlocked)
        | RequestError::Api(ApiError::UserDeactivated)
        | RequestError::Api(ApiError::ChatNotFound) => SendFailure::Blocked,
        _ => SendFailure::Other,
    }
}

#[derive(Clone)]
pub struct Messenger {
    bot: Bot,
}

impl Messenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    pub async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        markup: Option<ReplyMarkup>,
    ) -> Option<Message> {
        let mut req = self.bot.send_message(chat, text);
        if let Some(m) = markup {
            req = req.reply_markup(m);
        }
        self.absorb(chat, req.await)
    }

    pub async fn send_photo(
        &self,
        chat: ChatId,
        path: &Path,
        caption: &str,
        markup: Option<ReplyMarkup>,
    ) -> Option<Message> {
        let mut req = self
            .bot
            .send_photo(chat, InputFile::file(path.to_path_buf()))
            .caption(caption.to_string());
        if let Some(m) = markup {
            req = req.reply_markup(m);
        }
        self.absorb(chat, req.await)
    }

    pub async fn send_video(
        &self,
        chat: ChatId,
        path: &Path,
        caption: &str,
        markup: Option<ReplyMarkup>,
    ) -> Option<Message> {
        let mut req = self
            .bot
            .send_video(chat, InputFile::file(path.to_path_buf()))
            .caption(caption.to_string());
        if let Some(m) = markup {
            req = req.reply_markup(m);
        }
        self.absorb(chat, req.await)
    }

    /// Deletion failures are always swallowed: the message being already
    /// gone or past the deletion window is the normal case here.
    pub async fn delete_message(&self, chat: ChatId, id: MessageId) {
        if let Err(e) = self.bot.delete_message(chat, id).await {
            debug!("Delete of message {} in chat {} failed: {}", id.0, chat, e);
        }
    }

    fn absorb(&self, chat: ChatId, res: Result<Message, RequestError>) -> Option<Message> {
        match res {
            Ok(m) => Some(m),
            Err(e) => {
                match classify_send_error(&e) {
                    SendFailure::Blocked => {
                        info!("Chat {} has blocked the bot or is unreachable", chat);
                    }
                    SendFailure::Other => {
                        error!("Failed to send message to chat {}: {}", chat, e);
                    }
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocked_family_is_classified_as_blocked() {
        for api in [
            ApiError::BotBlocked,
            ApiError::UserDeactivated,
            ApiError::ChatNotFound,
        ] {
            assert_eq!(
                classify_send_error(&RequestError::Api(api)),
                SendFailure::Blocked
            );
        }
    }

    #[test]
    fn everything_else_is_other() {
        let err = RequestError::Api(ApiError::Unknown("flood wait".to_string()));
        assert_eq!(classify_send_error(&err), SendFailure::Other);
        let err = RequestError::Api(ApiError::MessageToDeleteNotFound);
        assert_eq!(classify_send_error(&err), SendFailure::Other);
    }
}
