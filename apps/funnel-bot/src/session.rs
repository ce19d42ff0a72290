//! In-memory per-chat state. Ephemeral by design: a restart drops every
//! session and users simply re-enter through /start. The durable user
//! record is the source of truth for attribution, not this map.

use dashmap::DashMap;
use std::sync::Arc;
use teloxide::types::{ChatId, MessageId};

use crate::referral::{build_link, ReferralLink};

/// Quiz progress as a tagged union: each state carries exactly the answers
/// collected so far, so a half-filled record cannot exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizState {
    Idle,
    AwaitingPhone,
    AwaitingWorkTime { phone: String },
    AwaitingIncome { phone: String, work_time: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Next(QuizState),
    Completed {
        phone: String,
        work_time: String,
        income: String,
    },
}

impl QuizState {
    /// Applies a callback payload to the current state. Returns `None` for
    /// any payload that does not belong to this state, which silently drops
    /// replayed and out-of-order button presses.
    pub fn advance(&self, payload: &str) -> Option<Advance> {
        match self {
            QuizState::Idle => None,
            QuizState::AwaitingPhone => {
                let phone = payload.strip_prefix("q1_")?;
                Some(Advance::Next(QuizState::AwaitingWorkTime {
                    phone: phone.to_string(),
                }))
            }
            QuizState::AwaitingWorkTime { phone } => {
                let token = payload.strip_prefix("q2_")?;
                let work_time = work_time_label(token)?;
                Some(Advance::Next(QuizState::AwaitingIncome {
                    phone: phone.clone(),
                    work_time: work_time.to_string(),
                }))
            }
            QuizState::AwaitingIncome { phone, work_time } => {
                let token = payload.strip_prefix("q3_")?;
                let income = income_label(token)?;
                Some(Advance::Completed {
                    phone: phone.clone(),
                    work_time: work_time.clone(),
                    income: income.to_string(),
                })
            }
        }
    }
}

pub fn work_time_label(token: &str) -> Option<&'static str> {
    match token {
        "30min" => Some("30 минут в день"),
        "1h" => Some("1 час в день"),
        "3h" => Some("3 часа в день"),
        "5h" => Some("5 часов в день"),
        _ => None,
    }
}

pub fn income_label(token: &str) -> Option<&'static str> {
    match token {
        "50k" => Some("50 т.р. в месяц"),
        "70k" => Some("70 т.р. в месяц"),
        "120k" => Some("120 т.р. в месяц"),
        "300k" => Some("300 т.р. в месяц"),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub quiz: QuizState,
    pub review_cursor: usize,
    /// Most recent question/status message, deleted before the next one
    /// is shown so only one prompt is ever visible.
    pub last_prompt: Option<MessageId>,
    pub referral: ReferralLink,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            quiz: QuizState::Idle,
            review_cursor: 0,
            last_prompt: None,
            referral: build_link(None, 0),
        }
    }
}

/// Session map keyed by chat, created lazily on first touch.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<DashMap<ChatId, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<R>(&self, chat: ChatId, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut entry = self.inner.entry(chat).or_default();
        f(entry.value_mut())
    }

    pub fn get(&self, chat: ChatId) -> Session {
        self.inner
            .get(&chat)
            .map(|s| s.value().clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_in_wrong_state_is_a_no_op() {
        assert_eq!(QuizState::Idle.advance("q1_Iphone"), None);
        assert_eq!(QuizState::AwaitingPhone.advance("q2_1h"), None);
        assert_eq!(QuizState::AwaitingPhone.advance("q3_50k"), None);
        let q3 = QuizState::AwaitingIncome {
            phone: "Iphone".into(),
            work_time: "1 час в день".into(),
        };
        assert_eq!(q3.advance("q1_Android"), None);
        assert_eq!(q3.advance("q2_3h"), None);
    }

    #[test]
    fn unknown_answer_token_is_a_no_op() {
        let q2 = QuizState::AwaitingWorkTime {
            phone: "Android".into(),
        };
        assert_eq!(q2.advance("q2_forever"), None);
    }

    #[test]
    fn full_traversal_accumulates_answers() {
        let s = QuizState::AwaitingPhone;
        let Some(Advance::Next(s)) = s.advance("q1_Iphone") else {
            panic!("q1 should advance");
        };
        let Some(Advance::Next(s)) = s.advance("q2_30min") else {
            panic!("q2 should advance");
        };
        match s.advance("q3_300k") {
            Some(Advance::Completed {
                phone,
                work_time,
                income,
            }) => {
                assert_eq!(phone, "Iphone");
                assert_eq!(work_time, "30 минут в день");
                assert_eq!(income, "300 т.р. в месяц");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn sessions_are_created_lazily_with_organic_referral() {
        let store = SessionStore::new();
        let s = store.get(ChatId(1));
        assert_eq!(s.quiz, QuizState::Idle);
        assert_eq!(s.referral.click_id, "organic");

        store.with(ChatId(1), |s| s.review_cursor = 2);
        assert_eq!(store.get(ChatId(1)).review_cursor, 2);
    }
}
