use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup,
};
use url::Url;

pub const BTN_REVIEWS: &str = "Отзывы";
pub const BTN_HOW_TO_GET: &str = "Как получить";

pub fn welcome_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "Подобрать стратегию",
        "get_money",
    )]])
}

pub fn q1_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("Iphone", "q1_Iphone"),
        InlineKeyboardButton::callback("Android", "q1_Android"),
    ]])
}

pub fn q2_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("30 минут в день", "q2_30min"),
            InlineKeyboardButton::callback("1 час в день", "q2_1h"),
        ],
        vec![
            InlineKeyboardButton::callback("3 часа в день", "q2_3h"),
            InlineKeyboardButton::callback("5 часов в день", "q2_5h"),
        ],
    ])
}

pub fn q3_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("50 т.р. в месяц", "q3_50k"),
            InlineKeyboardButton::callback("70 т.р. в месяц", "q3_70k"),
        ],
        vec![
            InlineKeyboardButton::callback("120 т.р. в месяц", "q3_120k"),
            InlineKeyboardButton::callback("300 т.р. в месяц", "q3_300k"),
        ],
    ])
}

/// Persistent two-button menu shown after the quiz.
pub fn final_menu() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![
        KeyboardButton::new(BTN_REVIEWS),
        KeyboardButton::new(BTN_HOW_TO_GET),
    ]])
    .resize_keyboard()
}

/// Single URL button; `None` when the stored link does not parse.
pub fn link_keyboard(link: &str) -> Option<InlineKeyboardMarkup> {
    let url: Url = link.parse().ok()?;
    Some(InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::url("Перейти", url),
    ]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_keyboard_rejects_garbage() {
        assert!(link_keyboard("").is_none());
        assert!(link_keyboard("not a url").is_none());
        assert!(link_keyboard("https://onesecgo.ru/stream/8kact?cid=abc").is_some());
    }
}
