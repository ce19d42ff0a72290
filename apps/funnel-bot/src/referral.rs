//! Referral link derivation from the /start deep-link parameter.
//!
//! The parameter is `<clickId>_<route markers...>`. The click id is the
//! segment before the first underscore; the route is picked by the suffix
//! of the *full* parameter, so `abc_al2` and `abc_al` carry the same click
//! id but land on different campaign streams.

const TRACKER_HOST: &str = "onesecgo.ru";

const DEFAULT_SLUG: &str = "8kact";
const ROUTE_AL_SLUG: &str = "8mqnd";
const ROUTE_AL2_SLUG: &str = "8mqnd2";

pub const ORGANIC_CLICK_ID: &str = "organic";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferralLink {
    pub click_id: String,
    pub link: String,
}

/// Pure derivation of click id and outbound URL. Same input, same output;
/// `chat_id` only ever appears in the `_al2` route's `sub1` field.
pub fn build_link(raw_param: Option<&str>, chat_id: i64) -> ReferralLink {
    let param = match raw_param {
        Some(p) if !p.is_empty() => p,
        _ => {
            return ReferralLink {
                click_id: ORGANIC_CLICK_ID.to_string(),
                link: stream_url(DEFAULT_SLUG, ORGANIC_CLICK_ID),
            };
        }
    };

    let click_id = param.split('_').next().unwrap_or(param).to_string();

    let link = if param.ends_with("_al2") {
        format!("{}&sub1={}", stream_url(ROUTE_AL2_SLUG, &click_id), chat_id)
    } else if param.ends_with("_al") {
        stream_url(ROUTE_AL_SLUG, &click_id)
    } else {
        stream_url(DEFAULT_SLUG, &click_id)
    };

    ReferralLink { click_id, link }
}

fn stream_url(slug: &str, click_id: &str) -> String {
    format!("https://{}/stream/{}?cid={}", TRACKER_HOST, slug, click_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_param_is_organic_on_default_route() {
        let r = build_link(None, 77);
        assert_eq!(r.click_id, "organic");
        assert_eq!(r.link, "https://onesecgo.ru/stream/8kact?cid=organic");
        assert_eq!(build_link(Some(""), 77), r);
    }

    #[test]
    fn al2_suffix_routes_with_sub1() {
        let r = build_link(Some("abc_al2"), 42);
        assert_eq!(r.click_id, "abc");
        assert_eq!(r.link, "https://onesecgo.ru/stream/8mqnd2?cid=abc&sub1=42");
    }

    #[test]
    fn al_suffix_routes_without_sub1() {
        let r = build_link(Some("abc_al"), 42);
        assert_eq!(r.click_id, "abc");
        assert_eq!(r.link, "https://onesecgo.ru/stream/8mqnd?cid=abc");
    }

    #[test]
    fn plain_param_keeps_default_route() {
        let r = build_link(Some("abc"), 42);
        assert_eq!(r.click_id, "abc");
        assert_eq!(r.link, "https://onesecgo.ru/stream/8kact?cid=abc");
    }

    #[test]
    fn click_id_is_segment_before_first_underscore() {
        assert_eq!(build_link(Some("451325435_x_al"), 1).click_id, "451325435");
    }

    #[test]
    fn same_input_same_output() {
        assert_eq!(build_link(Some("abc_al2"), 42), build_link(Some("abc_al2"), 42));
    }
}
