//! Mention marker extraction

use once_cell::sync::Lazy;
use regex_lite::Regex;

static USER_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<@!?([0-9]+)>").expect("user mention pattern is valid"));

static CHANNEL_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<#([0-9]+)>").expect("channel mention pattern is valid"));

static ROLE_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<@&([0-9]+)>").expect("role mention pattern is valid"));

/// Any single mention marker of the three kinds
pub(crate) static ANY_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(?:@[!&]?|#)[0-9]+>").expect("mention marker pattern is valid"));

/// User ids from `<@id>` and `<@!id>` markers, in order of appearance
pub fn raw_user_mentions(content: &str) -> Vec<String> {
    capture_ids(&USER_MENTION, content)
}

/// Channel ids from `<#id>` markers, in order of appearance
pub fn raw_channel_mentions(content: &str) -> Vec<String> {
    capture_ids(&CHANNEL_MENTION, content)
}

/// Role ids from `<@&id>` markers, in order of appearance
pub fn raw_role_mentions(content: &str) -> Vec<String> {
    capture_ids(&ROLE_MENTION, content)
}

fn capture_ids(pattern: &Regex, content: &str) -> Vec<String> {
    pattern
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|id| id.as_str().to_string())
        .collect()
}
