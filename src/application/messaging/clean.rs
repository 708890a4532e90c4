//! Clean content rendering - mention markers to display text

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex_lite::{Captures, Regex};

use super::mentions::ANY_MENTION;
use crate::domain::entities::{Channel, Member, Role};

static BROADCAST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@(everyone|here)").expect("broadcast pattern is valid"));

/// Zero-width space placed after `@` to defuse broadcast mentions
const ZERO_WIDTH_SPACE: char = '\u{200b}';

/// Substitutions from literal mention markers to display strings.
///
/// Markers without an entry are left untouched when applied.
#[derive(Debug, Clone, Default)]
pub struct MentionTransforms {
    replacements: HashMap<String, String>,
}

impl MentionTransforms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_channel(&mut self, channel: &Channel) {
        self.replacements
            .insert(format!("<#{}>", channel.id), format!("#{}", channel.name));
    }

    /// Registers both the plain and the nickname form of the marker
    pub fn add_member(&mut self, member: &Member) {
        let display = format!("@{}", member.display_name());
        self.replacements
            .insert(format!("<@{}>", member.id()), display.clone());
        self.replacements
            .insert(format!("<@!{}>", member.id()), display);
    }

    pub fn add_role(&mut self, role: &Role) {
        self.replacements
            .insert(format!("<@&{}>", role.id), format!("@{}", role.name));
    }

    pub fn get(&self, marker: &str) -> Option<&str> {
        self.replacements.get(marker).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.replacements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }

    /// Rewrite every known marker in a single pass over `content`
    pub fn apply(&self, content: &str) -> String {
        if self.is_empty() {
            return content.to_string();
        }

        ANY_MENTION
            .replace_all(content, |caps: &Captures<'_>| {
                let marker = &caps[0];
                self.get(marker).unwrap_or(marker).to_string()
            })
            .into_owned()
    }
}

/// Insert a zero-width space into `@everyone` and `@here`
pub fn defuse_broadcasts(text: &str) -> String {
    BROADCAST
        .replace_all(text, |caps: &Captures<'_>| {
            format!("@{}{}", ZERO_WIDTH_SPACE, &caps[1])
        })
        .into_owned()
}

/// Full clean rendering: mention substitution, then broadcast defusing
pub fn render_clean_content(content: &str, transforms: &MentionTransforms) -> String {
    defuse_broadcasts(&transforms.apply(content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::User;

    fn alice() -> Member {
        Member::new(User::new("123", "alice")).with_nick("Alice")
    }

    #[test]
    fn test_member_both_marker_forms() {
        let mut transforms = MentionTransforms::new();
        transforms.add_member(&alice());

        assert_eq!(transforms.len(), 2);
        assert_eq!(
            transforms.apply("hello <@123> and <@!123>"),
            "hello @Alice and @Alice"
        );
    }

    #[test]
    fn test_unknown_markers_left_as_is() {
        let mut transforms = MentionTransforms::new();
        transforms.add_member(&alice());

        assert_eq!(transforms.apply("<@999> <@123>"), "<@999> @Alice");
    }

    #[test]
    fn test_role_and_channel_markers() {
        let mut transforms = MentionTransforms::new();
        transforms.add_role(&Role::new("5", "mods"));
        transforms.add_channel(&Channel::private("6"));

        assert_eq!(transforms.apply("<@&5> see <#6>"), "@mods see #");
    }

    #[test]
    fn test_empty_transforms_copy_content() {
        let transforms = MentionTransforms::new();
        assert_eq!(transforms.apply("<@1> hi"), "<@1> hi");
    }

    #[test]
    fn test_defuse_broadcasts() {
        let cleaned = defuse_broadcasts("ping @everyone and @here now");
        assert_eq!(cleaned, "ping @\u{200b}everyone and @\u{200b}here now");
        assert!(!cleaned.contains("@everyone"));
        assert!(!cleaned.contains("@here"));
    }

    #[test]
    fn test_substituted_name_is_defused_too() {
        let mut transforms = MentionTransforms::new();
        transforms.add_role(&Role::new("1", "everyone"));

        let cleaned = render_clean_content("<@&1>", &transforms);
        assert_eq!(cleaned, "@\u{200b}everyone");
    }
}
