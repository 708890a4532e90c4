use chrono::NaiveDateTime;
use once_cell::unsync::OnceCell;
use std::sync::Arc;

use super::{Author, Channel, Member, MessageChannel, Role, Server, User};
use crate::application::errors::MessageError;
use crate::application::messaging::clean::{render_clean_content, MentionTransforms};
use crate::application::messaging::mentions;
use crate::application::messaging::payload::{parse_timestamp, MessagePayload};
use crate::domain::traits::Roster;

/// Values derived from `content`, computed on first read.
///
/// Replaced wholesale on every hydration so nothing computed against an
/// older payload survives.
#[derive(Debug, Clone, Default)]
struct Derived {
    raw_mentions: OnceCell<Vec<String>>,
    raw_channel_mentions: OnceCell<Vec<String>>,
    raw_role_mentions: OnceCell<Vec<String>>,
    clean_content: OnceCell<String>,
}

/// A chat message received from the gateway.
///
/// Built from a [`MessagePayload`] plus the channel it arrived in, and
/// re-hydrated in place by [`Message::update`] when an update or edit event
/// for the same id comes in.
#[derive(Debug, Clone)]
pub struct Message {
    id: String,
    timestamp: NaiveDateTime,
    edited_timestamp: Option<NaiveDateTime>,
    tts: bool,
    content: String,
    mention_everyone: bool,
    embeds: Vec<serde_json::Value>,
    attachments: Vec<serde_json::Value>,
    nonce: Option<serde_json::Value>,
    channel: Option<MessageChannel>,
    server: Option<Arc<Server>>,
    author: Author,
    mentions: Vec<Arc<Member>>,
    channel_mentions: Vec<Arc<Channel>>,
    role_mentions: Vec<Arc<Role>>,
    derived: Derived,
}

impl Message {
    pub fn new(payload: MessagePayload, channel: Option<Arc<Channel>>) -> Result<Self, MessageError> {
        let mut message = Self {
            id: String::new(),
            timestamp: NaiveDateTime::default(),
            edited_timestamp: None,
            tts: false,
            content: String::new(),
            mention_everyone: false,
            embeds: Vec::new(),
            attachments: Vec::new(),
            nonce: None,
            channel: None,
            server: None,
            author: Author::default(),
            mentions: Vec::new(),
            channel_mentions: Vec::new(),
            role_mentions: Vec::new(),
            derived: Derived::default(),
        };
        message.update(payload, channel)?;
        Ok(message)
    }

    /// Build from an untyped JSON payload
    pub fn from_value(value: serde_json::Value, channel: Option<Arc<Channel>>) -> Result<Self, MessageError> {
        Self::new(MessagePayload::from_value(value)?, channel)
    }

    /// Re-hydrate this message from a new payload.
    ///
    /// Timestamps are parsed first; on error the message is left untouched.
    pub fn update(&mut self, payload: MessagePayload, channel: Option<Arc<Channel>>) -> Result<(), MessageError> {
        let timestamp = parse_timestamp("timestamp", &payload.timestamp)?;
        let edited_timestamp = payload
            .edited_timestamp
            .as_deref()
            .map(|value| parse_timestamp("edited_timestamp", value))
            .transpose()?;

        self.derived = Derived::default();

        self.id = payload.id;
        self.timestamp = timestamp;
        self.edited_timestamp = edited_timestamp;
        self.tts = payload.tts;
        self.content = payload.content;
        self.mention_everyone = payload.mention_everyone;
        self.embeds = payload.embeds;
        self.attachments = payload.attachments;
        self.nonce = payload.nonce;
        self.author = Author::User(payload.author);

        self.handle_upgrades(channel, payload.channel_id);
        self.handle_mentions(&payload.mentions, &payload.mention_roles);

        tracing::debug!(
            "[{}] hydrated message {} ({} user, {} channel, {} role mentions)",
            self.channel.as_ref().map(|c| c.id()).unwrap_or("-"),
            self.id,
            self.mentions.len(),
            self.channel_mentions.len(),
            self.role_mentions.len()
        );
        Ok(())
    }

    /// Settle channel and server, then upgrade the author to a member
    fn handle_upgrades(&mut self, channel: Option<Arc<Channel>>, channel_id: Option<String>) {
        self.server = None;
        self.channel = match (channel, channel_id) {
            (Some(channel), _) => Some(MessageChannel::Resolved(channel)),
            (None, Some(id)) => {
                tracing::debug!("Channel {} not resolved for message {}, using placeholder", id, self.id);
                Some(MessageChannel::Unresolved { id })
            }
            (None, None) => None,
        };

        let Some(MessageChannel::Resolved(channel)) = &self.channel else {
            return;
        };
        if channel.is_private() {
            return;
        }

        self.server = channel.server();
        let Some(server) = &self.server else {
            return;
        };

        if let Some(member) = server.get_member(self.author.id()) {
            tracing::trace!("Author {} upgraded to member of {}", member.id(), server.id);
            self.author = Author::Member(member);
        }
    }

    fn handle_mentions(&mut self, mentions: &[User], role_ids: &[String]) {
        self.mentions.clear();
        self.channel_mentions.clear();
        self.role_mentions.clear();

        if self.channel.as_ref().map_or(true, MessageChannel::is_private) {
            return;
        }
        let Some(server) = self.server.clone() else {
            return;
        };

        for mention in mentions {
            match server.get_member(&mention.id) {
                Some(member) => self.mentions.push(member),
                None => tracing::trace!("Dropping unresolved user mention {}", mention.id),
            }
        }

        let channel_ids = self.raw_channel_mentions().to_vec();
        for id in &channel_ids {
            match server.get_channel(id) {
                Some(channel) => self.channel_mentions.push(channel),
                None => tracing::trace!("Dropping unresolved channel mention {}", id),
            }
        }

        for id in role_ids {
            match server.get_role(id) {
                Some(role) => self.role_mentions.push(role),
                None => tracing::trace!("Dropping unresolved role mention {}", id),
            }
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn edited_timestamp(&self) -> Option<NaiveDateTime> {
        self.edited_timestamp
    }

    pub fn tts(&self) -> bool {
        self.tts
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether the server confirmed an `@everyone`/`@here` mention actually
    /// notified everyone. Not a substring check on `content`.
    pub fn mention_everyone(&self) -> bool {
        self.mention_everyone
    }

    pub fn embeds(&self) -> &[serde_json::Value] {
        &self.embeds
    }

    pub fn attachments(&self) -> &[serde_json::Value] {
        &self.attachments
    }

    pub fn nonce(&self) -> Option<&serde_json::Value> {
        self.nonce.as_ref()
    }

    pub fn channel(&self) -> Option<&MessageChannel> {
        self.channel.as_ref()
    }

    pub fn server(&self) -> Option<&Arc<Server>> {
        self.server.as_ref()
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn is_private(&self) -> bool {
        self.channel.as_ref().map_or(true, MessageChannel::is_private)
    }

    /// Members mentioned, in payload order. Always empty in private channels.
    pub fn mentions(&self) -> &[Arc<Member>] {
        &self.mentions
    }

    /// Channels mentioned, in content order. Always empty in private channels.
    pub fn channel_mentions(&self) -> &[Arc<Channel>] {
        &self.channel_mentions
    }

    /// Roles mentioned, in payload order. Always empty in private channels.
    pub fn role_mentions(&self) -> &[Arc<Role>] {
        &self.role_mentions
    }

    /// User ids matched by `<@id>` or `<@!id>` in the content.
    ///
    /// Available even in private channels, where `mentions` stays empty.
    pub fn raw_mentions(&self) -> &[String] {
        self.derived
            .raw_mentions
            .get_or_init(|| mentions::raw_user_mentions(&self.content))
    }

    /// Channel ids matched by `<#id>` in the content
    pub fn raw_channel_mentions(&self) -> &[String] {
        self.derived
            .raw_channel_mentions
            .get_or_init(|| mentions::raw_channel_mentions(&self.content))
    }

    /// Role ids matched by `<@&id>` in the content
    pub fn raw_role_mentions(&self) -> &[String] {
        self.derived
            .raw_role_mentions
            .get_or_init(|| mentions::raw_role_mentions(&self.content))
    }

    /// Content with resolved mentions shown the way a client displays them
    /// and `@everyone`/`@here` defused.
    ///
    /// Markers whose target did not resolve stay as raw markup.
    pub fn clean_content(&self) -> &str {
        self.derived.clean_content.get_or_init(|| {
            let mut transforms = MentionTransforms::new();
            for channel in &self.channel_mentions {
                transforms.add_channel(channel);
            }
            for member in &self.mentions {
                transforms.add_member(member);
            }
            if self.server.is_some() {
                for role in &self.role_mentions {
                    transforms.add_role(role);
                }
            }
            render_clean_content(&self.content, &transforms)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ChannelKind;

    fn payload(content: &str) -> MessagePayload {
        MessagePayload {
            id: "1000".to_string(),
            content: content.to_string(),
            timestamp: "2016-03-01T10:00:00.123000+00:00".to_string(),
            author: User::new("1", "alice"),
            ..MessagePayload::default()
        }
    }

    #[test]
    fn test_no_channel_at_all() {
        let message = Message::new(payload("<@1>"), None).unwrap();
        assert!(message.channel().is_none());
        assert!(message.is_private());
        assert!(message.server().is_none());
        assert!(message.mentions().is_empty());
        assert_eq!(message.raw_mentions(), ["1"]);
    }

    #[test]
    fn test_placeholder_channel_from_id() {
        let mut data = payload("hi");
        data.channel_id = Some("55".to_string());

        let message = Message::new(data, None).unwrap();
        assert_eq!(
            message.channel(),
            Some(&MessageChannel::Unresolved { id: "55".to_string() })
        );
        assert!(message.server().is_none());
    }

    #[test]
    fn test_failed_update_keeps_previous_state() {
        let server = Server::new("1", "guild");
        let channel = server.create_channel("2", "general", ChannelKind::Text);
        let mut message = Message::new(payload("first"), Some(Arc::clone(&channel))).unwrap();
        assert_eq!(message.clean_content(), "first");

        let mut broken = payload("second");
        broken.edited_timestamp = Some("not a time".to_string());
        assert!(message.update(broken, Some(channel)).is_err());

        assert_eq!(message.content(), "first");
        assert_eq!(message.clean_content(), "first");
        assert!(message.edited_timestamp().is_none());
    }

    #[test]
    fn test_update_invalidates_derived_values() {
        let mut message = Message::new(payload("<@1> <#2>"), None).unwrap();
        assert_eq!(message.raw_mentions(), ["1"]);
        assert_eq!(message.raw_channel_mentions(), ["2"]);

        message.update(payload("<@3> @here"), None).unwrap();
        assert_eq!(message.raw_mentions(), ["3"]);
        assert!(message.raw_channel_mentions().is_empty());
        assert_eq!(message.clean_content(), "<@3> @\u{200b}here");
    }
}
