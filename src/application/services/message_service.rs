use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::application::errors::MessageError;
use crate::application::messaging::MessagePayload;
use crate::domain::entities::{Channel, Message, Server};
use crate::domain::traits::Roster;

/// Service for hydrating gateway payloads against a server context
pub struct MessageService {
    server: Arc<Server>,
    private_channels: HashMap<String, Arc<Channel>>,
}

impl MessageService {
    pub fn new(server: Arc<Server>) -> Self {
        Self {
            server,
            private_channels: HashMap::new(),
        }
    }

    pub fn server(&self) -> &Arc<Server> {
        &self.server
    }

    /// Make a direct-message channel known to the service
    pub fn register_private_channel(&mut self, channel: Channel) -> Arc<Channel> {
        let channel = Arc::new(channel);
        self.private_channels
            .insert(channel.id.clone(), Arc::clone(&channel));
        channel
    }

    /// Look up the payload's channel among server and private channels
    pub fn resolve_channel(&self, payload: &MessagePayload) -> Option<Arc<Channel>> {
        let id = payload.channel_id.as_deref()?;
        self.server
            .get_channel(id)
            .or_else(|| self.private_channels.get(id).cloned())
    }

    /// Hydrate a new message. Unknown channels fall back to the placeholder.
    pub fn hydrate(&self, payload: MessagePayload) -> Result<Message, MessageError> {
        let channel = self.resolve_channel(&payload);
        Message::new(payload, channel)
    }

    pub fn hydrate_json(&self, text: &str) -> Result<Message, MessageError> {
        self.hydrate(MessagePayload::from_json(text)?)
    }

    /// Re-hydrate an existing message in place from an update or edit event
    pub fn refresh(&self, message: &mut Message, payload: MessagePayload) -> Result<(), MessageError> {
        let channel = self.resolve_channel(&payload);
        message.update(payload, channel)
    }

    pub fn summarize(&self, message: &Message) -> MessageSummary {
        MessageSummary::from(message)
    }
}

/// Flat, serializable view of a hydrated message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageSummary {
    pub id: String,
    pub channel_id: Option<String>,
    pub channel_kind: Option<String>,
    pub server: Option<String>,
    pub author: String,
    pub timestamp: NaiveDateTime,
    pub edited_timestamp: Option<NaiveDateTime>,
    pub mention_everyone: bool,
    pub mentions: Vec<String>,
    pub channel_mentions: Vec<String>,
    pub role_mentions: Vec<String>,
    pub raw_mentions: Vec<String>,
    pub raw_channel_mentions: Vec<String>,
    pub raw_role_mentions: Vec<String>,
    pub clean_content: String,
}

impl From<&Message> for MessageSummary {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id().to_string(),
            channel_id: message.channel().map(|c| c.id().to_string()),
            channel_kind: message
                .channel()
                .and_then(|c| c.as_channel())
                .map(|c| c.kind.as_str().to_string()),
            server: message.server().map(|s| s.name.clone()),
            author: message.author().display_name().to_string(),
            timestamp: message.timestamp(),
            edited_timestamp: message.edited_timestamp(),
            mention_everyone: message.mention_everyone(),
            mentions: message
                .mentions()
                .iter()
                .map(|m| m.display_name().to_string())
                .collect(),
            channel_mentions: message.channel_mentions().iter().map(|c| c.name.clone()).collect(),
            role_mentions: message.role_mentions().iter().map(|r| r.name.clone()).collect(),
            raw_mentions: message.raw_mentions().to_vec(),
            raw_channel_mentions: message.raw_channel_mentions().to_vec(),
            raw_role_mentions: message.raw_role_mentions().to_vec(),
            clean_content: message.clean_content().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ChannelKind, Member, User};

    fn service() -> MessageService {
        let server = Server::new("1", "guild");
        server.create_channel("10", "general", ChannelKind::Text);
        server.add_member(Member::new(User::new("100", "alice")).with_nick("Alice"));
        MessageService::new(server)
    }

    #[test]
    fn test_hydrate_resolves_channel_and_author() {
        let service = service();
        let message = service
            .hydrate_json(
                r#"{
                    "id": "5",
                    "channel_id": "10",
                    "content": "hey <@100>",
                    "timestamp": "2016-01-01T00:00:00+00:00",
                    "author": {"id": "100", "username": "alice"},
                    "mentions": [{"id": "100"}]
                }"#,
            )
            .unwrap();

        assert!(message.author().is_member());
        assert_eq!(message.server().unwrap().id, "1");

        let summary = service.summarize(&message);
        assert_eq!(summary.author, "Alice");
        assert_eq!(summary.mentions, vec!["Alice"]);
        assert_eq!(summary.clean_content, "hey @Alice");
        assert_eq!(summary.server.as_deref(), Some("guild"));
        assert_eq!(summary.channel_kind.as_deref(), Some("text"));
    }

    #[test]
    fn test_unknown_channel_uses_placeholder() {
        let service = service();
        let message = service
            .hydrate_json(r#"{"id": "5", "channel_id": "404", "timestamp": "2016-01-01T00:00:00+00:00"}"#)
            .unwrap();

        assert!(message.is_private());
        assert!(message.server().is_none());
        let summary = service.summarize(&message);
        assert_eq!(summary.channel_id.as_deref(), Some("404"));
        assert!(summary.channel_kind.is_none());
    }

    #[test]
    fn test_registered_private_channel() {
        let mut service = service();
        service.register_private_channel(Channel::private("77"));

        let message = service
            .hydrate_json(
                r#"{"id": "5", "channel_id": "77", "content": "<@100>",
                    "timestamp": "2016-01-01T00:00:00+00:00", "mentions": [{"id": "100"}]}"#,
            )
            .unwrap();

        assert!(message.channel().unwrap().as_channel().is_some());
        assert!(message.mentions().is_empty());
        assert_eq!(message.raw_mentions(), ["100"]);
    }

    #[test]
    fn test_refresh_rehydrates_in_place() {
        let service = service();
        let mut message = service
            .hydrate_json(r#"{"id": "5", "channel_id": "10", "content": "one", "timestamp": "2016-01-01T00:00:00+00:00"}"#)
            .unwrap();
        assert_eq!(message.clean_content(), "one");

        let edit = MessagePayload::from_json(
            r#"{"id": "5", "channel_id": "10", "content": "two <#10>",
                "timestamp": "2016-01-01T00:00:00+00:00",
                "edited_timestamp": "2016-01-01T00:05:00+00:00"}"#,
        )
        .unwrap();
        service.refresh(&mut message, edit).unwrap();

        assert_eq!(message.clean_content(), "two #general");
        assert!(message.edited_timestamp().is_some());
    }
}
