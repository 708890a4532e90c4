use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Weak};

use super::Server;

/// Type of channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    #[default]
    Text,
    Voice,
    Private,
}

impl ChannelKind {
    pub fn as_str(&self) -> &str {
        match self {
            ChannelKind::Text => "text",
            ChannelKind::Voice => "voice",
            ChannelKind::Private => "private",
        }
    }
}

/// A channel messages are posted in.
///
/// Server channels keep a weak link back to their server; the server owns
/// the channel, not the other way round.
#[derive(Debug, Clone)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub kind: ChannelKind,
    pub topic: Option<String>,
    server: Weak<Server>,
}

impl Channel {
    /// A direct-message channel with no owning server
    pub fn private(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            kind: ChannelKind::Private,
            topic: None,
            server: Weak::new(),
        }
    }

    pub(crate) fn in_server(
        server: Weak<Server>,
        id: impl Into<String>,
        name: impl Into<String>,
        kind: ChannelKind,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            topic: None,
            server,
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn is_private(&self) -> bool {
        self.kind == ChannelKind::Private
    }

    /// Owning server, `None` for private channels or once the server is gone
    pub fn server(&self) -> Option<Arc<Server>> {
        if self.is_private() {
            return None;
        }
        self.server.upgrade()
    }

    pub fn mention(&self) -> String {
        format!("<#{}>", self.id)
    }
}

/// Compares channel data only; the weak server link has no equality.
impl PartialEq for Channel {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.kind == other.kind
            && self.topic == other.topic
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.name)
    }
}

/// Channel a message was received in.
///
/// `Unresolved` stands in when the gateway only handed over a channel id the
/// context does not know. It carries no further information and is treated
/// as private.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageChannel {
    Resolved(Arc<Channel>),
    Unresolved { id: String },
}

impl MessageChannel {
    pub fn id(&self) -> &str {
        match self {
            MessageChannel::Resolved(channel) => &channel.id,
            MessageChannel::Unresolved { id } => id,
        }
    }

    pub fn is_private(&self) -> bool {
        match self {
            MessageChannel::Resolved(channel) => channel.is_private(),
            MessageChannel::Unresolved { .. } => true,
        }
    }

    pub fn as_channel(&self) -> Option<&Arc<Channel>> {
        match self {
            MessageChannel::Resolved(channel) => Some(channel),
            MessageChannel::Unresolved { .. } => None,
        }
    }
}
