use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A bare, cross-server user identity as carried by gateway payloads
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    #[serde(rename = "username", default)]
    pub name: String,
    #[serde(default)]
    pub discriminator: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_discriminator(mut self, discriminator: impl Into<String>) -> Self {
        self.discriminator = discriminator.into();
        self
    }

    pub fn with_bot(mut self, bot: bool) -> Self {
        self.bot = bot;
        self
    }

    pub fn display_name(&self) -> &str {
        &self.name
    }

    /// Marker string that mentions this user in message content
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.discriminator.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}#{}", self.name, self.discriminator)
        }
    }
}

/// A user's identity scoped to one server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub user: User,
    pub nick: Option<String>,
    pub roles: Vec<String>,
}

impl Member {
    pub fn new(user: User) -> Self {
        Self {
            user,
            nick: None,
            roles: Vec::new(),
        }
    }

    pub fn with_nick(mut self, nick: impl Into<String>) -> Self {
        self.nick = Some(nick.into());
        self
    }

    pub fn with_role(mut self, role_id: impl Into<String>) -> Self {
        self.roles.push(role_id.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.user.id
    }

    /// Nickname if one is set, otherwise the user name
    pub fn display_name(&self) -> &str {
        self.nick.as_deref().unwrap_or(&self.user.name)
    }

    pub fn mention(&self) -> String {
        if self.nick.is_some() {
            format!("<@!{}>", self.user.id)
        } else {
            self.user.mention()
        }
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.user, f)
    }
}

/// Sender of a message.
///
/// Starts out as the `User` parsed from the payload and is replaced by the
/// roster's shared `Member` when the message belongs to a server that knows
/// the author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Author {
    User(User),
    Member(Arc<Member>),
}

impl Author {
    pub fn user(&self) -> &User {
        match self {
            Author::User(user) => user,
            Author::Member(member) => &member.user,
        }
    }

    pub fn id(&self) -> &str {
        &self.user().id
    }

    pub fn display_name(&self) -> &str {
        match self {
            Author::User(user) => user.display_name(),
            Author::Member(member) => member.display_name(),
        }
    }

    pub fn as_member(&self) -> Option<&Arc<Member>> {
        match self {
            Author::Member(member) => Some(member),
            Author::User(_) => None,
        }
    }

    pub fn is_member(&self) -> bool {
        matches!(self, Author::Member(_))
    }
}

impl Default for Author {
    fn default() -> Self {
        Author::User(User::default())
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.user(), f)
    }
}
