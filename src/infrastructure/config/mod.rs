//! Configuration management

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::errors::ConfigError;
use crate::domain::entities::{Channel, ChannelKind, Member, Role, Server, User};

/// Tool configuration: logging plus the server roster messages resolve against
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub logging: LoggingConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub private_channels: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServerConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub members: Vec<MemberConfig>,
    #[serde(default)]
    pub roles: Vec<RoleConfig>,
    #[serde(default)]
    pub channels: Vec<ChannelConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct MemberConfig {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub discriminator: String,
    #[serde(default)]
    pub nick: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub bot: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RoleConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub colour: u32,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub mentionable: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ChannelConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kind: ChannelKind,
    #[serde(default)]
    pub topic: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            server: ServerConfig {
                id: "81384788765712384".to_string(),
                name: "example".to_string(),
                members: vec![MemberConfig {
                    id: "80351110224678912".to_string(),
                    username: "alice".to_string(),
                    discriminator: "1337".to_string(),
                    nick: Some("Alice".to_string()),
                    roles: vec!["41771983423143936".to_string()],
                    bot: false,
                }],
                roles: vec![RoleConfig {
                    id: "41771983423143936".to_string(),
                    name: "moderators".to_string(),
                    colour: 0x3498db,
                    position: 1,
                    mentionable: true,
                }],
                channels: vec![ChannelConfig {
                    id: "81384788765712384".to_string(),
                    name: "general".to_string(),
                    kind: ChannelKind::Text,
                    topic: None,
                }],
            },
            private_channels: Vec::new(),
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    pub fn load_env() -> Self {
        let mut config = Config::default();

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        config
    }

    /// Reject empty and duplicate ids within each roster
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.id.is_empty() {
            return Err(ConfigError::MissingField("server.id".to_string()));
        }

        check_ids("member", self.server.members.iter().map(|m| m.id.as_str()))?;
        check_ids("role", self.server.roles.iter().map(|r| r.id.as_str()))?;
        check_ids(
            "channel",
            self.server
                .channels
                .iter()
                .map(|c| c.id.as_str())
                .chain(self.private_channels.iter().map(String::as_str)),
        )?;

        if let Some(channel) = self.server.channels.iter().find(|c| c.kind == ChannelKind::Private) {
            return Err(ConfigError::InvalidValue(format!(
                "channel {} is private; list it under private-channels",
                channel.id
            )));
        }

        Ok(())
    }

    /// Build the in-memory roster described by this config
    pub fn build_server(&self) -> Arc<Server> {
        let server = Server::new(&self.server.id, &self.server.name);

        for role in &self.server.roles {
            server.add_role(
                Role::new(&role.id, &role.name)
                    .with_colour(role.colour)
                    .with_position(role.position)
                    .with_mentionable(role.mentionable),
            );
        }

        for member in &self.server.members {
            let user = User::new(&member.id, &member.username)
                .with_discriminator(&member.discriminator)
                .with_bot(member.bot);
            let mut entry = Member::new(user);
            entry.nick = member.nick.clone();
            entry.roles = member.roles.clone();
            server.add_member(entry);
        }

        for channel in &self.server.channels {
            server.create_channel_with(&channel.id, &channel.name, channel.kind, |built| {
                match &channel.topic {
                    Some(topic) => built.with_topic(topic),
                    None => built,
                }
            });
        }

        tracing::debug!(
            "Built server {} with {} members, {} channels",
            server.name,
            server.member_count(),
            self.server.channels.len()
        );
        server
    }

    pub fn build_private_channels(&self) -> Vec<Channel> {
        self.private_channels.iter().map(Channel::private).collect()
    }
}

fn check_ids<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.is_empty() {
            return Err(ConfigError::InvalidValue(format!("empty {} id", kind)));
        }
        if !seen.insert(id) {
            return Err(ConfigError::InvalidValue(format!("duplicate {} id {}", kind, id)));
        }
    }
    Ok(())
}
