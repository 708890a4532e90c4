//! Gateway chat messages: hydration from raw payloads, mention resolution
//! against server rosters, and clean display rendering.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::errors::{AppError, ConfigError, MessageError};
pub use application::messaging::MessagePayload;
pub use application::services::{MessageService, MessageSummary};
pub use domain::entities::{
    Author, Channel, ChannelKind, Member, Message, MessageChannel, Role, Server, User,
};
pub use domain::traits::Roster;
