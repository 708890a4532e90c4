//! Domain entities - Messages and the objects they reference

pub mod user;
pub mod role;
pub mod channel;
pub mod server;
pub mod message;

pub use user::{Author, Member, User};
pub use role::Role;
pub use channel::{Channel, ChannelKind, MessageChannel};
pub use server::Server;
pub use message::Message;
