//! Message handling - Payloads, mention markers and clean rendering

pub mod clean;
pub mod mentions;
pub mod payload;

pub use clean::{defuse_broadcasts, MentionTransforms};
pub use payload::{parse_timestamp, MessagePayload};
