//! Application services - Message hydration orchestration

pub mod message_service;

pub use message_service::{MessageService, MessageSummary};
