//! Application layer - Message hydration support
//!
//! This layer contains:
//! - Errors: Hydration, config and CLI errors
//! - Messaging: Payloads, mention extraction, clean content rendering
//! - Services: Hydrating messages against a server context

pub mod errors;
pub mod messaging;
pub mod services;
