//! Domain layer - Entities and the roster contract
//!
//! This layer contains:
//! - Entities: Message, User/Member, Channel, Role, Server
//! - Traits: Roster lookups used to resolve ids

pub mod entities;
pub mod traits;
