//! Domain traits - Abstractions over the server rosters

pub mod roster;

pub use roster::Roster;
