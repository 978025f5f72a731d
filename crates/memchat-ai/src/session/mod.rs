//! Conversation session management.
//!
//! A `Session` owns one transcript and one endpoint handle. It appends the
//! user turn, streams the reply and appends the assistant turn, and exposes
//! history inspection plus JSON save/load.

mod chat;
mod manager;
mod persist;
mod types;


pub use manager::Session;
pub use types::EndpointStatus;
