//! Data models for persisted conversation sessions.
//!
//! - [`ConversationRecord`] - the durable representation of a conversation
//! - [`MessageRecord`] / [`MessageContent`] - ordered messages with literal
//!   or part-list content
//! - [`SessionKey`] - explicit composite key (project hash + file name)
//! - [`SessionIndexEntry`] - derived listing projection, never persisted
//!
//! Records use serde for JSON (de)serialization with a tolerant timestamp
//! deserializer in the `deserializers` module.

pub mod deserializers;
pub mod record;
pub mod session;

pub use record::{
    ContentPart, ConversationRecord, MESSAGE_TYPE_ASSISTANT, MESSAGE_TYPE_USER, MessageContent,
    MessageRecord,
};
pub use session::{SessionIndexEntry, SessionKey};
