//! Conversation model: messages, the append-only history and model responses

pub mod entities;
pub mod response;
