//! Core types for docqa.

mod message;
mod session;

pub use message::{split_system, Message, MessageRole};
pub use session::SessionState;
