//! Prompt scenarios for the chat-completion call

pub mod companion;
