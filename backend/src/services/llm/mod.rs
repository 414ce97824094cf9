//! LLM Service Module
//!
//! Wraps the hosted chat-completion API used to generate assistant replies.
//!
//! # Architecture
//! ```text
//! ┌──────────────────┐
//! │  ChatCompletion  │  ← Trait (generic interface)
//! └────────┬─────────┘
//!          │
//!    ┌─────┴──────┐
//!    ▼            ▼
//! ┌─────────┐  ┌──────────┐
//! │LLMClient│  │ Test     │
//! │ (HTTP)  │  │ doubles  │
//! └─────────┘  └──────────┘
//! ```
//!
//! # Scenarios
//! - Companion (category-focused emotional support, English / Malayalam)

mod client;
mod models;
mod scenarios;

pub use client::{ChatCompletion, LLMClient};
pub use models::*;
pub use scenarios::companion::{build_messages, build_system_prompt};
