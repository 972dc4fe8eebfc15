//! Service integrations for external APIs and clients.
//!
//! This module contains implementations for the services used by overflow-news:
//! - Chat services (e.g., Slack)
//! - Question sources (e.g., Stack Exchange)
//!
//! Each service module defines both a generic trait and a concrete implementation,
//! allowing for extensibility and easy testing.

pub mod chat;
pub mod questions;
