//! Outbound interactions for overflow-news.
//!
//! This module turns items found by the question source into chat messages.

pub mod announce;
