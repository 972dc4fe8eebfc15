//! Core components, types, and utilities for overflow-news.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - Log level and poll interval parsing.
//! - Wall-clock access.
//! - Common types and result handling.

pub mod clock;
pub mod config;
pub mod interval;
pub mod log_level;
pub mod types;
