//! Library root for `overflow-news`.
//!
//! Overflow-news watches a Stack Exchange site for new questions carrying a set
//! of tags, and announces each one in a Slack channel:
//! - Polls the site on a fixed interval, oldest questions first
//! - Posts one message per question, under a configurable display name
//! - Keeps no state beyond an in-memory watermark
//!
//! The question source and the chat destination are both behind traits so the
//! loop can be driven by other implementations (or mocks).

#[deny(missing_docs)]
pub mod base;
pub mod interaction;
pub mod poller;
pub mod runtime;
pub mod service;

use std::future::Future;

use anyhow::anyhow;
use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the overflow-news runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with the question and chat clients
/// - Runs the poll loop until it fails or `shutdown` resolves
pub async fn start<F>(config: Config, shutdown: F) -> Void
where
    F: Future<Output = ()>,
{
    info!("Starting overflow-news ...");

    // Start the crypto provider.
    crypto::ring::default_provider().install_default().map_err(|_| anyhow!("Failed to install the rustls crypto provider."))?;

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config)?;

    // Start the runtime.
    runtime.start(shutdown).await
}
