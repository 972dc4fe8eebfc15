//! Runtime services and shared state for overflow-news.

use std::future::Future;

use tracing::instrument;

use crate::{
    base::{
        clock::Clock,
        config::Config,
        types::{Res, Void},
    },
    poller::Poller,
    service::{chat::ChatClient, questions::QuestionClient},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the question client, chat client, clock, and configuration.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The question source client instance.
    pub questions: QuestionClient,
    /// The chat client instance.
    pub chat: ChatClient,
    /// The wall clock.
    pub clock: Clock,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub fn new(config: Config) -> Res<Self> {
        // Initialize the Stack Exchange client.
        let questions = QuestionClient::stack_exchange(&config)?;

        // Initialize the slack client.
        let chat = ChatClient::slack(&config)?;

        Ok(Self {
            config,
            questions,
            chat,
            clock: Clock::system(),
        })
    }

    /// Poll until a failure occurs or `shutdown` resolves.
    pub async fn start<F>(&self, shutdown: F) -> Void
    where
        F: Future<Output = ()>,
    {
        let mut poller = Poller::new(self.config.clone(), self.questions.clone(), self.chat.clone(), self.clock.clone())?;

        poller.run_until(shutdown).await
    }
}
