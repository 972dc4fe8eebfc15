//! The poll-and-forward loop.
//!
//! One cycle queries the question source for everything created since the
//! watermark, advances the watermark to the time the query returned, and posts
//! each question to the chat channel in the order received. The loop then idles
//! for the configured interval and starts over. Any failure ends the loop.

use std::future::Future;

use anyhow::Context;
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::{
    base::{
        clock::Clock,
        config::Config,
        types::{QuestionQuery, Res, Void},
    },
    interaction::announce::{announce_question, format_local_time},
    service::{chat::ChatClient, questions::QuestionClient},
};

/// Loop state: the configuration, both clients, and the watermark.
pub struct Poller {
    config: Config,
    questions: QuestionClient,
    chat: ChatClient,
    clock: Clock,
    watermark: DateTime<Utc>,
}

impl Poller {
    /// Create a poller whose watermark starts `slack_history` days before now.
    pub fn new(config: Config, questions: QuestionClient, chat: ChatClient, clock: Clock) -> Res<Self> {
        let watermark = config.watermark_origin(clock.now())?;

        Ok(Self {
            config,
            questions,
            chat,
            clock,
            watermark,
        })
    }

    /// Only questions created at or after this instant count as new.
    pub fn watermark(&self) -> DateTime<Utc> {
        self.watermark
    }

    /// Run one query, advance the watermark, then forward every result.
    ///
    /// The watermark moves before dispatch, so a question created while the
    /// batch is being posted can fall between two queries.
    #[instrument(skip_all)]
    pub async fn cycle(&mut self) -> Void {
        let query = QuestionQuery::new(self.watermark, self.config.stack_tags.clone());

        let page = self.questions.get_questions(&query).await.with_context(|| format!("Failed to query {}", self.questions.site()))?;

        info!("Questions since {}: {}", format_local_time(&self.watermark), page.items.len());

        self.watermark = self.clock.now();

        for question in &page.items {
            announce_question(question, &self.config, &self.chat).await?;
        }

        Ok(())
    }

    /// Wait out the poll interval.
    pub async fn idle(&self) {
        debug!("Sleeping {}", self.config.stack_poll);
        tokio::time::sleep(*self.config.stack_poll).await;
    }

    /// Cycle and idle forever; only returns on failure.
    pub async fn run(&mut self) -> Void {
        loop {
            self.cycle().await?;
            self.idle().await;
        }
    }

    /// Like [`Poller::run`], but stops cleanly once `shutdown` resolves.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Void
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            result = self.run() => result,
            _ = shutdown => {
                info!("Shutdown requested.");
                Ok(())
            }
        }
    }
}
