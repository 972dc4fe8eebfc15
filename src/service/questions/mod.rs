//! Question source integration for overflow-news.
//!
//! Defines the `GenericQuestionClient` trait that can be implemented for
//! different Q&A sites, with a default implementation for the Stack Exchange API.

pub mod stackexchange;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{QuestionPage, QuestionQuery, Res};

// Traits.

/// Generic "question source" trait that clients must implement.
#[async_trait]
pub trait GenericQuestionClient: Send + Sync + 'static {
    /// The site this client queries.
    fn site(&self) -> &str;

    /// Get the questions matching the query, oldest first.
    ///
    /// A single page is returned; no pagination is attempted.
    async fn get_questions(&self, query: &QuestionQuery) -> Res<QuestionPage>;
}

// Structs.

/// Question source client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct QuestionClient {
    inner: Arc<dyn GenericQuestionClient>,
}

impl Deref for QuestionClient {
    type Target = dyn GenericQuestionClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl QuestionClient {
    pub fn new(inner: Arc<dyn GenericQuestionClient>) -> Self {
        Self { inner }
    }
}
