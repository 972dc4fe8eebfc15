//! Slack implementation of the chat client, on top of `slack-morphism`.

use anyhow::anyhow;
use async_trait::async_trait;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use slack_morphism::prelude::*;
use tracing::{info, instrument};

use std::sync::Arc;

use crate::base::{
    config::Config,
    types::{Res, Void},
};

use super::{ChatClient, GenericChatClient};

// Type aliases.

type FullClient = slack_morphism::SlackClient<SlackClientHyperConnector<HttpsConnector<HttpConnector>>>;

// Extra methods on `ChatClient` applied by the slack implementation.

impl ChatClient {
    /// Creates a new Slack chat client.
    pub fn slack(config: &Config) -> Res<Self> {
        let client = SlackChatClient::new(config)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

impl From<SlackChatClient> for ChatClient {
    fn from(client: SlackChatClient) -> Self {
        Self { inner: Arc::new(client) }
    }
}

// Structs.

/// Slack client implementation.
#[derive(Clone)]
pub struct SlackChatClient {
    token: SlackApiToken,
    client: Arc<FullClient>,
    debug: bool,
}

impl SlackChatClient {
    /// Create a new Slack chat client.
    #[instrument(name = "SlackChatClient::new", skip_all)]
    pub fn new(config: &Config) -> Res<Self> {
        let token = SlackApiToken::new(SlackApiTokenValue(config.slack_token.clone()));

        let https_connector = HttpsConnector::<HttpConnector>::builder().with_native_roots()?.https_only().enable_http1().build();
        let connector = SlackClientHyperConnector::with_connector(https_connector);
        let client = Arc::new(slack_morphism::SlackClient::new(connector));

        Ok(Self {
            token,
            client,
            debug: config.slack_debug,
        })
    }

    /// Build the `chat.postMessage` request for a plain-text message.
    fn build_post_message_request(channel_id: &str, username: &str, text: &str) -> SlackApiChatPostMessageRequest {
        let message = SlackMessageContent::new().with_text(text.to_string());

        SlackApiChatPostMessageRequest::new(SlackChannelId(channel_id.to_string()), message)
            .with_username(username.to_string())
            .with_as_user(true)
    }
}

#[async_trait]
impl GenericChatClient for SlackChatClient {
    #[instrument(skip(self, text))]
    async fn post_message(&self, channel_id: &str, username: &str, text: &str) -> Void {
        let request = Self::build_post_message_request(channel_id, username, text);

        if self.debug {
            info!("Slack request: {:?}", request);
        }

        let session = self.client.open_session(&self.token);

        let response = session.chat_post_message(&request).await.map_err(|e| anyhow!("Slack rejected the message: {}", e))?;

        if self.debug {
            info!("Slack response: {:?}", response);
        }

        Ok(())
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_message_request_posts_as_named_user() {
        let request = SlackChatClient::build_post_message_request("C012345", "overflow-news", "hello");

        assert_eq!(request.channel, SlackChannelId("C012345".to_string()));
        assert_eq!(request.username.as_deref(), Some("overflow-news"));
        assert_eq!(request.as_user, Some(true));
        assert_eq!(request.content.text.as_deref(), Some("hello"));
    }
}
