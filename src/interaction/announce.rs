use std::{fmt::Display, sync::OnceLock};

use anyhow::Context;
use chrono::{DateTime, Local, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::{info, instrument};

use crate::{
    base::{config::Config, types::{Question, Void}},
    service::chat::ChatClient,
};

/// Timestamp layout used in log lines and messages.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

static LOCAL_ZONE: OnceLock<Option<Tz>> = OnceLock::new();

/// Parse an IANA zone name, as found in `TZ` (an optional leading `:` is ignored).
pub fn parse_zone(name: &str) -> Option<Tz> {
    name.trim().trim_start_matches(':').parse().ok()
}

/// The named local time zone: `TZ` first, then the system setting.
///
/// `None` when neither names a zone known to the tz database.
pub fn local_zone() -> Option<Tz> {
    *LOCAL_ZONE.get_or_init(|| {
        std::env::var("TZ")
            .ok()
            .and_then(|name| parse_zone(&name))
            .or_else(|| iana_time_zone::get_timezone().ok().and_then(|name| parse_zone(&name)))
    })
}

/// Render an instant in the given time zone.
pub fn format_time<Z>(time: &DateTime<Utc>, tz: &Z) -> String
where
    Z: TimeZone,
    Z::Offset: Display,
{
    time.with_timezone(tz).format(TIME_FORMAT).to_string()
}

/// Render an instant in the local time zone, named (`UTC`, `PST`, ...) when it can be resolved.
///
/// Falls back to the numeric local offset otherwise.
pub fn format_local_time(time: &DateTime<Utc>) -> String {
    match local_zone() {
        Some(tz) => format_time(time, &tz),
        None => format_time(time, &Local),
    }
}

/// The chat text announcing `question`: `[<created>] <author>: <link>`.
pub fn format_question<Z>(question: &Question, tz: &Z) -> String
where
    Z: TimeZone,
    Z::Offset: Display,
{
    render_question(question, &format_time(&question.creation_date, tz))
}

/// Like [`format_question`], in the local time zone.
pub fn format_local_question(question: &Question) -> String {
    render_question(question, &format_local_time(&question.creation_date))
}

fn render_question(question: &Question, created: &str) -> String {
    format!("[{}] {}: {}", created, question.owner.display_name, question.link)
}

/// Post one question to the configured channel.
#[instrument(skip_all, fields(question_id = question.question_id))]
pub async fn announce_question(question: &Question, config: &Config, chat: &ChatClient) -> Void {
    let text = format_local_question(question);

    info!("> {}: {}", config.slack_channel, text);

    chat.post_message(&config.slack_channel, &config.slack_username, &text).await.context("Failed to post message")
}

// Tests.
