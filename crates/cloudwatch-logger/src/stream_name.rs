// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Hourly stream naming and the append cursor tied to it.
//!
//! Every instance writes to one stream per wall-clock hour. The name embeds a
//! salt picked once per instance so that two processes logging into the same
//! group never share a stream, and therefore never fight over its cursor.

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike, Utc};

/// Derives stream names from the hour bucket of a timestamp and a salt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamNameResolver {
    salt: i64,
}

impl StreamNameResolver {
    #[must_use]
    pub fn new(salt: i64) -> Self {
        Self { salt }
    }

    /// Uses the current time in milliseconds as the salt.
    #[must_use]
    pub fn from_clock() -> Self {
        Self::new(Utc::now().timestamp_millis())
    }

    #[must_use]
    pub fn salt(&self) -> i64 {
        self.salt
    }

    /// Stream name for the hour that `now` falls in, as
    /// `{day}/{zero based month}/{year}-{hour}-00-{salt}`.
    #[must_use]
    pub fn stream_name_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> String {
        format!(
            "{}/{}/{}-{}-00-{}",
            now.day(),
            now.month0(),
            now.year(),
            now.hour(),
            self.salt
        )
    }

    #[must_use]
    pub fn current_stream_name(&self) -> String {
        self.stream_name_at(&Local::now())
    }
}

/// Last observed stream name and the sequence token that goes with it.
///
/// The token only means something for the stream it was returned for, so
/// observing a different name drops it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StreamState {
    stream_name: Option<String>,
    sequence_token: Option<String>,
}

impl StreamState {
    /// Records `stream_name` as the current target. Returns true when the
    /// name rolled over, in which case the held token has been cleared.
    pub fn observe(&mut self, stream_name: &str) -> bool {
        if self.stream_name.as_deref() == Some(stream_name) {
            return false;
        }
        self.stream_name = Some(stream_name.to_string());
        self.sequence_token = None;
        true
    }

    #[must_use]
    pub fn stream_name(&self) -> Option<&str> {
        self.stream_name.as_deref()
    }

    #[must_use]
    pub fn sequence_token(&self) -> Option<&str> {
        self.sequence_token.as_deref()
    }

    pub fn set_sequence_token(&mut self, token: Option<String>) {
        self.sequence_token = token;
    }

    pub fn invalidate(&mut self) {
        self.sequence_token = None;
    }
}
