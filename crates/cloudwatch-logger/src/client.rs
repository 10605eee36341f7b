// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Seam to the remote log-stream service.
//!
//! The logger only needs three primitives from the destination: append a
//! batch of events to a stream, create a stream, and create a group. Any SDK
//! or HTTP client can be plugged in by implementing [`LogStreamClient`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ClientError;

/// A single formatted log line, timestamped in milliseconds since the epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    pub message: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutLogEventsRequest {
    pub log_group_name: String,
    pub log_stream_name: String,
    pub log_events: Vec<LogEvent>,
    /// Absent on the first append to a stream. The destination treats a
    /// missing token differently from an empty one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutLogEventsResponse {
    #[serde(default)]
    pub next_sequence_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLogStreamRequest {
    pub log_group_name: String,
    pub log_stream_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLogGroupRequest {
    pub log_group_name: String,
}

#[async_trait]
pub trait LogStreamClient: Send + Sync {
    /// Appends `log_events` to a stream, returning the cursor for the next append.
    async fn put_log_events(
        &self,
        request: PutLogEventsRequest,
    ) -> Result<PutLogEventsResponse, ClientError>;

    /// Creates a stream. Fails with `ResourceNotFoundException` when the
    /// group does not exist.
    async fn create_log_stream(&self, request: CreateLogStreamRequest) -> Result<(), ClientError>;

    async fn create_log_group(&self, request: CreateLogGroupRequest) -> Result<(), ClientError>;
}
