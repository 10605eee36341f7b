// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::constants::{RESOURCE_ALREADY_EXISTS, RESOURCE_NOT_FOUND};

/// Raised synchronously while building a logger from its options.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("no cloudwatch client provided")]
    MissingClient,

    #[error("no logGroupName provided")]
    MissingLogGroupName,

    #[error("debounce time must be greater than 0")]
    InvalidDebounceTime,

    #[error("invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("logger must be created inside a tokio runtime")]
    NoRuntime,
}

/// Failure reported by the remote log-stream client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
}

impl ClientError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_resource_not_found(&self) -> bool {
        self.code == RESOURCE_NOT_FOUND
    }

    #[must_use]
    pub fn is_resource_already_exists(&self) -> bool {
        self.code == RESOURCE_ALREADY_EXISTS
    }
}

/// Terminal outcome of a single shipment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShipmentError {
    #[error("failed to create log stream {stream_name}: {source}")]
    CreateStream {
        stream_name: String,
        #[source]
        source: ClientError,
    },

    #[error("failed to create log group {group_name}: {source}")]
    CreateGroup {
        group_name: String,
        #[source]
        source: ClientError,
    },

    #[error("log group still missing after creating it, giving up on stream {stream_name}: {source}")]
    GroupStillMissing {
        stream_name: String,
        #[source]
        source: ClientError,
    },

    #[error("failed to put log events into {stream_name}: {source}")]
    Append {
        stream_name: String,
        #[source]
        source: ClientError,
    },
}

impl ShipmentError {
    /// The client error that ended the shipment.
    #[must_use]
    pub fn client_error(&self) -> &ClientError {
        match self {
            Self::CreateStream { source, .. }
            | Self::CreateGroup { source, .. }
            | Self::GroupStillMissing { source, .. }
            | Self::Append { source, .. } => source,
        }
    }

    /// Whether the destination reported a missing group or stream.
    #[must_use]
    pub fn is_resource_missing(&self) -> bool {
        self.client_error().is_resource_not_found()
    }
}
