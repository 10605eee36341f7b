// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Ships batches into the current hourly stream, keeping its sequence token.
//!
//! Each shipment walks the same small state machine:
//!
//! ```text
//!   resolve stream ──(token held)──────────────────────────> append
//!        │                                                    ^
//!        └─(no token)─> create stream ──ok / exists──────────┘
//!                            │
//!                            └─ group missing ─> create group ─> create stream (once)
//! ```
//!
//! Only a missing group is recovered from, and only once per shipment. A
//! failed append always drops the held token, since the destination may have
//! rejected it, and the next shipment then starts over from stream creation.
//! `ResourceAlreadyExistsException` from either create call is treated as
//! success on purpose: the stream or group exists, which is all creation needs.
//!
//! Shipments may overlap. The token lives in one cell that every shipment
//! reads and writes in short critical sections: the last writer wins, and a
//! stale token heals itself through the invalidation above.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, TimeZone};
use tracing::{debug, error, warn};

use crate::accumulator::Batch;
use crate::client::{
    CreateLogGroupRequest, CreateLogStreamRequest, LogStreamClient, PutLogEventsRequest,
};
use crate::errors::{ClientError, ShipmentError};
use crate::stream_name::{StreamNameResolver, StreamState};

/// Successful shipment summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shipped {
    pub stream_name: String,
    pub events: usize,
}

pub struct Shipper {
    client: Arc<dyn LogStreamClient>,
    log_group_name: String,
    resolver: StreamNameResolver,
    state: Mutex<StreamState>,
}

impl Shipper {
    #[must_use]
    pub fn new(
        client: Arc<dyn LogStreamClient>,
        log_group_name: String,
        resolver: StreamNameResolver,
    ) -> Self {
        Self {
            client,
            log_group_name,
            resolver,
            state: Mutex::new(StreamState::default()),
        }
    }

    #[must_use]
    pub fn log_group_name(&self) -> &str {
        &self.log_group_name
    }

    /// The token the next append would carry, if any.
    #[must_use]
    pub fn sequence_token(&self) -> Option<String> {
        self.state().sequence_token().map(str::to_string)
    }

    /// Resolves the stream for the current hour, dropping the held token if
    /// the hour rolled over since the last resolution.
    pub fn resolve_stream_name(&self) -> String {
        self.observe(self.resolver.current_stream_name())
    }

    pub fn resolve_stream_name_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> String {
        self.observe(self.resolver.stream_name_at(now))
    }

    pub async fn ship(&self, batch: Batch) -> Result<Shipped, ShipmentError> {
        let stream_name = self.resolve_stream_name();
        self.ship_to(stream_name, batch).await
    }

    /// Same as [`Shipper::ship`] with the stream resolved for `now`.
    pub async fn ship_at<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
        batch: Batch,
    ) -> Result<Shipped, ShipmentError> {
        let stream_name = self.resolve_stream_name_at(now);
        self.ship_to(stream_name, batch).await
    }

    async fn ship_to(&self, stream_name: String, batch: Batch) -> Result<Shipped, ShipmentError> {
        let holds_token = self.state().sequence_token().is_some();
        if !holds_token {
            self.ensure_stream(&stream_name).await?;
        }
        self.write_logs(stream_name, batch).await
    }

    async fn ensure_stream(&self, stream_name: &str) -> Result<(), ShipmentError> {
        let source = match self.create_log_stream(stream_name).await {
            Ok(()) => return Ok(()),
            Err(source) if source.is_resource_not_found() => source,
            Err(source) => {
                return Err(ShipmentError::CreateStream {
                    stream_name: stream_name.to_string(),
                    source,
                })
            }
        };

        warn!(
            "CLOUDWATCH | Log group {} not found ({}), creating it",
            self.log_group_name, source.message
        );
        self.create_log_group().await?;

        match self.create_log_stream(stream_name).await {
            Ok(()) => Ok(()),
            Err(source) if source.is_resource_not_found() => {
                Err(ShipmentError::GroupStillMissing {
                    stream_name: stream_name.to_string(),
                    source,
                })
            }
            Err(source) => Err(ShipmentError::CreateStream {
                stream_name: stream_name.to_string(),
                source,
            }),
        }
    }

    /// An already existing stream satisfies the request.
    async fn create_log_stream(&self, stream_name: &str) -> Result<(), ClientError> {
        let request = CreateLogStreamRequest {
            log_group_name: self.log_group_name.clone(),
            log_stream_name: stream_name.to_string(),
        };

        match self.client.create_log_stream(request).await {
            Ok(()) => {
                debug!("CLOUDWATCH | Created log stream {stream_name}");
                Ok(())
            }
            Err(e) if e.is_resource_already_exists() => {
                debug!("CLOUDWATCH | Log stream {stream_name} already exists");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn create_log_group(&self) -> Result<(), ShipmentError> {
        let request = CreateLogGroupRequest {
            log_group_name: self.log_group_name.clone(),
        };

        match self.client.create_log_group(request).await {
            Ok(()) => {
                debug!("CLOUDWATCH | Created log group {}", self.log_group_name);
                Ok(())
            }
            Err(e) if e.is_resource_already_exists() => Ok(()),
            Err(source) => Err(ShipmentError::CreateGroup {
                group_name: self.log_group_name.clone(),
                source,
            }),
        }
    }

    async fn write_logs(
        &self,
        stream_name: String,
        batch: Batch,
    ) -> Result<Shipped, ShipmentError> {
        let events = batch.len();
        let request = PutLogEventsRequest {
            log_group_name: self.log_group_name.clone(),
            log_stream_name: stream_name.clone(),
            log_events: batch,
            sequence_token: self.sequence_token(),
        };

        match self.client.put_log_events(request).await {
            Ok(response) => {
                let mut state = self.state();
                // The hour may have rolled over while the append was in flight.
                if state.stream_name() == Some(stream_name.as_str()) {
                    state.set_sequence_token(response.next_sequence_token);
                }
                drop(state);

                debug!("CLOUDWATCH | Put {events} log events into {stream_name}");
                Ok(Shipped {
                    stream_name,
                    events,
                })
            }
            Err(source) => {
                self.state().invalidate();
                error!(
                    "CLOUDWATCH | Failed to put {events} log events into {stream_name}, sequence token dropped: {source}"
                );
                Err(ShipmentError::Append {
                    stream_name,
                    source,
                })
            }
        }
    }

    fn observe(&self, stream_name: String) -> String {
        if self.state().observe(&stream_name) {
            debug!("CLOUDWATCH | Switched to log stream {stream_name}");
        }
        stream_name
    }

    fn state(&self) -> MutexGuard<'_, StreamState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
