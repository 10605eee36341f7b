// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Public entry point tying the pipeline together.
//!
//! ```text
//!   log(value) ──> BatchAccumulator ──Batch──> shipping loop ──spawn──> Shipper::ship
//!                                                                           │
//!                                          subscribe() <── ShipmentEvent ───┘
//! ```
//!
//! The shipping loop never stops because a shipment failed. Each shipment
//! gets its own task, so a slow append does not hold back the next batch.

use std::sync::Arc;

use chrono::Utc;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, mpsc};
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::accumulator::{AccumulatorHandle, Batch, BatchAccumulator, PendingEntry};
use crate::config::LoggerOptions;
use crate::constants::SHIPMENT_EVENTS_CAPACITY;
use crate::errors::{ConfigError, ShipmentError};
use crate::formatter::LogValue;
use crate::shipper::Shipper;
use crate::stream_name::StreamNameResolver;

/// Outcome of one shipment, published to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShipmentEvent {
    Shipped { stream_name: String, events: usize },
    Failed { error: ShipmentError },
}

pub struct CloudWatchLogger {
    handle: AccumulatorHandle,
    shipper: Arc<Shipper>,
    events_tx: broadcast::Sender<ShipmentEvent>,
    cancel_token: CancellationToken,
    accumulator_task: JoinHandle<()>,
    shipping_task: JoinHandle<()>,
}

impl CloudWatchLogger {
    /// Validates `options` and starts the pipeline on the current tokio runtime.
    pub fn new(options: LoggerOptions) -> Result<Self, ConfigError> {
        let config = options.validate()?;
        let runtime = Handle::try_current().map_err(|_| ConfigError::NoRuntime)?;

        let resolver = config
            .stream_salt
            .map_or_else(StreamNameResolver::from_clock, StreamNameResolver::new);
        let shipper = Arc::new(Shipper::new(
            config.client,
            config.log_group_name,
            resolver,
        ));

        let cancel_token = CancellationToken::new();
        let (accumulator, handle, batch_rx) =
            BatchAccumulator::new(config.debounce_time, cancel_token.clone());
        let (events_tx, _) = broadcast::channel(SHIPMENT_EVENTS_CAPACITY);

        let accumulator_task = runtime.spawn(accumulator.run());
        let shipping_task = runtime.spawn(ship_batches(
            batch_rx,
            Arc::clone(&shipper),
            events_tx.clone(),
        ));

        debug!(
            "CLOUDWATCH | Logger started for group {} with salt {}",
            shipper.log_group_name(),
            resolver.salt()
        );

        Ok(Self {
            handle,
            shipper,
            events_tx,
            cancel_token,
            accumulator_task,
            shipping_task,
        })
    }

    /// Queues a value for shipping. Never blocks and never fails; values
    /// logged after shutdown are dropped with a warning.
    pub fn log(&self, value: impl Into<LogValue>) {
        let entry = PendingEntry {
            value: value.into(),
            timestamp: Utc::now().timestamp_millis(),
        };

        if self.handle.submit(entry).is_err() {
            warn!("CLOUDWATCH | Logger is shut down, dropping log message");
        }
    }

    /// Receives the outcome of every shipment completed after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ShipmentEvent> {
        self.events_tx.subscribe()
    }

    #[must_use]
    pub fn log_group_name(&self) -> &str {
        self.shipper.log_group_name()
    }

    /// The stream the next batch would go to.
    #[must_use]
    pub fn stream_name(&self) -> String {
        self.shipper.resolve_stream_name()
    }

    #[must_use]
    pub fn sequence_token(&self) -> Option<String> {
        self.shipper.sequence_token()
    }

    /// Flushes whatever is buffered and waits for in-flight shipments.
    pub async fn shutdown(self) {
        self.cancel_token.cancel();

        if let Err(e) = self.accumulator_task.await {
            error!("CLOUDWATCH | Batch accumulator task failed: {e}");
        }
        if let Err(e) = self.shipping_task.await {
            error!("CLOUDWATCH | Shipping task failed: {e}");
        }
        debug!("CLOUDWATCH | Logger shut down");
    }
}

async fn ship_batches(
    mut batch_rx: mpsc::UnboundedReceiver<Batch>,
    shipper: Arc<Shipper>,
    events_tx: broadcast::Sender<ShipmentEvent>,
) {
    let mut shipments = JoinSet::new();

    loop {
        tokio::select! {
            batch = batch_rx.recv() => match batch {
                Some(batch) => {
                    let shipper = Arc::clone(&shipper);
                    let events_tx = events_tx.clone();
                    shipments.spawn(async move {
                        ship_one(&shipper, batch, &events_tx).await;
                    });
                }
                None => break,
            },
            Some(result) = shipments.join_next(), if !shipments.is_empty() => {
                if let Err(e) = result {
                    error!("CLOUDWATCH | Shipment task failed: {e}");
                }
            }
        }
    }

    while let Some(result) = shipments.join_next().await {
        if let Err(e) = result {
            error!("CLOUDWATCH | Shipment task failed: {e}");
        }
    }
}

async fn ship_one(shipper: &Shipper, batch: Batch, events_tx: &broadcast::Sender<ShipmentEvent>) {
    let event = match shipper.ship(batch).await {
        Ok(shipped) => ShipmentEvent::Shipped {
            stream_name: shipped.stream_name,
            events: shipped.events,
        },
        Err(error) => {
            error!("CLOUDWATCH | Shipment failed: {error}");
            ShipmentEvent::Failed { error }
        }
    };

    // No subscribers is not an error.
    let _ = events_tx.send(event);
}
