// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Debounced batching of submitted log entries.
//!
//! The accumulator is an actor: producers push entries through a cloneable
//! [`AccumulatorHandle`] and a single task owns the buffer. A batch is
//! emitted once no entry has arrived for a full quiescence window.
//!
//! ```text
//!   submit ──> [buffer] ──(debounce_time of silence)──> Batch ──> shipper
//!                 ^                   |
//!                 └── each submit ────┘ rearms the timer
//! ```
//!
//! This is a trailing-edge debounce, not a periodic flush. A producer that
//! keeps submitting with gaps shorter than the window postpones the flush for
//! as long as it keeps going. That latency is the price paid for merging
//! bursts into as few appends as possible.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::client::LogEvent;
use crate::formatter::{format, LogValue};

/// Ordered log events flushed together, in submission order.
pub type Batch = Vec<LogEvent>;

/// A raw value waiting to be formatted, stamped with its submission time.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEntry {
    pub value: LogValue,
    pub timestamp: i64,
}

#[derive(Clone, Debug)]
pub struct AccumulatorHandle {
    tx: mpsc::UnboundedSender<PendingEntry>,
}

impl AccumulatorHandle {
    /// Queues an entry without waiting. Fails only once the accumulator has
    /// stopped.
    pub fn submit(&self, entry: PendingEntry) -> Result<(), mpsc::error::SendError<PendingEntry>> {
        self.tx.send(entry)
    }
}

pub struct BatchAccumulator {
    rx: mpsc::UnboundedReceiver<PendingEntry>,
    batch_tx: mpsc::UnboundedSender<Batch>,
    debounce_time: Duration,
    cancel_token: CancellationToken,
}

impl BatchAccumulator {
    /// Returns the actor to spawn, the handle producers submit through, and
    /// the receiving end of completed batches.
    #[must_use]
    pub fn new(
        debounce_time: Duration,
        cancel_token: CancellationToken,
    ) -> (Self, AccumulatorHandle, mpsc::UnboundedReceiver<Batch>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (batch_tx, batch_rx) = mpsc::unbounded_channel();

        let accumulator = Self {
            rx,
            batch_tx,
            debounce_time,
            cancel_token,
        };

        (accumulator, AccumulatorHandle { tx }, batch_rx)
    }

    /// Runs until cancelled or until every handle is dropped. Whatever is
    /// still buffered at that point goes out as a last batch.
    pub async fn run(mut self) {
        debug!("CLOUDWATCH | Batch accumulator started");

        let mut buffer: Batch = Vec::new();
        let quiescence = sleep(self.debounce_time);
        tokio::pin!(quiescence);

        loop {
            tokio::select! {
                biased;

                () = self.cancel_token.cancelled() => {
                    while let Ok(entry) = self.rx.try_recv() {
                        buffer.push(Self::to_event(entry));
                    }
                    self.flush(&mut buffer);
                    break;
                }

                entry = self.rx.recv() => match entry {
                    Some(entry) => {
                        buffer.push(Self::to_event(entry));
                        quiescence.as_mut().reset(Instant::now() + self.debounce_time);
                    }
                    None => {
                        self.flush(&mut buffer);
                        break;
                    }
                },

                () = &mut quiescence, if !buffer.is_empty() => {
                    self.flush(&mut buffer);
                }
            }
        }

        debug!("CLOUDWATCH | Batch accumulator stopped");
    }

    fn to_event(entry: PendingEntry) -> LogEvent {
        LogEvent {
            message: format(&entry.value),
            timestamp: entry.timestamp,
        }
    }

    fn flush(&self, buffer: &mut Batch) {
        if buffer.is_empty() {
            return;
        }

        let batch = std::mem::take(buffer);
        debug!("CLOUDWATCH | Flushing batch of {} log events", batch.len());
        if self.batch_tx.send(batch).is_err() {
            warn!("CLOUDWATCH | Batch receiver dropped, discarding batch");
        }
    }
}
