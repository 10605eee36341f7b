// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Batches application log messages and ships them to an append-only
//! log-stream service such as CloudWatch Logs.
//!
//! Messages are debounced into batches, written to one stream per wall-clock
//! hour, and appended with the sequence token the destination handed back on
//! the previous append. Missing streams are created on demand, and so is the
//! group when the destination reports it missing.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod accumulator;
pub mod client;
pub mod config;
pub mod constants;
pub mod errors;
pub mod formatter;
pub mod logger;
pub mod shipper;
pub mod stream_name;

pub use client::LogStreamClient;
pub use config::LoggerOptions;
pub use errors::{ClientError, ConfigError, ShipmentError};
pub use formatter::LogValue;
pub use logger::{CloudWatchLogger, ShipmentEvent};
