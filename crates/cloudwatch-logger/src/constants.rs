// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Defaults and destination error codes.

use std::time::Duration;

/// Quiescence window used when the caller does not configure one.
pub const DEFAULT_DEBOUNCE_TIME: Duration = Duration::from_millis(5000);

/// Error code the destination returns when a group or stream does not exist.
pub const RESOURCE_NOT_FOUND: &str = "ResourceNotFoundException";

/// Error code the destination returns when creating a group or stream that
/// is already there.
pub const RESOURCE_ALREADY_EXISTS: &str = "ResourceAlreadyExistsException";

/// Capacity of the shipment event broadcast. Slow subscribers lag, they never
/// hold up shipping.
pub(crate) const SHIPMENT_EVENTS_CAPACITY: usize = 256;

pub(crate) const ENV_LOG_GROUP_NAME: &str = "CLOUDWATCH_LOG_GROUP_NAME";
pub(crate) const ENV_DEBOUNCE_TIME_MS: &str = "CLOUDWATCH_DEBOUNCE_TIME_MS";
