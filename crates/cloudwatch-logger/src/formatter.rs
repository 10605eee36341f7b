// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Turns whatever the caller logged into the text payload of a log event.

use serde::Serialize;
use std::error::Error;

const DYN_ERROR_NAME: &str = "Error";

/// A value handed to [`crate::logger::CloudWatchLogger::log`].
#[derive(Debug, Clone, PartialEq)]
pub enum LogValue {
    Text(String),
    Structured(serde_json::Value),
    Fault(ErrorReport),
}

/// Diagnostic structure of an error: its type, its message and the chain of
/// underlying causes, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub name: String,
    pub message: String,
    pub stack: Vec<String>,
}

impl ErrorReport {
    /// Builds a report named after the concrete error type.
    pub fn from_error<E: Error + 'static>(error: &E) -> Self {
        let name = std::any::type_name::<E>();
        let name = name.rsplit("::").next().unwrap_or(name);
        Self::named(name, error)
    }

    pub fn named(name: impl Into<String>, error: &(dyn Error + 'static)) -> Self {
        let mut stack = Vec::new();
        let mut cause = error.source();
        while let Some(inner) = cause {
            stack.push(inner.to_string());
            cause = inner.source();
        }

        Self {
            name: name.into(),
            message: error.to_string(),
            stack,
        }
    }
}

impl LogValue {
    pub fn error<E: Error + 'static>(error: &E) -> Self {
        Self::Fault(ErrorReport::from_error(error))
    }

    /// For errors only known as trait objects. The report is named `Error`
    /// since the concrete type is gone.
    pub fn error_dyn(error: &(dyn Error + 'static)) -> Self {
        Self::Fault(ErrorReport::named(DYN_ERROR_NAME, error))
    }

    /// Captures any serializable value as structured data.
    pub fn serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self::Structured)
    }
}

impl From<&str> for LogValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for LogValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<serde_json::Value> for LogValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(text) => Self::Text(text),
            other => Self::Structured(other),
        }
    }
}

impl From<Box<dyn Error + Send + Sync>> for LogValue {
    fn from(error: Box<dyn Error + Send + Sync>) -> Self {
        Self::error_dyn(&*error)
    }
}

impl From<Box<dyn Error>> for LogValue {
    fn from(error: Box<dyn Error>) -> Self {
        Self::error_dyn(&*error)
    }
}

impl From<ErrorReport> for LogValue {
    fn from(report: ErrorReport) -> Self {
        Self::Fault(report)
    }
}

/// Renders a value as the message of a log event. Text passes through
/// untouched, everything else becomes pretty-printed JSON.
#[must_use]
pub fn format(value: &LogValue) -> String {
    match value {
        LogValue::Text(text) => text.clone(),
        LogValue::Structured(data) => {
            serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string())
        }
        LogValue::Fault(report) => {
            serde_json::to_string_pretty(report).unwrap_or_else(|_| report.message.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use std::fmt;

    #[derive(Debug)]
    struct ConnectionReset;

    impl fmt::Display for ConnectionReset {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "connection reset by peer")
        }
    }

    impl Error for ConnectionReset {}

    #[derive(Debug)]
    struct UploadFailed(ConnectionReset);

    impl fmt::Display for UploadFailed {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "upload failed")
        }
    }

    impl Error for UploadFailed {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_format_text_is_unchanged() {
        let value = LogValue::from("plain message");
        assert_eq!(format(&value), "plain message");
    }

    #[test]
    fn test_format_structured_is_pretty_json() {
        let value = LogValue::from(json!({"user": "ada", "attempts": 3}));
        let formatted = format(&value);

        assert!(formatted.contains('\n'));
        let parsed: serde_json::Value =
            serde_json::from_str(&formatted).expect("formatted output should be json");
        assert_eq!(parsed, json!({"user": "ada", "attempts": 3}));
    }

    #[test]
    fn test_format_json_string_is_text() {
        let value = LogValue::from(json!("already text"));
        assert_eq!(format(&value), "already text");
    }

    #[test]
    fn test_format_null_does_not_fail() {
        let value = LogValue::from(serde_json::Value::Null);
        assert_eq!(format(&value), "null");
    }

    #[test]
    fn test_format_error_report() {
        let error = UploadFailed(ConnectionReset);
        let formatted = format(&LogValue::error(&error));

        let parsed: serde_json::Value =
            serde_json::from_str(&formatted).expect("formatted output should be json");
        assert_eq!(
            parsed,
            json!({
                "name": "UploadFailed",
                "message": "upload failed",
                "stack": ["connection reset by peer"],
            })
        );
    }

    #[test]
    fn test_format_error_is_deterministic() {
        let first = format(&LogValue::error(&UploadFailed(ConnectionReset)));
        let second = format(&LogValue::error(&UploadFailed(ConnectionReset)));
        assert_eq!(first, second);
    }

    #[test]
    fn test_format_boxed_error() {
        let boxed: Box<dyn Error + Send + Sync> = Box::new(UploadFailed(ConnectionReset));
        let formatted = format(&LogValue::from(boxed));

        let parsed: serde_json::Value =
            serde_json::from_str(&formatted).expect("formatted output should be json");
        assert_eq!(
            parsed,
            json!({
                "name": "Error",
                "message": "upload failed",
                "stack": ["connection reset by peer"],
            })
        );
    }

    #[test]
    fn test_format_error_trait_object() {
        let boxed: Box<dyn Error> = Box::new(ConnectionReset);
        let by_ref = format(&LogValue::error_dyn(boxed.as_ref()));
        assert_eq!(by_ref, format(&LogValue::from(boxed)));
        assert!(by_ref.contains("\"message\": \"connection reset by peer\""));
    }

    #[test]
    fn test_serialize_struct() {
        #[derive(Serialize)]
        struct Request<'a> {
            path: &'a str,
            status: u16,
        }

        let value = LogValue::serialize(&Request {
            path: "/health",
            status: 200,
        })
        .expect("failed to serialize");
        let formatted = format(&value);
        assert!(formatted.contains("\"path\": \"/health\""));
        assert!(formatted.contains("\"status\": 200"));
    }

    proptest! {
        #[test]
        fn prop_text_round_trips(text in ".*") {
            prop_assert_eq!(format(&LogValue::Text(text.clone())), text);
        }

        #[test]
        fn prop_error_reports_are_reproducible(message in ".*", causes in proptest::collection::vec(".*", 0..4)) {
            let report = ErrorReport { name: "Fault".to_string(), message, stack: causes };
            let value = LogValue::Fault(report);
            prop_assert_eq!(format(&value), format(&value.clone()));
        }
    }
}
