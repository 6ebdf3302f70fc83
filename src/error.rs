//! Error types shared by the widget layer.
//!
//! Nothing in the widget layer is fatal. Public controller operations catch
//! these at the point of use and log them. Only startup code in the binary
//! turns them into hard failures.

use std::path::PathBuf;

use thiserror::Error;

use crate::widgets::{WidgetId, WidgetKind};

/// Failures while building or querying a [`crate::page::Page`].
#[derive(Debug, Error)]
pub enum PageError {
    #[error("invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: &'static str },
    #[error("failed to parse page description")]
    Json(#[from] serde_json::Error),
    #[error("failed to read page {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Soft failures inside the controller and observer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WidgetError {
    #[error("missing element: {0}")]
    MissingElement(String),
    #[error("unknown widget {0}")]
    UnknownWidget(WidgetId),
    #[error("widget {widget} has no child {key:?}")]
    UnknownChild { widget: WidgetId, key: String },
    #[error("widget {widget} is a {actual}, expected {expected}")]
    WrongKind {
        widget: WidgetId,
        expected: WidgetKind,
        actual: WidgetKind,
    },
    #[error("widget {widget} does not support {operation}")]
    Unsupported {
        widget: WidgetId,
        operation: &'static str,
    },
    #[error("layout measurement failed: {0}")]
    Measurement(String),
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
}

/// Failures reading or writing the preference store.
#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("preference key must not be empty")]
    EmptyKey,
    #[error("failed to access preference store {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode preferences")]
    Json(#[from] serde_json::Error),
}
