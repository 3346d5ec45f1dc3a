// SPDX-License-Identifier: GPL-3.0-only
use std::fmt;

/// Semantic error reported by the store service, stripped of its transport envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    /// Remote error name (e.g. `io.FuriOS.AndroidStore.Error.NotFound`), if the service sent one
    pub name: Option<String>,

    /// Human readable message
    pub message: String,
}

impl RemoteError {
    pub fn new(name: Option<String>, message: impl Into<String>) -> Self {
        Self {
            name,
            message: message.into(),
        }
    }

    /// Build a remote error from a message that may still carry a `GDBus.Error:<name>: ` prefix
    pub fn from_message(raw: &str) -> Self {
        match raw.strip_prefix("GDBus.Error:") {
            Some(rest) => match rest.split_once(": ") {
                Some((name, message)) => Self::new(Some(name.to_string()), message),
                None => Self::new(None, rest),
            },
            None => Self::new(None, raw),
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for RemoteError {}

#[derive(thiserror::Error, Debug)]
pub enum PluginError {
    #[error("Store service is not connected")]
    NotConnected,

    #[error("Failed to connect to store service: {0}")]
    Connection(#[source] RemoteError),

    #[error("{0}")]
    Remote(#[from] RemoteError),

    #[error("{0}")]
    NotSupported(String),

    #[error("Failed to decode search results: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Operation was cancelled")]
    Cancelled,

    #[error("{0}")]
    Failed(String),
}

impl PluginError {
    pub fn not_supported(message: impl Into<String>) -> Self {
        Self::NotSupported(message.into())
    }

    pub fn is_not_supported(&self) -> bool {
        matches!(self, Self::NotSupported(_))
    }
}

pub type PluginResult<T> = Result<T, PluginError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_display_hides_name() {
        let err = RemoteError::new(
            Some("io.FuriOS.AndroidStore.Error.Failed".to_string()),
            "Package not found",
        );
        assert_eq!(err.to_string(), "Package not found");
    }

    #[test]
    fn test_remote_error_strips_gdbus_prefix() {
        let err = RemoteError::from_message(
            "GDBus.Error:io.FuriOS.AndroidStore.Error.Failed: Download failed",
        );
        assert_eq!(err.name.as_deref(), Some("io.FuriOS.AndroidStore.Error.Failed"));
        assert_eq!(err.message, "Download failed");
    }

    #[test]
    fn test_remote_error_plain_message() {
        let err = RemoteError::from_message("Connection reset");
        assert_eq!(err.name, None);
        assert_eq!(err.message, "Connection reset");
    }

    #[test]
    fn test_plugin_error_remote_is_unwrapped() {
        let err = PluginError::from(RemoteError::new(Some("x.Error".to_string()), "boom"));
        assert_eq!(err.to_string(), "boom");
    }
}
