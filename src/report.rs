//! User-facing messages attached to model nodes.

use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    /// Path of the node the message is about
    pub node: String,
    pub message: String,
    pub severity: Severity,
}

/// Channel for messages shown to the model's author
pub trait MessageChannel: Send + Sync {
    fn create_message(&self, node: &str, message: &str, severity: Severity);
}

/// Forwards messages to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingChannel;

impl MessageChannel for TracingChannel {
    fn create_message(&self, node: &str, message: &str, severity: Severity) {
        match severity {
            Severity::Debug => tracing::debug!(node = %node, "{}", message),
            Severity::Info => tracing::info!(node = %node, "{}", message),
            Severity::Warning => tracing::warn!(node = %node, "{}", message),
            Severity::Error => tracing::error!(node = %node, "{}", message),
        }
    }
}

/// Stores messages for later inspection
#[derive(Debug, Default)]
pub struct CollectingChannel {
    messages: Mutex<Vec<Message>>,
}

impl CollectingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.messages.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

impl MessageChannel for CollectingChannel {
    fn create_message(&self, node: &str, message: &str, severity: Severity) {
        self.messages.lock().push(Message {
            node: node.to_string(),
            message: message.to_string(),
            severity,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_channel_keeps_order() {
        let channel = CollectingChannel::new();
        channel.create_message("/a", "first", Severity::Error);
        channel.create_message("/b", "second", Severity::Warning);

        let messages = channel.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].node, "/a");
        assert_eq!(messages[1].severity, Severity::Warning);
    }
}
