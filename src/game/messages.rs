//! # Player Messages
//!
//! Player-facing feedback is pushed through an injected [`MessageSink`] rather than a
//! global log, so generation and visibility code never touch presentation state.

use crate::config::MESSAGE_LOG_CAPACITY;
use std::collections::VecDeque;

/// Receiver for player-facing messages.
pub trait MessageSink {
    /// Records one message.
    fn log(&mut self, message: String);
}

/// Bounded log keeping the most recent messages, oldest first.
#[derive(Debug, Clone)]
pub struct MessageLog {
    messages: VecDeque<String>,
    capacity: usize,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::with_capacity(MESSAGE_LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.messages.back().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageSink for MessageLog {
    fn log(&mut self, message: String) {
        if self.capacity == 0 {
            return;
        }
        while self.messages.len() >= self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }
}

/// Sink that drops every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl MessageSink for NullSink {
    fn log(&mut self, _message: String) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_log_keeps_most_recent() {
        let mut log = MessageLog::with_capacity(3);
        for i in 0..5 {
            log.log(format!("message {i}"));
        }
        assert_eq!(log.len(), 3);
        let kept: Vec<&str> = log.messages().collect();
        assert_eq!(kept, vec!["message 2", "message 3", "message 4"]);
        assert_eq!(log.last(), Some("message 4"));
    }

    #[test]
    fn test_default_capacity() {
        let mut log = MessageLog::default();
        for i in 0..(MESSAGE_LOG_CAPACITY + 10) {
            log.log(i.to_string());
        }
        assert_eq!(log.len(), MESSAGE_LOG_CAPACITY);
    }
}
