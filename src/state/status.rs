//! Operator-facing notifications.

use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self { level: StatusLevel::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { level: StatusLevel::Error, text: text.into() }
    }
}

/// Fire-and-forget notification sink.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);

    fn notify(&self, message: &StatusMessage) {
        match message.level {
            StatusLevel::Success => self.success(&message.text),
            StatusLevel::Error => self.error(&message.text),
        }
    }
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        log::info!("{message}");
    }

    fn error(&self, message: &str) {
        log::error!("{message}");
    }
}

/// Keeps every notification in order, most recent last.
#[derive(Debug, Default)]
pub struct StatusLog {
    messages: Mutex<Vec<StatusMessage>>,
}

impl StatusLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<StatusMessage> {
        self.messages.lock().clone()
    }

    pub fn last(&self) -> Option<StatusMessage> {
        self.messages.lock().last().cloned()
    }

    pub fn clear(&self) {
        self.messages.lock().clear();
    }
}

impl Notifier for StatusLog {
    fn success(&self, message: &str) {
        self.messages.lock().push(StatusMessage::success(message));
    }

    fn error(&self, message: &str) {
        self.messages.lock().push(StatusMessage::error(message));
    }
}
