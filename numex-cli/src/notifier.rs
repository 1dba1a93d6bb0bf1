//! User-facing notifications on stderr
//!
//! Three severities gated by the configured [`NotificationLevel`]: info only at `all`, warnings
//! and errors at `all` and `important`, nothing at `silent`. Every notification is also traced
//! at debug level, whatever the setting.

use numex_config::NotificationLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl Severity {
    fn prefix(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warn => "warning",
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Notifier {
    level: NotificationLevel,
}

impl Notifier {
    pub fn new(level: NotificationLevel) -> Self {
        Notifier { level }
    }

    pub fn allows(&self, severity: Severity) -> bool {
        match self.level {
            NotificationLevel::All => true,
            NotificationLevel::Important => severity != Severity::Info,
            NotificationLevel::Silent => false,
        }
    }

    pub fn info(&self, message: &str) {
        self.emit(Severity::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.emit(Severity::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.emit(Severity::Error, message);
    }

    fn emit(&self, severity: Severity, message: &str) {
        tracing::debug!(severity = severity.prefix(), text = message, "notification");
        if self.allows(severity) {
            eprintln!("{}: {}", severity.prefix(), message);
        }
    }
}
