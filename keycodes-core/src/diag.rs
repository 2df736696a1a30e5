//! Diagnostics sink threaded through compilation.
//!
//! Messages are recorded so callers (and tests) can inspect them, and are
//! forwarded to the `log` facade. Whether a warning is emitted at all is
//! decided by the caller against [`Diagnostics::level`].

use log::{error, info, warn};

/// Warning levels above this report every collision, not only same-file ones
pub const VERBOSE_LEVEL: u8 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
    /// Follow-up describing what was done about the preceding message
    Action,
    /// Internal consistency failure
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    level: u8,
    messages: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(level: u8) -> Self {
        Self {
            level,
            messages: Vec::new(),
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn set_level(&mut self, level: u8) {
        self.level = level;
    }

    /// Gate for duplicate-definition reports. Definitions from the same file
    /// are reported at any non-zero level, cross-file ones only when verbose.
    pub fn reports_collision(&self, same_file: bool) -> bool {
        (same_file && self.level > 0) || self.level > VERBOSE_LEVEL
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.push(Severity::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        error!("{}", message);
        self.push(Severity::Error, message);
    }

    pub fn action(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("    {}", message);
        self.push(Severity::Action, message);
    }

    pub fn internal(&mut self, message: impl Into<String>) {
        let message = message.into();
        error!("Internal error: {}", message);
        self.push(Severity::Internal, message);
    }

    pub fn messages(&self) -> &[Diagnostic] {
        &self.messages
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.messages.iter().filter(|d| d.severity == severity).count()
    }

    /// True if any recorded message of `severity` contains `needle`
    pub fn contains(&self, severity: Severity, needle: &str) -> bool {
        self.messages
            .iter()
            .any(|d| d.severity == severity && d.message.contains(needle))
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    fn push(&mut self, severity: Severity, message: String) {
        self.messages.push(Diagnostic { severity, message });
    }
}
