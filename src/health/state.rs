//! Status definitions shared by the evaluator, the emitter and the exit path

use std::fmt;

/// Severity of a single check or of the whole run
///
/// Wire codes follow the usual monitoring plugin convention
/// (0 = OK, 1 = WARNING, 2 = CRITICAL, 3 = UNKNOWN).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Status {
    /// Numeric code sent to the event intake and used as process exit code
    pub fn code(self) -> u8 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
            Status::Unknown => 3,
        }
    }

    /// Upper-case severity word used in event output and the summary line
    pub fn label(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        }
    }

    /// Ordering used when folding results: OK < WARNING < UNKNOWN < CRITICAL
    fn rank(self) -> u8 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Unknown => 2,
            Status::Critical => 3,
        }
    }

    /// Return whichever of the two statuses is more severe
    pub fn worst(self, other: Status) -> Status {
        if other.rank() > self.rank() {
            other
        } else {
            self
        }
    }

    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one named condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    /// Event name, e.g. `mysql-slave-lag`
    pub name: &'static str,
    pub status: Status,
    /// Human readable message, without the severity prefix
    pub message: String,
}

impl CheckResult {
    pub fn ok(name: &'static str, message: impl Into<String>) -> Self {
        Self::new(name, Status::Ok, message)
    }

    pub fn warning(name: &'static str, message: impl Into<String>) -> Self {
        Self::new(name, Status::Warning, message)
    }

    pub fn critical(name: &'static str, message: impl Into<String>) -> Self {
        Self::new(name, Status::Critical, message)
    }

    pub fn unknown(name: &'static str, message: impl Into<String>) -> Self {
        Self::new(name, Status::Unknown, message)
    }

    fn new(name: &'static str, status: Status, message: impl Into<String>) -> Self {
        Self {
            name,
            status,
            message: message.into(),
        }
    }
}

/// Overall result of a run, reported once on stdout and via the exit code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: Status,
    pub message: String,
}

impl Outcome {
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Process exit code for this outcome
    pub fn exit_code(&self) -> u8 {
        self.status.code()
    }
}
