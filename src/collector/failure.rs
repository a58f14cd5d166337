// Failure details handed over by the host runner

/// What kind of problem a failed or errored test reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The runner deliberately did not execute the test
    Skip,
    /// Anything else, identified by a short name such as `AssertionError`
    Other(String),
}

impl ErrorKind {
    pub fn other(name: impl Into<String>) -> Self {
        ErrorKind::Other(name.into())
    }

    /// Identifier used when the failure carries no text
    pub fn name(&self) -> &str {
        match self {
            ErrorKind::Skip => "SkipTest",
            ErrorKind::Other(name) if name.trim().is_empty() => "Error",
            ErrorKind::Other(name) => name,
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, ErrorKind::Skip)
    }
}

/// Failure or error payload of a verdict notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureInfo {
    pub kind: ErrorKind,
    pub message: Option<String>,
}

impl FailureInfo {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    pub fn skip() -> Self {
        Self::new(ErrorKind::Skip)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Text for the report's message cell.
    ///
    /// Falls back to the kind name when the message is absent or blank, so a
    /// failing row never has an empty message.
    pub fn describe(&self) -> String {
        match self.message.as_deref() {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => self.kind.name().to_string(),
        }
    }
}
