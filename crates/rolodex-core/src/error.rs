use std::fmt;

/// Machine-readable error codes for script-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigReadFailed,
    ConfigParseError,
    InvalidBaseUrl,
    NetworkFailure,
    InvalidResponse,
    ValidationRejected,
    DeletionFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigReadFailed => "E1001",
            Self::ConfigParseError => "E1002",
            Self::InvalidBaseUrl => "E1003",
            Self::NetworkFailure => "E2001",
            Self::InvalidResponse => "E2002",
            Self::ValidationRejected => "E3001",
            Self::DeletionFailed => "E3002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigReadFailed => "Config file could not be read",
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidBaseUrl => "Invalid API base URL",
            Self::NetworkFailure => "Contact service unreachable or failed",
            Self::InvalidResponse => "Contact service sent an unexpected response",
            Self::ValidationRejected => "Contact service rejected the contact",
            Self::DeletionFailed => "Contact could not be deleted",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to the user.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigReadFailed => Some("Check the --config path and its permissions."),
            Self::ConfigParseError => Some("Fix the TOML syntax in the rolodex config file."),
            Self::InvalidBaseUrl => {
                Some("Use an absolute http(s) URL, e.g. http://127.0.0.1:3000/api.")
            }
            Self::NetworkFailure => {
                Some("Check that the contact service is running and ROLODEX_API_URL is right.")
            }
            Self::InvalidResponse => Some("Check that the base URL points at the contacts API."),
            Self::ValidationRejected => Some("Correct the fields named in the message and retry."),
            Self::DeletionFailed => Some("Refresh the list; the contact may already be gone."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
