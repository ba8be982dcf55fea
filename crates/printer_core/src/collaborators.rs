//! Capability seams for everything the dispatcher hands work to.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(String),
    #[error("invalid test endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("failed to serialize configuration: {0}")]
    Serialize(String),
    #[error("failed to persist configuration: {0}")]
    Persist(String),
}

/// Key-value persistence for the handful of settings the dispatcher reads.
pub trait ConfigStore {
    fn test_endpoint(&self) -> String;
    fn set_test_endpoint(&mut self, endpoint: &str) -> Result<(), ConfigError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status_code: u16,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkFailureKind {
    HostUnreachable,
    ConnectionRefused,
    Timeout,
    InvalidUrl,
    Other,
}

impl fmt::Display for NetworkFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkFailureKind::HostUnreachable => write!(f, "host unreachable"),
            NetworkFailureKind::ConnectionRefused => write!(f, "connection refused"),
            NetworkFailureKind::Timeout => write!(f, "timeout"),
            NetworkFailureKind::InvalidUrl => write!(f, "invalid url"),
            NetworkFailureKind::Other => write!(f, "network error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct NetworkError {
    pub kind: NetworkFailureKind,
    pub message: String,
}

impl NetworkError {
    pub fn new(kind: NetworkFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Operator-facing hint for the failure, when one is known.
    pub fn hint(&self) -> Option<&'static str> {
        match self.kind {
            NetworkFailureKind::HostUnreachable => {
                Some("Internet connection might be down or DNS resolution failed")
            }
            NetworkFailureKind::ConnectionRefused => Some("Server is not accepting connections"),
            NetworkFailureKind::Timeout => {
                Some("Connection timed out - server might be slow or unreachable")
            }
            NetworkFailureKind::InvalidUrl => {
                Some("The configured test endpoint is not a valid URL")
            }
            NetworkFailureKind::Other => None,
        }
    }
}

pub trait HttpProbe {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, NetworkError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrintError {
    #[error("access denied: {0}")]
    AccessDenied(String),
    #[error("print failed: {0}")]
    Failed(String),
    #[error("printing is not supported on this platform")]
    Unsupported,
}

/// Hands a payload file to the local spooler.
pub trait PrintSink {
    fn print(&self, file: &Path) -> Result<(), PrintError>;
}

/// Desktop notification. Best effort; implementations swallow their errors.
pub trait Notifier {
    fn show(&self, title: &str, message: &str);
}

/// The console the operator may be looking at.
pub trait OperatorConsole {
    fn report(&self, line: &str);
    /// Blocks until the operator acknowledges.
    fn wait_for_acknowledgement(&self);
}
