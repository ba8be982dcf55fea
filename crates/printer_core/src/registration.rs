//! Scheme-handler registration seams.
//!
//! Platform backends implement [`RegistrationProbe`] and
//! [`RegistrationWriter`]; the dispatcher only ever sees these traits.

use printer_logging::printer_warn;
use thiserror::Error;

/// How two filesystem paths are compared on a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathCase {
    Sensitive,
    Insensitive,
}

impl PathCase {
    pub fn same(self, left: &str, right: &str) -> bool {
        match self {
            PathCase::Sensitive => left == right,
            PathCase::Insensitive => left
                .chars()
                .flat_map(char::to_lowercase)
                .eq(right.chars().flat_map(char::to_lowercase)),
        }
    }
}

/// Snapshot of the OS registration, recomputed on every run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistrationState {
    pub exists: bool,
    pub current_target_path: Option<String>,
}

impl RegistrationState {
    pub fn needs_update(&self, executable: &str, case: PathCase) -> bool {
        self.exists
            && !self
                .current_target_path
                .as_deref()
                .is_some_and(|target| case.same(target, executable))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("registration could not be read: {0}")]
    Unreadable(String),
}

pub trait RegistrationProbe {
    fn exists(&self) -> bool;

    /// Executable the OS currently launches for the scheme, if any.
    fn current_target(&self) -> Result<Option<String>, ProbeError>;

    fn path_case(&self) -> PathCase;

    /// `executable` is `None` when the running binary's path could not be
    /// resolved. Any probing failure counts as stale.
    fn needs_update(&self, executable: Option<&str>) -> bool {
        let Some(executable) = executable else {
            printer_warn!("Executable path unknown; assuming registration is stale");
            return true;
        };
        match self.current_target() {
            Ok(current_target_path) => RegistrationState {
                exists: true,
                current_target_path,
            }
            .needs_update(executable, self.path_case()),
            Err(err) => {
                printer_warn!("Assuming registration is stale: {}", err);
                true
            }
        }
    }

    fn state(&self) -> RegistrationState {
        let exists = self.exists();
        let current_target_path = if exists {
            self.current_target().ok().flatten()
        } else {
            None
        };
        RegistrationState {
            exists,
            current_target_path,
        }
    }
}

/// Result of a registration attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Registered,
    /// An elevated copy of the process was launched to do the write. The
    /// current process must exit without touching the registration.
    DelegatedToElevated,
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("failed to create directory {path}: {message}")]
    CreateDirectory { path: String, message: String },
    #[error("failed to write registration entry {path}: {message}")]
    WriteEntry { path: String, message: String },
    #[error("failed to register MIME handler: {0}")]
    MimeRegistration(String),
    #[error("failed to write registry keys: {0}")]
    Registry(String),
    #[error("failed to request elevation: {0}")]
    Elevation(String),
    #[error("executable path unavailable")]
    ExecutableUnknown,
}

pub trait RegistrationWriter {
    fn register(&self, executable: &str) -> Result<RegistrationOutcome, RegistrationError>;
}
