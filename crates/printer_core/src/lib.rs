//! Printer core: activation routing, registration seams and dispatch.
mod collaborators;
mod command;
mod dispatch;
mod label;
mod notification;
mod payload;
mod registration;
mod request;

pub use collaborators::{
    ConfigError, ConfigStore, HttpProbe, HttpResponse, NetworkError, NetworkFailureKind, Notifier,
    OperatorConsole, PrintError, PrintSink,
};
pub use command::{classify, Command};
pub use dispatch::{Collaborators, DispatchContext, DispatchController, RunOutcome, TEST_TIMEOUT};
pub use label::format_label;
pub use notification::{NotificationOutcome, SERVICE_TITLE};
pub use payload::TransientPayload;
pub use registration::{
    PathCase, ProbeError, RegistrationError, RegistrationOutcome, RegistrationProbe,
    RegistrationState, RegistrationWriter,
};
pub use request::{has_scheme_prefix, ActivationRequest, ParseError, SCHEME, SCHEME_PREFIX};
