//! Top-level orchestration for one process invocation.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use printer_logging::{printer_debug, printer_error, printer_info, printer_warn};
use url::Url;

use crate::collaborators::{
    ConfigStore, HttpProbe, NetworkError, Notifier, OperatorConsole, PrintError, PrintSink,
};
use crate::label::format_label;
use crate::notification::NotificationOutcome;
use crate::payload::TransientPayload;
use crate::registration::{
    RegistrationError, RegistrationOutcome, RegistrationProbe, RegistrationWriter,
};
use crate::request::{has_scheme_prefix, ActivationRequest, SCHEME_PREFIX};
use crate::Command;

/// Upper bound for each connectivity-test request.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Values resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchContext {
    /// Absolute path of the running executable; `None` if it could not be resolved.
    pub executable: Option<String>,
    /// Directory that receives transient label payloads.
    pub labels_dir: PathBuf,
}

pub struct Collaborators {
    pub config: Box<dyn ConfigStore>,
    pub http: Box<dyn HttpProbe>,
    pub printer: Box<dyn PrintSink>,
    pub notifier: Box<dyn Notifier>,
    pub console: Box<dyn OperatorConsole>,
    pub probe: Box<dyn RegistrationProbe>,
    pub writer: Box<dyn RegistrationWriter>,
}

/// How an invocation ended. Both variants are terminal for the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Notified(NotificationOutcome),
    /// Registration was handed to an elevated copy of the process; exit now.
    ElevationRequested,
}

pub struct DispatchController {
    context: DispatchContext,
    collaborators: Collaborators,
}

impl DispatchController {
    pub fn new(context: DispatchContext, collaborators: Collaborators) -> Self {
        Self {
            context,
            collaborators,
        }
    }

    /// `args` excludes the program name.
    pub fn run(&mut self, args: &[String]) -> RunOutcome {
        match args.first() {
            Some(arg) if has_scheme_prefix(arg) => {
                printer_info!("Received activation: {}", arg);
                let outcome = self.route(arg);
                self.notify(outcome)
            }
            Some(arg) => {
                printer_warn!(
                    "Argument {:?} does not start with {}; checking registration instead",
                    arg,
                    SCHEME_PREFIX
                );
                self.ensure_registered()
            }
            None => self.ensure_registered(),
        }
    }

    fn route(&mut self, raw: &str) -> NotificationOutcome {
        let request = match ActivationRequest::parse(raw) {
            Ok(request) => request,
            Err(err) => {
                printer_error!("{}", err);
                return NotificationOutcome::new("Error", format!("Failed to parse URL: {err}"));
            }
        };
        printer_debug!(
            "Parsed activation host={:?} path={:?}",
            request.host(),
            request.path()
        );

        match request.command() {
            Command::Test => self.run_test(),
            Command::Config { url } => self.run_config(url),
            Command::Print { item_id, item_name } => self.run_print(&item_id, &item_name),
            Command::Unknown => {
                printer_warn!("Unrecognized activation {}", raw);
                NotificationOutcome::new("Unknown Command", "Nothing was done for this request")
            }
        }
    }

    fn run_test(&self) -> NotificationOutcome {
        let endpoint = self.collaborators.config.test_endpoint();
        printer_info!("Testing connection to: {}", endpoint);

        let failure = match self.probe_endpoint(&endpoint) {
            Ok(()) => return test_succeeded(),
            Err(failure) => failure,
        };

        let failure = match insecure_fallback(&endpoint) {
            Some(fallback) => {
                printer_warn!(
                    "Secure endpoint failed ({}); retrying once at {}",
                    failure,
                    fallback
                );
                match self.probe_endpoint(&fallback) {
                    Ok(()) => return test_succeeded(),
                    Err(failure) => failure,
                }
            }
            None => failure,
        };

        printer_error!("Connection test failed: {}", failure);
        let console = &self.collaborators.console;
        console.report(&failure.to_string());
        if let Some(hint) = failure.hint() {
            console.report(hint);
        }
        console.report("Press Enter to continue...");
        console.wait_for_acknowledgement();

        NotificationOutcome::new("Test Failed", format!("Connection test failed: {failure}"))
    }

    fn probe_endpoint(&self, endpoint: &str) -> Result<(), TestFailure> {
        let response = self
            .collaborators
            .http
            .get(endpoint, TEST_TIMEOUT)
            .map_err(TestFailure::Network)?;
        if response.status_code != 200 {
            return Err(TestFailure::Status(response.status_code));
        }
        printer_info!("Server responded with status: {}", response.status_code);
        Ok(())
    }

    fn run_config(&mut self, url: Option<String>) -> NotificationOutcome {
        let Some(url) = url else {
            printer_error!("Config activation without a url parameter");
            return NotificationOutcome::new(
                "Config Error",
                format!("Usage: {SCHEME_PREFIX}config?url=<endpoint>"),
            );
        };

        match self.collaborators.config.set_test_endpoint(&url) {
            Ok(()) => {
                printer_info!("Test endpoint updated to {}", url);
                NotificationOutcome::new("Config Updated", format!("Test endpoint set to {url}"))
            }
            Err(err) => {
                printer_error!("Failed to update configuration: {}", err);
                NotificationOutcome::new(
                    "Config Error",
                    format!("Failed to update configuration: {err}"),
                )
            }
        }
    }

    fn run_print(&self, item_id: &str, item_name: &str) -> NotificationOutcome {
        printer_info!("Processing print request id={:?} name={:?}", item_id, item_name);
        let content = format_label(item_id, item_name);
        let payload =
            match TransientPayload::create(&self.context.labels_dir, item_id, &content) {
                Ok(payload) => payload,
                Err(err) => {
                    printer_error!("Failed to create label file: {}", err);
                    return NotificationOutcome::new(
                        "Print Error",
                        format!("Failed to create file: {err}"),
                    );
                }
            };

        let result = self.collaborators.printer.print(payload.path());
        let path = payload.path().to_path_buf();
        if let Err(err) = payload.remove() {
            printer_warn!("Failed to clean up temporary file {:?}: {}", path, err);
        }

        match result {
            Ok(()) => {
                printer_info!("Successfully printed label for {}", item_name);
                NotificationOutcome::new(
                    "Print Success",
                    format!("Successfully printed label for {item_name}"),
                )
            }
            Err(PrintError::AccessDenied(detail)) => {
                printer_error!("Access denied while printing: {}", detail);
                NotificationOutcome::new(
                    "Print Error",
                    "Access denied. Please run the application with elevated privileges.",
                )
            }
            Err(err) => {
                printer_error!("{}", err);
                NotificationOutcome::new("Print Error", capitalize(&err.to_string()))
            }
        }
    }

    fn ensure_registered(&self) -> RunOutcome {
        let probe = &self.collaborators.probe;
        printer_debug!("Registration state: {:?}", probe.state());
        if !probe.exists() {
            printer_info!("Protocol handler not registered; registering");
            return self.register(NotificationOutcome::initialized());
        }
        if probe.needs_update(self.context.executable.as_deref()) {
            printer_info!("Protocol handler points elsewhere; updating");
            return self.register(NotificationOutcome::path_updated());
        }
        self.notify(NotificationOutcome::already_registered())
    }

    fn register(&self, on_success: NotificationOutcome) -> RunOutcome {
        let result = match self.context.executable.as_deref() {
            Some(executable) => self.collaborators.writer.register(executable),
            None => Err(RegistrationError::ExecutableUnknown),
        };
        let outcome = match result {
            Ok(RegistrationOutcome::Registered) => on_success,
            Ok(RegistrationOutcome::DelegatedToElevated) => {
                printer_info!("Registration delegated to an elevated process");
                return RunOutcome::ElevationRequested;
            }
            Ok(RegistrationOutcome::Unsupported) => NotificationOutcome::registration_unsupported(),
            Err(err) => {
                printer_error!("Registration failed: {}", err);
                NotificationOutcome::new(
                    "Registration Error",
                    format!("Failed to register protocol handler: {err}"),
                )
            }
        };
        self.notify(outcome)
    }

    fn notify(&self, outcome: NotificationOutcome) -> RunOutcome {
        if outcome.is_error() {
            printer_error!("Notification: {} - {}", outcome.title, outcome.message);
        } else {
            printer_info!("Notification: {} - {}", outcome.title, outcome.message);
        }
        self.collaborators
            .notifier
            .show(&outcome.title, &outcome.message);
        RunOutcome::Notified(outcome)
    }
}

#[derive(Debug)]
enum TestFailure {
    Network(NetworkError),
    Status(u16),
}

impl TestFailure {
    fn hint(&self) -> Option<&'static str> {
        match self {
            TestFailure::Network(err) => err.hint(),
            TestFailure::Status(_) => None,
        }
    }
}

impl fmt::Display for TestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestFailure::Network(err) => write!(f, "Network error: {err}"),
            TestFailure::Status(code) => write!(f, "Server returned error status: {code}"),
        }
    }
}

fn test_succeeded() -> NotificationOutcome {
    printer_info!("Connection test successful");
    NotificationOutcome::new("Test Success", "Connection test successful")
}

/// `http://` twin of an `https://` endpoint; `None` for anything else.
fn insecure_fallback(endpoint: &str) -> Option<String> {
    let mut url = Url::parse(endpoint).ok()?;
    if url.scheme() != "https" {
        return None;
    }
    url.set_scheme("http").ok()?;
    Some(url.to_string())
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
