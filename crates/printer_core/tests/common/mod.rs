#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Once;
use std::time::Duration;

use printer_core::{
    Collaborators, ConfigError, ConfigStore, DispatchContext, DispatchController, HttpProbe,
    HttpResponse, NetworkError, Notifier, OperatorConsole, PathCase, PrintError, PrintSink,
    ProbeError, RegistrationError, RegistrationOutcome, RegistrationProbe, RegistrationWriter,
};
use tempfile::TempDir;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(printer_logging::initialize_for_tests);
}

/// Ordered record of every collaborator call.
#[derive(Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn with_prefix(&self, prefix: &str) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter(|entry| entry.starts_with(prefix))
            .cloned()
            .collect()
    }
}

pub struct FakeConfig {
    pub endpoint: String,
    pub reject: bool,
    pub journal: Journal,
}

impl ConfigStore for FakeConfig {
    fn test_endpoint(&self) -> String {
        self.endpoint.clone()
    }

    fn set_test_endpoint(&mut self, endpoint: &str) -> Result<(), ConfigError> {
        self.journal.push(format!("config.set {endpoint}"));
        if self.reject {
            return Err(ConfigError::Persist("disk full".to_string()));
        }
        self.endpoint = endpoint.to_string();
        Ok(())
    }
}

pub struct FakeHttp {
    pub replies: RefCell<VecDeque<Result<HttpResponse, NetworkError>>>,
    pub journal: Journal,
}

impl HttpProbe for FakeHttp {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, NetworkError> {
        self.journal
            .push(format!("http.get {url} {}s", timeout.as_secs()));
        self.replies
            .borrow_mut()
            .pop_front()
            .expect("unexpected http request")
    }
}

pub struct FakePrinter {
    pub result: Result<(), PrintError>,
    pub printed: Rc<RefCell<Vec<(PathBuf, String)>>>,
    pub journal: Journal,
}

impl PrintSink for FakePrinter {
    fn print(&self, file: &Path) -> Result<(), PrintError> {
        let content = std::fs::read_to_string(file).expect("payload readable while printing");
        self.printed
            .borrow_mut()
            .push((file.to_path_buf(), content));
        self.journal.push("printer.print");
        self.result.clone()
    }
}

pub struct FakeNotifier {
    pub journal: Journal,
}

impl Notifier for FakeNotifier {
    fn show(&self, title: &str, message: &str) {
        self.journal.push(format!("notify {title}: {message}"));
    }
}

pub struct FakeConsole {
    pub journal: Journal,
}

impl OperatorConsole for FakeConsole {
    fn report(&self, line: &str) {
        self.journal.push(format!("console {line}"));
    }

    fn wait_for_acknowledgement(&self) {
        self.journal.push("console.ack");
    }
}

pub struct FakeProbe {
    pub exists: bool,
    pub target: Result<Option<String>, ProbeError>,
    pub case: PathCase,
}

impl RegistrationProbe for FakeProbe {
    fn exists(&self) -> bool {
        self.exists
    }

    fn current_target(&self) -> Result<Option<String>, ProbeError> {
        self.target.clone()
    }

    fn path_case(&self) -> PathCase {
        self.case
    }
}

pub struct FakeWriter {
    pub result: Result<RegistrationOutcome, RegistrationError>,
    pub journal: Journal,
}

impl RegistrationWriter for FakeWriter {
    fn register(&self, executable: &str) -> Result<RegistrationOutcome, RegistrationError> {
        self.journal.push(format!("register {executable}"));
        self.result.clone()
    }
}

pub const EXECUTABLE: &str = "/opt/inventoryt-printer/bin/inventoryt-printer";

/// Builder for a controller wired entirely to fakes.
pub struct Harness {
    pub journal: Journal,
    pub printed: Rc<RefCell<Vec<(PathBuf, String)>>>,
    pub labels: TempDir,
    pub endpoint: String,
    pub reject_config: bool,
    pub replies: Vec<Result<HttpResponse, NetworkError>>,
    pub print_result: Result<(), PrintError>,
    pub exists: bool,
    pub target: Result<Option<String>, ProbeError>,
    pub case: PathCase,
    pub register_result: Result<RegistrationOutcome, RegistrationError>,
    pub executable: Option<String>,
}

impl Harness {
    pub fn new() -> Self {
        init_logging();
        Self {
            journal: Journal::default(),
            printed: Rc::default(),
            labels: TempDir::new().expect("temp dir"),
            endpoint: "https://inventory.example.com/apptest".to_string(),
            reject_config: false,
            replies: Vec::new(),
            print_result: Ok(()),
            exists: true,
            target: Ok(Some(EXECUTABLE.to_string())),
            case: PathCase::Sensitive,
            register_result: Ok(RegistrationOutcome::Registered),
            executable: Some(EXECUTABLE.to_string()),
        }
    }

    pub fn labels_dir(&self) -> PathBuf {
        self.labels.path().join("labels")
    }

    pub fn controller(&self) -> DispatchController {
        let journal = &self.journal;
        let collaborators = Collaborators {
            config: Box::new(FakeConfig {
                endpoint: self.endpoint.clone(),
                reject: self.reject_config,
                journal: journal.clone(),
            }),
            http: Box::new(FakeHttp {
                replies: RefCell::new(self.replies.iter().cloned().collect()),
                journal: journal.clone(),
            }),
            printer: Box::new(FakePrinter {
                result: self.print_result.clone(),
                printed: self.printed.clone(),
                journal: journal.clone(),
            }),
            notifier: Box::new(FakeNotifier {
                journal: journal.clone(),
            }),
            console: Box::new(FakeConsole {
                journal: journal.clone(),
            }),
            probe: Box::new(FakeProbe {
                exists: self.exists,
                target: self.target.clone(),
                case: self.case,
            }),
            writer: Box::new(FakeWriter {
                result: self.register_result.clone(),
                journal: journal.clone(),
            }),
        };
        let context = DispatchContext {
            executable: self.executable.clone(),
            labels_dir: self.labels_dir(),
        };
        DispatchController::new(context, collaborators)
    }
}

pub fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub fn ok_response(status_code: u16) -> Result<HttpResponse, NetworkError> {
    Ok(HttpResponse {
        status_code,
        body: b"ok".to_vec(),
    })
}
