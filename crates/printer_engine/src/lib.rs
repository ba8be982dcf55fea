//! Printer engine: OS-facing implementations of the core's capability seams.
mod config;
mod console;
mod http;
mod notify;
mod persist;
mod platform;
mod print;
mod registration;
mod runner;

pub use config::{AppConfig, JsonConfigStore};
pub use console::StdioConsole;
pub use http::ReqwestProbe;
pub use notify::DesktopNotifier;
pub use persist::{ensure_dir, AtomicFileWriter, PersistError};
pub use platform::Platform;
pub use print::SpoolerPrintSink;
pub use registration::{
    applications_dir, command_value, desktop_entry, parse_open_command, registration_backends,
    DesktopEntryProbe, DesktopEntryWriter, Elevation, RegistrationBackends, SystemElevation,
    UnsupportedProbe, UnsupportedWriter, WindowsRegistryProbe, WindowsRegistryWriter,
    COMMAND_KEY, DESKTOP_FILE, PROTOCOL_KEY,
};
pub use runner::{CommandOutput, ProcessRunner, RunnerError, SystemRunner};
