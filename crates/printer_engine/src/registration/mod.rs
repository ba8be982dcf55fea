//! Scheme-handler registration backends, one per platform.
mod linux;
mod unsupported;
mod windows;

use std::path::PathBuf;
use std::rc::Rc;

use printer_core::{RegistrationProbe, RegistrationWriter};

use crate::platform::Platform;
use crate::runner::ProcessRunner;

pub use linux::{
    applications_dir, desktop_entry, DesktopEntryProbe, DesktopEntryWriter, DESKTOP_FILE,
};
pub use unsupported::{UnsupportedProbe, UnsupportedWriter};
pub use windows::{
    command_value, parse_open_command, Elevation, SystemElevation, WindowsRegistryProbe,
    WindowsRegistryWriter, COMMAND_KEY, PROTOCOL_KEY,
};

pub struct RegistrationBackends {
    pub probe: Box<dyn RegistrationProbe>,
    pub writer: Box<dyn RegistrationWriter>,
}

/// Picks the probe/writer pair for `platform`.
pub fn registration_backends(
    platform: Platform,
    runner: Rc<dyn ProcessRunner>,
) -> RegistrationBackends {
    match platform {
        Platform::Windows => RegistrationBackends {
            probe: Box::new(WindowsRegistryProbe::new(runner.clone())),
            writer: Box::new(WindowsRegistryWriter::new(
                runner.clone(),
                Box::new(SystemElevation::new(runner)),
            )),
        },
        Platform::Linux => {
            let dir = applications_dir()
                .unwrap_or_else(|| PathBuf::from(".local/share/applications"));
            RegistrationBackends {
                probe: Box::new(DesktopEntryProbe::new(dir.join(DESKTOP_FILE))),
                writer: Box::new(DesktopEntryWriter::new(dir, runner)),
            }
        }
        Platform::Unsupported => RegistrationBackends {
            probe: Box::new(UnsupportedProbe),
            writer: Box::new(UnsupportedWriter),
        },
    }
}
