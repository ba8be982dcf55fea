//! `HKLM\SOFTWARE\Classes\<scheme>` written through PowerShell.

use std::fs::OpenOptions;
use std::rc::Rc;

use printer_core::{
    PathCase, ProbeError, RegistrationError, RegistrationOutcome, RegistrationProbe,
    RegistrationWriter,
};
use printer_logging::{printer_info, printer_warn};

use crate::platform::{powershell_args, ps_quote, POWERSHELL};
use crate::runner::ProcessRunner;

pub const PROTOCOL_KEY: &str = r"HKLM:\SOFTWARE\Classes\inventoryt-printer";
pub const COMMAND_KEY: &str = r"HKLM:\SOFTWARE\Classes\inventoryt-printer\shell\open\command";
const PROTOCOL_DESCRIPTION: &str = "URL:Inventory Printer Protocol";

/// Default value of the open command key: `"<exe>" "%1"`.
pub fn command_value(executable: &str) -> String {
    format!("\"{executable}\" \"%1\"")
}

/// Executable path from an open-command value, without quotes or the `%1`
/// placeholder.
pub fn parse_open_command(value: &str) -> Option<String> {
    let mut command = value.trim();
    for placeholder in ["\"%1\"", "%1"] {
        if let Some(stripped) = command.strip_suffix(placeholder) {
            command = stripped.trim_end();
            break;
        }
    }
    let path = command.trim_matches('"').trim();
    (!path.is_empty()).then(|| path.to_string())
}

pub struct WindowsRegistryProbe {
    runner: Rc<dyn ProcessRunner>,
}

impl WindowsRegistryProbe {
    pub fn new(runner: Rc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }
}

impl RegistrationProbe for WindowsRegistryProbe {
    fn exists(&self) -> bool {
        let script = format!("Test-Path -Path {}", ps_quote(PROTOCOL_KEY));
        match self.runner.run(POWERSHELL, &powershell_args(&script)) {
            Ok(output) => output.success && output.stdout.trim() == "True",
            Err(err) => {
                printer_warn!("Could not query registry: {}", err);
                false
            }
        }
    }

    fn current_target(&self) -> Result<Option<String>, ProbeError> {
        let script = format!(
            "(Get-ItemProperty -Path {}).'(Default)'",
            ps_quote(COMMAND_KEY)
        );
        let output = self
            .runner
            .run(POWERSHELL, &powershell_args(&script))
            .map_err(|err| ProbeError::Unreadable(err.to_string()))?;
        if !output.success {
            return Err(ProbeError::Unreadable(format!(
                "{} exited with {}: {}",
                POWERSHELL,
                output.describe_status(),
                output.combined()
            )));
        }
        Ok(parse_open_command(&output.stdout))
    }

    fn path_case(&self) -> PathCase {
        PathCase::Insensitive
    }
}

/// Administrator check and elevated re-launch.
pub trait Elevation {
    fn is_elevated(&self) -> bool;
    /// Starts an elevated copy of `executable` without waiting for it.
    fn relaunch_elevated(&self, executable: &str) -> Result<(), RegistrationError>;
}

pub struct SystemElevation {
    runner: Rc<dyn ProcessRunner>,
}

impl SystemElevation {
    pub fn new(runner: Rc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }
}

impl Elevation for SystemElevation {
    fn is_elevated(&self) -> bool {
        // Only administrators may open the raw disk device.
        OpenOptions::new()
            .read(true)
            .open(r"\\.\PHYSICALDRIVE0")
            .is_ok()
    }

    fn relaunch_elevated(&self, executable: &str) -> Result<(), RegistrationError> {
        let mut script = format!(
            "Start-Process -FilePath {} -Verb RunAs",
            ps_quote(executable)
        );
        if let Ok(cwd) = std::env::current_dir() {
            script.push_str(&format!(
                " -WorkingDirectory {}",
                ps_quote(&cwd.display().to_string())
            ));
        }
        let output = self
            .runner
            .run(POWERSHELL, &powershell_args(&script))
            .map_err(|err| RegistrationError::Elevation(err.to_string()))?;
        if !output.success {
            return Err(RegistrationError::Elevation(output.combined()));
        }
        Ok(())
    }
}

pub struct WindowsRegistryWriter {
    runner: Rc<dyn ProcessRunner>,
    elevation: Box<dyn Elevation>,
}

impl WindowsRegistryWriter {
    pub fn new(runner: Rc<dyn ProcessRunner>, elevation: Box<dyn Elevation>) -> Self {
        Self { runner, elevation }
    }
}

impl RegistrationWriter for WindowsRegistryWriter {
    fn register(&self, executable: &str) -> Result<RegistrationOutcome, RegistrationError> {
        if !self.elevation.is_elevated() {
            printer_info!("Registry write needs administrator rights; relaunching elevated");
            self.elevation.relaunch_elevated(executable)?;
            return Ok(RegistrationOutcome::DelegatedToElevated);
        }

        let output = self
            .runner
            .run(POWERSHELL, &powershell_args(&registration_script(executable)))
            .map_err(|err| RegistrationError::Registry(err.to_string()))?;
        if !output.success {
            return Err(RegistrationError::Registry(format!(
                "{}: {}",
                output.describe_status(),
                output.combined()
            )));
        }
        printer_info!("Windows protocol handler registered for {}", executable);
        Ok(RegistrationOutcome::Registered)
    }
}

fn registration_script(executable: &str) -> String {
    let protocol_key = ps_quote(PROTOCOL_KEY);
    let command_key = ps_quote(COMMAND_KEY);
    [
        "$ErrorActionPreference = 'Stop'".to_string(),
        format!("New-Item -Path {protocol_key} -Force | Out-Null"),
        format!(
            "Set-ItemProperty -Path {protocol_key} -Name '(Default)' -Value {}",
            ps_quote(PROTOCOL_DESCRIPTION)
        ),
        format!("Set-ItemProperty -Path {protocol_key} -Name 'URL Protocol' -Value ''"),
        format!("New-Item -Path {command_key} -Force | Out-Null"),
        format!(
            "Set-ItemProperty -Path {command_key} -Name '(Default)' -Value {}",
            ps_quote(&command_value(executable))
        ),
    ]
    .join("\n")
}
