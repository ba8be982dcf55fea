//! `~/.local/share/applications/<scheme>.desktop` plus `xdg-mime`.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use printer_core::{
    PathCase, ProbeError, RegistrationError, RegistrationOutcome, RegistrationProbe,
    RegistrationWriter, SCHEME,
};
use printer_logging::printer_info;

use crate::persist::AtomicFileWriter;
use crate::runner::ProcessRunner;

pub const DESKTOP_FILE: &str = "inventoryt-printer.desktop";

pub fn applications_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".local").join("share").join("applications"))
}

pub fn desktop_entry(executable: &str) -> String {
    format!(
        "[Desktop Entry]
Name=Inventory Printer
Exec={executable} %u
Type=Application
Terminal=false
Categories=Application;
MimeType=x-scheme-handler/{SCHEME};
"
    )
}

pub struct DesktopEntryProbe {
    entry: PathBuf,
}

impl DesktopEntryProbe {
    pub fn new(entry: PathBuf) -> Self {
        Self { entry }
    }
}

impl RegistrationProbe for DesktopEntryProbe {
    fn exists(&self) -> bool {
        // An entry we cannot stat still counts; reading it later fails and
        // marks it stale.
        self.entry.try_exists().unwrap_or(true)
    }

    fn current_target(&self) -> Result<Option<String>, ProbeError> {
        let content = fs::read_to_string(&self.entry).map_err(|err| {
            ProbeError::Unreadable(format!("{}: {}", self.entry.display(), err))
        })?;
        Ok(content
            .lines()
            .find_map(|line| line.strip_prefix("Exec="))
            .and_then(|exec| exec.split(' ').next())
            .filter(|target| !target.is_empty())
            .map(ToOwned::to_owned))
    }

    fn path_case(&self) -> PathCase {
        PathCase::Sensitive
    }
}

pub struct DesktopEntryWriter {
    applications_dir: PathBuf,
    runner: Rc<dyn ProcessRunner>,
}

impl DesktopEntryWriter {
    pub fn new(applications_dir: PathBuf, runner: Rc<dyn ProcessRunner>) -> Self {
        Self {
            applications_dir,
            runner,
        }
    }

    fn write_entry(&self, executable: &str) -> Result<PathBuf, RegistrationError> {
        let entry = self.applications_dir.join(DESKTOP_FILE);
        let write_error = |message: String| RegistrationError::WriteEntry {
            path: entry.display().to_string(),
            message,
        };
        let written = AtomicFileWriter::new(self.applications_dir.clone())
            .write(DESKTOP_FILE, &desktop_entry(executable))
            .map_err(|err| write_error(err.to_string()))?;
        make_executable(&written).map_err(|err| write_error(err.to_string()))?;
        Ok(written)
    }

    fn register_mime_handler(&self) -> Result<(), RegistrationError> {
        let args = vec![
            "default".to_string(),
            DESKTOP_FILE.to_string(),
            format!("x-scheme-handler/{SCHEME}"),
        ];
        let output = self
            .runner
            .run("xdg-mime", &args)
            .map_err(|err| RegistrationError::MimeRegistration(err.to_string()))?;
        if !output.success {
            let detail = output.combined();
            let mut message = format!("xdg-mime exited with {}", output.describe_status());
            if !detail.is_empty() {
                message.push_str(": ");
                message.push_str(&detail);
            }
            return Err(RegistrationError::MimeRegistration(message));
        }
        Ok(())
    }
}

impl RegistrationWriter for DesktopEntryWriter {
    /// Stops at the first failing step. A written entry whose MIME step failed
    /// stays on disk.
    fn register(&self, executable: &str) -> Result<RegistrationOutcome, RegistrationError> {
        fs::create_dir_all(&self.applications_dir).map_err(|err| {
            RegistrationError::CreateDirectory {
                path: self.applications_dir.display().to_string(),
                message: err.to_string(),
            }
        })?;
        let entry = self.write_entry(executable)?;
        self.register_mime_handler()?;
        printer_info!("Linux protocol handler registered via {:?}", entry);
        Ok(RegistrationOutcome::Registered)
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
