use std::io;
use std::path::Path;
use std::rc::Rc;

use printer_core::{PrintError, PrintSink};
use printer_logging::printer_info;

use crate::platform::Platform;
use crate::runner::{CommandOutput, ProcessRunner};

const DENIED_MARKERS: [&str; 3] = ["access is denied", "access denied", "permission denied"];

/// Sends payload files to the local label printer.
///
/// Windows copies the file to the printer share on this machine; Linux hands
/// it to `lpr` in raw mode.
pub struct SpoolerPrintSink {
    platform: Platform,
    runner: Rc<dyn ProcessRunner>,
    computer_name: String,
    printer_share: String,
}

impl SpoolerPrintSink {
    pub fn new(
        platform: Platform,
        runner: Rc<dyn ProcessRunner>,
        computer_name: impl Into<String>,
        printer_share: impl Into<String>,
    ) -> Self {
        Self {
            platform,
            runner,
            computer_name: computer_name.into(),
            printer_share: printer_share.into(),
        }
    }

    fn command(&self, file: &Path) -> Option<(&'static str, Vec<String>)> {
        let file = file.display().to_string();
        match self.platform {
            Platform::Windows => Some((
                "cmd",
                vec![
                    "/C".to_string(),
                    "copy".to_string(),
                    file,
                    format!(r"\\{}\{}", self.computer_name, self.printer_share),
                ],
            )),
            Platform::Linux => Some(("lpr", vec!["-l".to_string(), file])),
            Platform::Unsupported => None,
        }
    }
}

impl PrintSink for SpoolerPrintSink {
    fn print(&self, file: &Path) -> Result<(), PrintError> {
        let (program, args) = self.command(file).ok_or(PrintError::Unsupported)?;
        let output = self.runner.run(program, &args).map_err(|err| {
            if err.kind == io::ErrorKind::PermissionDenied {
                PrintError::AccessDenied(err.to_string())
            } else {
                PrintError::Failed(err.to_string())
            }
        })?;
        if output.success {
            printer_info!("{} accepted {:?}", program, file);
            return Ok(());
        }
        Err(classify_failure(program, &output))
    }
}

fn classify_failure(program: &str, output: &CommandOutput) -> PrintError {
    let text = output.combined();
    let lowered = text.to_lowercase();
    if DENIED_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        return PrintError::AccessDenied(text);
    }
    if text.is_empty() {
        PrintError::Failed(format!("{program} exited with {}", output.describe_status()))
    } else {
        PrintError::Failed(format!(
            "{program} exited with {}: {text}",
            output.describe_status()
        ))
    }
}
