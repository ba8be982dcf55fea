use std::rc::Rc;

use printer_core::Notifier;
use printer_logging::printer_warn;

use crate::platform::{powershell_args, ps_quote, Platform, POWERSHELL};
use crate::runner::ProcessRunner;

/// Balloon tip on Windows, `notify-send` on Linux, nothing elsewhere.
pub struct DesktopNotifier {
    platform: Platform,
    runner: Rc<dyn ProcessRunner>,
}

impl DesktopNotifier {
    pub fn new(platform: Platform, runner: Rc<dyn ProcessRunner>) -> Self {
        Self { platform, runner }
    }
}

impl Notifier for DesktopNotifier {
    fn show(&self, title: &str, message: &str) {
        let (program, args) = match self.platform {
            Platform::Windows => (POWERSHELL, powershell_args(&balloon_script(title, message))),
            Platform::Linux => ("notify-send", vec![title.to_string(), message.to_string()]),
            Platform::Unsupported => return,
        };
        match self.runner.run(program, &args) {
            Ok(output) if output.success => {}
            Ok(output) => printer_warn!(
                "Failed to show notification: {} exited with {}",
                program,
                output.describe_status()
            ),
            Err(err) => printer_warn!("Failed to show notification: {}", err),
        }
    }
}

fn balloon_script(title: &str, message: &str) -> String {
    format!(
        "Add-Type -AssemblyName System.Windows.Forms
$notify = New-Object System.Windows.Forms.NotifyIcon
$notify.Icon = [System.Drawing.SystemIcons]::Information
$notify.BalloonTipIcon = 'Info'
$notify.BalloonTipTitle = {}
$notify.BalloonTipText = {}
$notify.Visible = $True
$notify.ShowBalloonTip(5000)
Start-Sleep -Seconds 5
$notify.Dispose()",
        ps_quote(title),
        ps_quote(message)
    )
}
