use std::io::{self, BufRead, Write};

use printer_core::OperatorConsole;

/// Stdout for diagnostics, one stdin line as acknowledgement.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdioConsole;

impl OperatorConsole for StdioConsole {
    fn report(&self, line: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{line}");
        let _ = stdout.flush();
    }

    fn wait_for_acknowledgement(&self) {
        let mut line = String::new();
        // EOF or a closed stdin counts as acknowledged.
        let _ = io::stdin().lock().read_line(&mut line);
    }
}
