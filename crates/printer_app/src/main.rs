mod startup;

use std::process::ExitCode;

use printer_core::RunOutcome;
use printer_logging::{printer_error, printer_info};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            printer_error!("{:#}", err);
            eprintln!("inventoryt-printer: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let mut controller = startup::build()?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    if let RunOutcome::ElevationRequested = controller.run(&args) {
        printer_info!("Exiting; the elevated instance finishes registration");
    }
    Ok(())
}
