//! Builds the dispatch context once per process.

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context;
use log::LevelFilter;
use printer_core::{Collaborators, DispatchContext, DispatchController};
use printer_engine::{
    registration_backends, AppConfig, DesktopNotifier, JsonConfigStore, Platform, ProcessRunner,
    ReqwestProbe, SpoolerPrintSink, StdioConsole, SystemRunner,
};
use printer_logging::{printer_info, printer_warn, LogDestination};

pub fn build() -> anyhow::Result<DispatchController> {
    let config_path = JsonConfigStore::default_path();
    let config = JsonConfigStore::load(config_path.clone())
        .with_context(|| format!("failed to load configuration from {}", config_path.display()))?;
    init_logging(config.config());
    printer_info!("=== InventoryT Printer Service ===");
    printer_info!("Using configuration {:?}", config.path());

    let platform = Platform::current();
    let runner: Rc<dyn ProcessRunner> = Rc::new(SystemRunner);
    let registration = registration_backends(platform, runner.clone());
    let printer = SpoolerPrintSink::new(
        platform,
        runner.clone(),
        computer_name(),
        config.config().printer_share.clone(),
    );
    let http = ReqwestProbe::new().context("failed to start HTTP client runtime")?;

    let context = DispatchContext {
        executable: current_executable(),
        labels_dir: std::env::temp_dir().join("inventoryt-printer").join("labels"),
    };
    let collaborators = Collaborators {
        config: Box::new(config),
        http: Box::new(http),
        printer: Box::new(printer),
        notifier: Box::new(DesktopNotifier::new(platform, runner)),
        console: Box::new(StdioConsole),
        probe: registration.probe,
        writer: registration.writer,
    };
    Ok(DispatchController::new(context, collaborators))
}

fn init_logging(config: &AppConfig) {
    let destination = if config.enable_file_logging {
        LogDestination::Both(config.log_file_path.clone())
    } else {
        LogDestination::Terminal
    };
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    printer_logging::initialize(destination, level);
}

fn current_executable() -> Option<String> {
    match std::env::current_exe() {
        Ok(path) => Some(absolute(path).display().to_string()),
        Err(err) => {
            printer_warn!("Failed to get executable path: {}", err);
            None
        }
    }
}

fn absolute(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(&path))
        .unwrap_or(path)
}

fn computer_name() -> String {
    std::env::var("COMPUTERNAME").unwrap_or_else(|_| "localhost".to_string())
}
