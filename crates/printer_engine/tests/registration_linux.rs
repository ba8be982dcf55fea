mod common;

use std::fs;

use common::{Invocation, RecordingRunner};
use pretty_assertions::assert_eq;
use printer_core::{RegistrationError, RegistrationOutcome, RegistrationProbe, RegistrationWriter};
use printer_engine::{
    desktop_entry, CommandOutput, DesktopEntryProbe, DesktopEntryWriter, DESKTOP_FILE,
};
use tempfile::TempDir;

const EXE: &str = "/opt/inventoryt-printer/inventoryt-printer";

#[test]
fn missing_entry_does_not_exist() {
    let temp = TempDir::new().unwrap();
    let probe = DesktopEntryProbe::new(temp.path().join(DESKTOP_FILE));
    assert!(!probe.exists());
}

#[test]
fn register_writes_entry_and_mime_association() {
    let temp = TempDir::new().unwrap();
    let apps = temp.path().join("share").join("applications");
    let runner = RecordingRunner::new();
    let writer = DesktopEntryWriter::new(apps.clone(), runner.clone());

    let outcome = writer.register(EXE).unwrap();

    assert_eq!(outcome, RegistrationOutcome::Registered);
    let content = fs::read_to_string(apps.join(DESKTOP_FILE)).unwrap();
    assert_eq!(
        content,
        "[Desktop Entry]\n\
         Name=Inventory Printer\n\
         Exec=/opt/inventoryt-printer/inventoryt-printer %u\n\
         Type=Application\n\
         Terminal=false\n\
         Categories=Application;\n\
         MimeType=x-scheme-handler/inventoryt-printer;\n"
    );
    assert_eq!(
        runner.calls(),
        vec![Invocation {
            program: "xdg-mime".to_string(),
            args: vec![
                "default".to_string(),
                "inventoryt-printer.desktop".to_string(),
                "x-scheme-handler/inventoryt-printer".to_string(),
            ],
        }]
    );
}

#[test]
fn probe_reads_back_the_registered_target() {
    let temp = TempDir::new().unwrap();
    let runner = RecordingRunner::new();
    DesktopEntryWriter::new(temp.path().to_path_buf(), runner)
        .register(EXE)
        .unwrap();

    let probe = DesktopEntryProbe::new(temp.path().join(DESKTOP_FILE));
    assert!(probe.exists());
    assert_eq!(probe.current_target().unwrap().as_deref(), Some(EXE));
    assert!(!probe.needs_update(Some(EXE)));
    assert!(probe.needs_update(Some("/usr/local/bin/inventoryt-printer")));
    // Linux paths compare byte for byte.
    assert!(probe.needs_update(Some("/OPT/inventoryt-printer/inventoryt-printer")));
    assert!(probe.needs_update(None));
}

#[test]
fn registering_twice_yields_identical_entry() {
    let temp = TempDir::new().unwrap();
    let runner = RecordingRunner::new();
    let writer = DesktopEntryWriter::new(temp.path().to_path_buf(), runner.clone());

    writer.register(EXE).unwrap();
    let first = fs::read_to_string(temp.path().join(DESKTOP_FILE)).unwrap();
    writer.register(EXE).unwrap();
    let second = fs::read_to_string(temp.path().join(DESKTOP_FILE)).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, desktop_entry(EXE));
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    assert_eq!(runner.calls().len(), 2);
}

#[test]
fn entry_without_exec_line_is_stale() {
    let temp = TempDir::new().unwrap();
    let entry = temp.path().join(DESKTOP_FILE);
    fs::write(&entry, "[Desktop Entry]\nName=Inventory Printer\n").unwrap();

    let probe = DesktopEntryProbe::new(entry);
    assert!(probe.exists());
    assert_eq!(probe.current_target().unwrap(), None);
    assert!(probe.needs_update(Some(EXE)));
}

#[test]
fn mime_failure_keeps_entry_and_reports() {
    let temp = TempDir::new().unwrap();
    let runner = RecordingRunner::with_replies(vec![Ok(CommandOutput::failed(
        4,
        "xdg-mime: no writable user mimeapps.list",
    ))]);
    let writer = DesktopEntryWriter::new(temp.path().to_path_buf(), runner);

    let err = writer.register(EXE).unwrap_err();

    assert_eq!(
        err,
        RegistrationError::MimeRegistration(
            "xdg-mime exited with exit status 4: xdg-mime: no writable user mimeapps.list"
                .to_string()
        )
    );
    assert!(temp.path().join(DESKTOP_FILE).exists());
}

#[test]
fn directory_failure_stops_before_any_write() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("applications");
    fs::write(&blocker, "not a directory").unwrap();
    let runner = RecordingRunner::new();
    let writer = DesktopEntryWriter::new(blocker, runner.clone());

    let err = writer.register(EXE).unwrap_err();

    assert!(matches!(err, RegistrationError::CreateDirectory { .. }));
    assert!(runner.calls().is_empty());
}
