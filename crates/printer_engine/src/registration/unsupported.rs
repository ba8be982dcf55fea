use printer_core::{
    PathCase, ProbeError, RegistrationError, RegistrationOutcome, RegistrationProbe,
    RegistrationWriter,
};

/// Registration on platforms without a known mechanism: nothing exists, nothing changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedProbe;

impl RegistrationProbe for UnsupportedProbe {
    fn exists(&self) -> bool {
        false
    }

    fn current_target(&self) -> Result<Option<String>, ProbeError> {
        Ok(None)
    }

    fn path_case(&self) -> PathCase {
        PathCase::Sensitive
    }

    fn needs_update(&self, _executable: Option<&str>) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedWriter;

impl RegistrationWriter for UnsupportedWriter {
    fn register(&self, _executable: &str) -> Result<RegistrationOutcome, RegistrationError> {
        Ok(RegistrationOutcome::Unsupported)
    }
}
