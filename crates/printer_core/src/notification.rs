/// Title and message handed to the desktop notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationOutcome {
    pub title: String,
    pub message: String,
}

impl NotificationOutcome {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn initialized() -> Self {
        Self::new(SERVICE_TITLE, "Application initialized and ready to print")
    }

    pub fn path_updated() -> Self {
        Self::new(SERVICE_TITLE, "Application path has been updated")
    }

    pub fn already_registered() -> Self {
        Self::new(SERVICE_TITLE, "Printer service is already registered")
    }

    pub fn registration_unsupported() -> Self {
        Self::new(
            SERVICE_TITLE,
            "Protocol registration is not supported on this platform",
        )
    }

    pub fn is_error(&self) -> bool {
        self.title.ends_with("Error") || self.title.ends_with("Failed")
    }
}

pub const SERVICE_TITLE: &str = "Printer Service";
