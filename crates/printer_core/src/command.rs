use crate::request::{ActivationRequest, ParseError};

/// What an activation asks for. Carries only what its handler needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Test,
    Config { url: Option<String> },
    Print { item_id: String, item_name: String },
    /// Not produced by [`classify`]; handlers treat it as a warned no-op.
    Unknown,
}

/// Parses `raw` and classifies it. Pure.
pub fn classify(raw: &str) -> Result<Command, ParseError> {
    ActivationRequest::parse(raw).map(|request| request.command())
}

impl ActivationRequest {
    /// First match wins: test, then config, then print.
    pub fn command(&self) -> Command {
        if self.path() == "test" || self.host() == "test" {
            return Command::Test;
        }
        if self.path() == "config" || self.host() == "config" {
            let url = self
                .query("url")
                .filter(|value| !value.is_empty())
                .map(ToOwned::to_owned);
            return Command::Config { url };
        }
        Command::Print {
            item_id: self.query("id").unwrap_or_default().to_string(),
            item_name: self.query("name").unwrap_or_default().to_string(),
        }
    }
}
