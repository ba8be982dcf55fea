use std::collections::BTreeMap;

use thiserror::Error;
use url::Url;

/// Scheme literal the executable is registered for.
pub const SCHEME: &str = "inventoryt-printer";

/// Prefix an activation argument must carry to be routed.
pub const SCHEME_PREFIX: &str = "inventoryt-printer://";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed activation url {input:?}: {reason}")]
    Malformed { input: String, reason: String },
}

impl ParseError {
    fn malformed(input: &str, reason: impl Into<String>) -> Self {
        ParseError::Malformed {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// One parsed activation URL. Only constructed from input that parsed cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationRequest {
    raw: String,
    scheme: String,
    host: String,
    path: String,
    query: BTreeMap<String, String>,
}

impl ActivationRequest {
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let trimmed = raw.trim();
        if let Some(position) = first_invalid_escape(trimmed) {
            return Err(ParseError::malformed(
                raw,
                format!("invalid percent-encoding at byte {position}"),
            ));
        }

        let url = Url::parse(trimmed).map_err(|err| ParseError::malformed(raw, err.to_string()))?;
        // `scheme:path` parses as a URL too, but activations always carry `://`.
        if !trimmed[url.scheme().len()..].starts_with("://") {
            return Err(ParseError::malformed(raw, "missing \"://\" scheme separator"));
        }

        let mut query = BTreeMap::new();
        for (key, value) in url.query_pairs() {
            query
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }

        Ok(Self {
            raw: raw.to_string(),
            scheme: url.scheme().to_string(),
            host: url.host_str().unwrap_or_default().to_ascii_lowercase(),
            path: url.path().trim_matches('/').to_string(),
            query,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Lower-cased host; empty for `scheme:///path` and `scheme://?query` forms.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Path with leading and trailing `/` removed.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// First value for `key`, if present.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }
}

/// Returns true when `arg` carries the registered scheme prefix.
pub fn has_scheme_prefix(arg: &str) -> bool {
    let arg = arg.trim_start();
    arg.len() >= SCHEME_PREFIX.len()
        && arg.as_bytes()[..SCHEME_PREFIX.len()].eq_ignore_ascii_case(SCHEME_PREFIX.as_bytes())
}

fn first_invalid_escape(input: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    bytes.iter().enumerate().find_map(|(index, byte)| {
        if *byte != b'%' {
            return None;
        }
        let valid = bytes
            .get(index + 1..index + 3)
            .is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit));
        (!valid).then_some(index)
    })
}
