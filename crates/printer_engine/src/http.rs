use std::error::Error as StdError;
use std::time::Duration;

use printer_core::{HttpProbe, HttpResponse, NetworkError, NetworkFailureKind};
use printer_logging::printer_debug;

const USER_AGENT: &str = "InventoryPrinter/1.0";

/// Blocking HTTP GET on top of the async reqwest client.
///
/// Owns a current-thread runtime; calling [`HttpProbe::get`] from inside
/// another tokio runtime panics.
pub struct ReqwestProbe {
    runtime: tokio::runtime::Runtime,
}

impl ReqwestProbe {
    pub fn new() -> Result<Self, NetworkError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| NetworkError::new(NetworkFailureKind::Other, err.to_string()))?;
        Ok(Self { runtime })
    }

    fn build_client(&self, timeout: Duration) -> Result<reqwest::Client, NetworkError> {
        // The test endpoint sits behind an internal certificate.
        reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|err| NetworkError::new(NetworkFailureKind::Other, error_chain(&err)))
    }
}

impl HttpProbe for ReqwestProbe {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, NetworkError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| NetworkError::new(NetworkFailureKind::InvalidUrl, err.to_string()))?;
        let client = self.build_client(timeout)?;

        self.runtime.block_on(async move {
            let response = client.get(parsed).send().await.map_err(map_reqwest_error)?;
            let status_code = response.status().as_u16();
            let body = response.bytes().await.map_err(map_reqwest_error)?;
            printer_debug!("GET {} -> {} ({} bytes)", url, status_code, body.len());
            Ok::<_, NetworkError>(HttpResponse {
                status_code,
                body: body.to_vec(),
            })
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> NetworkError {
    let detail = error_chain(&err);
    let kind = if err.is_timeout() {
        NetworkFailureKind::Timeout
    } else if err.is_builder() {
        NetworkFailureKind::InvalidUrl
    } else if err.is_connect() {
        classify_connect_failure(&detail)
    } else {
        NetworkFailureKind::Other
    };
    NetworkError::new(kind, detail)
}

/// reqwest's `Display` omits the underlying cause; walk the sources.
fn error_chain(err: &dyn StdError) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !parts.iter().any(|part| part.contains(&text)) {
            parts.push(text);
        }
        source = cause.source();
    }
    parts.join(": ")
}

fn classify_connect_failure(detail: &str) -> NetworkFailureKind {
    let detail = detail.to_ascii_lowercase();
    if detail.contains("refused") {
        NetworkFailureKind::ConnectionRefused
    } else if detail.contains("timed out") {
        NetworkFailureKind::Timeout
    } else if ["dns", "lookup", "resolve", "no such host", "not known", "unreachable"]
        .iter()
        .any(|marker| detail.contains(marker))
    {
        NetworkFailureKind::HostUnreachable
    } else {
        NetworkFailureKind::Other
    }
}
