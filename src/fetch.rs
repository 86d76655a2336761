//! Blocking HTTP fetch and media download.
//!
//! One agent per run, explicit timeouts passed in by the caller - the
//! extraction core never reads ambient configuration.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::time::Duration;

use log::debug;

use crate::error::{Error, Result};

/// Default request timeout, matching the service's comfortable worst case.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking HTTP client for page fetches and media downloads.
pub struct Client {
    agent: ureq::Agent,
}

impl Client {
    /// Build a client with the given read/write timeout. Connection
    /// establishment gets a shorter fixed budget.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout_read(timeout)
            .timeout_write(timeout)
            .build();
        Self { agent }
    }

    /// GET a URL and return the raw response body.
    pub fn get(&self, url: &str) -> Result<Vec<u8>> {
        debug!("GET {url}");
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|err| fetch_error(url, &err))?;

        let mut body = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|err| Error::Fetch {
                url: url.to_string(),
                reason: format!("body read failed: {err}"),
            })?;
        Ok(body)
    }

    /// GET a URL and stream the body straight to `path`.
    pub fn download(&self, url: &str, path: &Path) -> Result<()> {
        debug!("GET {url} -> {}", path.display());
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|err| fetch_error(url, &err))?;

        let mut reader = response.into_reader();
        let mut file = File::create(path)?;
        io::copy(&mut reader, &mut file).map_err(|err| Error::Fetch {
            url: url.to_string(),
            reason: format!("transfer failed: {err}"),
        })?;
        Ok(())
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

/// Collapse a ureq failure into a readable reason.
fn fetch_error(url: &str, err: &ureq::Error) -> Error {
    let reason = match err {
        ureq::Error::Status(code, _) => format!("HTTP status {code}"),
        ureq::Error::Transport(transport) => transport.to_string(),
    };
    Error::Fetch {
        url: url.to_string(),
        reason,
    }
}
