// HTTP client construction for the Salus web service.
//
// A login only lives in the `PHPSESSID` cookie, so every client carries its
// own jar; two clients never share a session.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;
use reqwest::cookie::Jar;
use reqwest::redirect::Policy;

use crate::error::Error;

const USER_AGENT: &str = concat!("salus-bridge/", env!("CARGO_PKG_VERSION"));

/// `login.php` bounces through one or two redirects before landing.
const MAX_REDIRECTS: usize = 5;

/// How to verify the service's certificate.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    #[default]
    System,
    /// PEM file with an extra root (e.g. an intercepting proxy).
    CustomCa(PathBuf),
    DangerAcceptInvalid,
}

impl TlsMode {
    fn apply(&self, builder: ClientBuilder) -> Result<ClientBuilder, Error> {
        Ok(match self {
            Self::System => builder,
            Self::CustomCa(path) => {
                let pem = std::fs::read(path).map_err(|e| {
                    Error::Tls(format!("cannot read CA file {}: {e}", path.display()))
                })?;
                let cert = reqwest::Certificate::from_pem(&pem)
                    .map_err(|e| Error::Tls(format!("invalid CA file {}: {e}", path.display())))?;
                builder.add_root_certificate(cert)
            }
            Self::DangerAcceptInvalid => builder.danger_accept_invalid_certs(true),
        })
    }
}

/// Settings for [`SalusClient::new`](crate::SalusClient::new).
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// Whole-request timeout, also reported back in [`Error::Timeout`].
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::default(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a session-capable client: fresh cookie jar, bounded redirects.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .cookie_provider(Arc::new(Jar::default()))
            .redirect(Policy::limited(MAX_REDIRECTS));

        self.tls
            .apply(builder)?
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_is_system_tls_with_thirty_seconds() {
        let config = TransportConfig::default();
        assert!(matches!(config.tls, TlsMode::System));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.build_client().is_ok());
    }

    #[test]
    fn missing_ca_file_is_a_tls_error() {
        let config = TransportConfig {
            tls: TlsMode::CustomCa(PathBuf::from("/nonexistent/salus-ca.pem")),
            ..TransportConfig::default()
        };

        let err = config.build_client().unwrap_err();
        assert!(matches!(err, Error::Tls(ref msg) if msg.contains("salus-ca.pem")));
    }
}
