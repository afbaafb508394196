// Salus web service HTTP client
//
// Wraps `reqwest::Client` with base-URL handling, status mapping, and
// response decoding. Endpoint groups (auth, device values) are inherent
// methods in sibling modules so this file stays focused on transport.

use std::time::Duration;

use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Public endpoint of the Salus iT500 web service.
pub const DEFAULT_ENDPOINT: &str = "https://salus-it500.com/";

/// Account credentials used to open a web session.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

/// Raw HTTP client for the Salus web service.
///
/// Holds the account credentials so it can open a fresh session whenever
/// a new token is requested. The session cookie lives in the client's
/// cookie jar.
pub struct SalusClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    /// Known only when this crate built the HTTP client.
    timeout: Option<Duration>,
}

impl SalusClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(
        base_url: Url,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            base_url: normalize_base_url(base_url),
            credentials,
            timeout: Some(transport.timeout),
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// The caller is responsible for giving it a cookie store. Its timeouts
    /// surface as [`Error::Transport`].
    pub fn with_client(http: reqwest::Client, base_url: Url, credentials: Credentials) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url),
            credentials,
            timeout: None,
        }
    }

    /// The service base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The account credentials.
    pub(crate) fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"public/login.php"`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        self.base_url.join(path).map_err(Error::InvalidUrl)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and return the body as text.
    pub(crate) async fn get_text(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<String, Error> {
        debug!("GET {}", url.path());

        let resp = self.send(self.http.get(url).query(query)).await?;
        resp.text().await.map_err(Error::Transport)
    }

    /// Send a GET request and decode a JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        let body = self.get_text(url, query).await?;

        serde_json::from_str(&body).map_err(|e| {
            let preview = &body[..floor_char_boundary(&body, 200)];
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    /// Send a form-encoded POST request and return the body as text.
    pub(crate) async fn post_form(
        &self,
        url: Url,
        form: &(impl Serialize + ?Sized),
    ) -> Result<String, Error> {
        debug!("POST {}", url.path());

        let resp = self.send(self.http.post(url).form(form)).await?;
        resp.text().await.map_err(Error::Transport)
    }

    /// Execute a request and map transport failures and HTTP status codes.
    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, Error> {
        let resp = builder.send().await.map_err(|e| match self.timeout {
            Some(timeout) if e.is_timeout() => Error::Timeout {
                timeout_secs: timeout.as_secs(),
            },
            _ => Error::Transport(e),
        })?;

        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::Authentication {
                message: format!("session rejected (HTTP {status})"),
            });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message: body[..floor_char_boundary(&body, 200)].to_owned(),
            });
        }

        Ok(resp)
    }
}

/// `Url::join` drops the last path segment unless the base ends with `/`.
fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Largest char boundary at or below `max`, so previews never split UTF-8.
fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let url = normalize_base_url(Url::parse("https://example.com/salus").unwrap());
        assert_eq!(url.as_str(), "https://example.com/salus/");
        assert_eq!(
            url.join("public/login.php").unwrap().as_str(),
            "https://example.com/salus/public/login.php"
        );
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let s = "é".repeat(150);
        let cut = floor_char_boundary(&s, 200);
        assert!(s.is_char_boundary(cut));
        assert!(cut <= 200);
        assert_eq!(floor_char_boundary("short", 200), 5);
    }
}
