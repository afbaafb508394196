// Session login and token issuance
//
// The web service has no token endpoint. A form login opens a cookie
// session; the device overview page then embeds the day's API token in a
// hidden `<input id="token">` element.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::SalusClient;
use crate::error::Error;

const LOGIN_PATH: &str = "public/login.php";
const DEVICES_PATH: &str = "public/devices.php";

impl SalusClient {
    /// Log in with the configured credentials and scrape a fresh token.
    ///
    /// `POST /public/login.php`, then `GET /public/devices.php`.
    ///
    /// A rejected login still answers HTTP 200 with the login form, so the
    /// absence of a token on the devices page is what signals failure.
    pub async fn login(&self) -> Result<SecretString, Error> {
        let url = self.url(LOGIN_PATH)?;
        let credentials = self.credentials();

        debug!(email = %credentials.email, "logging in");

        let form = [
            ("IDemail", credentials.email.as_str()),
            ("password", credentials.password.expose_secret()),
            ("login", "Login"),
            ("keep_logged_in", "1"),
        ];
        self.post_form(url, &form).await?;

        let page = self.get_text(self.url(DEVICES_PATH)?, &[]).await?;
        let token = extract_token(&page).ok_or_else(|| Error::Authentication {
            message: "no session token on the devices page (login rejected?)".into(),
        })?;

        debug!("login successful");
        Ok(SecretString::from(token.to_owned()))
    }
}

/// Pull the `value` attribute of the `<input id="token">` element.
pub(crate) fn extract_token(html: &str) -> Option<&str> {
    let mut rest = html;
    while let Some(open) = rest.find('<') {
        let after = &rest[open + 1..];
        let close = after.find('>')?;
        let tag = &after[..close];
        rest = &after[close + 1..];

        let Some(attrs) = input_attributes(tag) else {
            continue;
        };
        if attribute(attrs, "id") == Some("token") {
            return attribute(attrs, "value")
                .map(str::trim)
                .filter(|v| !v.is_empty());
        }
    }
    None
}

/// The attribute list of an `<input ...>` tag body, or `None` for other tags.
fn input_attributes(tag: &str) -> Option<&str> {
    let name = tag.get(..5)?;
    let attrs = &tag[5..];
    let separated = attrs.is_empty() || attrs.starts_with(char::is_whitespace);
    (name.eq_ignore_ascii_case("input") && separated).then_some(attrs)
}

/// Value of the attribute called exactly `name` (case-insensitive).
///
/// Handles double-quoted, single-quoted and bare values; a bare
/// attribute reads as `""`.
fn attribute<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    let is_name_end = |c: char| c == '=' || c == '/' || c.is_whitespace();
    let mut rest = attrs;

    loop {
        rest = rest.trim_start_matches(|c: char| c == '/' || c.is_whitespace());
        if rest.is_empty() {
            return None;
        }

        let name_end = rest.find(is_name_end).unwrap_or(rest.len());
        let attr = &rest[..name_end];
        rest = rest[name_end..].trim_start();

        let value = match rest.strip_prefix('=') {
            Some(after) => {
                let after = after.trim_start();
                match after.chars().next() {
                    Some(quote @ ('"' | '\'')) => {
                        let body = &after[1..];
                        let end = body.find(quote)?;
                        rest = &body[end + 1..];
                        &body[..end]
                    }
                    _ => {
                        let end = after.find(char::is_whitespace).unwrap_or(after.len());
                        rest = &after[end..];
                        after[..end].trim_end_matches('/')
                    }
                }
            }
            None => "",
        };

        if attr.eq_ignore_ascii_case(name) {
            return Some(value);
        }
    }
}
