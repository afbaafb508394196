// ── Runtime bridge configuration ──
//
// Describes *how* to reach the Salus service and which thermostat to
// expose. Carries credentials and tuning but never touches disk; the CLI
// or a host builds a `BridgeConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::device::Device;
use crate::guard::RefreshPolicy;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict). The public service has a valid certificate.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (local proxies, test rigs).
    DangerAcceptInvalid,
}

/// The thermostat to expose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    pub id: String,
    pub name: Option<String>,
    /// Initial mode string; `"OFFLINE"` marks the accessory inactive.
    pub mode: String,
}

impl DeviceConfig {
    pub fn to_device(&self) -> Device {
        let device = Device::new(self.id.clone(), self.mode.clone());
        match &self.name {
            Some(name) => device.with_name(name.clone()),
            None => device,
        }
    }
}

/// Configuration for bridging one thermostat.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Service base URL (e.g., `https://salus-it500.com/`).
    pub endpoint: Url,
    /// Account e-mail used for login.
    pub email: String,
    /// Account password.
    pub password: SecretString,
    /// Which thermostat to expose.
    pub device: DeviceConfig,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Handling of concurrent token refreshes.
    pub token_refresh: RefreshPolicy,
    /// Log in while connecting instead of on the first request.
    pub prefetch_token: bool,
}

impl BridgeConfig {
    pub fn new(endpoint: Url, email: String, password: SecretString, device: DeviceConfig) -> Self {
        Self {
            endpoint,
            email,
            password,
            device,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            token_refresh: RefreshPolicy::default(),
            prefetch_token: true,
        }
    }
}
