//! Resolve a `BridgeConfig` from the config file, the active profile, and
//! command-line overrides.

use std::time::Duration;

use secrecy::SecretString;

use salus_config::{
    Config, load_config_or_default, profile_to_bridge_config, profile_with_password,
};
use salus_core::{BridgeConfig, DEFAULT_ENDPOINT, DeviceConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Profile name: `--profile`, then the file's `default_profile`, then "default".
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the runtime config for the active profile.
pub fn build_bridge_config(global: &GlobalOpts) -> Result<BridgeConfig, CliError> {
    let cfg = load_config_or_default();
    resolve(global, &cfg)
}

fn resolve(global: &GlobalOpts, cfg: &Config) -> Result<BridgeConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    // A flag password wins over the profile's credential chain.
    if let Some(profile) = cfg.profiles.get(&profile_name) {
        let mut bridge = match global.password {
            Some(ref password) => profile_with_password(
                profile,
                &cfg.defaults,
                SecretString::from(password.clone()),
            )?,
            None => profile_to_bridge_config(profile, &profile_name, &cfg.defaults)
                .map_err(|e| CliError::from(e).with_profile(&profile_name))?,
        };
        apply_overrides(&mut bridge, global)?;
        return Ok(bridge);
    }

    // No profile -- everything must come from flags / env vars.
    if global.email.is_none() && global.device.is_none() {
        return Err(CliError::NoConfig {
            path: salus_config::config_path().display().to_string(),
        });
    }

    let (Some(email), Some(password)) = (global.email.clone(), global.password.clone()) else {
        return Err(CliError::NoCredentials {
            profile: profile_name,
        });
    };

    let device = global.device.clone().ok_or_else(|| CliError::Validation {
        field: "device".into(),
        reason: "pass --device or set SALUS_DEVICE".into(),
    })?;

    let endpoint = parse_endpoint(global.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT))?;

    let mut bridge = BridgeConfig::new(
        endpoint,
        email,
        SecretString::from(password),
        DeviceConfig {
            id: device,
            name: None,
            mode: "ONLINE".into(),
        },
    );
    bridge.timeout = Duration::from_secs(cfg.defaults.timeout);
    bridge.token_refresh = cfg.defaults.token_refresh;
    if cfg.defaults.insecure {
        bridge.tls = TlsVerification::DangerAcceptInvalid;
    }
    apply_overrides(&mut bridge, global)?;
    Ok(bridge)
}

fn apply_overrides(bridge: &mut BridgeConfig, global: &GlobalOpts) -> Result<(), CliError> {
    if let Some(ref endpoint) = global.endpoint {
        bridge.endpoint = parse_endpoint(endpoint)?;
    }
    if let Some(ref email) = global.email {
        bridge.email.clone_from(email);
    }
    if let Some(ref device) = global.device {
        bridge.device.id.clone_from(device);
    }
    if let Some(timeout) = global.timeout {
        bridge.timeout = Duration::from_secs(timeout);
    }
    if global.insecure {
        bridge.tls = TlsVerification::DangerAcceptInvalid;
    }
    Ok(())
}

fn parse_endpoint(raw: &str) -> Result<url::Url, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: "endpoint".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;
    use crate::cli::OutputFormat;

    const PROFILE: &str = r#"
default_profile = "home"

[profiles.home]
email = "me@example.com"
device_id = "STA00012345"
timeout = 12
"#;

    fn opts() -> GlobalOpts {
        GlobalOpts {
            profile: None,
            endpoint: None,
            email: None,
            password: None,
            device: None,
            output: OutputFormat::Plain,
            verbose: 0,
            insecure: false,
            timeout: None,
        }
    }

    fn sample_config() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, PROFILE).unwrap();
        let cfg = salus_config::load_config_from(&path).unwrap();
        (dir, cfg)
    }

    #[test]
    fn flags_alone_build_a_config() {
        let global = GlobalOpts {
            email: Some("me@example.com".into()),
            password: Some("hunter2".into()),
            device: Some("12345".into()),
            ..opts()
        };

        let bridge = resolve(&global, &Config::default()).unwrap();

        assert_eq!(bridge.endpoint.as_str(), DEFAULT_ENDPOINT);
        assert_eq!(bridge.device.id, "12345");
        assert_eq!(bridge.password.expose_secret(), "hunter2");
        assert_eq!(bridge.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn nothing_configured_reports_missing_file() {
        let err = resolve(&opts(), &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }

    #[test]
    fn missing_password_reports_credentials() {
        let global = GlobalOpts {
            email: Some("me@example.com".into()),
            device: Some("12345".into()),
            ..opts()
        };

        let err = resolve(&global, &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::NoCredentials { ref profile } if profile == "default"));
    }

    #[test]
    fn flags_override_the_profile() {
        let (_dir, cfg) = sample_config();
        let global = GlobalOpts {
            password: Some("from-flag".into()),
            device: Some("STA00099999".into()),
            endpoint: Some("http://127.0.0.1:9000/".into()),
            insecure: true,
            ..opts()
        };

        let bridge = resolve(&global, &cfg).unwrap();

        assert_eq!(bridge.email, "me@example.com");
        assert_eq!(bridge.device.id, "STA00099999");
        assert_eq!(bridge.endpoint.as_str(), "http://127.0.0.1:9000/");
        assert_eq!(bridge.timeout, Duration::from_secs(12));
        assert_eq!(bridge.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(bridge.password.expose_secret(), "from-flag");
    }

    #[test]
    fn bad_endpoint_is_a_validation_error() {
        let global = GlobalOpts {
            email: Some("me@example.com".into()),
            password: Some("pw".into()),
            device: Some("1".into()),
            endpoint: Some("not a url".into()),
            ..opts()
        };

        let err = resolve(&global, &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "endpoint"));
    }
}
