//! Config subcommand handlers. None of these contact the service.

use serde_json::Value;

use salus_config::{Config, Profile};
use salus_core::DEFAULT_ENDPOINT;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::active_profile_name;
use crate::error::CliError;
use crate::output;

const MASK: &str = "****";

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&salus_config::config_path().display().to_string());
            Ok(())
        }
        ConfigCommand::Show => {
            let cfg = salus_config::load_config()?;
            let out = match global.output {
                OutputFormat::Plain => format_config_redacted(&cfg),
                OutputFormat::Json => {
                    let mut value = serde_json::to_value(&cfg)?;
                    redact_passwords(&mut value);
                    serde_json::to_string_pretty(&value)?
                }
            };
            output::print_output(&out);
            Ok(())
        }
        ConfigCommand::Init { force } => init(global, force),
    }
}

// ── Init ────────────────────────────────────────────────────────────

fn init(global: &GlobalOpts, force: bool) -> Result<(), CliError> {
    let path = salus_config::config_path();
    let mut cfg = salus_config::load_config_for_update(&path)?;
    let name = active_profile_name(global, &cfg);

    if cfg.profiles.contains_key(&name) && !force {
        return Err(CliError::ProfileExists { name });
    }

    let email = global.email.clone().ok_or_else(|| CliError::Validation {
        field: "email".into(),
        reason: "pass --email".into(),
    })?;
    let device_id = global.device.clone().ok_or_else(|| CliError::Validation {
        field: "device".into(),
        reason: "pass --device".into(),
    })?;
    let endpoint = global
        .endpoint
        .clone()
        .unwrap_or_else(|| DEFAULT_ENDPOINT.into());

    // Credentials are never persisted.
    if global.password.is_some() {
        eprintln!(
            "Password not saved. Set `password_env` in [profiles.{name}] or export SALUS_PASSWORD."
        );
    }

    cfg.profiles.insert(
        name.clone(),
        Profile {
            endpoint,
            email,
            password: None,
            password_env: None,
            device_id,
            device_name: None,
            mode: "ONLINE".into(),
            ca_cert: None,
            insecure: global.insecure.then_some(true),
            timeout: global.timeout,
            token_refresh: None,
            prefetch_token: None,
        },
    );
    if cfg.default_profile.is_none() || cfg.profiles.len() == 1 {
        cfg.default_profile = Some(name.clone());
    }

    salus_config::save_config(&cfg)?;
    output::print_output(&format!("Wrote profile '{name}' to {}", path.display()));
    Ok(())
}

// ── Show ────────────────────────────────────────────────────────────

/// Format config for display, masking passwords.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "endpoint = \"{}\"", p.endpoint);
        let _ = writeln!(out, "email = \"{}\"", p.email);
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"{MASK}\"");
        }
        if let Some(ref env) = p.password_env {
            let _ = writeln!(out, "password_env = \"{env}\"");
        }
        let _ = writeln!(out, "device_id = \"{}\"", p.device_id);
        if let Some(ref device_name) = p.device_name {
            let _ = writeln!(out, "device_name = \"{device_name}\"");
        }
        let _ = writeln!(out, "mode = \"{}\"", p.mode);
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out.trim_end().to_string()
}

fn redact_passwords(value: &mut Value) {
    let Some(profiles) = value.get_mut("profiles").and_then(Value::as_object_mut) else {
        return;
    };
    for profile in profiles.values_mut() {
        if let Some(password) = profile.get_mut("password") {
            if !password.is_null() {
                *password = Value::String(MASK.into());
            }
        }
    }
}
