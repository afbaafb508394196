//! Clap derive structures for the `salus` CLI.
//!
//! Only depends on clap + clap_complete so `build.rs` can include it for
//! man page generation.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// salus -- read and control a Salus iT500/iT600 thermostat
#[derive(Debug, Parser)]
#[command(
    name = "salus",
    version,
    about = "Read and control a Salus thermostat from the command line",
    long_about = "Bridges one Salus iT500/iT600 thermostat through the salus-it500.com\n\
        web service. Each command logs in on demand; the session token is only\n\
        honoured on the day it was issued.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Thermostat profile to use
    #[arg(long, short = 'p', env = "SALUS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Service base URL (overrides profile)
    #[arg(long, env = "SALUS_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Account e-mail (overrides profile)
    #[arg(long, env = "SALUS_EMAIL", global = true)]
    pub email: Option<String>,

    /// Account password
    #[arg(long, env = "SALUS_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Thermostat device id (overrides profile)
    #[arg(long, short = 'd', env = "SALUS_DEVICE", global = true)]
    pub device: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SALUS_OUTPUT",
        default_value = "plain",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "SALUS_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "SALUS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text, one value per line (scripting)
    Plain,
    /// Pretty-printed JSON
    Json,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read every property of the thermostat
    #[command(alias = "st")]
    Status,

    /// Read one property
    Get {
        /// Property to read
        property: PropertyArg,
    },

    /// Change the target temperature (°C)
    #[command(alias = "set")]
    SetTarget {
        /// New target temperature in degrees Celsius
        celsius: f64,
    },

    /// Show accessory information and property metadata
    Info,

    /// Log in again and report the new token's issuing day
    Login,

    /// Manage configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Property names accepted by `get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PropertyArg {
    CurrentHeatingCoolingState,
    TargetHeatingCoolingState,
    CurrentTemperature,
    TargetTemperature,
    TemperatureDisplayUnits,
    StatusActive,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display the current configuration (passwords masked)
    Show,

    /// Write a profile from --endpoint, --email and --device
    Init {
        /// Overwrite an existing profile of the same name
        #[arg(long)]
        force: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
