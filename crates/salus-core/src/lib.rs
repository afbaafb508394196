//! Token lifecycle and state adapter between `salus-api` and an accessory host.
//!
//! - **[`TokenGuard`]** owns the bridge's API token, which the service only
//!   honours on the calendar day it was issued. Every device operation goes
//!   through [`TokenGuard::token`], which logs in again when the day rolled
//!   over. Concurrent refreshes follow the configured [`RefreshPolicy`].
//!
//! - **[`ThermostatAccessory`]** exposes one thermostat as a set of
//!   [`Property`] values. Remote-backed reads always fetch; the cached
//!   [`Device`] is updated as a side effect and never served in place of a
//!   failed fetch.
//!
//! - **Host boundary**: [`ThermostatAccessory::get`] / [`ThermostatAccessory::set`]
//!   return `Result`s; `handle_get` / `handle_set` adapt them to
//!   `(error, value)` completion callbacks.
//!
//! Property codes and bounds are injected through [`AccessoryTypes`].

pub mod accessory;
pub mod clock;
pub mod config;
pub mod device;
pub mod error;
pub mod guard;
mod host;
pub mod properties;
pub mod token;

#[cfg(test)]
mod mock;

// ── Primary re-exports ──────────────────────────────────────────────
pub use accessory::{AccessoryBuilder, ThermostatAccessory};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{BridgeConfig, DeviceConfig, TlsVerification};
pub use device::{Device, OFFLINE_MODE};
pub use error::CoreError;
pub use guard::{RefreshPolicy, TokenGuard};
pub use properties::{
    AccessoryInformation, AccessoryTypes, HeatingStateCodes, Property, PropertyDescriptor,
    PropertyValue, TemperatureBounds,
};
pub use token::Token;

pub use salus_api::{DEFAULT_ENDPOINT, SalusClient, ThermostatApi};
