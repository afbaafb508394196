// salus-api: Async Rust client for the Salus iT500/iT600 web service

pub mod api;
mod auth;
pub mod client;
mod device;
pub mod error;
pub mod models;
pub mod transport;

pub use api::ThermostatApi;
pub use client::{Credentials, DEFAULT_ENDPOINT, SalusClient};
pub use error::Error;
pub use models::DeviceValues;
pub use transport::{TlsMode, TransportConfig};
