//! `salus login`: discard any held token and log in again.

use serde_json::json;

use salus_core::{SalusClient, ThermostatAccessory};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(
    accessory: &ThermostatAccessory<SalusClient>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let guard = accessory.token_guard();
    guard.invalidate().await;
    let token = guard.token().await?;

    let day = token.creation_day();
    let body = json!({
        "logged_in": true,
        "valid_on": day.to_string(),
        "refresh_policy": guard.policy(),
    });
    let out = output::render(global.output, &body, |_| {
        format!("Logged in; token valid through {day}")
    })?;
    output::print_output(&out);
    Ok(())
}
