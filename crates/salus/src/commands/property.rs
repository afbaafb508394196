//! `salus get` and `salus set-target`.

use serde_json::json;

use salus_core::{
    AccessoryTypes, Property, PropertyValue, SalusClient, ThermostatAccessory,
};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn get(
    accessory: &ThermostatAccessory<SalusClient>,
    property: Property,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let value = accessory.get(property).await?;
    print_value(property, value, global)
}

/// Reject targets outside the declared bounds before any request is made.
pub fn validate_target(celsius: f64) -> Result<(), CliError> {
    let bounds = AccessoryTypes::default().target_temperature;
    if bounds.contains(celsius) {
        Ok(())
    } else {
        Err(CliError::OutOfRange {
            value: celsius,
            min: bounds.min,
            max: bounds.max,
            step: bounds.step,
        })
    }
}

pub async fn set_target(
    accessory: &ThermostatAccessory<SalusClient>,
    celsius: f64,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    accessory
        .set(Property::TargetTemperature, PropertyValue::Float(celsius))
        .await?;
    print_value(
        Property::TargetTemperature,
        PropertyValue::Float(accessory.device().target),
        global,
    )
}

fn print_value(
    property: Property,
    value: PropertyValue,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let body = json!({ "property": property, "value": value });
    let out = output::render(global.output, &body, |_| value.to_string())?;
    output::print_output(&out);
    Ok(())
}
