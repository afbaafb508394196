//! `salus status`: read every property.

use serde_json::{Map, Value, json};

use salus_core::{CoreError, SalusClient, ThermostatAccessory};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    accessory: &ThermostatAccessory<SalusClient>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let readings = accessory.snapshot().await;
    let device = accessory.device();

    let mut first_error: Option<CoreError> = None;
    let rendered = match global.output {
        OutputFormat::Plain => {
            let label = match device.name {
                Some(ref name) => format!("{} ({name})", device.id),
                None => device.id.clone(),
            };
            let mut rows = vec![("device", label)];
            for (property, result) in readings {
                let value = match result {
                    Ok(v) => v.to_string(),
                    Err(e) => {
                        let text = format!("error: {e}");
                        first_error.get_or_insert(e);
                        text
                    }
                };
                rows.push((property.into(), value));
            }
            output::key_values(rows)
        }
        OutputFormat::Json => {
            let mut properties = Map::new();
            let mut errors = Map::new();
            for (property, result) in readings {
                match result {
                    Ok(v) => {
                        properties.insert(property.to_string(), serde_json::to_value(v)?);
                    }
                    Err(e) => {
                        properties.insert(property.to_string(), Value::Null);
                        errors.insert(property.to_string(), Value::String(e.to_string()));
                        first_error.get_or_insert(e);
                    }
                }
            }
            let body = json!({
                "device": device.id,
                "name": device.name,
                "properties": properties,
                "errors": errors,
            });
            serde_json::to_string_pretty(&body)?
        }
    };

    output::print_output(&rendered);
    match first_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
