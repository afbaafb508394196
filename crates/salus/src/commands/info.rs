//! `salus info`: accessory identification and property metadata. Makes no
//! requests.

use serde_json::json;

use salus_core::{PropertyDescriptor, SalusClient, ThermostatAccessory};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::commands::all_properties;
use crate::error::CliError;
use crate::output;

pub fn handle(
    accessory: &ThermostatAccessory<SalusClient>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let information = accessory.information();
    let device = accessory.device();
    let descriptors: Vec<PropertyDescriptor> = all_properties()
        .map(|p| accessory.types().descriptor(p))
        .collect();

    let rendered = match global.output {
        OutputFormat::Plain => {
            let mut rows = vec![
                ("manufacturer", information.manufacturer.clone()),
                ("model", information.model.clone()),
                ("serial-number", information.serial_number.clone()),
                ("mode", device.mode.clone()),
            ];
            if let Some(ref name) = device.name {
                rows.push(("name", name.clone()));
            }
            for d in &descriptors {
                rows.push((d.property.into(), describe(d)));
            }
            output::key_values(rows)
        }
        OutputFormat::Json => serde_json::to_string_pretty(&json!({
            "information": information,
            "device": device,
            "properties": descriptors,
        }))?,
    };

    output::print_output(&rendered);
    Ok(())
}

fn describe(d: &PropertyDescriptor) -> String {
    let access = if d.writable { "read/write" } else { "read" };
    let mut parts = vec![access.to_string()];
    if let Some(bounds) = d.bounds {
        parts.push(format!("{}..{} °C", bounds.min, bounds.max));
    }
    if let Some(step) = d.min_step {
        parts.push(format!("step {step}"));
    }
    if !d.valid_values.is_empty() {
        let values: Vec<String> = d.valid_values.iter().map(u8::to_string).collect();
        parts.push(format!("values {}", values.join(",")));
    }
    parts.join(", ")
}
