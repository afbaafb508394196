// ── Property catalog ──
//
// Names, value types, and metadata of the properties the accessory
// exposes. The numeric codes and bounds are handed to the accessory at
// construction; defaults match the HomeKit Accessory Protocol.

use std::fmt;

use serde::Serialize;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::device::Device;

pub const MANUFACTURER: &str = "Salus";
pub const MODEL: &str = "iT-600";

/// A property of the thermostat accessory.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Property {
    CurrentHeatingCoolingState,
    TargetHeatingCoolingState,
    CurrentTemperature,
    TargetTemperature,
    TemperatureDisplayUnits,
    StatusActive,
}

/// A value read from or written to a property.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Float(f64),
    Uint8(u8),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Uint8(v) => write!(f, "{v}"),
        }
    }
}

/// Codes for the OFF and HEAT states of a heating/cooling property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatingStateCodes {
    pub off: u8,
    pub heat: u8,
}

impl HeatingStateCodes {
    pub fn code(&self, heating: bool) -> u8 {
        if heating { self.heat } else { self.off }
    }
}

/// Declared range and granularity of a temperature property, in °C.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl TemperatureBounds {
    /// Whether `value` is in range and lands on a step.
    pub fn contains(&self, value: f64) -> bool {
        if !value.is_finite() || value < self.min || value > self.max {
            return false;
        }
        let steps = (value - self.min) / self.step;
        (steps - steps.round()).abs() < 1e-6
    }
}

/// Property type definitions handed to the accessory at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessoryTypes {
    pub current_heating_state: HeatingStateCodes,
    pub target_heating_state: HeatingStateCodes,
    pub celsius: u8,
    pub target_temperature: TemperatureBounds,
    pub current_temperature_step: f64,
}

impl Default for AccessoryTypes {
    fn default() -> Self {
        Self {
            current_heating_state: HeatingStateCodes { off: 0, heat: 1 },
            target_heating_state: HeatingStateCodes { off: 0, heat: 1 },
            celsius: 0,
            target_temperature: TemperatureBounds {
                min: 10.0,
                max: 30.0,
                step: 0.5,
            },
            current_temperature_step: 0.1,
        }
    }
}

/// Host-facing metadata for one property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyDescriptor {
    pub property: Property,
    pub readable: bool,
    pub writable: bool,
    pub bounds: Option<TemperatureBounds>,
    pub min_step: Option<f64>,
    pub valid_values: Vec<u8>,
}

impl AccessoryTypes {
    pub fn descriptor(&self, property: Property) -> PropertyDescriptor {
        let mut descriptor = PropertyDescriptor {
            property,
            readable: true,
            writable: false,
            bounds: None,
            min_step: None,
            valid_values: Vec::new(),
        };

        match property {
            Property::CurrentHeatingCoolingState => {
                let codes = self.current_heating_state;
                descriptor.valid_values = vec![codes.off, codes.heat];
            }
            Property::TargetHeatingCoolingState => {
                let codes = self.target_heating_state;
                descriptor.valid_values = vec![codes.off, codes.heat];
            }
            Property::CurrentTemperature => {
                descriptor.min_step = Some(self.current_temperature_step);
            }
            Property::TargetTemperature => {
                descriptor.writable = true;
                descriptor.bounds = Some(self.target_temperature);
                descriptor.min_step = Some(self.target_temperature.step);
            }
            Property::TemperatureDisplayUnits => {
                descriptor.writable = true;
                descriptor.valid_values = vec![self.celsius];
            }
            Property::StatusActive => {}
        }

        descriptor
    }
}

/// Identification shown by the host for this accessory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessoryInformation {
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
}

impl AccessoryInformation {
    pub fn for_device(device: &Device) -> Self {
        Self {
            manufacturer: MANUFACTURER.into(),
            model: MODEL.into(),
            serial_number: device.id.clone(),
        }
    }
}
