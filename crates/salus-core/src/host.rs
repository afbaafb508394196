// ── Host boundary ──
//
// Uniform get/set entry points keyed by `Property`, plus adapters for
// hosts that expect `(error, value)` completion callbacks.

use strum::IntoEnumIterator;
use tracing::debug;

use salus_api::ThermostatApi;

use crate::accessory::ThermostatAccessory;
use crate::error::CoreError;
use crate::properties::{Property, PropertyValue};

impl<A: ThermostatApi> ThermostatAccessory<A> {
    /// Read one property.
    pub async fn get(&self, property: Property) -> Result<PropertyValue, CoreError> {
        debug!(%property, "get");
        match property {
            Property::CurrentHeatingCoolingState => self
                .current_heating_cooling_state()
                .await
                .map(PropertyValue::Uint8),
            Property::TargetHeatingCoolingState => self
                .target_heating_cooling_state()
                .await
                .map(PropertyValue::Uint8),
            Property::CurrentTemperature => {
                self.current_temperature().await.map(PropertyValue::Float)
            }
            Property::TargetTemperature => self.target_temperature().await.map(PropertyValue::Float),
            Property::TemperatureDisplayUnits => {
                Ok(PropertyValue::Uint8(self.temperature_display_units()))
            }
            Property::StatusActive => Ok(PropertyValue::Bool(self.active_status())),
        }
    }

    /// Write one property.
    ///
    /// Display units accept anything and change nothing. Properties
    /// without a setter answer [`CoreError::ReadOnly`].
    pub async fn set(&self, property: Property, value: PropertyValue) -> Result<(), CoreError> {
        debug!(%property, %value, "set");
        match (property, value) {
            (Property::TargetTemperature, PropertyValue::Float(v)) => {
                self.set_target_temperature(v).await
            }
            (Property::TargetTemperature, PropertyValue::Uint8(v)) => {
                self.set_target_temperature(f64::from(v)).await
            }
            (Property::TargetTemperature, PropertyValue::Bool(_)) => {
                Err(CoreError::ValidationFailed {
                    message: format!("{property} expects a number, got {value}"),
                })
            }
            (Property::TemperatureDisplayUnits, PropertyValue::Uint8(units)) => {
                self.set_temperature_display_units(units);
                Ok(())
            }
            (Property::TemperatureDisplayUnits, _) => Ok(()),
            (read_only, _) => Err(CoreError::ReadOnly(read_only)),
        }
    }

    /// Callback form of [`get`](Self::get): `done(error, value)`.
    pub async fn handle_get<F>(&self, property: Property, done: F)
    where
        F: FnOnce(Option<CoreError>, Option<PropertyValue>),
    {
        match self.get(property).await {
            Ok(value) => done(None, Some(value)),
            Err(e) => done(Some(e), None),
        }
    }

    /// Callback form of [`set`](Self::set): `done(error)`.
    pub async fn handle_set<F>(&self, property: Property, value: PropertyValue, done: F)
    where
        F: FnOnce(Option<CoreError>),
    {
        done(self.set(property, value).await.err());
    }

    /// Read every property in declaration order, one request at a time.
    pub async fn snapshot(&self) -> Vec<(Property, Result<PropertyValue, CoreError>)> {
        let mut readings = Vec::new();
        for property in Property::iter() {
            readings.push((property, self.get(property).await));
        }
        readings
    }
}
