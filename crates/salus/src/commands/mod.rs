//! Command handlers. Each one connects on its own terms: reads log in up
//! front, while `info` and `login` defer the first request.

pub mod config_cmd;
mod info;
mod login;
mod property;
mod status;

use clap::ValueEnum;

use salus_core::{BridgeConfig, Property, SalusClient, ThermostatAccessory};

use crate::cli::{Command, GlobalOpts, PropertyArg};
use crate::error::CliError;

pub async fn dispatch(
    cmd: Command,
    mut config: BridgeConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Status => {
            let accessory = connect(&config).await?;
            status::handle(&accessory, global).await
        }
        Command::Get { property } => {
            let accessory = connect(&config).await?;
            property::get(&accessory, property.into(), global).await
        }
        Command::SetTarget { celsius } => {
            property::validate_target(celsius)?;
            let accessory = connect(&config).await?;
            property::set_target(&accessory, celsius, global).await
        }
        Command::Info => {
            config.prefetch_token = false;
            let accessory = connect(&config).await?;
            info::handle(&accessory, global)
        }
        Command::Login => {
            config.prefetch_token = false;
            let accessory = connect(&config).await?;
            login::handle(&accessory, global).await
        }
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "command does not need a connection".into(),
        )),
    }
}

async fn connect(config: &BridgeConfig) -> Result<ThermostatAccessory<SalusClient>, CliError> {
    Ok(ThermostatAccessory::connect(config).await?)
}

/// Every property, in declaration order.
pub fn all_properties() -> impl Iterator<Item = Property> {
    PropertyArg::value_variants().iter().copied().map(Property::from)
}

impl From<PropertyArg> for Property {
    fn from(arg: PropertyArg) -> Self {
        match arg {
            PropertyArg::CurrentHeatingCoolingState => Self::CurrentHeatingCoolingState,
            PropertyArg::TargetHeatingCoolingState => Self::TargetHeatingCoolingState,
            PropertyArg::CurrentTemperature => Self::CurrentTemperature,
            PropertyArg::TargetTemperature => Self::TargetTemperature,
            PropertyArg::TemperatureDisplayUnits => Self::TemperatureDisplayUnits,
            PropertyArg::StatusActive => Self::StatusActive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_names_match_property_names() {
        for arg in PropertyArg::value_variants() {
            let name = arg.to_possible_value().map(|v| v.get_name().to_owned());
            assert_eq!(name, Some(Property::from(*arg).to_string()));
        }
    }

    #[test]
    fn all_properties_covers_six() {
        assert_eq!(all_properties().count(), 6);
    }
}
