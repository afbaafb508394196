use std::future::Future;

use secrecy::SecretString;

use crate::client::SalusClient;
use crate::error::Error;

/// The remote operations the bridge needs from a thermostat service.
///
/// Every call is keyed by a device id and a token obtained from
/// [`issue_token`](Self::issue_token). Temperatures come back as the
/// decimal strings the service sends; parsing belongs to the caller.
pub trait ThermostatApi: Send + Sync {
    /// Open a session and return a fresh API token.
    fn issue_token(&self) -> impl Future<Output = Result<SecretString, Error>> + Send;

    /// Whether the device is currently calling for heat.
    fn get_device_heating(
        &self,
        token: &SecretString,
        device_id: &str,
    ) -> impl Future<Output = Result<bool, Error>> + Send;

    /// Measured room temperature, as a decimal string.
    fn get_device_current_temperature(
        &self,
        token: &SecretString,
        device_id: &str,
    ) -> impl Future<Output = Result<String, Error>> + Send;

    /// Current set point, as a decimal string.
    fn get_device_target_temperature(
        &self,
        token: &SecretString,
        device_id: &str,
    ) -> impl Future<Output = Result<String, Error>> + Send;

    /// Change the set point. Resolves once the service acknowledged it.
    fn update_temperature(
        &self,
        token: &SecretString,
        device_id: &str,
        value: f64,
    ) -> impl Future<Output = Result<(), Error>> + Send;
}

impl ThermostatApi for SalusClient {
    async fn issue_token(&self) -> Result<SecretString, Error> {
        self.login().await
    }

    async fn get_device_heating(&self, token: &SecretString, device_id: &str) -> Result<bool, Error> {
        Ok(self.device_values(token, device_id).await?.is_heating())
    }

    async fn get_device_current_temperature(
        &self,
        token: &SecretString,
        device_id: &str,
    ) -> Result<String, Error> {
        Ok(self.device_values(token, device_id).await?.current_room_temp)
    }

    async fn get_device_target_temperature(
        &self,
        token: &SecretString,
        device_id: &str,
    ) -> Result<String, Error> {
        Ok(self.device_values(token, device_id).await?.current_set_point)
    }

    async fn update_temperature(
        &self,
        token: &SecretString,
        device_id: &str,
        value: f64,
    ) -> Result<(), Error> {
        self.set_target_temperature(token, device_id, value).await
    }
}
