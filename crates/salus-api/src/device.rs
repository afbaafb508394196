// Device endpoints
//
// Reads go through the AJAX polling endpoint the web UI uses; writes go
// through the form handler behind the set-point slider.

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::SalusClient;
use crate::error::Error;
use crate::models::DeviceValues;

const VALUES_PATH: &str = "public/ajax_device_values.php";
const SET_PATH: &str = "includes/set.php";

impl SalusClient {
    /// Fetch the current readings of one device.
    ///
    /// `GET /public/ajax_device_values.php?devId={id}&token={token}&_={ms}`
    ///
    /// The `_` parameter is a cache buster, as sent by the web UI.
    pub async fn device_values(
        &self,
        token: &SecretString,
        device_id: &str,
    ) -> Result<DeviceValues, Error> {
        let url = self.url(VALUES_PATH)?;
        debug!(device_id, "fetching device values");

        let query = [
            ("devId", device_id.to_owned()),
            ("token", token.expose_secret().to_owned()),
            ("_", Utc::now().timestamp_millis().to_string()),
        ];
        self.get_json(url, &query).await
    }

    /// Change the zone-1 set point.
    ///
    /// `POST /includes/set.php` with `current_tempZ1={value}`
    pub async fn set_target_temperature(
        &self,
        token: &SecretString,
        device_id: &str,
        value: f64,
    ) -> Result<(), Error> {
        let url = self.url(SET_PATH)?;
        debug!(device_id, value, "updating set point");

        let value = value.to_string();
        let form = [
            ("token", token.expose_secret()),
            ("devId", device_id),
            ("tempUnit", "0"),
            ("current_tempZ1_set", "1"),
            ("current_tempZ1", value.as_str()),
        ];
        self.post_form(url, &form).await?;
        Ok(())
    }
}
