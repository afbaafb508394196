// Wire types for the Salus web service.

use serde::{Deserialize, Deserializer};

/// Channel-1 readings from `ajax_device_values.php`.
///
/// The service sends most values as strings, but some firmware revisions
/// emit bare numbers. Both are kept as the string the service meant.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeviceValues {
    #[serde(rename = "CH1currentRoomTemp", deserialize_with = "string_or_number")]
    pub current_room_temp: String,

    #[serde(rename = "CH1currentSetPoint", deserialize_with = "string_or_number")]
    pub current_set_point: String,

    #[serde(rename = "CH1heatOnOffStatus", deserialize_with = "string_or_number")]
    pub heat_on_off_status: String,
}

impl DeviceValues {
    /// `CH1heatOnOffStatus` is `"1"` while the boiler is firing.
    pub fn is_heating(&self) -> bool {
        self.heat_on_off_status.trim() == "1"
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn decodes_string_values() {
        let values: DeviceValues = serde_json::from_str(
            r#"{
                "CH1currentRoomTemp": "21.5",
                "CH1currentSetPoint": "20.0",
                "CH1heatOnOffStatus": "1",
                "CH1autoOff": "0",
                "frost": "7"
            }"#,
        )
        .unwrap();

        assert_eq!(
            values,
            DeviceValues {
                current_room_temp: "21.5".into(),
                current_set_point: "20.0".into(),
                heat_on_off_status: "1".into(),
            }
        );
        assert!(values.is_heating());
    }

    #[test]
    fn decodes_numeric_values() {
        let values: DeviceValues = serde_json::from_str(
            r#"{"CH1currentRoomTemp": 19.5, "CH1currentSetPoint": 18, "CH1heatOnOffStatus": 0}"#,
        )
        .unwrap();

        assert_eq!(values.current_room_temp, "19.5");
        assert_eq!(values.current_set_point, "18");
        assert!(!values.is_heating());
    }

    #[test]
    fn rejects_null_reading() {
        let result = serde_json::from_str::<DeviceValues>(
            r#"{"CH1currentRoomTemp": null, "CH1currentSetPoint": "18", "CH1heatOnOffStatus": "0"}"#,
        );
        assert!(result.is_err());
    }
}
