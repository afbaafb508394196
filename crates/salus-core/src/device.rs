use serde::Serialize;

/// Mode string the service reports for a thermostat that lost its link.
pub const OFFLINE_MODE: &str = "OFFLINE";

/// Last-observed state of the remote thermostat.
///
/// A cache, not a source of truth: each successful read overwrites the
/// matching field, failed reads leave it alone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Device {
    pub id: String,
    pub name: Option<String>,
    pub heating: bool,
    pub current: f64,
    pub target: f64,
    pub mode: String,
}

impl Device {
    pub fn new(id: impl Into<String>, mode: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            heating: false,
            current: 0.0,
            target: 0.0,
            mode: mode.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Seed the cache with readings known at construction time.
    pub fn with_readings(mut self, heating: bool, current: f64, target: f64) -> Self {
        self.heating = heating;
        self.current = current;
        self.target = target;
        self
    }

    /// Anything but the offline sentinel counts as active, including "".
    pub fn is_active(&self) -> bool {
        self.mode != OFFLINE_MODE
    }
}
