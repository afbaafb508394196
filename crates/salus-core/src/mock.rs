// In-memory `ThermostatApi` for unit tests.

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use chrono::NaiveDate;
use secrecy::{ExposeSecret, SecretString};

use salus_api::{Error, ThermostatApi};

pub(crate) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

pub(crate) fn yesterday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

/// Scripted thermostat service.
///
/// Tokens are issued as `token-1`, `token-2`, …; every call is appended to
/// `calls` so tests can assert ordering.
pub(crate) struct MockApi {
    pub issue_calls: AtomicUsize,
    pub calls: Mutex<Vec<String>>,
    pub heating: AtomicBool,
    pub current: Mutex<String>,
    pub target: Mutex<String>,
    pub updates: Mutex<Vec<f64>>,
    fail_issue: AtomicBool,
    fail_device: AtomicBool,
    issue_delay: Duration,
    device_delay: Duration,
}

impl Default for MockApi {
    fn default() -> Self {
        Self {
            issue_calls: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
            heating: AtomicBool::new(false),
            current: Mutex::new("21.5".into()),
            target: Mutex::new("20.0".into()),
            updates: Mutex::new(Vec::new()),
            fail_issue: AtomicBool::new(false),
            fail_device: AtomicBool::new(false),
            issue_delay: Duration::ZERO,
            device_delay: Duration::ZERO,
        }
    }
}

impl MockApi {
    pub fn with_issue_delay(mut self, delay: Duration) -> Self {
        self.issue_delay = delay;
        self
    }

    pub fn with_device_delay(mut self, delay: Duration) -> Self {
        self.device_delay = delay;
        self
    }

    pub fn fail_issue(&self, fail: bool) {
        self.fail_issue.store(fail, Ordering::SeqCst);
    }

    /// Make every device read and write fail with a timeout.
    pub fn fail_device(&self, fail: bool) {
        self.fail_device.store(fail, Ordering::SeqCst);
    }

    pub fn set_current(&self, raw: &str) {
        *self.current.lock().unwrap() = raw.into();
    }

    pub fn set_target(&self, raw: &str) {
        *self.target.lock().unwrap() = raw.into();
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    async fn device_call(&self, name: &str, token: &SecretString) -> Result<(), Error> {
        self.record(format!("{name}:{}", token.expose_secret()));
        if !self.device_delay.is_zero() {
            tokio::time::sleep(self.device_delay).await;
        }
        if self.fail_device.load(Ordering::SeqCst) {
            return Err(Error::Timeout { timeout_secs: 30 });
        }
        Ok(())
    }
}

impl ThermostatApi for MockApi {
    async fn issue_token(&self) -> Result<SecretString, Error> {
        let n = self.issue_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.record("issue_token".into());
        if !self.issue_delay.is_zero() {
            tokio::time::sleep(self.issue_delay).await;
        }
        if self.fail_issue.load(Ordering::SeqCst) {
            return Err(Error::Authentication {
                message: "login rejected".into(),
            });
        }
        Ok(SecretString::from(format!("token-{n}")))
    }

    async fn get_device_heating(&self, token: &SecretString, _device_id: &str) -> Result<bool, Error> {
        self.device_call("heating", token).await?;
        Ok(self.heating.load(Ordering::SeqCst))
    }

    async fn get_device_current_temperature(
        &self,
        token: &SecretString,
        _device_id: &str,
    ) -> Result<String, Error> {
        self.device_call("current", token).await?;
        Ok(self.current.lock().unwrap().clone())
    }

    async fn get_device_target_temperature(
        &self,
        token: &SecretString,
        _device_id: &str,
    ) -> Result<String, Error> {
        self.device_call("target", token).await?;
        Ok(self.target.lock().unwrap().clone())
    }

    async fn update_temperature(
        &self,
        token: &SecretString,
        _device_id: &str,
        value: f64,
    ) -> Result<(), Error> {
        self.device_call("update", token).await?;
        self.updates.lock().unwrap().push(value);
        Ok(())
    }
}
