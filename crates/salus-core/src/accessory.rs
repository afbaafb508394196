// ── Thermostat accessory ──
//
// Bridges property requests to the remote service. Each remote-backed
// read obtains a valid token, fetches the value, updates the cached
// `Device` field, and returns the fetched value itself. Nothing is
// retried and a failed request leaves the cache as it was.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use salus_api::{Credentials, SalusClient, ThermostatApi, TlsMode, TransportConfig};

use crate::clock::{Clock, SystemClock};
use crate::config::{BridgeConfig, TlsVerification};
use crate::device::Device;
use crate::error::CoreError;
use crate::guard::{RefreshPolicy, TokenGuard};
use crate::properties::{AccessoryInformation, AccessoryTypes};
use crate::token::Token;

/// A single Salus thermostat exposed as an accessory.
///
/// `Send + Sync`; share it behind an `Arc` to serve concurrent requests.
pub struct ThermostatAccessory<A> {
    api: Arc<A>,
    guard: TokenGuard<A>,
    types: AccessoryTypes,
    device_id: String,
    device: RwLock<Device>,
}

/// Builder for [`ThermostatAccessory`].
pub struct AccessoryBuilder<A> {
    api: Arc<A>,
    device: Device,
    types: AccessoryTypes,
    clock: Arc<dyn Clock>,
    policy: RefreshPolicy,
    token: Option<Token>,
}

impl<A: ThermostatApi> AccessoryBuilder<A> {
    pub fn types(mut self, types: AccessoryTypes) -> Self {
        self.types = types;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn refresh_policy(mut self, policy: RefreshPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Start with an already issued token.
    pub fn token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }

    pub fn build(self) -> ThermostatAccessory<A> {
        let mut guard = TokenGuard::new(Arc::clone(&self.api), self.clock, self.policy);
        if let Some(token) = self.token {
            guard = guard.with_token(token);
        }

        ThermostatAccessory {
            api: self.api,
            guard,
            types: self.types,
            device_id: self.device.id.clone(),
            device: RwLock::new(self.device),
        }
    }
}

impl<A: ThermostatApi> ThermostatAccessory<A> {
    pub fn builder(api: Arc<A>, device: Device) -> AccessoryBuilder<A> {
        AccessoryBuilder {
            api,
            device,
            types: AccessoryTypes::default(),
            clock: Arc::new(SystemClock),
            policy: RefreshPolicy::default(),
            token: None,
        }
    }

    pub fn token_guard(&self) -> &TokenGuard<A> {
        &self.guard
    }

    pub fn types(&self) -> &AccessoryTypes {
        &self.types
    }

    /// Snapshot of the cached device state.
    pub fn device(&self) -> Device {
        self.device_read().clone()
    }

    pub fn information(&self) -> AccessoryInformation {
        AccessoryInformation::for_device(&self.device_read())
    }

    // ── Heating state ────────────────────────────────────────────────

    /// HEAT while the boiler is firing, OFF otherwise.
    pub async fn current_heating_cooling_state(&self) -> Result<u8, CoreError> {
        let heating = self.fetch_heating().await?;
        Ok(self.types.current_heating_state.code(heating))
    }

    /// Same remote flag as the current state; the service has no separate
    /// target mode.
    pub async fn target_heating_cooling_state(&self) -> Result<u8, CoreError> {
        let heating = self.fetch_heating().await?;
        Ok(self.types.target_heating_state.code(heating))
    }

    async fn fetch_heating(&self) -> Result<bool, CoreError> {
        let token = self.guard.token().await?;
        let heating = self
            .api
            .get_device_heating(token.value(), &self.device_id)
            .await?;
        self.device_write().heating = heating;
        Ok(heating)
    }

    // ── Temperatures ─────────────────────────────────────────────────

    pub async fn current_temperature(&self) -> Result<f64, CoreError> {
        let token = self.guard.token().await?;
        let raw = self
            .api
            .get_device_current_temperature(token.value(), &self.device_id)
            .await?;
        let value = parse_temperature("current temperature", &raw)?;
        self.device_write().current = value;
        Ok(value)
    }

    pub async fn target_temperature(&self) -> Result<f64, CoreError> {
        let token = self.guard.token().await?;
        let raw = self
            .api
            .get_device_target_temperature(token.value(), &self.device_id)
            .await?;
        let value = parse_temperature("target temperature", &raw)?;
        self.device_write().target = value;
        Ok(value)
    }

    /// Send a new set point; resolves once the service acknowledged it.
    ///
    /// Range checks belong to the host, which knows the declared bounds.
    pub async fn set_target_temperature(&self, value: f64) -> Result<(), CoreError> {
        let token = self.guard.token().await?;
        debug!(device_id = %self.device_id, value, "setting target temperature");
        if let Err(e) = self
            .api
            .update_temperature(token.value(), &self.device_id, value)
            .await
        {
            warn!(device_id = %self.device_id, error = %e, "set point rejected");
            return Err(e.into());
        }
        self.device_write().target = value;
        Ok(())
    }

    // ── Fixed and local properties ───────────────────────────────────

    /// Always Celsius; the thermostat has no unit setting.
    pub fn temperature_display_units(&self) -> u8 {
        self.types.celsius
    }

    /// Accepted and ignored.
    pub fn set_temperature_display_units(&self, units: u8) {
        debug!(units, "ignoring display unit change");
    }

    /// Answered from the cached mode, without a remote call.
    pub fn active_status(&self) -> bool {
        self.device_read().is_active()
    }

    // ── Cache access ─────────────────────────────────────────────────

    fn device_read(&self) -> RwLockReadGuard<'_, Device> {
        self.device.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn device_write(&self) -> RwLockWriteGuard<'_, Device> {
        self.device.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ThermostatAccessory<SalusClient> {
    /// Build the HTTP client and accessory from a `BridgeConfig`.
    ///
    /// Logs in right away when `prefetch_token` is set, so bad credentials
    /// surface here rather than on the first property read.
    pub async fn connect(config: &BridgeConfig) -> Result<Self, CoreError> {
        let transport = build_transport(config);
        let credentials = Credentials {
            email: config.email.clone(),
            password: config.password.clone(),
        };
        let client = SalusClient::new(config.endpoint.clone(), credentials, &transport)?;

        let accessory = Self::builder(Arc::new(client), config.device.to_device())
            .refresh_policy(config.token_refresh)
            .build();

        if config.prefetch_token {
            accessory.guard.prefetch().await?;
        }

        info!(device_id = %config.device.id, "accessory ready");
        Ok(accessory)
    }
}

fn build_transport(config: &BridgeConfig) -> TransportConfig {
    let tls = match &config.tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    };
    TransportConfig {
        tls,
        timeout: config.timeout,
    }
}

/// Parse a decimal temperature string strictly; junk is an error, never 0.
fn parse_temperature(field: &'static str, raw: &str) -> Result<f64, CoreError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CoreError::Parse {
            field,
            raw: raw.to_owned(),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use secrecy::SecretString;

    use super::*;
    use crate::clock::ManualClock;
    use crate::mock::{MockApi, today, yesterday};

    fn accessory_with(api: &Arc<MockApi>, policy: RefreshPolicy) -> ThermostatAccessory<MockApi> {
        ThermostatAccessory::builder(
            Arc::clone(api),
            Device::new("12345", "ONLINE").with_readings(false, 19.0, 20.0),
        )
        .clock(Arc::new(ManualClock::new(today())))
        .refresh_policy(policy)
        .build()
    }

    fn accessory(api: &Arc<MockApi>) -> ThermostatAccessory<MockApi> {
        accessory_with(api, RefreshPolicy::SingleFlight)
    }

    #[test]
    fn parses_decimal_strings() {
        assert_eq!(parse_temperature("t", "21.5").unwrap(), 21.5);
        assert_eq!(parse_temperature("t", " 18 ").unwrap(), 18.0);
        assert_eq!(parse_temperature("t", "-2.5").unwrap(), -2.5);
    }

    #[test]
    fn rejects_non_numeric_strings() {
        for raw in ["", "abc", "21.5C", "NaN", "inf"] {
            let err = parse_temperature("current temperature", raw).unwrap_err();
            assert!(
                matches!(err, CoreError::Parse { field: "current temperature", .. }),
                "expected Parse error for {raw:?}, got {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn heating_maps_to_heat_and_off_for_both_states() {
        let api = Arc::new(MockApi::default());
        let accessory = accessory(&api);

        api.heating.store(true, Ordering::SeqCst);
        assert_eq!(accessory.current_heating_cooling_state().await.unwrap(), 1);
        assert_eq!(accessory.target_heating_cooling_state().await.unwrap(), 1);
        assert!(accessory.device().heating);

        api.heating.store(false, Ordering::SeqCst);
        assert_eq!(accessory.current_heating_cooling_state().await.unwrap(), 0);
        assert_eq!(accessory.target_heating_cooling_state().await.unwrap(), 0);
        assert!(!accessory.device().heating);
    }

    #[tokio::test]
    async fn injected_codes_are_used() {
        let api = Arc::new(MockApi::default());
        api.heating.store(true, Ordering::SeqCst);
        let mut types = AccessoryTypes::default();
        types.target_heating_state.heat = 7;

        let accessory = ThermostatAccessory::builder(Arc::clone(&api), Device::new("1", ""))
            .clock(Arc::new(ManualClock::new(today())))
            .types(types)
            .build();

        assert_eq!(accessory.target_heating_cooling_state().await.unwrap(), 7);
        assert_eq!(accessory.current_heating_cooling_state().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn temperatures_are_parsed_and_cached() {
        let api = Arc::new(MockApi::default());
        api.set_current("21.5");
        api.set_target("22.0");
        let accessory = accessory(&api);

        assert_eq!(accessory.current_temperature().await.unwrap(), 21.5);
        assert_eq!(accessory.target_temperature().await.unwrap(), 22.0);

        let device = accessory.device();
        assert_eq!(device.current, 21.5);
        assert_eq!(device.target, 22.0);
    }

    #[tokio::test]
    async fn parse_failure_leaves_cache_untouched() {
        let api = Arc::new(MockApi::default());
        api.set_current("--.-");
        let accessory = accessory(&api);

        let err = accessory.current_temperature().await.unwrap_err();

        assert!(matches!(err, CoreError::Parse { .. }));
        assert_eq!(accessory.device().current, 19.0);
    }

    #[tokio::test]
    async fn failed_read_leaves_cache_untouched() {
        let api = Arc::new(MockApi::default());
        api.fail_device(true);
        let accessory = accessory(&api);

        let err = accessory.target_temperature().await.unwrap_err();

        assert!(matches!(err, CoreError::Timeout { .. }));
        assert_eq!(accessory.device().target, 20.0);
    }

    #[tokio::test]
    async fn set_target_updates_cache_after_remote_ack() {
        let api = Arc::new(MockApi::default());
        let accessory = accessory(&api);

        accessory.set_target_temperature(22.0).await.unwrap();

        assert_eq!(*api.updates.lock().unwrap(), vec![22.0]);
        assert_eq!(accessory.device().target, 22.0);
    }

    #[tokio::test]
    async fn rejected_set_keeps_prior_target() {
        let api = Arc::new(MockApi::default());
        api.fail_device(true);
        let accessory = accessory(&api);

        let result = accessory.set_target_temperature(22.0).await;

        assert!(result.is_err());
        assert_eq!(accessory.device().target, 20.0);
    }

    #[tokio::test]
    async fn token_failure_fails_the_read_without_fetching() {
        let api = Arc::new(MockApi::default());
        api.fail_issue(true);
        let accessory = accessory(&api);

        let err = accessory.current_temperature().await.unwrap_err();

        assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
        assert_eq!(api.calls(), vec!["issue_token"]);
    }

    #[tokio::test]
    async fn stale_token_triggers_one_refresh_before_fetch() {
        let api = Arc::new(MockApi::default());
        let accessory = ThermostatAccessory::builder(Arc::clone(&api), Device::new("1", "ONLINE"))
            .clock(Arc::new(ManualClock::new(today())))
            .token(Token::new(SecretString::from("old".to_string()), yesterday()))
            .build();

        accessory.current_temperature().await.unwrap();

        assert_eq!(api.issue_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.calls(), vec!["issue_token", "current:token-1"]);
    }

    #[tokio::test]
    async fn fresh_token_is_used_as_is() {
        let api = Arc::new(MockApi::default());
        let accessory = ThermostatAccessory::builder(Arc::clone(&api), Device::new("1", "ONLINE"))
            .clock(Arc::new(ManualClock::new(today())))
            .token(Token::new(SecretString::from("today".to_string()), today()))
            .build();

        accessory.target_temperature().await.unwrap();

        assert_eq!(api.calls(), vec!["target:today"]);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_reads_with_stale_token_return_their_own_values() {
        for policy in [RefreshPolicy::SingleFlight, RefreshPolicy::Independent] {
            let api = Arc::new(
                MockApi::default()
                    .with_issue_delay(Duration::from_millis(20))
                    .with_device_delay(Duration::from_millis(5)),
            );
            api.set_current("21.5");
            api.set_target("23.0");
            let accessory = accessory_with(&api, policy);

            let (current, target) =
                tokio::join!(accessory.current_temperature(), accessory.target_temperature());

            assert_eq!(current.unwrap(), 21.5);
            assert_eq!(target.unwrap(), 23.0);

            let issued = api.issue_calls.load(Ordering::SeqCst);
            match policy {
                RefreshPolicy::SingleFlight => assert_eq!(issued, 1),
                RefreshPolicy::Independent => assert!((1..=2).contains(&issued)),
            }
        }
    }

    #[test]
    fn active_status_follows_cached_mode() {
        let api = Arc::new(MockApi::default());
        let offline = ThermostatAccessory::builder(Arc::clone(&api), Device::new("1", "OFFLINE"))
            .build();
        let blank = ThermostatAccessory::builder(Arc::clone(&api), Device::new("1", "")).build();

        assert!(!offline.active_status());
        assert!(blank.active_status());
        assert!(api.calls().is_empty());
    }

    #[test]
    fn display_units_are_fixed_celsius() {
        let api = Arc::new(MockApi::default());
        let accessory = accessory(&api);

        accessory.set_temperature_display_units(1);

        assert_eq!(accessory.temperature_display_units(), 0);
        assert!(api.calls().is_empty());
    }
}
