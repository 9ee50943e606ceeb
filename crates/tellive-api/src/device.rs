// Device view.
//
// A Device is a handle: the owning client plus a device id, nothing else.
// Every read goes through the client's current cache, so two reads around
// a refresh may observe different values — that is the contract of the
// view model, not a bug. A handle whose id was dropped by a refresh stays
// valid as a handle; its reads fail with `NotFound`.

use std::fmt;

use crate::client::Client;
use crate::error::Error;
use crate::method::{Method, Methods};
use crate::model::{DeviceId, DeviceRecord, UNNAMED};

/// View of one cached device.
#[derive(Clone)]
pub struct Device<'a> {
    client: &'a Client,
    id: DeviceId,
}

impl<'a> Device<'a> {
    pub(crate) fn new(client: &'a Client, id: DeviceId) -> Self {
        Self { client, id }
    }

    /// Id of this device.
    pub fn id(&self) -> &DeviceId {
        &self.id
    }

    fn record(&self) -> Result<DeviceRecord, Error> {
        self.client.device(&self.id)
    }

    // ── Derived state ────────────────────────────────────────────────

    /// Name of the device.
    pub fn name(&self) -> Result<Option<String>, Error> {
        Ok(self.record()?.name)
    }

    /// Last-known state as a single method code.
    pub fn state(&self) -> Result<u32, Error> {
        Ok(self.record()?.state)
    }

    /// State value accompanying `state` (e.g. the dim level as text).
    pub fn statevalue(&self) -> Result<Option<String>, Error> {
        Ok(self.record()?.statevalue)
    }

    /// Methods the device advertises support for.
    pub fn methods(&self) -> Result<Methods, Error> {
        Ok(Methods::new(self.record()?.methods))
    }

    /// `true` if the device is on (state is turn-on or dim).
    pub fn is_on(&self) -> Result<bool, Error> {
        let state = self.state()?;
        Ok(state == Method::TurnOn.bit() || state == Method::Dim.bit())
    }

    /// Current dim level parsed from `statevalue`.
    ///
    /// `None` when the state value is not an integer (e.g. `"unknown"`) —
    /// a malformed value, not an error.
    pub fn dim_level(&self) -> Result<Option<u32>, Error> {
        Ok(self.statevalue()?.and_then(|v| v.parse().ok()))
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Issue a command and, once the server confirms it, patch the cached
    /// `state` to the issued code. A failed command returns `false` and
    /// leaves the cache exactly as it was.
    async fn command(&self, method: Method, extra: &[(&str, String)]) -> bool {
        let Some(endpoint) = method.endpoint() else {
            return false;
        };
        let mut params = vec![("id", self.id.to_string())];
        params.extend(extra.iter().map(|(k, v)| (*k, v.clone())));
        if self.client.execute(endpoint, &params).await {
            self.client.patch_device_state(&self.id, method);
            return true;
        }
        false
    }

    /// Turn the device on.
    pub async fn turn_on(&self) -> bool {
        self.command(Method::TurnOn, &[]).await
    }

    /// Turn the device off.
    pub async fn turn_off(&self) -> bool {
        self.command(Method::TurnOff, &[]).await
    }

    /// Dim the device to `level` (0–255).
    ///
    /// Only `state` is patched on success; `statevalue` keeps the
    /// pre-command level until the next refresh.
    pub async fn dim(&self, level: u8) -> bool {
        self.command(Method::Dim, &[("level", level.to_string())])
            .await
    }

    /// Pull the device up.
    pub async fn up(&self) -> bool {
        self.command(Method::Up, &[]).await
    }

    /// Pull the device down.
    pub async fn down(&self) -> bool {
        self.command(Method::Down, &[]).await
    }

    /// Stop the device.
    pub async fn stop(&self) -> bool {
        self.command(Method::Stop, &[]).await
    }
}

impl fmt::Display for Device<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.record() {
            Ok(device) => write!(
                f,
                "Device@{}:{}({}:{})({})",
                self.id,
                device.name.as_deref().unwrap_or(UNNAMED),
                Methods::new(device.state),
                device.statevalue.as_deref().unwrap_or("-"),
                Methods::new(device.methods),
            ),
            Err(_) => write!(f, "Device@{}(not cached)", self.id),
        }
    }
}
