// Telldus Live HTTP client and device/sensor cache.
//
// The Client owns the signed session and a point-in-time snapshot of the
// account's devices and sensors. View objects (`Device`, `Sensor`,
// `DataItem`) hold only an id plus a reference back here and re-read the
// cache on every access; commands patch the cache in place after the
// server confirms them.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};
use url::Url;

use crate::device::Device;
use crate::error::Error;
use crate::method::{Method, SUPPORTED_METHODS};
use crate::model::{DeviceId, DeviceList, DeviceRecord, SensorId, SensorList, SensorRecord, UserProfile};
use crate::oauth::{self, Credentials};
use crate::sensor::{DataItem, DataItemId, Sensor};
use crate::transport::TransportConfig;

/// Base endpoint of the Telldus Live JSON API.
pub const API_URL: &str = "https://api.telldus.com/json/";

#[derive(Default)]
struct Cache {
    devices: HashMap<DeviceId, DeviceRecord>,
    sensors: HashMap<SensorId, SensorRecord>,
}

/// Telldus Live client.
///
/// All remote calls are signed GETs against the JSON API. The cache is
/// replaced wholesale by [`refresh`](Client::refresh) and patched in place
/// by confirmed device commands; it is never mutated on a failed call.
///
/// The design assumes one logical thread of control — calls are awaited
/// sequentially and the internal lock is only the serialization between a
/// command's confirmation and its cache patch, never held across an await.
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    cache: RwLock<Cache>,
}

impl Client {
    /// Create a client for the public API endpoint with default transport.
    pub fn new(credentials: Credentials) -> Result<Self, Error> {
        Self::with_transport(credentials, &TransportConfig::default())
    }

    /// Create a client for the public API endpoint with a custom transport.
    pub fn with_transport(
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        Self::with_base_url(credentials, Url::parse(API_URL)?, transport)
    }

    /// Create a client against an explicit base URL.
    ///
    /// Used by tests and self-hosted proxies; `base_url` should end with a
    /// trailing slash so endpoint paths append cleanly.
    pub fn with_base_url(
        credentials: Credentials,
        base_url: Url,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            base_url,
            credentials,
            cache: RwLock::new(Cache::default()),
        })
    }

    fn api_url(&self, path: &str) -> Url {
        self.base_url.join(path).expect("invalid API URL")
    }

    fn cache_read(&self) -> RwLockReadGuard<'_, Cache> {
        self.cache.read().expect("cache lock poisoned")
    }

    fn cache_write(&self) -> RwLockWriteGuard<'_, Cache> {
        self.cache.write().expect("cache lock poisoned")
    }

    // ── Remote calls ─────────────────────────────────────────────────

    /// Send one signed GET to the Telldus Live API.
    ///
    /// Returns `Ok(None)` when the request did not complete (connect,
    /// timeout, or HTTP-status failure) — logged here, never propagated as
    /// a raw transport error. A well-formed body carrying an `error`
    /// payload fails with [`Error::RemoteApi`] and the server's message.
    pub async fn request(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Option<Value>, Error> {
        let mut url = self.api_url(path);
        url.query_pairs_mut().extend_pairs(params);
        let authorization = oauth::authorization_header(&self.credentials, &url);
        debug!(%url, "GET");

        let response = match self
            .http
            .get(url)
            .header(AUTHORIZATION, authorization)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
        {
            Ok(response) => response,
            Err(err) => {
                error!("request to {path} failed: {err}");
                return Ok(None);
            }
        };

        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                error!("request to {path} failed while reading the body: {err}");
                return Ok(None);
            }
        };

        let value: Value = serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: body.clone(),
        })?;

        if let Some(err) = value.get("error") {
            let message = err.as_str().map_or_else(|| err.to_string(), ToOwned::to_owned);
            return Err(Error::RemoteApi { message });
        }

        Ok(Some(value))
    }

    /// Make a request and check whether the server confirmed it.
    ///
    /// `true` only when the request completed and the body's `status`
    /// field equals `"success"`; every other outcome — absent result,
    /// remote error, missing or different status — is `false`. Never errs.
    pub async fn execute(&self, path: &str, params: &[(&str, String)]) -> bool {
        match self.request(path, params).await {
            Ok(Some(body)) => body.get("status").and_then(Value::as_str) == Some("success"),
            Ok(None) => false,
            Err(err) => {
                warn!("command {path} rejected: {err}");
                false
            }
        }
    }

    async fn request_devices(&self) -> Result<Option<Vec<DeviceRecord>>, Error> {
        let params = [
            ("supportedMethods", SUPPORTED_METHODS.to_string()),
            ("includeIgnored", "0".to_owned()),
        ];
        match self.request("devices/list", &params).await? {
            Some(body) => Ok(Some(decode::<DeviceList>(body)?.device)),
            None => Ok(None),
        }
    }

    async fn request_sensors(&self) -> Result<Option<Vec<SensorRecord>>, Error> {
        let params = [
            ("includeValues", "1".to_owned()),
            ("includeScale", "1".to_owned()),
            ("includeIgnored", "0".to_owned()),
        ];
        match self.request("sensors/list", &params).await? {
            Some(body) => Ok(Some(decode::<SensorList>(body)?.sensor)),
            None => Ok(None),
        }
    }

    /// Request the account's user details.
    pub async fn user_profile(&self) -> Result<Option<UserProfile>, Error> {
        match self.request("user/profile", &[]).await? {
            Some(body) => Ok(Some(decode(body)?)),
            None => Ok(None),
        }
    }

    /// Pull devices and sensors from the server and replace the cache.
    ///
    /// Both lists must arrive before either map is touched, so a partial
    /// failure can never replace a previously good snapshot with empty
    /// data. On any failure the prior cache contents stay as they were.
    pub async fn refresh(&self) -> Result<(), Error> {
        let devices = self
            .request_devices()
            .await?
            .ok_or_else(|| Error::Incomplete {
                path: "devices/list".to_owned(),
            })?;
        let sensors = self
            .request_sensors()
            .await?
            .ok_or_else(|| Error::Incomplete {
                path: "sensors/list".to_owned(),
            })?;

        let mut cache = self.cache_write();
        cache.devices = devices.into_iter().map(|d| (d.id.clone(), d)).collect();
        cache.sensors = sensors.into_iter().map(|s| (s.id.clone(), s)).collect();
        Ok(())
    }

    // ── Cache reads ──────────────────────────────────────────────────

    /// The current cached record for a device id.
    pub fn device(&self, id: &DeviceId) -> Result<DeviceRecord, Error> {
        self.cache_read()
            .devices
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound {
                kind: "device",
                id: id.to_string(),
            })
    }

    /// The current cached record for a sensor id.
    pub fn sensor(&self, id: &SensorId) -> Result<SensorRecord, Error> {
        self.cache_read()
            .sensors
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound {
                kind: "sensor",
                id: id.to_string(),
            })
    }

    // ── View factories ───────────────────────────────────────────────

    /// One [`Device`] view per currently cached device id.
    ///
    /// No ordering is guaranteed across entries or across refreshes.
    pub fn devices(&self) -> impl Iterator<Item = Device<'_>> {
        let ids: Vec<DeviceId> = self.cache_read().devices.keys().cloned().collect();
        ids.into_iter().map(move |id| Device::new(self, id))
    }

    /// One [`Sensor`] view per currently cached sensor id.
    pub fn sensors(&self) -> impl Iterator<Item = Sensor<'_>> {
        let ids: Vec<SensorId> = self.cache_read().sensors.keys().cloned().collect();
        ids.into_iter().map(move |id| Sensor::new(self, id))
    }

    /// Every [`DataItem`] view of every cached sensor, in sensor-then-data
    /// order.
    pub fn sensor_data_items(&self) -> Vec<DataItem<'_>> {
        let triples: Vec<DataItemId> = {
            let cache = self.cache_read();
            cache
                .sensors
                .iter()
                .flat_map(|(id, sensor)| {
                    sensor.data.iter().map(move |datum| DataItemId {
                        sensor: id.clone(),
                        name: datum.name.clone(),
                        scale: datum.scale.clone(),
                    })
                })
                .collect()
        };
        triples
            .into_iter()
            .map(|id| DataItem::new(self, id))
            .collect()
    }

    // ── Cache writes ─────────────────────────────────────────────────

    /// Patch a cached device's `state` after a confirmed command.
    ///
    /// Only `state` changes; `statevalue` keeps its pre-command value
    /// until the next refresh.
    pub(crate) fn patch_device_state(&self, id: &DeviceId, method: Method) {
        if let Some(device) = self.cache_write().devices.get_mut(id) {
            device.state = method.bit();
        }
    }
}

fn decode<T: DeserializeOwned>(body: Value) -> Result<T, Error> {
    let rendered = body.to_string();
    serde_json::from_value(body).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: rendered,
    })
}
