// Sensor and DataItem views.
//
// Both are handles in the same sense as `Device`: an id (or id-triple)
// plus a reference to the owning client. A DataItem never stores its
// value — it is resolved against the sensor's current data sequence on
// every read, so the result can change between two calls without any
// invalidation step.

use std::fmt;

use crate::client::Client;
use crate::error::Error;
use crate::model::{SensorDatum, SensorId, SensorRecord, UNNAMED};

/// View of one cached sensor.
#[derive(Clone)]
pub struct Sensor<'a> {
    client: &'a Client,
    id: SensorId,
}

impl<'a> Sensor<'a> {
    pub(crate) fn new(client: &'a Client, id: SensorId) -> Self {
        Self { client, id }
    }

    /// Id of this sensor.
    pub fn id(&self) -> &SensorId {
        &self.id
    }

    fn record(&self) -> Result<SensorRecord, Error> {
        self.client.sensor(&self.id)
    }

    /// Name of the sensor.
    pub fn name(&self) -> Result<Option<String>, Error> {
        Ok(self.record()?.name)
    }

    /// The sensor's current measurement sequence.
    pub fn data(&self) -> Result<Vec<SensorDatum>, Error> {
        Ok(self.record()?.data)
    }

    /// One [`DataItem`] view per entry in the current data sequence.
    ///
    /// Handles are cheap and constructed fresh on each call.
    pub fn data_items(&self) -> Result<Vec<DataItem<'a>>, Error> {
        Ok(self
            .record()?
            .data
            .into_iter()
            .map(|datum| {
                DataItem::new(
                    self.client,
                    DataItemId {
                        sensor: self.id.clone(),
                        name: datum.name,
                        scale: datum.scale,
                    },
                )
            })
            .collect())
    }

    /// A [`DataItem`] view for an arbitrary `(name, scale)` pair.
    ///
    /// The pair does not have to exist in the current data sequence; a
    /// non-matching triple simply resolves its value to `None`.
    pub fn data_item(&self, name: impl Into<String>, scale: impl Into<String>) -> DataItem<'a> {
        DataItem::new(
            self.client,
            DataItemId {
                sensor: self.id.clone(),
                name: name.into(),
                scale: scale.into(),
            },
        )
    }
}

impl fmt::Display for Sensor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.record() {
            Ok(sensor) => {
                let items = sensor
                    .data
                    .iter()
                    .map(|d| format!("{}={}", d.name, d.value))
                    .collect::<Vec<_>>()
                    .join(",");
                write!(
                    f,
                    "Sensor@{}:{}({items})",
                    self.id,
                    sensor.name.as_deref().unwrap_or(UNNAMED),
                )
            }
            Err(_) => write!(f, "Sensor@{}(not cached)", self.id),
        }
    }
}

// ── DataItem ────────────────────────────────────────────────────────

/// Identity of a data item: the owning sensor plus a `(name, scale)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataItemId {
    pub sensor: SensorId,
    pub name: String,
    pub scale: String,
}

/// View of one `(sensor, measurement-name, scale)` triple.
#[derive(Clone)]
pub struct DataItem<'a> {
    client: &'a Client,
    id: DataItemId,
}

impl<'a> DataItem<'a> {
    pub(crate) fn new(client: &'a Client, id: DataItemId) -> Self {
        Self { client, id }
    }

    /// Full identity triple of this data item.
    pub fn item_id(&self) -> &DataItemId {
        &self.id
    }

    /// Id of the owning sensor.
    pub fn sensor_id(&self) -> &SensorId {
        &self.id.sensor
    }

    /// Measurement name.
    pub fn name(&self) -> &str {
        &self.id.name
    }

    /// Measurement scale.
    pub fn scale(&self) -> &str {
        &self.id.scale
    }

    /// A fresh [`Sensor`] view for the owning sensor.
    pub fn sensor(&self) -> Sensor<'a> {
        Sensor::new(self.client, self.id.sensor.clone())
    }

    /// Resolve the current value by `(name, scale)` lookup against the
    /// owning sensor's data sequence.
    ///
    /// `Ok(None)` when no entry matches the triple; `NotFound` only when
    /// the sensor itself is gone from the cache.
    pub fn value(&self) -> Result<Option<String>, Error> {
        let record = self.client.sensor(&self.id.sensor)?;
        Ok(record
            .data
            .into_iter()
            .find(|d| d.name == self.id.name && d.scale == self.id.scale)
            .map(|d| d.value))
    }
}

impl fmt::Display for DataItem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.client.sensor(&self.id.sensor) {
            Ok(sensor) => {
                let value = sensor
                    .data
                    .iter()
                    .find(|d| d.name == self.id.name && d.scale == self.id.scale)
                    .map_or("-", |d| d.value.as_str());
                write!(
                    f,
                    "DataItem@{}:{}({}={value})",
                    self.id.sensor,
                    sensor.name.as_deref().unwrap_or(UNNAMED),
                    self.id.name,
                )
            }
            Err(_) => write!(f, "DataItem@{}(not cached)", self.id.sensor),
        }
    }
}
