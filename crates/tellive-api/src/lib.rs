// tellive-api: Async Rust client for the Telldus Live cloud API

pub mod client;
pub mod device;
pub mod error;
pub mod method;
pub mod model;
pub mod oauth;
pub mod scale;
pub mod sensor;
pub mod transport;

pub use client::{API_URL, Client};
pub use device::Device;
pub use error::Error;
pub use method::{Method, Methods, SUPPORTED_METHODS};
pub use model::{
    DeviceId, DeviceRecord, SensorDatum, SensorId, SensorRecord, UNNAMED, UserProfile,
};
pub use oauth::Credentials;
pub use scale::SensorKind;
pub use sensor::{DataItem, DataItemId, Sensor};
pub use transport::TransportConfig;
