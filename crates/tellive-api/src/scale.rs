// Sensor measurement registry.
//
// Sensors report a list of named measurements; the `name` field of each
// entry uses the identifiers below. The last two identifiers are inherited
// from the upstream protocol without confirmation and should be treated as
// provisional.

use strum::{EnumIter, IntoEnumIterator};

/// Kind of measurement a sensor data entry carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum SensorKind {
    Temperature,
    Humidity,
    RainRate,
    RainTotal,
    WindDirection,
    WindAverage,
    WindGust,
    Uv,
    Watt,
    Luminance,
    /// Identifier not confirmed upstream.
    DewPoint,
    /// Identifier not confirmed upstream.
    BarometricPressure,
}

impl SensorKind {
    /// The protocol identifier used in sensor data entries.
    pub const fn identifier(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::RainRate => "rrate",
            Self::RainTotal => "rtot",
            Self::WindDirection => "wdir",
            Self::WindAverage => "wavg",
            Self::WindGust => "wgust",
            Self::Uv => "uv",
            Self::Watt => "watt",
            Self::Luminance => "lum",
            Self::DewPoint => "dew",
            Self::BarometricPressure => "?",
        }
    }

    /// The kind for a protocol identifier, if it is a known one.
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        Self::iter().find(|k| k.identifier() == identifier)
    }
}
