// Device method registry.
//
// Tellstick devices advertise capabilities as a bitmask of method codes,
// and report their last-known state as a single code. The server accepts
// commands on a subset of the codes only; everything else (bell, toggle,
// learn, RGBW, thermostat) is reported but not commandable through this
// client.

use std::fmt;

use strum::{Display, EnumIter, IntoEnumIterator};

/// A single Tellstick method code (bit-flag integer on the wire).
///
/// Iteration order via [`Method::iter`] is the declaration order below and
/// is relied on for stable `A|B|C` renderings of flag sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[repr(u32)]
pub enum Method {
    #[strum(serialize = "TURNON")]
    TurnOn = 1,
    #[strum(serialize = "TURNOFF")]
    TurnOff = 2,
    #[strum(serialize = "BELL")]
    Bell = 4,
    #[strum(serialize = "TOGGLE")]
    Toggle = 8,
    #[strum(serialize = "DIM")]
    Dim = 16,
    #[strum(serialize = "LEARN")]
    Learn = 32,
    #[strum(serialize = "UP")]
    Up = 128,
    #[strum(serialize = "DOWN")]
    Down = 256,
    #[strum(serialize = "STOP")]
    Stop = 512,
    #[strum(serialize = "RGBW")]
    Rgbw = 1024,
    #[strum(serialize = "THERMOSTAT")]
    Thermostat = 2048,
}

/// Bitmask of the methods this client will issue commands for.
///
/// Sent as `supportedMethods` on `devices/list` so the server reports
/// device state in terms the client understands.
pub const SUPPORTED_METHODS: u32 = Method::TurnOn.bit()
    | Method::TurnOff.bit()
    | Method::Dim.bit()
    | Method::Up.bit()
    | Method::Down.bit()
    | Method::Stop.bit();

impl Method {
    /// The wire value of this method's flag bit.
    pub const fn bit(self) -> u32 {
        self as u32
    }

    /// The method whose flag value is exactly `code`, if any.
    ///
    /// Composite masks resolve to `None`; a state field is a single code,
    /// never a union of bits.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::iter().find(|m| m.bit() == code)
    }

    /// Remote endpoint for issuing this method as a command.
    ///
    /// `None` for methods outside the supported command set — those are
    /// not expressible through this client.
    pub const fn endpoint(self) -> Option<&'static str> {
        match self {
            Self::TurnOn => Some("device/turnOn"),
            Self::TurnOff => Some("device/turnOff"),
            Self::Dim => Some("device/dim"),
            Self::Up => Some("device/up"),
            Self::Down => Some("device/down"),
            Self::Stop => Some("device/stop"),
            _ => None,
        }
    }

    /// Whether this method can be issued as a command.
    pub const fn is_commandable(self) -> bool {
        self.endpoint().is_some()
    }
}

/// A set of method flags, as reported in a device's `methods` bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Methods(u32);

impl Methods {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn contains(self, method: Method) -> bool {
        self.0 & method.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Set members in registry declaration order.
    pub fn flags(self) -> impl Iterator<Item = Method> {
        Method::iter().filter(move |m| self.contains(*m))
    }
}

impl From<u32> for Methods {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Methods {
    /// Renders as `TURNON|TURNOFF|DIM`, empty string for no flags.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for method in self.flags() {
            if !first {
                f.write_str("|")?;
            }
            write!(f, "{method}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn wire_values_match_the_protocol() {
        let expected: [(Method, u32); 11] = [
            (Method::TurnOn, 1),
            (Method::TurnOff, 2),
            (Method::Bell, 4),
            (Method::Toggle, 8),
            (Method::Dim, 16),
            (Method::Learn, 32),
            (Method::Up, 128),
            (Method::Down, 256),
            (Method::Stop, 512),
            (Method::Rgbw, 1024),
            (Method::Thermostat, 2048),
        ];
        for (method, bit) in expected {
            assert_eq!(method.bit(), bit);
            assert_eq!(Method::from_code(bit), Some(method));
        }
    }

    #[test]
    fn composite_codes_do_not_resolve() {
        assert_eq!(Method::from_code(0), None);
        assert_eq!(Method::from_code(3), None);
        assert_eq!(Method::from_code(64), None);
    }

    #[test]
    fn supported_mask_is_the_six_commandable_methods() {
        assert_eq!(SUPPORTED_METHODS, 1 | 2 | 16 | 128 | 256 | 512);
        for method in Method::iter() {
            assert_eq!(
                method.is_commandable(),
                SUPPORTED_METHODS & method.bit() != 0
            );
        }
    }

    #[test]
    fn endpoints_exist_only_for_commandable_methods() {
        assert_eq!(Method::TurnOn.endpoint(), Some("device/turnOn"));
        assert_eq!(Method::TurnOff.endpoint(), Some("device/turnOff"));
        assert_eq!(Method::Dim.endpoint(), Some("device/dim"));
        assert_eq!(Method::Up.endpoint(), Some("device/up"));
        assert_eq!(Method::Down.endpoint(), Some("device/down"));
        assert_eq!(Method::Stop.endpoint(), Some("device/stop"));
        assert_eq!(Method::Bell.endpoint(), None);
        assert_eq!(Method::Toggle.endpoint(), None);
        assert_eq!(Method::Learn.endpoint(), None);
        assert_eq!(Method::Rgbw.endpoint(), None);
        assert_eq!(Method::Thermostat.endpoint(), None);
    }

    #[test]
    fn flag_set_renders_in_registry_order() {
        let set = Methods::new(Method::Dim.bit() | Method::TurnOn.bit() | Method::Stop.bit());
        assert_eq!(set.to_string(), "TURNON|DIM|STOP");
        assert_eq!(Methods::new(0).to_string(), "");
    }

    #[test]
    fn membership_checks() {
        let set = Methods::new(SUPPORTED_METHODS);
        assert!(set.contains(Method::TurnOn));
        assert!(set.contains(Method::Stop));
        assert!(!set.contains(Method::Bell));
        assert!(!set.contains(Method::Thermostat));
        assert!(Methods::new(0).is_empty());
    }
}
