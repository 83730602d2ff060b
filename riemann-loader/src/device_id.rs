// SPDX-License-Identifier: GPL-2.0
//! HID device identifiers as they appear in sysfs
//!
//! The kernel names every HID device `BBBB:VVVV:PPPP.IIII` (bus, vendor,
//! product, instance), formatted with `%04X`. Only the bus, vendor and
//! product fields are parsed; whatever follows the product is kept verbatim
//! in the raw name and never inspected.

use std::fmt;
use std::str::FromStr;

/// HID bus type for USB devices
pub const BUS_USB: u16 = 0x0003;

/// Parsed HID device name, e.g. `0003:1926:0008.0001`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HidDeviceId {
    bus: u16,
    vendor: u16,
    product: u16,
    raw: String,
}

impl HidDeviceId {
    pub fn bus(&self) -> u16 {
        self.bus
    }

    pub fn vendor(&self) -> u16 {
        self.vendor
    }

    pub fn product(&self) -> u16 {
        self.product
    }

    /// The name exactly as read from sysfs; this is what bind/unbind expect
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for HidDeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Why a name is not a HID device id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseIdError {
    /// Too short, or no `:` after the bus field
    Shape,
    /// A field is not uppercase hex
    Field(&'static str),
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseIdError::Shape => f.write_str("expected BBBB:VVVV:PPPP"),
            ParseIdError::Field(name) => write!(f, "invalid {name} field"),
        }
    }
}

impl std::error::Error for ParseIdError {}

fn parse_u16_field(b: &[u8], name: &'static str) -> Result<u16, ParseIdError> {
    b.iter().try_fold(0u16, |acc, &c| {
        let digit = match c {
            b'0'..=b'9' => c - b'0',
            b'A'..=b'F' => c - b'A' + 10,
            _ => return Err(ParseIdError::Field(name)),
        };
        Ok(acc << 4 | digit as u16)
    })
}

impl FromStr for HidDeviceId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Fixed-width prefix: BBBB:VVVV?PPPP, anything may follow. The byte
        // between vendor and product is not checked.
        let b = s.as_bytes();
        if b.len() < 14 || b[4] != b':' {
            return Err(ParseIdError::Shape);
        }

        Ok(Self {
            bus: parse_u16_field(&b[0..4], "bus")?,
            vendor: parse_u16_field(&b[5..9], "vendor")?,
            product: parse_u16_field(&b[10..14], "product")?,
            raw: s.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kernel_name() {
        let id: HidDeviceId = "0003:1926:00FF.000A".parse().unwrap();
        assert_eq!(id.bus(), BUS_USB);
        assert_eq!(id.vendor(), 0x1926);
        assert_eq!(id.product(), 0x00FF);
        assert_eq!(id.as_str(), "0003:1926:00FF.000A");
        assert_eq!(id.to_string(), "0003:1926:00FF.000A");
    }

    #[test]
    fn suffix_is_kept_verbatim() {
        for name in ["0003:1926:0008", "0003:1926:00FF.0001.1", "0003:1926:025E.000g"] {
            let id: HidDeviceId = name.parse().unwrap();
            assert_eq!(id.as_str(), name);
        }
    }

    #[test]
    fn rejects_driver_control_files() {
        for name in ["bind", "unbind", "uevent", "module", "new_id", ""] {
            assert_eq!(name.parse::<HidDeviceId>(), Err(ParseIdError::Shape), "{name}");
        }
    }

    #[test]
    fn rejects_lowercase_hex() {
        // The kernel writes %04X, so "00ff" can never be a real device
        assert_eq!(
            "0003:1926:00ff.0001".parse::<HidDeviceId>(),
            Err(ParseIdError::Field("product"))
        );
    }

    #[test]
    fn rejects_shifted_fields() {
        assert_eq!(
            "003:1926:0008.0001".parse::<HidDeviceId>(),
            Err(ParseIdError::Shape)
        );
        assert_eq!(
            "0003:01926:0008.0001".parse::<HidDeviceId>(),
            Err(ParseIdError::Field("product"))
        );
        assert_eq!("0003:1926:000".parse::<HidDeviceId>(), Err(ParseIdError::Shape));
        assert_eq!(
            "0003:1926:0x08.0001".parse::<HidDeviceId>(),
            Err(ParseIdError::Field("product"))
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(ParseIdError::Shape.to_string(), "expected BBBB:VVVV:PPPP");
        assert_eq!(
            ParseIdError::Field("vendor").to_string(),
            "invalid vendor field"
        );
    }
}
