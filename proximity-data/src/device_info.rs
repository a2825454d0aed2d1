#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identification block returned by the `GET_INFO` request.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceInfo {
    pub model: u8,
    pub firmware_major_version: u8,
    pub firmware_minor_version: u8,
    pub hardware_version: u8,
    pub serial_number: [u8; 16],
}

impl DeviceInfo {
    /// Serial number as the upper-case hex string printed on the device label.
    pub fn serial_number_hex(&self) -> String {
        self.serial_number
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_number_hex() {
        let mut serial_number = [0u8; 16];
        serial_number[0] = 0xAB;
        serial_number[15] = 0x01;
        let info = DeviceInfo {
            model: 0x18,
            firmware_major_version: 1,
            firmware_minor_version: 29,
            hardware_version: 7,
            serial_number,
        };
        assert_eq!(
            info.serial_number_hex(),
            "AB000000000000000000000000000001"
        );
    }
}
