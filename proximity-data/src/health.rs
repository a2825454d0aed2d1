#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Health status reported by the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HealthStatus {
    /// The device works normally
    Good,
    /// The device works but reports a degraded condition
    Warning,
    /// The device is in protection stop state and refuses to scan
    Error,
}

/// Answer to the `GET_HEALTH` request.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceHealth {
    pub status: HealthStatus,
    pub error_code: u16,
}
