use std::io;
use thiserror::Error;

/// Device-level failures of the LiDAR.
#[derive(Debug, Error)]
pub enum LidarError {
    #[error("Response descriptor must be always seven bytes. Actually {0} bytes.")]
    InvalidDescriptorLength(usize),
    #[error("Descriptor must start with 0xA5 0x5A. Observed = {0}.")]
    InvalidMagicNumber(String),
    #[error("Expected response length of {0} bytes but found {1} bytes.")]
    InvalidResponseLength(u32, u32),
    #[error("Expected send mode {0} but obtained {1}.")]
    InvalidSendMode(u8, u8),
    #[error("Expected type code {0:#04X} but obtained {1:#04X}.")]
    InvalidTypeCode(u8, u8),
    #[error("Device health error. Error code = {0:#06X}. See the development manual for details.")]
    DeviceHealthError(u16),
    #[error("Unknown health status {0}.")]
    UnknownHealthStatus(u8),
    #[error("New scan flags mismatch. Observed byte = {0:#010b}.")]
    ScanFlagMismatch(u8),
    #[error("Check bit not equal to 1. Observed byte = {0:#010b}.")]
    CheckBitMismatch(u8),
    #[error("Motor PWM must be at most {max}, got {0}.", max = crate::constants::MAX_MOTOR_PWM)]
    InvalidMotorPwm(u16),
    #[error("Operation timed out")]
    Timeout,
    #[error("Device stream closed")]
    Disconnected,
    #[error("Failed to open \"{0}\": {1}")]
    OpenError(String, serialport::Error),
    #[error(transparent)]
    SerialError(#[from] serialport::Error),
    #[error(transparent)]
    IoError(#[from] io::Error),
}

/// The camera did not deliver a frame.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Frame source exhausted")]
    Exhausted,
    #[error("Frame not available: {0}")]
    Unavailable(String),
    #[error(transparent)]
    IoError(#[from] io::Error),
}

/// Errors reaching the single shutdown-coordinating point.
#[derive(Debug, Error)]
pub enum FusionError {
    #[error("LiDAR device error: {0}")]
    Device(#[from] LidarError),
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Thread \"{0}\" panicked")]
    ThreadPanic(String),
}
