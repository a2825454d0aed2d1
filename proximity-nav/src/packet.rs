use crate::constants::{
    DESCRIPTOR_SIZE, LIDAR_ANS_SYNC_BYTE, LIDAR_CMD_SYNC_BYTE, MEASUREMENT_SIZE,
};
use crate::error::LidarError;
use crate::numeric::{calc_distance, to_angle, to_string, to_u16};
use proximity_data::{DeviceHealth, DeviceInfo, HealthStatus, ScanSample};

/// Decoded measurement node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Measurement {
    pub(crate) new_scan: bool,
    pub(crate) sample: ScanSample,
}

pub(crate) fn validate_response_descriptor(
    descriptor: &[u8],
    response_length: u32,
    send_mode: u8,
    type_code: u8,
) -> Result<(), LidarError> {
    if descriptor.len() != DESCRIPTOR_SIZE {
        return Err(LidarError::InvalidDescriptorLength(descriptor.len()));
    }
    if descriptor[0..2] != [LIDAR_CMD_SYNC_BYTE, LIDAR_ANS_SYNC_BYTE] {
        return Err(LidarError::InvalidMagicNumber(to_string(&descriptor[0..2])));
    }
    let length = u32::from_le_bytes([descriptor[2], descriptor[3], descriptor[4], descriptor[5]]);
    let actual_length = length & 0x3FFF_FFFF;
    if actual_length != response_length {
        return Err(LidarError::InvalidResponseLength(
            response_length,
            actual_length,
        ));
    }
    let actual_mode = descriptor[5] >> 6;
    if actual_mode != send_mode {
        return Err(LidarError::InvalidSendMode(send_mode, actual_mode));
    }
    if descriptor[6] != type_code {
        return Err(LidarError::InvalidTypeCode(type_code, descriptor[6]));
    }
    Ok(())
}

/// Request with payload: sync byte, command, payload size, payload, xor checksum.
pub(crate) fn payload_request(command: u8, payload: &[u8]) -> Vec<u8> {
    let mut request = Vec::with_capacity(payload.len() + 4);
    request.push(LIDAR_CMD_SYNC_BYTE);
    request.push(command);
    request.push(payload.len() as u8);
    request.extend_from_slice(payload);
    let checksum = request.iter().fold(0u8, |acc, b| acc ^ b);
    request.push(checksum);
    request
}

pub(crate) fn parse_measurement(raw: &[u8]) -> Result<Measurement, LidarError> {
    assert_eq!(raw.len(), MEASUREMENT_SIZE);
    let new_scan = raw[0] & 0x01 == 1;
    let inversed_new_scan = (raw[0] >> 1) & 0x01 == 1;
    if new_scan == inversed_new_scan {
        return Err(LidarError::ScanFlagMismatch(raw[0]));
    }
    if raw[1] & 0x01 != 1 {
        return Err(LidarError::CheckBitMismatch(raw[1]));
    }
    let quality = raw[0] >> 2;
    let sample = ScanSample::new(
        quality,
        to_angle(raw[1], raw[2]),
        calc_distance(raw[3], raw[4]),
    );
    Ok(Measurement { new_scan, sample })
}

pub(crate) fn parse_health(raw: &[u8]) -> Result<DeviceHealth, LidarError> {
    let status = match raw[0] {
        0 => HealthStatus::Good,
        1 => HealthStatus::Warning,
        2 => HealthStatus::Error,
        s => return Err(LidarError::UnknownHealthStatus(s)),
    };
    Ok(DeviceHealth {
        status,
        error_code: to_u16(raw[2], raw[1]),
    })
}

pub(crate) fn parse_info(raw: &[u8]) -> DeviceInfo {
    let mut serial_number = [0u8; 16];
    serial_number.copy_from_slice(&raw[4..20]);
    DeviceInfo {
        model: raw[0],
        firmware_major_version: raw[2],
        firmware_minor_version: raw[1],
        hardware_version: raw[3],
        serial_number,
    }
}
