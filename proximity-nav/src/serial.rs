use crate::constants::{
    DESCRIPTOR_SIZE, LIDAR_ANS_LENGTH_DEVHEALTH, LIDAR_ANS_LENGTH_DEVINFO,
    LIDAR_ANS_LENGTH_MEASUREMENT, LIDAR_ANS_TYPE_DEVHEALTH, LIDAR_ANS_TYPE_DEVINFO,
    LIDAR_ANS_TYPE_MEASUREMENT, LIDAR_CMD_GET_HEALTH, LIDAR_CMD_GET_INFO, LIDAR_CMD_SCAN,
    LIDAR_CMD_SET_PWM, LIDAR_CMD_STOP, LIDAR_CMD_SYNC_BYTE, MAX_MOTOR_PWM, N_READ_TRIALS,
    SEND_MODE_MULTIPLE, SEND_MODE_SINGLE,
};
use crate::error::LidarError;
use crate::packet::{parse_health, parse_info, payload_request, validate_response_descriptor};
use crate::time::sleep_ms;
use proximity_data::{DeviceHealth, DeviceInfo};
use serialport::SerialPort;
use std::io::{Read, Write};

pub(crate) fn start_scan(port: &mut Box<dyn SerialPort>) -> Result<(), LidarError> {
    send_command(port, LIDAR_CMD_SCAN)?;
    let descriptor = read(port, DESCRIPTOR_SIZE)?;
    validate_response_descriptor(
        &descriptor,
        LIDAR_ANS_LENGTH_MEASUREMENT,
        SEND_MODE_MULTIPLE,
        LIDAR_ANS_TYPE_MEASUREMENT,
    )?;
    Ok(())
}

fn stop_scan(port: &mut Box<dyn SerialPort>) -> Result<(), LidarError> {
    send_command(port, LIDAR_CMD_STOP)?;
    // The device needs at least 1ms before it accepts the next request
    sleep_ms(1);
    Ok(())
}

pub(crate) fn stop_scan_and_flush(port: &mut Box<dyn SerialPort>) -> Result<(), LidarError> {
    stop_scan(port)?;
    flush(port)?;
    Ok(())
}

pub(crate) fn get_health(port: &mut Box<dyn SerialPort>) -> Result<DeviceHealth, LidarError> {
    send_command(port, LIDAR_CMD_GET_HEALTH)?;
    let descriptor = read(port, DESCRIPTOR_SIZE)?;
    validate_response_descriptor(
        &descriptor,
        LIDAR_ANS_LENGTH_DEVHEALTH,
        SEND_MODE_SINGLE,
        LIDAR_ANS_TYPE_DEVHEALTH,
    )?;
    let health = read(port, LIDAR_ANS_LENGTH_DEVHEALTH as usize)?;
    parse_health(&health)
}

pub(crate) fn get_info(port: &mut Box<dyn SerialPort>) -> Result<DeviceInfo, LidarError> {
    send_command(port, LIDAR_CMD_GET_INFO)?;
    let descriptor = read(port, DESCRIPTOR_SIZE)?;
    validate_response_descriptor(
        &descriptor,
        LIDAR_ANS_LENGTH_DEVINFO,
        SEND_MODE_SINGLE,
        LIDAR_ANS_TYPE_DEVINFO,
    )?;
    let info = read(port, LIDAR_ANS_LENGTH_DEVINFO as usize)?;
    Ok(parse_info(&info))
}

pub(crate) fn set_motor_pwm(port: &mut Box<dyn SerialPort>, pwm: u16) -> Result<(), LidarError> {
    if pwm > MAX_MOTOR_PWM {
        return Err(LidarError::InvalidMotorPwm(pwm));
    }
    send_payload_command(port, LIDAR_CMD_SET_PWM, &pwm.to_le_bytes())?;
    Ok(())
}

fn send_data(port: &mut Box<dyn SerialPort>, data: &[u8]) -> std::io::Result<()> {
    port.write_all(data)?;
    port.flush()
}

pub(crate) fn send_command(port: &mut Box<dyn SerialPort>, command: u8) -> std::io::Result<()> {
    let data: [u8; 2] = [LIDAR_CMD_SYNC_BYTE, command];
    send_data(port, &data)
}

pub(crate) fn send_payload_command(
    port: &mut Box<dyn SerialPort>,
    command: u8,
    payload: &[u8],
) -> std::io::Result<()> {
    send_data(port, &payload_request(command, payload))
}

pub(crate) fn get_n_read(port: &mut Box<dyn SerialPort>) -> Result<usize, LidarError> {
    let n_u32: u32 = port.bytes_to_read()?;
    Ok(n_u32.try_into().unwrap_or(0))
}

pub(crate) fn flush(port: &mut Box<dyn SerialPort>) -> Result<(), LidarError> {
    let n_read: usize = get_n_read(port).unwrap_or(0);
    if n_read == 0 {
        return Ok(());
    }
    let mut packet: Vec<u8> = vec![0; n_read];
    port.read_exact(packet.as_mut_slice())?;
    Ok(())
}

pub(crate) fn read(
    port: &mut Box<dyn SerialPort>,
    data_size: usize,
) -> Result<Vec<u8>, LidarError> {
    assert!(data_size > 0);
    for _ in 0..N_READ_TRIALS {
        let n_read: usize = get_n_read(port)?;

        if n_read < data_size {
            sleep_ms(10);
            continue;
        }

        let mut packet: Vec<u8> = vec![0; data_size];
        port.read_exact(packet.as_mut_slice())?;
        return Ok(packet);
    }
    Err(LidarError::Timeout)
}
