pub(crate) const DESCRIPTOR_SIZE: usize = 7;
pub(crate) const MEASUREMENT_SIZE: usize = 5;
pub(crate) const LIDAR_CMD_SYNC_BYTE: u8 = 0xA5;
pub(crate) const LIDAR_ANS_SYNC_BYTE: u8 = 0x5A;
pub(crate) const LIDAR_CMD_STOP: u8 = 0x25;
pub(crate) const LIDAR_CMD_SCAN: u8 = 0x20;
pub(crate) const LIDAR_CMD_GET_INFO: u8 = 0x50;
pub(crate) const LIDAR_CMD_GET_HEALTH: u8 = 0x52;
pub(crate) const LIDAR_CMD_SET_PWM: u8 = 0xF0;
pub(crate) const LIDAR_ANS_TYPE_DEVINFO: u8 = 0x04;
pub(crate) const LIDAR_ANS_LENGTH_DEVINFO: u32 = 20;
pub(crate) const LIDAR_ANS_TYPE_DEVHEALTH: u8 = 0x06;
pub(crate) const LIDAR_ANS_LENGTH_DEVHEALTH: u32 = 3;
pub(crate) const LIDAR_ANS_TYPE_MEASUREMENT: u8 = 0x81;
pub(crate) const LIDAR_ANS_LENGTH_MEASUREMENT: u32 = 5;
pub(crate) const SEND_MODE_SINGLE: u8 = 0;
pub(crate) const SEND_MODE_MULTIPLE: u8 = 1;
pub(crate) const N_READ_TRIALS: usize = 100;
pub(crate) const MAX_MOTOR_PWM: u16 = 1023;
pub(crate) const DEFAULT_MOTOR_PWM: u16 = 660;
pub(crate) const DEFAULT_BAUD_RATE: u32 = 115200;
// A scan must hold more samples than this to be forwarded
pub(crate) const MIN_SCAN_SAMPLES: usize = 5;
