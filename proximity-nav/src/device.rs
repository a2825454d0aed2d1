//! LiDAR device abstraction and the RPLidar serial backend.

use crate::constants::{DEFAULT_BAUD_RATE, DEFAULT_MOTOR_PWM};
use crate::driver_threads::{spawn_driver_threads, DriverThreads, ScanResult};
use crate::error::LidarError;
use crate::serial::{get_health, get_info, set_motor_pwm, start_scan, stop_scan_and_flush};
use crate::time::sleep_ms;
use proximity_data::{DeviceHealth, DeviceInfo, HealthStatus, Scan};
use serialport::SerialPort;
use std::sync::mpsc;

/// A rotating range sensor producing one `Scan` per rotation.
///
/// Opening the device is done by whoever constructs the implementation.
pub trait LidarDevice {
    fn start_motor(&mut self) -> Result<(), LidarError>;

    fn stop_motor(&mut self) -> Result<(), LidarError>;

    /// Blocks until the next full rotation is available.
    /// `Ok(None)` means the scan stream is exhausted.
    fn next_scan(&mut self) -> Result<Option<Scan>, LidarError>;

    fn disconnect(&mut self) -> Result<(), LidarError>;
}

impl<D: LidarDevice + ?Sized> LidarDevice for Box<D> {
    fn start_motor(&mut self) -> Result<(), LidarError> {
        (**self).start_motor()
    }

    fn stop_motor(&mut self) -> Result<(), LidarError> {
        (**self).stop_motor()
    }

    fn next_scan(&mut self) -> Result<Option<Scan>, LidarError> {
        (**self).next_scan()
    }

    fn disconnect(&mut self) -> Result<(), LidarError> {
        (**self).disconnect()
    }
}

/// Serial port settings of an RPLidar.
#[derive(Clone, Debug, PartialEq)]
pub struct RplidarSettings {
    pub baud_rate: u32,
    pub motor_pwm: u16,
}

impl Default for RplidarSettings {
    fn default() -> Self {
        RplidarSettings {
            baud_rate: DEFAULT_BAUD_RATE,
            motor_pwm: DEFAULT_MOTOR_PWM,
        }
    }
}

struct Scanning {
    // Field order matters: the receiver must go before the threads are
    // joined, otherwise the parser may block on a full channel.
    scan_rx: mpsc::Receiver<ScanResult>,
    _threads: DriverThreads,
}

/// RPLidar A-series driver speaking the standard serial protocol.
pub struct RplidarDevice {
    port_name: String,
    port: Option<Box<dyn SerialPort>>,
    settings: RplidarSettings,
    scanning: Option<Scanning>,
    motor_running: bool,
}

impl RplidarDevice {
    /// Opens the serial port and stops any scan left running by a previous
    /// session.
    ///
    /// # Arguments
    ///
    /// * `port_name` - Serial port name such as `/dev/ttyUSB0` or `COM3`.
    /// * `settings` - Baud rate and motor speed.
    pub fn open(port_name: &str, settings: RplidarSettings) -> Result<Self, LidarError> {
        let port = serialport::new(port_name, settings.baud_rate)
            .timeout(std::time::Duration::from_millis(10))
            .open()
            .map_err(|e| LidarError::OpenError(port_name.to_string(), e))?;
        Self::from_port(port_name, port, settings)
    }

    pub(crate) fn from_port(
        port_name: &str,
        mut port: Box<dyn SerialPort>,
        settings: RplidarSettings,
    ) -> Result<Self, LidarError> {
        stop_scan_and_flush(&mut port)?;
        log::info!("Connected to LiDAR on {port_name}");
        Ok(RplidarDevice {
            port_name: port_name.to_string(),
            port: Some(port),
            settings,
            scanning: None,
            motor_running: false,
        })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    fn port(&mut self) -> Result<&mut Box<dyn SerialPort>, LidarError> {
        self.port.as_mut().ok_or(LidarError::Disconnected)
    }

    /// Must not be called while scanning; the answer would be mixed into the
    /// measurement stream.
    pub fn get_info(&mut self) -> Result<DeviceInfo, LidarError> {
        get_info(self.port()?)
    }

    /// Must not be called while scanning.
    pub fn get_health(&mut self) -> Result<DeviceHealth, LidarError> {
        get_health(self.port()?)
    }

    fn start_scanning(&mut self) -> Result<(), LidarError> {
        let health = self.get_health()?;
        match health.status {
            HealthStatus::Good => (),
            HealthStatus::Warning => log::warn!(
                "LiDAR reports a warning (error code {:#06X})",
                health.error_code
            ),
            HealthStatus::Error => {
                return Err(LidarError::DeviceHealthError(health.error_code));
            }
        }

        let port = self.port()?;
        start_scan(port)?;
        let reader_port = port.try_clone()?;
        let (threads, scan_rx) = spawn_driver_threads(reader_port)?;
        self.scanning = Some(Scanning {
            scan_rx,
            _threads: threads,
        });
        log::debug!("LiDAR scanning on {}", self.port_name);
        Ok(())
    }
}

impl LidarDevice for RplidarDevice {
    fn start_motor(&mut self) -> Result<(), LidarError> {
        let pwm = self.settings.motor_pwm;
        // A half-started motor is still stopped on drop
        self.motor_running = true;
        let port = self.port()?;
        port.write_data_terminal_ready(false)?;
        set_motor_pwm(port, pwm)?;
        Ok(())
    }

    fn stop_motor(&mut self) -> Result<(), LidarError> {
        let port = self.port()?;
        set_motor_pwm(port, 0)?;
        sleep_ms(1);
        port.write_data_terminal_ready(true)?;
        self.motor_running = false;
        Ok(())
    }

    fn next_scan(&mut self) -> Result<Option<Scan>, LidarError> {
        if self.port.is_none() {
            return Ok(None);
        }
        if self.scanning.is_none() {
            self.start_scanning()?;
        }
        let scanning = self.scanning.as_ref().ok_or(LidarError::Disconnected)?;
        match scanning.scan_rx.recv() {
            Ok(scan) => scan.map(Some),
            Err(mpsc::RecvError) => Err(LidarError::Disconnected),
        }
    }

    fn disconnect(&mut self) -> Result<(), LidarError> {
        // Joining the threads sends STOP through the reader's port handle
        self.scanning = None;
        if let Some(mut port) = self.port.take() {
            stop_scan_and_flush(&mut port)?;
            log::info!("Disconnected LiDAR on {}", self.port_name);
        }
        Ok(())
    }
}

impl Drop for RplidarDevice {
    fn drop(&mut self) {
        if self.motor_running && self.port.is_some() {
            if let Err(e) = self.stop_motor() {
                log::warn!("Failed to stop LiDAR motor: {e}");
            }
        }
        if let Err(e) = self.disconnect() {
            log::warn!("Failed to disconnect LiDAR: {e}");
        }
    }
}
