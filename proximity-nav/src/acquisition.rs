//! LiDAR side of the fusion: turns the scan stream into shared sector
//! distances until asked to stop.

use crate::device::LidarDevice;
use crate::error::LidarError;
use crate::sector::aggregate;
use crate::shared::FusionContext;
use std::time::Duration;

pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AcquisitionState {
    Disconnected,
    MotorSpinningUp,
    Scanning,
    Stopping,
}

/// Why the acquisition loop ended.
#[derive(Debug)]
pub enum AcquisitionExit {
    /// The stop signal was observed between two scans.
    StopRequested,
    /// The device ran out of scans. The stop signal has been set.
    StreamEnded,
    /// The device failed while running. Shared distances are left as they were.
    DeviceFailed(LidarError),
    /// The device could not be opened.
    ConnectFailed(LidarError),
}

#[derive(Debug)]
pub struct AcquisitionSummary {
    pub scans: u64,
    pub exit: AcquisitionExit,
}

/// Owns an opened device and stops it exactly once, on every exit path.
struct DeviceSession<D: LidarDevice> {
    device: D,
    released: bool,
}

impl<D: LidarDevice> DeviceSession<D> {
    fn new(device: D) -> Self {
        DeviceSession {
            device,
            released: false,
        }
    }

    fn release(&mut self) -> Result<(), LidarError> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        let motor = self.device.stop_motor();
        let disconnect = self.device.disconnect();
        motor.and(disconnect)
    }
}

impl<D: LidarDevice> Drop for DeviceSession<D> {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            log::warn!("Failed to release LiDAR: {e}");
        }
    }
}

pub struct AcquisitionLoop<'a> {
    ctx: &'a FusionContext,
    settle_delay: Duration,
    state: AcquisitionState,
    scans: u64,
}

impl<'a> AcquisitionLoop<'a> {
    pub fn new(ctx: &'a FusionContext, settle_delay: Duration) -> Self {
        AcquisitionLoop {
            ctx,
            settle_delay,
            state: AcquisitionState::Disconnected,
            scans: 0,
        }
    }

    pub fn state(&self) -> AcquisitionState {
        self.state
    }

    /// Opens the device with `open` and runs until the stop signal is set,
    /// the scan stream ends or the device fails. The device is always
    /// stopped and disconnected before this returns.
    pub fn run<D, F>(&mut self, open: F) -> AcquisitionSummary
    where
        D: LidarDevice,
        F: FnOnce() -> Result<D, LidarError>,
    {
        let device = match open() {
            Ok(device) => device,
            Err(e) => {
                log::error!("Cannot connect to LiDAR: {e}");
                return self.summary(AcquisitionExit::ConnectFailed(e));
            }
        };
        let mut session = DeviceSession::new(device);

        self.transition(AcquisitionState::MotorSpinningUp);
        let exit = match self.spin_up(&mut session.device) {
            Ok(()) => {
                self.transition(AcquisitionState::Scanning);
                self.scan(&mut session.device)
            }
            Err(e) => {
                log::error!("Cannot start LiDAR motor: {e}");
                AcquisitionExit::DeviceFailed(e)
            }
        };

        self.transition(AcquisitionState::Stopping);
        if let Err(e) = session.release() {
            log::warn!("Failed to release LiDAR: {e}");
        }
        self.transition(AcquisitionState::Disconnected);
        log::info!("LiDAR stopped after {} scans", self.scans);

        self.summary(exit)
    }

    fn spin_up<D: LidarDevice>(&mut self, device: &mut D) -> Result<(), LidarError> {
        device.start_motor()?;
        std::thread::sleep(self.settle_delay);
        log::info!("LiDAR running");
        Ok(())
    }

    fn scan<D: LidarDevice>(&mut self, device: &mut D) -> AcquisitionExit {
        // An in-flight scan is always completed before the stop is honored
        while !self.ctx.stop.is_set() {
            match device.next_scan() {
                Ok(Some(scan)) => {
                    let distances = aggregate(&scan);
                    self.ctx.distances.store(distances);
                    self.scans += 1;
                    log::trace!(
                        "Scan {} with {} samples: {}",
                        self.scans,
                        scan.len(),
                        distances
                    );
                }
                Ok(None) => {
                    log::info!("LiDAR scan stream ended");
                    self.ctx.stop.set();
                    return AcquisitionExit::StreamEnded;
                }
                Err(e) => {
                    log::error!("LiDAR failed, distances will no longer be updated: {e}");
                    return AcquisitionExit::DeviceFailed(e);
                }
            }
        }
        AcquisitionExit::StopRequested
    }

    fn transition(&mut self, next: AcquisitionState) {
        log::debug!("LiDAR acquisition {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn summary(&self, exit: AcquisitionExit) -> AcquisitionSummary {
        AcquisitionSummary {
            scans: self.scans,
            exit,
        }
    }
}
