mod constants;
mod driver_threads;
mod numeric;
mod packet;
mod serial;
mod time;

pub mod acquisition;
pub mod config;
pub mod decision;
pub mod device;
pub mod error;
pub mod headless;
pub mod presentation;
pub mod record;
pub mod run;
pub mod sector;
pub mod shared;

pub use crate::acquisition::{
    AcquisitionExit, AcquisitionLoop, AcquisitionState, AcquisitionSummary,
};
pub use crate::config::Config;
pub use crate::decision::decide;
pub use crate::device::{LidarDevice, RplidarDevice, RplidarSettings};
pub use crate::error::{CaptureError, FusionError, LidarError};
pub use crate::numeric::normalize_degree;
pub use crate::presentation::{
    Detection, Detector, Frame, FrameReport, FrameSink, FrameSource, PresentationExit,
    PresentationLoop, PresentationSummary, SinkControl,
};
pub use crate::record::DistanceLog;
pub use crate::run::{run, RunSummary};
pub use crate::sector::{aggregate, classify};
pub use crate::shared::{DistanceSnapshot, FusionContext, SharedDistances, StopSignal};

/// Function to open the RPLidar named in `config`.
///
/// Stops any scan left running on the device before returning.
pub fn open_rplidar(config: &Config) -> Result<RplidarDevice, LidarError> {
    RplidarDevice::open(&config.port, config.rplidar_settings())
}
