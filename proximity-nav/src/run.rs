use crate::acquisition::{AcquisitionLoop, AcquisitionSummary};
use crate::config::Config;
use crate::device::LidarDevice;
use crate::error::{FusionError, LidarError};
use crate::presentation::{
    Detector, FrameSink, FrameSource, PresentationLoop, PresentationSummary,
};
use crate::record::DistanceLog;
use crate::shared::{DistanceSnapshot, FusionContext, StopSignal};

const ACQUISITION_THREAD: &str = "lidar-acquisition";

#[derive(Debug)]
pub struct RunSummary {
    pub acquisition: AcquisitionSummary,
    pub presentation: PresentationSummary,
    /// Distances as last stored by the acquisition loop.
    pub last_distances: DistanceSnapshot,
}

/// Sets the stop signal when dropped, so that a panicking presentation side
/// never leaves the acquisition thread running.
struct StopOnDrop<'a>(&'a StopSignal);

impl Drop for StopOnDrop<'_> {
    fn drop(&mut self) {
        self.0.set();
    }
}

/// Runs the acquisition loop on its own thread and the presentation loop on
/// the calling thread, then waits for the device to be released.
///
/// # Arguments
///
/// * `config` - Validated settings.
/// * `open` - Opens the LiDAR. Called on the acquisition thread.
/// * `source`, `detector`, `sink` - Camera, object detector and renderer.
pub fn run<D, F, S, Det, K>(
    config: &Config,
    open: F,
    source: &mut S,
    detector: &mut Det,
    sink: &mut K,
) -> Result<RunSummary, FusionError>
where
    D: LidarDevice,
    F: FnOnce() -> Result<D, LidarError> + Send,
    S: FrameSource + ?Sized,
    Det: Detector + ?Sized,
    K: FrameSink + ?Sized,
{
    config.validate()?;
    let ctx = FusionContext::new();
    let settle_delay = config.settle_delay();

    let mut presentation = PresentationLoop::new(&ctx, config.alert_threshold);
    if config.log_enabled {
        log::info!("Logging distances to {}", config.log_path.display());
        presentation = presentation.with_log(DistanceLog::new(&config.log_path));
    }

    let outcome = crossbeam_utils::thread::scope(|s| -> Result<RunSummary, FusionError> {
        let _stop_on_exit = StopOnDrop(&ctx.stop);

        let acquisition = s
            .builder()
            .name(ACQUISITION_THREAD.to_string())
            .spawn(|_| AcquisitionLoop::new(&ctx, settle_delay).run(open))?;

        let presentation = presentation.run(source, detector, sink);
        ctx.stop.set();

        let acquisition = acquisition
            .join()
            .map_err(|_| FusionError::ThreadPanic(ACQUISITION_THREAD.to_string()))?;
        log::info!(
            "Stopped cleanly after {} frames and {} scans",
            presentation.frames,
            acquisition.scans
        );

        Ok(RunSummary {
            acquisition,
            presentation,
            last_distances: ctx.distances.snapshot(),
        })
    });

    match outcome {
        Ok(result) => result,
        Err(_) => Err(FusionError::ThreadPanic(ACQUISITION_THREAD.to_string())),
    }
}
