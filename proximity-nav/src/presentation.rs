//! Camera side of the fusion: one decision per captured frame.

use crate::decision::decide;
use crate::error::CaptureError;
use crate::record::DistanceLog;
use crate::shared::FusionContext;
use proximity_data::{NavigationDecision, SectorDistances};
use std::time::Instant;

/// A captured camera image.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub index: u64,
    pub width: u32,
    pub height: u32,
    /// Packed pixel data, layout defined by the frame source.
    pub data: Vec<u8>,
}

impl Frame {
    /// Columns splitting the image into the left, center and right thirds.
    pub fn sector_boundaries(&self) -> (u32, u32) {
        let third = self.width / 3;
        (third, 2 * third)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

/// Camera or any other producer of frames. `capture` may block.
pub trait FrameSource {
    fn capture(&mut self) -> Result<Frame, CaptureError>;
}

/// Object detector. Its output is only used for overlays.
pub trait Detector {
    fn infer(&mut self, frame: &Frame) -> Vec<Detection>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SinkControl {
    Continue,
    /// The user asked to quit.
    Exit,
}

/// Everything produced for one frame.
#[derive(Debug)]
pub struct FrameReport<'a> {
    pub frame: &'a Frame,
    pub detections: &'a [Detection],
    pub distances: SectorDistances,
    /// Number of scans the distances are based on, 0 before the first scan.
    pub scan_sequence: u64,
    pub decision: NavigationDecision,
    /// Average frame rate since the loop started.
    pub fps: f64,
}

/// Renderer, display or any other consumer of frame reports.
pub trait FrameSink {
    fn present(&mut self, report: &FrameReport<'_>) -> SinkControl;
}

#[derive(Debug)]
pub enum PresentationExit {
    UserQuit,
    /// The stop signal was set by the acquisition side.
    StopRequested,
    CaptureFailed(CaptureError),
}

#[derive(Debug)]
pub struct PresentationSummary {
    pub frames: u64,
    pub exit: PresentationExit,
}

pub struct PresentationLoop<'a> {
    ctx: &'a FusionContext,
    threshold: f64,
    log: Option<DistanceLog>,
    frames: u64,
}

impl<'a> PresentationLoop<'a> {
    pub fn new(ctx: &'a FusionContext, threshold: f64) -> Self {
        PresentationLoop {
            ctx,
            threshold,
            log: None,
            frames: 0,
        }
    }

    /// Appends one distance record per frame to `log`.
    pub fn with_log(mut self, distance_log: DistanceLog) -> Self {
        self.log = Some(distance_log);
        self
    }

    /// Runs until the user quits, a frame cannot be captured or the stop
    /// signal is set. Every exit path leaves the stop signal set.
    pub fn run<S, D, K>(
        &mut self,
        source: &mut S,
        detector: &mut D,
        sink: &mut K,
    ) -> PresentationSummary
    where
        S: FrameSource + ?Sized,
        D: Detector + ?Sized,
        K: FrameSink + ?Sized,
    {
        let started = Instant::now();
        let exit = loop {
            if self.ctx.stop.is_set() {
                break PresentationExit::StopRequested;
            }

            let frame = match source.capture() {
                Ok(frame) => frame,
                Err(e) => {
                    log::error!("Cannot capture frame: {e}");
                    break PresentationExit::CaptureFailed(e);
                }
            };
            self.frames += 1;

            let detections = detector.infer(&frame);
            let snapshot = self.ctx.distances.snapshot();
            let decision = decide(&snapshot.distances, self.threshold);
            self.write_log(&snapshot.distances);

            let elapsed = started.elapsed().as_secs_f64();
            let fps = if elapsed > 0. {
                self.frames as f64 / elapsed
            } else {
                0.
            };
            let report = FrameReport {
                frame: &frame,
                detections: &detections,
                distances: snapshot.distances,
                scan_sequence: snapshot.sequence,
                decision,
                fps,
            };
            log::trace!(
                "Frame {}: {} detections, {} -> {}",
                frame.index,
                detections.len(),
                snapshot.distances,
                decision.hint
            );

            if sink.present(&report) == SinkControl::Exit {
                log::info!("Exit requested");
                break PresentationExit::UserQuit;
            }
        };

        self.ctx.stop.set();
        PresentationSummary {
            frames: self.frames,
            exit,
        }
    }

    fn write_log(&mut self, distances: &SectorDistances) {
        let Some(distance_log) = self.log.as_mut() else {
            return;
        };
        if let Err(e) = distance_log.record(distances) {
            log::warn!(
                "Cannot write to {}, distance logging disabled: {e}",
                distance_log.path().display()
            );
            self.log = None;
        }
    }
}
