//! Collaborators used when no camera or detector backend is linked in.

use crate::error::CaptureError;
use crate::presentation::{
    Detection, Detector, Frame, FrameReport, FrameSink, FrameSource, SinkControl,
};
use crossbeam_channel::{bounded, Receiver, TryRecvError};
use proximity_data::NavigationHint;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Produces empty frames of a fixed size at a fixed rate.
pub struct PacedFrameSource {
    width: u32,
    height: u32,
    period: Duration,
    next_due: Instant,
    index: u64,
    limit: Option<u64>,
}

impl PacedFrameSource {
    pub fn new(width: u32, height: u32, fps: f64) -> Self {
        PacedFrameSource {
            width,
            height,
            period: Duration::from_secs_f64(1. / fps),
            next_due: Instant::now(),
            index: 0,
            limit: None,
        }
    }

    /// Fails with `CaptureError::Exhausted` after `limit` frames.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl FrameSource for PacedFrameSource {
    fn capture(&mut self) -> Result<Frame, CaptureError> {
        if self.limit == Some(self.index) {
            return Err(CaptureError::Exhausted);
        }
        let now = Instant::now();
        if self.next_due > now {
            std::thread::sleep(self.next_due - now);
        }
        self.next_due = self.next_due.max(now) + self.period;
        self.index += 1;
        Ok(Frame {
            index: self.index,
            width: self.width,
            height: self.height,
            data: Vec::new(),
        })
    }
}

/// Detector that never detects anything.
pub struct NullDetector {
    model_path: PathBuf,
}

impl NullDetector {
    pub fn new<P: AsRef<Path>>(model_path: P) -> Self {
        let model_path = model_path.as_ref().to_path_buf();
        log::warn!(
            "No detector backend available, model {} is not loaded",
            model_path.display()
        );
        NullDetector { model_path }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl Detector for NullDetector {
    fn infer(&mut self, _frame: &Frame) -> Vec<Detection> {
        Vec::new()
    }
}

/// Spawns a thread that signals once a line reading `q`, `quit` or ESC is
/// read from `input`. The thread ends at end of input.
pub fn spawn_quit_listener<R>(input: R) -> Receiver<()>
where
    R: BufRead + Send + 'static,
{
    let (quit_tx, quit_rx) = bounded(1);
    let spawned = std::thread::Builder::new()
        .name("quit-listener".to_string())
        .spawn(move || {
            for line in input.lines() {
                let Ok(line) = line else {
                    return;
                };
                if matches!(line.trim(), "q" | "Q" | "quit" | "\u{1b}") {
                    let _ = quit_tx.send(());
                    return;
                }
            }
        });
    if let Err(e) = spawned {
        log::warn!("Cannot listen for quit requests: {e}");
    }
    quit_rx
}

/// Logs hint changes and a periodic status line.
///
/// Rings on every alerting frame, at most once per tone duration.
pub struct ConsoleSink<W: Write> {
    quit_rx: Receiver<()>,
    alert_sound: bool,
    bell: W,
    bell_until: Instant,
    last_hint: Option<NavigationHint>,
    status_period: Duration,
    last_status: Instant,
}

impl<W: Write> ConsoleSink<W> {
    /// `bell` receives the BEL character on alerts when `alert_sound` is set.
    pub fn new(quit_rx: Receiver<()>, alert_sound: bool, bell: W) -> Self {
        ConsoleSink {
            quit_rx,
            alert_sound,
            bell,
            bell_until: Instant::now(),
            last_hint: None,
            status_period: Duration::from_secs(1),
            last_status: Instant::now(),
        }
    }

    fn ring(&mut self, frequency_hz: u32, duration: Duration) {
        let now = Instant::now();
        if now < self.bell_until {
            return;
        }
        self.bell_until = now + duration;
        log::trace!("Alert tone {frequency_hz} Hz for {} ms", duration.as_millis());
        let result = self
            .bell
            .write_all(b"\x07")
            .and_then(|_| self.bell.flush());
        if let Err(e) = result {
            log::warn!("Cannot sound alert: {e}");
            self.alert_sound = false;
        }
    }
}

impl<W: Write> FrameSink for ConsoleSink<W> {
    fn present(&mut self, report: &FrameReport<'_>) -> SinkControl {
        let hint = report.decision.hint;
        if self.last_hint != Some(hint) {
            log::info!("{} ({})", hint, report.distances);
            self.last_hint = Some(hint);
        }
        if self.alert_sound {
            if let Some((frequency_hz, duration)) = hint.alert_tone() {
                self.ring(frequency_hz, duration);
            }
        }

        if self.last_status.elapsed() >= self.status_period {
            log::debug!(
                "FPS: {:.1}, scans: {}, {}",
                report.fps,
                report.scan_sequence,
                report.distances
            );
            self.last_status = Instant::now();
        }

        match self.quit_rx.try_recv() {
            Ok(()) => SinkControl::Exit,
            // stdin closed, keep running
            Err(TryRecvError::Disconnected) | Err(TryRecvError::Empty) => SinkControl::Continue,
        }
    }
}
