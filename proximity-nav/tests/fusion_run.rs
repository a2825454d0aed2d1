use proximity_data::{NavigationHint, Scan, SectorDistances};
use proximity_nav::{
    run, AcquisitionExit, CaptureError, Config, Detection, Detector, Frame, FrameReport,
    FrameSink, FrameSource, LidarDevice, LidarError, PresentationExit, SinkControl,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct Counters {
    stop_motor: AtomicUsize,
    disconnect: AtomicUsize,
}

/// Emits scans whose three sectors all read `first_distance + i` mm.
struct FakeLidar {
    counters: Arc<Counters>,
    next: u64,
    first_distance: f64,
    scans_before_end: Option<u64>,
    fail_after: Option<u64>,
}

impl FakeLidar {
    fn endless(counters: &Arc<Counters>) -> Self {
        FakeLidar {
            counters: Arc::clone(counters),
            next: 0,
            first_distance: 500.,
            scans_before_end: None,
            fail_after: None,
        }
    }
}

impl LidarDevice for FakeLidar {
    fn start_motor(&mut self) -> Result<(), LidarError> {
        Ok(())
    }

    fn stop_motor(&mut self) -> Result<(), LidarError> {
        self.counters.stop_motor.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn next_scan(&mut self) -> Result<Option<Scan>, LidarError> {
        std::thread::sleep(Duration::from_millis(1));
        if self.scans_before_end == Some(self.next) {
            return Ok(None);
        }
        if self.fail_after == Some(self.next) {
            return Err(LidarError::Disconnected);
        }
        let d = self.first_distance + self.next as f64;
        self.next += 1;
        Ok(Some(
            vec![(10u8, 30., d), (10u8, 90., d), (10u8, 150., d), (10u8, 240., 1.)]
                .into_iter()
                .collect(),
        ))
    }

    fn disconnect(&mut self) -> Result<(), LidarError> {
        self.counters.disconnect.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct FakeCamera {
    captured: u64,
    limit: Option<u64>,
}

impl FakeCamera {
    fn new() -> Self {
        FakeCamera {
            captured: 0,
            limit: None,
        }
    }
}

impl FrameSource for FakeCamera {
    fn capture(&mut self) -> Result<Frame, CaptureError> {
        if self.limit == Some(self.captured) {
            return Err(CaptureError::Unavailable("camera unplugged".to_string()));
        }
        std::thread::sleep(Duration::from_millis(1));
        self.captured += 1;
        Ok(Frame {
            index: self.captured,
            width: 640,
            height: 480,
            data: Vec::new(),
        })
    }
}

struct NoDetections;

impl Detector for NoDetections {
    fn infer(&mut self, _frame: &Frame) -> Vec<Detection> {
        Vec::new()
    }
}

struct CollectingSink {
    reports: Vec<(SectorDistances, u64, NavigationHint)>,
    quit_after: Option<usize>,
}

impl CollectingSink {
    fn new(quit_after: Option<usize>) -> Self {
        CollectingSink {
            reports: Vec::new(),
            quit_after,
        }
    }
}

impl FrameSink for CollectingSink {
    fn present(&mut self, report: &FrameReport<'_>) -> SinkControl {
        self.reports
            .push((report.distances, report.scan_sequence, report.decision.hint));
        match self.quit_after {
            Some(n) if self.reports.len() >= n => SinkControl::Exit,
            _ => SinkControl::Continue,
        }
    }
}

fn config() -> Config {
    let mut config = Config::new("fake", "models/yolov8n.pt");
    config.settle_delay_ms = 0;
    config
}

#[test]
fn user_quit_stops_both_loops() {
    let counters = Arc::new(Counters::default());
    let mut sink = CollectingSink::new(Some(30));

    let summary = run(
        &config(),
        || Ok(FakeLidar::endless(&counters)),
        &mut FakeCamera::new(),
        &mut NoDetections,
        &mut sink,
    )
    .unwrap();

    assert!(matches!(summary.presentation.exit, PresentationExit::UserQuit));
    assert_eq!(summary.presentation.frames, 30);
    assert!(matches!(
        summary.acquisition.exit,
        AcquisitionExit::StopRequested
    ));
    assert_eq!(counters.stop_motor.load(Ordering::SeqCst), 1);
    assert_eq!(counters.disconnect.load(Ordering::SeqCst), 1);
}

#[test]
fn snapshots_are_never_torn() {
    let counters = Arc::new(Counters::default());
    let mut sink = CollectingSink::new(Some(200));

    run(
        &config(),
        || Ok(FakeLidar::endless(&counters)),
        &mut FakeCamera::new(),
        &mut NoDetections,
        &mut sink,
    )
    .unwrap();

    let mut last_sequence = 0;
    for (distances, sequence, _) in sink.reports.iter() {
        assert_eq!(distances.left, distances.center);
        assert_eq!(distances.center, distances.right);
        if *sequence > 0 {
            assert_eq!(distances.center, 500. + (*sequence - 1) as f64);
        } else {
            assert_eq!(*distances, SectorDistances::default());
        }
        assert!(*sequence >= last_sequence);
        last_sequence = *sequence;
    }
}

#[test]
fn stream_end_stops_presentation() {
    let counters = Arc::new(Counters::default());
    let mut sink = CollectingSink::new(None);

    let summary = run(
        &config(),
        || {
            let mut lidar = FakeLidar::endless(&counters);
            lidar.scans_before_end = Some(5);
            Ok(lidar)
        },
        &mut FakeCamera::new(),
        &mut NoDetections,
        &mut sink,
    )
    .unwrap();

    assert!(matches!(summary.acquisition.exit, AcquisitionExit::StreamEnded));
    assert_eq!(summary.acquisition.scans, 5);
    assert!(matches!(
        summary.presentation.exit,
        PresentationExit::StopRequested
    ));
    assert_eq!(summary.last_distances.sequence, 5);
    assert_eq!(counters.disconnect.load(Ordering::SeqCst), 1);
}

#[test]
fn device_failure_freezes_distances() {
    let counters = Arc::new(Counters::default());
    let mut sink = CollectingSink::new(Some(50));

    let summary = run(
        &config(),
        || {
            let mut lidar = FakeLidar::endless(&counters);
            lidar.first_distance = 800.;
            lidar.fail_after = Some(1);
            Ok(lidar)
        },
        &mut FakeCamera::new(),
        &mut NoDetections,
        &mut sink,
    )
    .unwrap();

    assert!(matches!(
        summary.acquisition.exit,
        AcquisitionExit::DeviceFailed(LidarError::Disconnected)
    ));
    assert!(matches!(summary.presentation.exit, PresentationExit::UserQuit));
    assert_eq!(summary.presentation.frames, 50);
    assert_eq!(
        summary.last_distances.distances,
        SectorDistances::new(800., 800., 800.)
    );
    assert_eq!(counters.disconnect.load(Ordering::SeqCst), 1);

    // 50 frames take far longer than the single scan
    let (distances, _, hint) = sink.reports.last().unwrap();
    assert_eq!(distances.center, 800.);
    assert_eq!(*hint, NavigationHint::Stop);
}

#[test]
fn connect_failure_keeps_presenting() {
    let mut sink = CollectingSink::new(Some(5));

    let summary = run(
        &config(),
        || -> Result<FakeLidar, LidarError> { Err(LidarError::Timeout) },
        &mut FakeCamera::new(),
        &mut NoDetections,
        &mut sink,
    )
    .unwrap();

    assert!(matches!(
        summary.acquisition.exit,
        AcquisitionExit::ConnectFailed(_)
    ));
    assert_eq!(summary.presentation.frames, 5);
    assert!(sink
        .reports
        .iter()
        .all(|(_, _, hint)| *hint == NavigationHint::PathClear));
}

#[test]
fn capture_failure_shuts_down() {
    let counters = Arc::new(Counters::default());
    let mut camera = FakeCamera::new();
    camera.limit = Some(10);
    let mut sink = CollectingSink::new(None);

    let summary = run(
        &config(),
        || Ok(FakeLidar::endless(&counters)),
        &mut camera,
        &mut NoDetections,
        &mut sink,
    )
    .unwrap();

    assert!(matches!(
        summary.presentation.exit,
        PresentationExit::CaptureFailed(_)
    ));
    assert_eq!(summary.presentation.frames, 10);
    assert!(matches!(
        summary.acquisition.exit,
        AcquisitionExit::StopRequested
    ));
    assert_eq!(counters.disconnect.load(Ordering::SeqCst), 1);
}

#[test]
fn logs_one_line_per_frame() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config();
    config.log_enabled = true;
    config.log_path = dir.path().join("logs").join("lidar_log.csv");
    let counters = Arc::new(Counters::default());
    let mut sink = CollectingSink::new(Some(12));

    run(
        &config,
        || Ok(FakeLidar::endless(&counters)),
        &mut FakeCamera::new(),
        &mut NoDetections,
        &mut sink,
    )
    .unwrap();

    let content = std::fs::read_to_string(&config.log_path).unwrap();
    assert_eq!(content.lines().count(), 12);
    for line in content.lines() {
        assert_eq!(line.split(',').count(), 4);
    }
}

#[test]
fn invalid_config_is_rejected_before_opening() {
    let mut config = config();
    config.alert_threshold = f64::NAN;
    let opened = AtomicUsize::new(0);

    let result = run(
        &config,
        || {
            opened.fetch_add(1, Ordering::SeqCst);
            Ok(FakeLidar::endless(&Arc::new(Counters::default())))
        },
        &mut FakeCamera::new(),
        &mut NoDetections,
        &mut CollectingSink::new(Some(1)),
    );

    assert!(matches!(result, Err(proximity_nav::FusionError::Configuration(_))));
    assert_eq!(opened.load(Ordering::SeqCst), 0);
}
