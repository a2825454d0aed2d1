use clap::{Arg, Command};
use piston_window::{EventLoop, PistonWindow, WindowSettings};
use plotters::drawing::IntoDrawingArea;
use plotters::prelude::{ChartBuilder, Circle, BLUE, WHITE};
use plotters::style::Color;
use plotters_piston::{draw_piston_window, PistonBackend};
use proximity_data::ScanSample;
use proximity_nav::{LidarDevice, RplidarDevice, RplidarSettings};
use std::cell::Cell;
use std::process::ExitCode;
use std::time::Duration;

fn get_port_name() -> String {
    let matches = Command::new("LiDAR scan plotter.")
        .about("Reads scans from an RPLidar and plots them live.")
        .disable_version_flag(true)
        .arg(
            Arg::new("port")
                .help("The device path to a serial port")
                .use_value_delimiter(false)
                .required(true),
        )
        .get_matches();

    let port_name: &String = matches.get_one("port").unwrap();
    port_name.to_string()
}

const WINDOW_RANGE: f64 = 6000.;
const FPS: u64 = 30;
const N_SCANS: usize = 50;

fn draw_scan(
    b: PistonBackend,
    points: &[(f64, f64)],
    index: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = b.into_drawing_area();
    root.fill(&WHITE)?;

    let mut cc = ChartBuilder::on(&root)
        .caption(format!("RPLidar scan #{index}"), ("sans-serif", 20))
        .build_cartesian_2d(-WINDOW_RANGE..WINDOW_RANGE, -WINDOW_RANGE..WINDOW_RANGE)?;

    let circles: Vec<_> = points
        .iter()
        .map(|(x, y)| Circle::new((*x, *y), 2, BLUE.filled()))
        .collect();
    cc.draw_series(circles)?;

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let port_name = get_port_name();

    let mut lidar = match RplidarDevice::open(&port_name, RplidarSettings::default()) {
        Ok(lidar) => lidar,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = lidar.start_motor() {
        log::error!("{e}");
        return ExitCode::FAILURE;
    }
    std::thread::sleep(Duration::from_secs(1));

    let mut window: PistonWindow = match WindowSettings::new("LiDAR scan", [800, 800]).build() {
        Ok(window) => window,
        Err(e) => {
            log::error!("Cannot open window: {e}");
            return ExitCode::FAILURE;
        }
    };
    window.set_max_fps(FPS);

    println!("Live plot started. Close the window to stop.");
    let mut status = ExitCode::SUCCESS;
    'scans: for index in 0..N_SCANS {
        let scan = match lidar.next_scan() {
            Ok(Some(scan)) => scan,
            Ok(None) => break,
            Err(e) => {
                log::error!("{e}");
                status = ExitCode::FAILURE;
                break;
            }
        };
        println!("Scan {index}: {} points.", scan.len());
        let points: Vec<(f64, f64)> = scan.samples.iter().map(ScanSample::to_cartesian).collect();

        // Input events come in between renders
        loop {
            let rendered = Cell::new(false);
            let event = draw_piston_window(&mut window, |b: PistonBackend| {
                rendered.set(true);
                draw_scan(b, &points, index)
            });
            if event.is_none() {
                break 'scans;
            }
            if rendered.get() {
                break;
            }
        }
    }

    if let Err(e) = lidar.stop_motor().and_then(|_| lidar.disconnect()) {
        log::warn!("{e}");
    }
    println!("LiDAR disconnected.");
    status
}
