use crate::constants::{MEASUREMENT_SIZE, MIN_SCAN_SAMPLES};
use crate::error::LidarError;
use crate::packet::parse_measurement;
use crate::serial::{get_n_read, read, stop_scan_and_flush};
use crate::time::sleep_ms;
use crossbeam_channel::{bounded, Receiver, Sender};
use proximity_data::Scan;
use serialport::SerialPort;
use std::collections::VecDeque;
use std::sync::mpsc;
use std::thread::JoinHandle;

pub(crate) type ScanResult = Result<Scan, LidarError>;

/// Struct that contains driver threads.
pub struct DriverThreads {
    pub(crate) reader_terminator_tx: Sender<bool>,
    pub(crate) parser_terminator_tx: Sender<bool>,
    pub(crate) reader_thread: Option<JoinHandle<()>>,
    pub(crate) parser_thread: Option<JoinHandle<()>>,
}

/// Starts the reader and parser threads on a port that is already scanning.
pub(crate) fn spawn_driver_threads(
    mut port: Box<dyn SerialPort>,
) -> Result<(DriverThreads, mpsc::Receiver<ScanResult>), LidarError> {
    let (reader_terminator_tx, reader_terminator_rx) = bounded(10);
    let (parser_terminator_tx, parser_terminator_rx) = bounded(10);
    let (scan_data_tx, scan_data_rx) = mpsc::sync_channel::<Result<Vec<u8>, LidarError>>(200);
    let (scan_tx, scan_rx) = mpsc::sync_channel::<ScanResult>(10);

    let reader_thread = std::thread::Builder::new()
        .name("rplidar-reader".to_string())
        .spawn(move || {
            read_device_signal(&mut port, scan_data_tx, reader_terminator_rx);
        })?;

    let parser_thread = std::thread::Builder::new()
        .name("rplidar-parser".to_string())
        .spawn(move || {
            parse_packets(scan_data_rx, parser_terminator_rx, scan_tx);
        })?;

    let driver_threads = DriverThreads {
        reader_thread: Some(reader_thread),
        parser_thread: Some(parser_thread),
        reader_terminator_tx,
        parser_terminator_tx,
    };
    Ok((driver_threads, scan_rx))
}

pub(crate) fn read_device_signal(
    port: &mut Box<dyn SerialPort>,
    scan_data_tx: mpsc::SyncSender<Result<Vec<u8>, LidarError>>,
    reader_terminator_rx: Receiver<bool>,
) {
    while !do_terminate(&reader_terminator_rx) {
        let signal = match get_n_read(port) {
            Ok(0) => {
                sleep_ms(1);
                continue;
            }
            Ok(n_read) => read(port, n_read),
            Err(e) => Err(e),
        };

        let failed = signal.is_err();
        if scan_data_tx.send(signal).is_err() || failed {
            break;
        }
    }

    if let Err(e) = stop_scan_and_flush(port) {
        log::warn!("Failed to stop scanning: {e}");
    }
}

pub(crate) fn parse_packets(
    scan_data_rx: mpsc::Receiver<Result<Vec<u8>, LidarError>>,
    parser_terminator_rx: Receiver<bool>,
    scan_tx: mpsc::SyncSender<ScanResult>,
) {
    let mut buffer = VecDeque::<u8>::new();
    let mut scan = Scan::new();
    while !do_terminate(&parser_terminator_rx) {
        match scan_data_rx.try_recv() {
            Ok(Ok(data)) => buffer.extend(data),
            Ok(Err(e)) => {
                let _ = scan_tx.send(Err(e));
                return;
            }
            Err(mpsc::TryRecvError::Empty) => sleep_ms(10),
            Err(mpsc::TryRecvError::Disconnected) => return,
        }

        while buffer.len() >= MEASUREMENT_SIZE {
            let raw = buffer.drain(..MEASUREMENT_SIZE).collect::<Vec<_>>();
            let measurement = match parse_measurement(&raw) {
                Ok(m) => m,
                Err(e) => {
                    let _ = scan_tx.send(Err(e));
                    return;
                }
            };
            if measurement.new_scan {
                if scan.len() > MIN_SCAN_SAMPLES && scan_tx.send(Ok(scan)).is_err() {
                    // Nobody listens anymore
                    return;
                }
                scan = Scan::new();
            }
            let sample = measurement.sample;
            if sample.quality > 0 && sample.distance_mm > 0. {
                scan.push(sample);
            }
        }
    }
}

pub(crate) fn do_terminate(terminator_rx: &Receiver<bool>) -> bool {
    terminator_rx.try_recv().unwrap_or(false)
}

/// Function to join driver threads.
/// This function is automatically called when `driver_threads` is dropped.
pub fn join(driver_threads: &mut DriverThreads) {
    // The threads may already have quit on a device error
    let _ = driver_threads.reader_terminator_tx.send(true);
    let _ = driver_threads.parser_terminator_tx.send(true);

    if let Some(thread) = driver_threads.reader_thread.take() {
        if thread.join().is_err() {
            log::error!("LiDAR reader thread panicked");
        }
    }
    if let Some(thread) = driver_threads.parser_thread.take() {
        if thread.join().is_err() {
            log::error!("LiDAR parser thread panicked");
        }
    }
}

impl Drop for DriverThreads {
    fn drop(&mut self) {
        join(self);
    }
}
