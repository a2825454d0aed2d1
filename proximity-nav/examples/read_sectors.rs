use clap::{Arg, Command};
use proximity_nav::{aggregate, LidarDevice, RplidarDevice, RplidarSettings};
use std::process::ExitCode;
use std::time::Duration;

const N_SCANS: usize = 5;

fn get_port_name() -> String {
    let matches = Command::new("LiDAR sector reader.")
        .about("Prints device information and the sector distances of a few scans.")
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

    match lidar.get_info() {
        Ok(info) => println!(
            "LiDAR info: model {}, firmware {}.{}, hardware {}, serial {}",
            info.model,
            info.firmware_major_version,
            info.firmware_minor_version,
            info.hardware_version,
            info.serial_number_hex()
        ),
        Err(e) => log::warn!("Cannot read device info: {e}"),
    }
    match lidar.get_health() {
        Ok(health) => println!("LiDAR health: {:?} ({})", health.status, health.error_code),
        Err(e) => log::warn!("Cannot read device health: {e}"),
    }

    if let Err(e) = lidar.start_motor() {
        // Dropping the device sends STOP and clears the motor
        log::error!("{e}");
        return ExitCode::FAILURE;
    }
    std::thread::sleep(Duration::from_secs(1));

    for i in 0..N_SCANS {
        match lidar.next_scan() {
            Ok(Some(scan)) => println!("Scan {i}: {} points, {}", scan.len(), aggregate(&scan)),
            Ok(None) => break,
            Err(e) => {
                log::error!("{e}");
                break;
            }
        }
    }

    if let Err(e) = lidar.stop_motor().and_then(|_| lidar.disconnect()) {
        log::warn!("{e}");
    }
    println!("LiDAR stopped.");
    ExitCode::SUCCESS
}
