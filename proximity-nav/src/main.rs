use clap::Parser;
use proximity_nav::config::DEFAULT_CONFIG_PATH;
use proximity_nav::headless::{spawn_quit_listener, ConsoleSink, NullDetector, PacedFrameSource};
use proximity_nav::{open_rplidar, run, Config, FusionError};
use std::io;
use std::process::ExitCode;

/// Fuses camera frames with RPLidar sector distances into navigation hints.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to the JSON settings file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,
    /// Serial port of the LiDAR, overrides PORT from the settings
    #[arg(short, long)]
    port: Option<String>,
}

fn load_config(args: &Args) -> Result<Config, FusionError> {
    let mut config = Config::load(&args.config)?;
    if let Some(port) = &args.port {
        config.port = port.clone();
    }
    config.validate()?;
    Ok(config)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    log::info!(
        "LiDAR on {}, alert threshold {} mm",
        config.port,
        config.alert_threshold
    );

    let mut source =
        PacedFrameSource::new(config.frame_width, config.frame_height, config.target_fps);
    let mut detector = NullDetector::new(&config.model_path);
    let quit_rx = spawn_quit_listener(io::BufReader::new(io::stdin()));
    let mut sink = ConsoleSink::new(quit_rx, config.alert_sound, io::stdout());

    log::info!("Running... Type q and press enter to exit.");
    match run(
        &config,
        || open_rplidar(&config),
        &mut source,
        &mut detector,
        &mut sink,
    ) {
        Ok(summary) => {
            log::debug!("{summary:?}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
