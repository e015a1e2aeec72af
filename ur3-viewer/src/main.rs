// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use clap::{Parser, ValueHint};
use tokio::sync::{broadcast, mpsc};

use ur3::{
    asset::Asset,
    control::ControlCommand,
    program::Program,
    robot::Robot,
    runtime::{FrameLoop, NullDetector},
    Configurable,
};

mod config;
mod render;

#[derive(Parser)]
#[command(author = "Copyright (C) 2024 Laixer Equipment B.V.")]
#[command(version, propagate_version = true)]
#[command(about = "UR3 skeleton viewer", long_about = None)]
struct Args {
    /// Configuration file.
    #[arg(
        short = 'c',
        long = "config",
        alias = "conf",
        value_name = "FILE",
        value_hint = ValueHint::FilePath
    )]
    config: Option<std::path::PathBuf>,
    /// Robot asset, overrides the configuration.
    #[arg(short = 'a', long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    asset: Option<std::path::PathBuf>,
    /// Joint program to play back.
    #[arg(short = 'p', long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    program: Option<std::path::PathBuf>,
    /// Frames per second.
    #[arg(long)]
    frame_rate: Option<u32>,
    /// Quiet output (no logging).
    #[arg(long)]
    quiet: bool,
    /// Daemonize the service.
    #[arg(short = 'D', long)]
    daemon: bool,
    /// Level of verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    use log::LevelFilter;

    let args = Args::parse();

    let mut config: config::Config = match &args.config {
        Some(path) => ur3::from_file(path)?,
        None => config::Config::default(),
    };

    if let Some(asset) = args.asset {
        config.asset = asset;
    }
    if args.program.is_some() {
        config.program = args.program;
    }
    if let Some(frame_rate) = args.frame_rate {
        config.frame_rate = frame_rate;
    }

    let mut log_config = simplelog::ConfigBuilder::new();
    if args.daemon {
        log_config.set_time_level(LevelFilter::Off);
        log_config.set_thread_level(LevelFilter::Off);
    }

    log_config.set_target_level(LevelFilter::Off);
    log_config.set_location_level(LevelFilter::Off);
    log_config.add_filter_ignore_str("mio");

    let log_level = if args.daemon {
        LevelFilter::Info
    } else if args.quiet {
        LevelFilter::Off
    } else {
        match args.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    let color_choice = if args.daemon {
        simplelog::ColorChoice::Never
    } else {
        simplelog::ColorChoice::Auto
    };

    simplelog::TermLogger::init(
        log_level,
        log_config.build(),
        simplelog::TerminalMode::Mixed,
        color_choice,
    )?;

    if args.daemon {
        log::debug!("Running service as daemon");
    }

    log::trace!("{:#?}", config);

    ////////////////////

    use std::time::Duration;

    log::info!("UR3 viewer {}", ur3::consts::VERSION);

    let asset_path = config.asset.clone();
    let asset = match tokio::task::spawn_blocking(move || Asset::load(asset_path)).await? {
        Ok(asset) => asset,
        Err(e) => {
            log::error!("Failed to load asset {}: {}", config.asset.display(), e);
            return Err(e.into());
        }
    };

    log::info!("Asset '{}' loaded", asset.name());

    let mut robot = setup_robot(&asset, &config)?;
    robot.home()?;

    let (command_tx, command_rx) = mpsc::channel(ur3::consts::QUEUE_SIZE_COMMAND);
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

    let panel_tx = command_tx.clone();
    std::thread::spawn(move || panel(panel_tx));

    if let Some(path) = &config.program {
        let program = load_program(path)?;

        log::info!("Playing program {} with {} steps", path.display(), program.len());

        tokio::spawn(playback(program, command_tx.clone()));
    }

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for interrupt: {}", e);
        }

        log::info!("Termination requested");

        shutdown_tx.send(()).ok();
    });

    let frame_rate = config.frame_rate.clamp(1, 240);
    let interval = Duration::from_secs_f64(1.0 / frame_rate as f64);

    let mut frame_loop = FrameLoop::new(robot, NullDetector, render::LogRenderer::default());
    frame_loop.run(interval, command_rx, shutdown_rx).await;

    drop(command_tx);

    log::debug!("{} was shutdown gracefully", env!("CARGO_BIN_NAME"));

    Ok(())
}

fn setup_robot(asset: &Asset, config: &impl Configurable) -> ur3::Result<Robot> {
    Robot::new(asset, config.robot().clone()).map_err(|e| {
        log::error!("Failed to set up robot from asset '{}': {}", asset.name(), e);
        e
    })
}

fn load_program(path: &std::path::Path) -> ur3::Result<Program> {
    Program::load(path).map_err(|e| {
        log::error!("Failed to load program {}: {}", path.display(), e);
        e
    })
}

/// Read control commands from stdin, one per line.
///
/// Blocks on stdin, run it on a dedicated thread.
fn panel(command_tx: mpsc::Sender<ControlCommand>) {
    for line in std::io::stdin().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("Failed to read control panel input: {}", e);
                return;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<ControlCommand>() {
            Ok(command) => {
                if command_tx.blocking_send(command).is_err() {
                    return;
                }
            }
            Err(e) => log::warn!("{}", e),
        }
    }

    log::debug!("Control panel input closed");
}

/// Send each program step as a move command.
async fn playback(mut program: Program, command_tx: mpsc::Sender<ControlCommand>) {
    while let Some(pose) = program.next() {
        if command_tx.send(ControlCommand::Move(pose)).await.is_err() {
            return;
        }

        tokio::time::sleep(ur3::consts::PROGRAM_STEP_INTERVAL).await;
    }

    log::info!("Program finished");
}
