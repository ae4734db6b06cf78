/*
 *  main.rs
 *
 *  fluepdot - flip-dot display driver
 *  (c) 2020-26 Stuart Hunter
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{error, info};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use fluepdot::config::{self, Cli, Command, PixelAction};
use fluepdot::{frame, Fluepdot, HttpTransport, Mode, SerializedFrame, TextPlacement};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Resolves on SIGINT, SIGTERM or SIGHUP.
#[cfg(unix)]
async fn signal_handler() {
    let (mut sigint, mut sigterm, mut sighup) = match (
        signal(SignalKind::interrupt()),
        signal(SignalKind::terminate()),
        signal(SignalKind::hangup()),
    ) {
        (Ok(i), Ok(t), Ok(h)) => (i, t, h),
        _ => {
            error!("unable to install signal handlers, falling back to ctrl-c");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT received. Initiating graceful shutdown.");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received. Initiating graceful shutdown.");
        }
        _ = sighup.recv() => {
            info!("SIGHUP received. Initiating graceful shutdown.");
        }
    }
}

#[cfg(not(unix))]
async fn signal_handler() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Ctrl-C received. Initiating graceful shutdown.");
}

async fn run(dots: &mut Fluepdot<HttpTransport>, cfg: &config::Config, command: Command) -> Result<()> {
    match command {
        Command::Frame => {
            let text = dots.get_serialized_frame().await?;
            print!("{text}");
        }
        Command::Size => {
            let (w, h) = dots.get_size().await?;
            println!("{w}x{h}");
        }
        Command::PostFrame { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            dots.post_frame_raw(text).await?;
        }
        Command::PostGrid { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let grid = frame::decode(&SerializedFrame::new(text));
            info!("posting {}x{} grid, {} lit", grid.width(), grid.height(), grid.lit_count());
            dots.post_grid(&grid).await?;
        }
        Command::Pixel { action } => match action {
            PixelAction::Get { x, y } => println!("{}", dots.get_pixel(x, y).await?),
            PixelAction::Set { x, y } => { dots.set_pixel(x, y).await?; }
            PixelAction::Unset { x, y } => { dots.unset_pixel(x, y).await?; }
        },
        Command::Text { text, x, y, font } => {
            dots.post_text(&text, &TextPlacement { x, y, font }).await?;
        }
        Command::Fonts => {
            for font in dots.get_fonts().await? {
                println!("{font}");
            }
        }
        Command::Mode { mode: None } => println!("{}", dots.get_mode().await?),
        Command::Mode { mode: Some(m) } => {
            let mode: Mode = m.parse()?;
            dots.set_mode(mode).await?;
            info!("rendering mode set to {mode}");
        }
        Command::Clock => {
            let options = cfg.clock.clone().unwrap_or_default().options();
            info!("clock at ({}, {}) in {}, ctrl-c to stop", options.x, options.y, options.font);
            dots.post_time(&options, signal_handler()).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli).context("loading configuration")?;

    if cli.dump_config {
        print!("{}", config::dump(&cfg)?);
        return Ok(());
    }

    let level = cfg.log_level.clone().unwrap_or_else(|| "info".to_string());
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();

    info!("{} v.{} built {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let command = cli.require_command()?;

    let device = cfg.device.clone().unwrap_or_default();
    let mut dots = Fluepdot::from_config(&device).context("building HTTP client")?;

    run(&mut dots, &cfg, command).await
}
