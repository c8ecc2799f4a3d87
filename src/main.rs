/*
 *  main.rs
 *
 *  WxMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Weather monitor for SPI attached OLED panels
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

use anyhow::{bail, Context};
use clap::Parser;
use env_logger::Env;
use log::{debug, error, info, warn};
use std::time::Duration;
use tokio::signal::unix::{signal, SignalKind};

use wxmons::config::{self, Cli, Config};
use wxmons::constants::INACTIVE_POLL_MS;
use wxmons::display::{BoxedDriver, DisplayDriverFactory, DisplayManager, LayoutConfig, RenderPipeline};
use wxmons::pacer::Pacer;
use wxmons::schedule::WallClock;
use wxmons::weather::{OpenWeatherClient, SnapshotStore, WeatherCache};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

const API_KEY_MISSING: &str = "API Key Not Set!";

/// Asynchronously waits for a SIGINT, SIGTERM, or SIGHUP signal.
async fn signal_handler() -> anyhow::Result<()> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

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
    Ok(())
}

/// Put the message on the panel, hold it, then give up.
async fn missing_api_key(config: &Config, mut driver: BoxedDriver) -> anyhow::Result<()> {
    error!("{} Set openWeatherApiKey in the environment or config file.", API_KEY_MISSING);
    let pipeline = RenderPipeline::new(config, LayoutConfig::for_display(driver.capabilities()));
    let frame = pipeline.compose_message(API_KEY_MISSING);
    if let Err(e) = pipeline.present(&frame, driver.as_mut()) {
        warn!("Could not show API key message: {}", e);
    }
    tokio::time::sleep(config.api_error_sleep()).await;
    bail!("no OpenWeatherMap API key configured")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = config::load(&cli).context("configuration")?;

    if cli.dump_config {
        print!("{}", serde_yaml::to_string(&config)?);
        return Ok(());
    }

    env_logger::Builder::from_env(Env::default().default_filter_or(if config.debug {"debug"} else {"info"}))
        .format_timestamp_secs()
        .init();

    info!("This {} worth the Squeeze", env!("CARGO_PKG_NAME"));
    info!("v.{} built {}", env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let mut driver = DisplayDriverFactory::create(&config, cli.emulated)?;
    driver.init()?;

    if !config.has_api_key() {
        return missing_api_key(&config, driver).await;
    }

    let clock = match config.debug_date {
        Some(start) => {
            info!("Debug clock starting at {}", start);
            WallClock::starting_at(start)
        }
        None => WallClock::system(),
    };

    let client = OpenWeatherClient::new(&config.api_key)?;
    let mut cache = WeatherCache::new(client, &config).with_store(SnapshotStore::new(&config.cache_dir));
    if config.force_refresh {
        info!("Ignoring stored snapshots, refreshing now");
        cache.force_refresh();
    }

    let mut manager = DisplayManager::new(driver, cache, &config, clock.now());
    let mut pacer = Pacer::new(manager.frame_interval());
    let log_every = config.log_interval();

    // Main application loop
    tokio::select! {
        res = signal_handler() => {
            if let Err(e) = res {
                error!("Signal handling failed: {}", e);
            }
        }

        _ = async {
            loop {
                pacer.wait().await;
                let report = manager.tick(clock.now());

                let period = if report.active {
                    report.frame_interval
                } else {
                    Duration::from_millis(INACTIVE_POLL_MS)
                };
                pacer.set_frame_interval(period);

                if !log_every.is_zero() && pacer.window_elapsed() >= log_every {
                    let fps = pacer.take_effective_fps();
                    if report.active {
                        let m = manager.performance_metrics();
                        info!("Effective FPS: {:.1}, avg frame {}μs, {} write error(s)",
                              fps, m.avg_frame_time_us, m.write_errors);
                    } else {
                        debug!("Outside operating hours, display asleep");
                    }
                }
            }
        } => {
            info!("Closed Application Loop.");
        }
    }

    info!("Main application exiting. Clearing display.");
    if let Err(e) = manager.shutdown() {
        warn!("Display shutdown failed: {}", e);
    }

    Ok(())
}
