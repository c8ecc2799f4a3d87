/*
 *  display/manager.rs
 *
 *  WxMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display manager - one tick of schedule, data, view, scroll,
 *  transition and render
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

use chrono::{DateTime, Local};
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::display::components::scrollers::{ElementId, ScrollEngine, ScrollTiming};
use crate::display::components::transition::TransitionState;
use crate::display::error::DisplayError;
use crate::display::factory::BoxedDriver;
use crate::display::layout::LayoutConfig;
use crate::display::pipeline::{RenderPipeline, Scene};
use crate::display::traits::DisplayCapabilities;
use crate::display::view_sequencer::{View, ViewSequencer};
use crate::schedule::ScheduleClock;
use crate::weather::{WeatherCache, WeatherClient, WeatherSnapshot};

/// Performance metrics for display rendering
#[derive(Debug, Clone)]
pub struct PerformanceMetrics {
    /// Time spent composing the last frame
    pub render_time_us: u64,

    /// Time spent handing the last frame to the driver
    pub transfer_time_us: u64,

    /// Frames written successfully
    pub frame_count: u64,

    /// Frames the driver rejected
    pub write_errors: u64,

    /// Average frame time over recent frames
    pub avg_frame_time_us: u64,

    /// Frame budget at the configured rate
    pub target_frame_time_us: u64,
}

impl PerformanceMetrics {
    pub fn new(frame_interval: Duration) -> Self {
        Self {
            render_time_us: 0,
            transfer_time_us: 0,
            frame_count: 0,
            write_errors: 0,
            avg_frame_time_us: 0,
            target_frame_time_us: frame_interval.as_micros() as u64,
        }
    }

    pub fn record_frame(&mut self, render_time_us: u64, transfer_time_us: u64) {
        self.render_time_us = render_time_us;
        self.transfer_time_us = transfer_time_us;
        let frame_time_us = render_time_us + transfer_time_us;
        self.frame_count += 1;

        // Simple moving average (last frame + current) / 2
        if self.avg_frame_time_us == 0 {
            self.avg_frame_time_us = frame_time_us;
        } else {
            self.avg_frame_time_us = (self.avg_frame_time_us + frame_time_us) / 2;
        }

        if frame_time_us > self.target_frame_time_us * 12 / 10 {
            debug!("Frame time {}μs exceeds target {}μs (render: {}μs, transfer: {}μs)",
                   frame_time_us, self.target_frame_time_us,
                   render_time_us, transfer_time_us);
        }
    }
}

/// What one tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Inside operating hours
    pub active: bool,

    /// A frame was composed and handed to the driver
    pub rendered: bool,

    /// View entered on this tick, if the sequencer advanced
    pub advanced: Option<View>,

    /// The driver rejected the frame
    pub write_error: bool,

    /// Period until the next tick
    pub frame_interval: Duration,
}

/// Display manager that orchestrates all display operations
///
/// Owns the schedule gate, the weather cache, the view sequencer, the
/// scroll engine and the render pipeline, and runs them in that order
/// once per [`tick`](DisplayManager::tick). The caller paces ticks and
/// supplies the time, so the whole cycle runs the same against the
/// mock driver with a simulated clock as it does on the panel.
///
/// The render path never waits on the network: the cache fetches on a
/// spawned task and the result is picked up by a later tick.
pub struct DisplayManager<C: WeatherClient> {
    driver: BoxedDriver,
    capabilities: DisplayCapabilities,
    clock: ScheduleClock,
    cache: WeatherCache<C>,
    sequencer: ViewSequencer,
    scrolls: ScrollEngine,
    pipeline: RenderPipeline,
    transition: Option<TransitionState>,
    display_on: bool,
    metrics: PerformanceMetrics,
}

/// Snapshot for `view` and the name its forecast title uses.
fn scene_source<C: WeatherClient>(
    cache: &WeatherCache<C>,
    view: View,
) -> (Option<Arc<WeatherSnapshot>>, String) {
    let snapshot = cache.snapshot(view.location());
    let location = match &snapshot {
        Some(s) => s.display_name.clone(),
        None => cache.query(view.location()).unwrap_or_default().to_string(),
    };
    (snapshot, location)
}

impl<C: WeatherClient> DisplayManager<C> {
    /// Build around an initialised driver.
    pub fn new(driver: BoxedDriver, cache: WeatherCache<C>, config: &Config, now: DateTime<Local>) -> Self {
        let capabilities = driver.capabilities().clone();
        let layout = LayoutConfig::for_display(&capabilities);
        let clock = ScheduleClock::new(config.operating_hours, config.fps);

        info!("Display: {}x{}, {} location(s), operating hours {}",
              capabilities.width, capabilities.height,
              cache.location_count(), config.operating_hours);

        Self {
            driver,
            capabilities,
            metrics: PerformanceMetrics::new(clock.frame_interval()),
            clock,
            cache,
            sequencer: ViewSequencer::from_config(config, now),
            scrolls: ScrollEngine::new(ScrollTiming::from_config(config)),
            pipeline: RenderPipeline::new(config, layout),
            transition: None,
            display_on: true,
        }
    }

    /// Get display capabilities
    pub fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    pub fn cache(&self) -> &WeatherCache<C> {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut WeatherCache<C> {
        &mut self.cache
    }

    pub fn view(&self) -> View {
        self.sequencer.view()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn performance_metrics(&self) -> &PerformanceMetrics {
        &self.metrics
    }

    pub fn frame_interval(&self) -> Duration {
        self.clock.frame_interval()
    }

    /// Replace the screen with one line of text.
    pub fn show_message(&mut self, text: &str) -> Result<(), DisplayError> {
        let frame = self.pipeline.compose_message(text);
        self.pipeline.present(&frame, self.driver.as_mut())
    }

    /// Blank and power down the panel.
    pub fn shutdown(&mut self) -> Result<(), DisplayError> {
        info!("Clearing display");
        self.driver.clear()?;
        self.driver.set_display_on(false)?;
        self.display_on = false;
        Ok(())
    }

    fn set_panel(&mut self, on: bool) {
        if on == self.display_on {
            return;
        }
        if !on {
            if let Err(e) = self.driver.clear() {
                error!("Failed to clear display: {}", e);
            }
        }
        if let Err(e) = self.driver.set_display_on(on) {
            error!("Failed to switch display {}: {}", if on { "on" } else { "off" }, e);
        }
        self.display_on = on;
    }

    pub fn tick(&mut self, now: DateTime<Local>) -> TickReport {
        let clock = self.clock.tick(&now);
        self.cache.poll(&now);

        if !clock.active {
            self.set_panel(false);
            return TickReport {
                active: false,
                rendered: false,
                advanced: None,
                write_error: false,
                frame_interval: clock.frame_interval,
            };
        }

        if clock.woke {
            self.set_panel(true);
            self.transition = None;
            self.scrolls.reset();
            self.sequencer.restart(now);
        }

        if self.cache.needs_refresh(&now) {
            self.cache.begin_refresh(&now);
        }

        if let Some(t) = &self.transition {
            if self.pipeline.transitions().is_finished(t, &now) {
                self.transition = None;
                self.scrolls.reset();
            }
        }

        let render_start = Instant::now();
        let mut view = self.sequencer.view();
        let (mut snapshot, mut location) = scene_source(&self.cache, view);
        let mut advanced = None;

        // scrolling is frozen while a transition is on screen
        if self.transition.is_none() {
            let scene = Scene { view, location: &location, snapshot: snapshot.as_deref() };
            let elements = self.pipeline.scroll_elements(&scene, &now);
            for el in &elements {
                self.scrolls.update(el.id, &el.text, &el.font, el.area.size.width, now);
            }
            let ids: Vec<ElementId> = elements.iter().map(|e| e.id).collect();
            self.scrolls.retain(&ids);

            if let Some(next) = self.sequencer.update(now, &self.scrolls.report()) {
                // scene still describes the view being left
                let outgoing = self.pipeline.compose_content(&scene, &self.scrolls, &now);
                view = next;
                self.scrolls.reset();
                self.transition = Some(self.pipeline.begin_transition(outgoing, now));
                advanced = Some(view);
                (snapshot, location) = scene_source(&self.cache, view);
            }
        }

        let scene = Scene { view, location: &location, snapshot: snapshot.as_deref() };
        let frame = self.pipeline.compose_frame(&scene, &self.scrolls, self.transition.as_ref(), &now);
        let render_us = render_start.elapsed().as_micros() as u64;

        let transfer_start = Instant::now();
        let write_error = match self.pipeline.present(&frame, self.driver.as_mut()) {
            Ok(()) => {
                self.metrics.record_frame(render_us, transfer_start.elapsed().as_micros() as u64);
                false
            }
            Err(e) => {
                self.metrics.write_errors += 1;
                if self.metrics.write_errors == 1 || self.metrics.write_errors % 100 == 0 {
                    error!("Frame write failed ({} so far): {}", self.metrics.write_errors, e);
                } else {
                    warn!("Frame write failed: {}", e);
                }
                true
            }
        };

        TickReport {
            active: true,
            rendered: true,
            advanced,
            write_error,
            frame_interval: clock.frame_interval,
        }
    }
}
