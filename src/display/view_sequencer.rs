/*
 *  display/view_sequencer.rs
 *
 *  WxMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  View sequencer - steps current and forecast panels across the
 *  configured locations
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
use std::time::Duration;

use crate::config::Config;
use crate::display::components::scrollers::{ScrollReport, ScrollTiming};
use crate::schedule::elapsed_between;
use crate::weather::LocationSlot;

/// What the screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    ShowingCurrent(LocationSlot),
    ShowingForecast(LocationSlot),
}

impl View {
    pub fn location(self) -> LocationSlot {
        match self {
            View::ShowingCurrent(l) | View::ShowingForecast(l) => l,
        }
    }

    pub fn is_forecast(self) -> bool {
        matches!(self, View::ShowingForecast(_))
    }

    /// Current then forecast for each location in turn.
    pub fn next(self, has_secondary: bool) -> View {
        match self {
            View::ShowingCurrent(l) => View::ShowingForecast(l),
            View::ShowingForecast(l) => View::ShowingCurrent(l.next(has_secondary)),
        }
    }
}

/// When a view has been up long enough
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvancePolicy {
    /// Fixed dwell per view
    FixedDuration { seconds: Duration },

    /// Until every scrolling element has completed a cycle; views with
    /// nothing to scroll are held for `idle_dwell`.
    WaitForScrollCompletion { idle_dwell: Duration },
}

impl AdvancePolicy {
    /// `displayDuration` of 0 selects scroll completion.
    pub fn from_config(config: &Config) -> Self {
        if config.display_duration_secs == 0 {
            AdvancePolicy::WaitForScrollCompletion {
                idle_dwell: ScrollTiming::from_config(config).idle_dwell(),
            }
        } else {
            AdvancePolicy::FixedDuration {
                seconds: Duration::from_secs(config.display_duration_secs),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub view: View,
    pub started_at: DateTime<Local>,
}

/// View sequencer - owns the active view and decides when to move on
pub struct ViewSequencer {
    policy: AdvancePolicy,
    has_secondary: bool,
    state: ViewState,
}

impl ViewSequencer {
    pub fn new(policy: AdvancePolicy, has_secondary: bool, now: DateTime<Local>) -> Self {
        Self {
            policy,
            has_secondary,
            state: ViewState {
                view: View::ShowingCurrent(LocationSlot::Primary),
                started_at: now,
            },
        }
    }

    pub fn from_config(config: &Config, now: DateTime<Local>) -> Self {
        Self::new(AdvancePolicy::from_config(config), config.other_location.is_some(), now)
    }

    pub fn policy(&self) -> AdvancePolicy {
        self.policy
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn view(&self) -> View {
        self.state.view
    }

    /// Time the current view has been up
    pub fn elapsed(&self, now: &DateTime<Local>) -> Duration {
        elapsed_between(&self.state.started_at, now)
    }

    pub fn should_advance(&self, now: &DateTime<Local>, scrolls: &ScrollReport) -> bool {
        match self.policy {
            AdvancePolicy::FixedDuration { seconds } => self.elapsed(now) >= seconds,
            AdvancePolicy::WaitForScrollCompletion { idle_dwell } => {
                if scrolls.any_scrolling {
                    scrolls.all_complete
                } else {
                    self.elapsed(now) >= idle_dwell
                }
            }
        }
    }

    /// Move to the next view unconditionally and return it
    pub fn advance(&mut self, now: DateTime<Local>) -> View {
        let next = self.state.view.next(self.has_secondary);
        log::debug!("View changed: {:?} -> {:?}", self.state.view, next);
        self.state = ViewState { view: next, started_at: now };
        next
    }

    /// Advance if due. Returns the new view when it changed.
    pub fn update(&mut self, now: DateTime<Local>, scrolls: &ScrollReport) -> Option<View> {
        if self.should_advance(&now, scrolls) {
            Some(self.advance(now))
        } else {
            None
        }
    }

    /// Back to the primary current view, used when the display wakes.
    pub fn restart(&mut self, now: DateTime<Local>) {
        log::info!("View sequence restarted");
        self.state = ViewState {
            view: View::ShowingCurrent(LocationSlot::Primary),
            started_at: now,
        };
    }
}
