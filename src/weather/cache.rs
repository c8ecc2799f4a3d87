/*
 *  weather/cache.rs
 *
 *  WxMonS - worth the squeeze
 *	(c) 2020-26 Stuart Hunter
 *
 *	Latest snapshot per location and the refresh schedule
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */
use chrono::{DateTime, Local, TimeDelta, Utc};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::{Config, Units};
use super::store::SnapshotStore;
use super::{FetchError, LocationSlot, WeatherClient, WeatherSnapshot};

/// Result of one refresh task, one entry per configured location.
#[derive(Debug)]
pub struct RefreshOutcome {
    pub results: Vec<(LocationSlot, Result<WeatherSnapshot, FetchError>)>,
}

#[derive(Debug)]
struct Entry {
    query: String,
    snapshot: Option<Arc<WeatherSnapshot>>,
}

/// Owns the snapshots the render path reads.
///
/// At most one refresh task is outstanding. Its outcome arrives over a
/// channel and is applied by `poll` on the render loop, where snapshots
/// are swapped whole.
pub struct WeatherCache<C: WeatherClient> {
    client: Arc<C>,
    units: Units,
    entries: Vec<Entry>,
    update_interval: TimeDelta,
    error_sleep: TimeDelta,
    next_refresh_at: Option<DateTime<Local>>,
    forced: bool,
    in_flight: Option<JoinHandle<()>>,
    failures: u32,
    tx: mpsc::UnboundedSender<RefreshOutcome>,
    rx: mpsc::UnboundedReceiver<RefreshOutcome>,
    store: Option<SnapshotStore>,
}

fn delta(d: Duration) -> TimeDelta {
    TimeDelta::from_std(d).unwrap_or_else(|_| TimeDelta::days(36_500))
}

impl<C: WeatherClient> WeatherCache<C> {
    pub fn new(client: C, config: &Config) -> Self {
        Self::with_schedule(
            client,
            config.units,
            config.locations(),
            config.update_interval(),
            config.api_error_sleep(),
        )
    }

    pub fn with_schedule(
        client: C,
        units: Units,
        locations: Vec<String>,
        update_interval: Duration,
        error_sleep: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            client: Arc::new(client),
            units,
            entries: locations
                .into_iter()
                .take(2)
                .map(|query| Entry { query, snapshot: None })
                .collect(),
            update_interval: delta(update_interval),
            error_sleep: delta(error_sleep),
            next_refresh_at: None,
            forced: false,
            in_flight: None,
            failures: 0,
            tx,
            rx,
            store: None,
        }
    }

    /// Attach the on-disk store and seed from whatever it holds.
    ///
    /// The next refresh is scheduled from the oldest seeded snapshot;
    /// a location with nothing saved refreshes straight away.
    pub fn with_store(mut self, store: SnapshotStore) -> Self {
        let mut due: Option<DateTime<Local>> = None;
        let mut missing = false;
        for entry in self.entries.iter_mut() {
            match store.load(&entry.query) {
                Ok(Some(snap)) => {
                    info!("Loaded cached weather for {} from {}", entry.query, snap.fetched_at);
                    let at = (snap.fetched_at + self.update_interval).with_timezone(&Local);
                    due = Some(due.map_or(at, |d| d.min(at)));
                    entry.snapshot = Some(Arc::new(snap));
                }
                Ok(None) => missing = true,
                Err(e) => {
                    warn!("Ignoring cached weather for {}: {}", entry.query, e);
                    missing = true;
                }
            }
        }
        self.next_refresh_at = if missing { None } else { due };
        self.store = Some(store);
        self
    }

    /// Refresh on the next opportunity regardless of the schedule. One shot.
    pub fn force_refresh(&mut self) {
        self.forced = true;
    }

    pub fn location_count(&self) -> usize {
        self.entries.len()
    }

    pub fn has_secondary(&self) -> bool {
        self.entries.len() > 1
    }

    pub fn query(&self, slot: LocationSlot) -> Option<&str> {
        self.entries.get(slot.index()).map(|e| e.query.as_str())
    }

    pub fn snapshot(&self, slot: LocationSlot) -> Option<Arc<WeatherSnapshot>> {
        self.entries.get(slot.index()).and_then(|e| e.snapshot.clone())
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.failures
    }

    pub fn next_refresh_at(&self) -> Option<DateTime<Local>> {
        self.next_refresh_at
    }

    pub fn needs_refresh(&self, now: &DateTime<Local>) -> bool {
        if self.in_flight.is_some() {
            return false;
        }
        if self.forced {
            return true;
        }
        self.next_refresh_at.is_none_or(|at| *now >= at)
    }

    /// Start the refresh task if one is due. Returns true when started.
    pub fn begin_refresh(&mut self, now: &DateTime<Local>) -> bool {
        if !self.needs_refresh(now) {
            return false;
        }
        self.forced = false;
        let targets: Vec<(LocationSlot, String)> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| LocationSlot::from_index(i).map(|s| (s, e.query.clone())))
            .collect();
        debug!("Starting weather refresh for {} location(s)", targets.len());

        let client = Arc::clone(&self.client);
        let units = self.units;
        let tx = self.tx.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let mut results = Vec::with_capacity(targets.len());
            for (slot, query) in targets {
                let r = client.fetch(&query, units).await;
                results.push((slot, r));
            }
            // receiver gone means we are shutting down
            let _ = tx.send(RefreshOutcome { results });
        }));
        true
    }

    /// Apply a finished refresh, if any. Returns true when something was applied.
    pub fn poll(&mut self, now: &DateTime<Local>) -> bool {
        // sample before reading: a task that finishes after an empty read
        // may still have sent its outcome
        let finished = self.in_flight.as_ref().is_some_and(|h| h.is_finished());
        match self.rx.try_recv() {
            Ok(outcome) => {
                self.apply(outcome, now);
                true
            }
            Err(_) => {
                let died = finished;
                if died {
                    // task ended without reporting (panicked)
                    warn!("Weather refresh task ended without a result");
                    let results = (0..self.entries.len())
                        .filter_map(LocationSlot::from_index)
                        .map(|s| (s, Err(FetchError::Network("refresh task aborted".into()))))
                        .collect();
                    self.apply(RefreshOutcome { results }, now);
                }
                died
            }
        }
    }

    fn apply(&mut self, outcome: RefreshOutcome, now: &DateTime<Local>) {
        self.in_flight = None;
        let mut all_ok = true;
        for (slot, result) in outcome.results {
            let Some(entry) = self.entries.get_mut(slot.index()) else {
                continue;
            };
            match result {
                Ok(mut snap) => {
                    snap.fetched_at = now.with_timezone(&Utc);
                    snap.valid = true;
                    info!("Weather updated for {}: {}", entry.query, snap.current.description);
                    if let Some(store) = &self.store {
                        if let Err(e) = store.save(&snap) {
                            warn!("Could not save weather for {}: {}", entry.query, e);
                        }
                    }
                    entry.snapshot = Some(Arc::new(snap));
                }
                Err(e) => {
                    all_ok = false;
                    warn!("Weather fetch for {} failed: {}", entry.query, e);
                    if let Some(prev) = entry.snapshot.as_ref().filter(|s| s.valid) {
                        entry.snapshot = Some(Arc::new(prev.marked_stale()));
                    }
                }
            }
        }

        if all_ok {
            self.failures = 0;
            self.next_refresh_at = Some(*now + self.update_interval);
        } else {
            self.failures = self.failures.saturating_add(1);
            self.next_refresh_at = Some(*now + self.error_sleep);
            warn!(
                "Weather refresh incomplete ({} consecutive), retrying at {}",
                self.failures,
                now.checked_add_signed(self.error_sleep)
                    .map(|t| t.format("%H:%M:%S").to_string())
                    .unwrap_or_default()
            );
        }
    }
}
