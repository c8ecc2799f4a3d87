/*
 *  pacer.rs
 *
 *  WxMonS - worth the squeeze
 *	(c) 2020-26 Stuart Hunter
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
use std::time::{Duration, Instant};

/// Fixed-rate tick scheduler for the render loop.
///
/// A late tick does not cause a burst of catch-up frames; the next
/// deadline is rebased on the current instant instead.
pub struct Pacer {
    next_deadline: Instant,
    frame: Duration,
    window_start: Instant,
    window_frames: u32,
}

impl Pacer {
    pub fn new(frame: Duration) -> Self {
        let now = Instant::now();
        Self {
            next_deadline: now,
            frame,
            window_start: now,
            window_frames: 0,
        }
    }

    #[inline]
    pub fn frame_interval(&self) -> Duration {
        self.frame
    }

    #[inline]
    pub fn set_frame_interval(&mut self, frame: Duration) {
        if frame != self.frame {
            self.frame = frame;
            self.next_deadline = Instant::now() + frame;
        }
    }

    /// Schedule the deadline after the one that just passed.
    fn advance(&mut self, now: Instant) {
        self.window_frames = self.window_frames.saturating_add(1);
        self.next_deadline += self.frame;
        if self.next_deadline < now {
            self.next_deadline = now + self.frame;
        }
    }

    /// Sleep until the next deadline.
    pub async fn wait(&mut self) {
        let deadline = self.next_deadline;
        if Instant::now() < deadline {
            tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
        }
        self.advance(Instant::now());
    }

    /// Ticks per second since the last call, then restart the window.
    pub fn take_effective_fps(&mut self) -> f32 {
        let now = Instant::now();
        let secs = now.duration_since(self.window_start).as_secs_f32();
        let fps = if secs > 0.0 { self.window_frames as f32 / secs } else { 0.0 };
        self.window_start = now;
        self.window_frames = 0;
        fps
    }

    pub fn window_elapsed(&self) -> Duration {
        self.window_start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_tick_is_immediate() {
        let mut p = Pacer::new(Duration::from_millis(50));
        let start = Instant::now();
        p.wait().await;
        assert!(start.elapsed() < Duration::from_millis(40));
        p.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn late_ticks_do_not_burst() {
        let mut p = Pacer::new(Duration::from_millis(50));
        p.wait().await;
        std::thread::sleep(Duration::from_millis(200));
        let late = Instant::now();
        p.wait().await;
        assert!(late.elapsed() < Duration::from_millis(40));
        // rebased, so the backlog of missed deadlines is dropped
        let next = Instant::now();
        p.wait().await;
        assert!(next.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn effective_fps_resets_window() {
        let mut p = Pacer::new(Duration::from_millis(1));
        for _ in 0..3 {
            p.wait().await;
        }
        assert_eq!(p.window_frames, 3);
        assert!(p.take_effective_fps() > 0.0);
        assert_eq!(p.window_frames, 0);
    }
}
