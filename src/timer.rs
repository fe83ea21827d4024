//! Frame rate measurement.

use std::{
    fmt::{self, Arguments},
    time::{Duration, Instant},
};

const LOG_INTERVAL: Duration = Duration::from_secs(1);

/// Measures frames per second of a processing loop.
///
/// Every [`FpsCounter::tick`] records the time since the previous tick; [`FpsCounter::fps`]
/// returns the rate derived from that interval. Once per second, the number of frames processed in
/// that second is logged at *debug* level.
pub struct FpsCounter {
    name: String,
    frames: u32,
    window_start: Instant,
    last_tick: Instant,
    fps: f32,
}

impl FpsCounter {
    pub fn new<N: Into<String>>(name: N) -> Self {
        let now = Instant::now();
        Self {
            name: name.into(),
            frames: 0,
            window_start: now,
            last_tick: now,
            fps: 0.0,
        }
    }

    /// Returns the rate derived from the interval between the last two ticks.
    ///
    /// Returns 0 before the first tick, or if no time has passed between the last two ticks.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Records a frame and returns the current rate.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now(), format_args!(""))
    }

    /// Records a frame, including `extra` items in the periodic log line.
    pub fn tick_with<D: fmt::Display, I: IntoIterator<Item = D>>(&mut self, extra: I) -> f32 {
        let extra = extra
            .into_iter()
            .map(|item| item.to_string())
            .collect::<Vec<_>>();
        if extra.is_empty() {
            self.tick()
        } else {
            self.tick_at(Instant::now(), format_args!(" ({})", extra.join(", ")))
        }
    }

    fn tick_at(&mut self, now: Instant, extra: Arguments<'_>) -> f32 {
        let dt = now.saturating_duration_since(self.last_tick).as_secs_f32();
        self.fps = if dt > 0.0 { dt.recip() } else { 0.0 };
        self.last_tick = now;

        self.frames += 1;
        if now.saturating_duration_since(self.window_start) > LOG_INTERVAL {
            log::debug!("{}: {} FPS{}", self.name, self.frames, extra);
            self.frames = 0;
            self.window_start = now;
        }
        self.fps
    }
}
