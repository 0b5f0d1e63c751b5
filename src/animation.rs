use std::time::Duration;

use bevy::log::{debug, warn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Idle,
    Running,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTick {
    pub frame: usize,
    pub wait: Duration,
}

#[derive(Clone, Debug, Default)]
pub struct AnimationDriver {
    state: PlaybackState,
    cursor: Option<usize>,
    next_frame: usize,
    frame_count: usize,
    interval: Duration,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == PlaybackState::Running
    }

    /// Frame most recently handed out, if any.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns `false` without touching anything when a playback is already
    /// running or there is nothing to play.
    pub fn start(&mut self, total_seconds: f32, frame_count: usize) -> bool {
        if self.is_running() {
            debug!("Playback already running, ignoring start");
            return false;
        }
        if frame_count == 0 {
            return false;
        }
        if !total_seconds.is_finite() || total_seconds < 0. {
            warn!("Refusing playback over {} seconds", total_seconds);
            return false;
        }

        self.state = PlaybackState::Running;
        self.cursor = None;
        self.next_frame = 0;
        self.frame_count = frame_count;
        self.interval =
            Duration::try_from_secs_f32(total_seconds / frame_count as f32).unwrap_or_default();

        debug!(
            "Starting playback of {} frames every {:?}",
            frame_count, self.interval
        );
        true
    }

    pub fn stop(&mut self) {
        self.state = PlaybackState::Idle;
    }
}

impl Iterator for AnimationDriver {
    type Item = FrameTick;

    fn next(&mut self) -> Option<FrameTick> {
        if !self.is_running() {
            return None;
        }

        if self.next_frame == self.frame_count {
            self.state = PlaybackState::Idle;
            return None;
        }

        let frame = self.next_frame;
        self.cursor = Some(frame);
        self.next_frame += 1;

        Some(FrameTick {
            frame,
            wait: self.interval,
        })
    }
}
