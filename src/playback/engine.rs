//! Replay state machine: one explicit state value, one pending advance.
//!
//! The engine is single-threaded and cooperative. It never reads a clock;
//! a driver owns the timer, asks [`PlaybackEngine::pending_wait_ms`] how
//! long to sleep, and reports elapsed real time through
//! [`PlaybackEngine::tick`]. Every transition cancels the pending advance
//! before computing the next one, so a stale advance can never fire after
//! the state it was computed for has changed.

use crate::playback::timing::{GapTimeline, TimingConfig, TimingMode};

/// Replay lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
    Paused,
    Ended,
}

/// Cursor destinations for seek commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekTarget {
    Home,
    End,
    Next,
    Previous,
    /// 1-based event position within the replayed view.
    Index(usize),
}

/// Purely presentational toggles; they never touch scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewToggles {
    pub show_clock: bool,
    pub show_tool_details: bool,
    pub skip_tool_events: bool,
    pub follow: bool,
}

impl Default for ViewToggles {
    fn default() -> Self {
        Self {
            show_clock: true,
            show_tool_details: true,
            skip_tool_events: false,
            follow: true,
        }
    }
}

/// The playback engine driving one replayed view.
///
/// `cursor` is the 1-based position of the most recently revealed event;
/// zero means nothing is revealed yet.
#[derive(Debug)]
pub struct PlaybackEngine {
    timeline: GapTimeline,
    config: TimingConfig,
    state: PlaybackState,
    mode: TimingMode,
    speed: f64,
    cursor: usize,
    /// Remaining wait of the single scheduled advance, in milliseconds.
    pending_ms: Option<f64>,
    toggles: ViewToggles,
}

impl PlaybackEngine {
    #[must_use]
    pub fn new(timeline: GapTimeline, config: TimingConfig) -> Self {
        Self {
            timeline,
            config,
            state: PlaybackState::Idle,
            mode: TimingMode::default(),
            speed: 1.0,
            cursor: 0,
            pending_ms: None,
            toggles: ViewToggles::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.timeline.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timeline.is_empty()
    }

    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    #[must_use]
    pub fn mode(&self) -> TimingMode {
        self.mode
    }

    #[must_use]
    pub fn toggles(&self) -> ViewToggles {
        self.toggles
    }

    pub fn set_toggles(&mut self, toggles: ViewToggles) {
        self.toggles = toggles;
    }

    /// How long the driver should wait before the next [`tick`](Self::tick),
    /// when an advance is scheduled at all.
    #[must_use]
    pub fn pending_wait_ms(&self) -> Option<f64> {
        match self.state {
            PlaybackState::Playing => self.pending_ms,
            _ => None,
        }
    }

    /// Starts or resumes playback at the current cursor (default: the
    /// first event).
    pub fn play(&mut self) {
        match self.state {
            PlaybackState::Idle => {
                if self.timeline.is_empty() {
                    self.state = PlaybackState::Ended;
                    return;
                }
                if self.cursor == 0 {
                    self.cursor = 1;
                }
                self.state = PlaybackState::Playing;
                self.arm();
            }
            PlaybackState::Paused => {
                self.state = PlaybackState::Playing;
                // Resume continues the frozen remainder instead of
                // restarting the full gap.
                if self.pending_ms.is_none() {
                    self.arm();
                }
            }
            PlaybackState::Playing | PlaybackState::Ended => {}
        }
    }

    /// Freezes the pending advance without losing progress toward it.
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// Moves the cursor, cancelling any pending advance first. While
    /// Playing, the gap for the new position is scheduled fresh; from
    /// Ended, landing on a non-final index re-arms the engine as Paused.
    pub fn seek(&mut self, target: SeekTarget) {
        if self.timeline.is_empty() {
            return;
        }

        let last = self.timeline.len();
        let destination = match target {
            SeekTarget::Home => 1,
            SeekTarget::End => last,
            SeekTarget::Next => (self.cursor + 1).min(last),
            SeekTarget::Previous => self.cursor.saturating_sub(1).max(1),
            SeekTarget::Index(index) => index.clamp(1, last),
        };

        self.pending_ms = None;
        self.cursor = destination;
        tracing::debug!(cursor = self.cursor, state = ?self.state, "seek");

        match self.state {
            PlaybackState::Playing => {
                if self.cursor >= last {
                    self.state = PlaybackState::Ended;
                } else {
                    self.arm();
                }
            }
            PlaybackState::Ended => {
                if self.cursor < last {
                    self.state = PlaybackState::Paused;
                }
            }
            PlaybackState::Idle | PlaybackState::Paused => {}
        }
    }

    /// Rescales only the remaining portion of the pending wait; the wait
    /// is neither restarted nor skipped.
    pub fn set_speed(&mut self, speed: f64) {
        if !(speed > 0.0) {
            return;
        }
        if let Some(remaining) = self.pending_ms.as_mut() {
            *remaining *= self.speed / speed;
        }
        self.speed = speed;
    }

    /// Switches discipline; the current gap is cancelled and scheduled
    /// fresh under the new mode.
    pub fn set_mode(&mut self, mode: TimingMode) {
        self.mode = mode;
        if matches!(self.state, PlaybackState::Playing | PlaybackState::Paused)
            && self.pending_ms.is_some()
        {
            self.pending_ms = None;
            self.arm();
        }
    }

    /// Reports `elapsed_ms` of real time. Returns the new cursor when the
    /// pending advance fired; at most one advance per call.
    pub fn tick(&mut self, elapsed_ms: f64) -> Option<usize> {
        if self.state != PlaybackState::Playing {
            return None;
        }
        let remaining = self.pending_ms? - elapsed_ms;
        if remaining > 0.0 {
            self.pending_ms = Some(remaining);
            return None;
        }

        self.pending_ms = None;
        self.cursor += 1;
        if self.cursor >= self.timeline.len() {
            self.cursor = self.timeline.len();
            self.state = PlaybackState::Ended;
            tracing::debug!(cursor = self.cursor, "reached end of view");
        } else {
            self.arm();
        }
        Some(self.cursor)
    }

    /// Schedules the advance off the current cursor. The previous pending
    /// advance must already be cancelled.
    fn arm(&mut self) {
        if self.cursor >= self.timeline.len() {
            self.state = PlaybackState::Ended;
            self.pending_ms = None;
            return;
        }
        self.pending_ms = Some(self.timeline.delay_ms(
            self.cursor,
            self.mode,
            self.speed,
            &self.config,
        ));
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::playback::timing::{GapTimeline, TimingConfig, TimingMode};

    use super::{PlaybackEngine, PlaybackState, SeekTarget};

    fn engine_with_stamps(seconds: &[Option<i64>]) -> PlaybackEngine {
        let base = datetime!(2026-07-01 00:00:00 UTC);
        let timeline = GapTimeline::from_stamps(
            seconds
                .iter()
                .map(|offset| offset.map(|s| base + time::Duration::seconds(s)))
                .collect(),
        );
        PlaybackEngine::new(timeline, TimingConfig::default())
    }

    fn uniform_engine(events: usize) -> PlaybackEngine {
        engine_with_stamps(&vec![None; events])
    }

    #[test]
    fn play_reveals_the_first_event_and_schedules_the_first_gap() {
        let mut engine = uniform_engine(3);
        assert_eq!(engine.state(), PlaybackState::Idle);

        engine.play();
        assert_eq!(engine.state(), PlaybackState::Playing);
        assert_eq!(engine.cursor(), 1);
        assert_eq!(engine.pending_wait_ms(), Some(800.0));
    }

    #[test]
    fn ticks_advance_exactly_on_schedule() {
        let mut engine = uniform_engine(3);
        engine.play();

        assert_eq!(engine.tick(500.0), None);
        assert_eq!(engine.tick(300.0), Some(2));
        assert_eq!(engine.pending_wait_ms(), Some(800.0));
    }

    #[test]
    fn advancing_onto_the_last_event_ends_playback() {
        let mut engine = uniform_engine(2);
        engine.play();

        assert_eq!(engine.tick(800.0), Some(2));
        assert_eq!(engine.state(), PlaybackState::Ended);
        assert_eq!(engine.pending_wait_ms(), None);
        // Further ticks are inert.
        assert_eq!(engine.tick(10_000.0), None);
    }

    #[test]
    fn pause_freezes_the_remainder_and_resume_continues_it() {
        let mut engine = uniform_engine(3);
        engine.play();

        assert_eq!(engine.tick(300.0), None);
        engine.pause();
        assert_eq!(engine.state(), PlaybackState::Paused);
        // Elapsed time while paused is not charged against the wait.
        assert_eq!(engine.tick(5_000.0), None);
        assert_eq!(engine.cursor(), 1);

        engine.play();
        assert_eq!(engine.pending_wait_ms(), Some(500.0));
        assert_eq!(engine.tick(500.0), Some(2));
    }

    #[test]
    fn speed_change_rescales_only_the_remaining_wait() {
        let mut engine = uniform_engine(3);
        engine.play();
        assert_eq!(engine.tick(400.0), None);

        engine.set_speed(2.0);
        assert_eq!(engine.pending_wait_ms(), Some(200.0));

        // The advance fires once, never doubled.
        assert_eq!(engine.tick(200.0), Some(2));
        // The next gap is computed at the new speed from scratch.
        assert_eq!(engine.pending_wait_ms(), Some(400.0));
    }

    #[test]
    fn non_positive_speeds_are_rejected() {
        let mut engine = uniform_engine(2);
        engine.set_speed(0.0);
        engine.set_speed(-3.0);
        assert_eq!(engine.speed(), 1.0);
    }

    #[test]
    fn seek_while_playing_schedules_the_new_gap_not_the_old_one() {
        let mut engine = engine_with_stamps(&[Some(0), Some(2), Some(5), Some(11)]);
        engine.set_mode(TimingMode::RealTime);
        engine.play();
        assert_eq!(engine.pending_wait_ms(), Some(2000.0));
        assert_eq!(engine.tick(1500.0), None);

        engine.seek(SeekTarget::Index(3));
        assert_eq!(engine.cursor(), 3);
        // Gap 3 -> 4 is 6 s; the stale 2 s schedule is gone.
        assert_eq!(engine.pending_wait_ms(), Some(6000.0));
    }

    #[test]
    fn seek_to_the_last_index_while_playing_ends() {
        let mut engine = uniform_engine(3);
        engine.play();
        engine.seek(SeekTarget::End);
        assert_eq!(engine.state(), PlaybackState::Ended);
        assert_eq!(engine.pending_wait_ms(), None);
    }

    #[test]
    fn seek_from_ended_to_a_non_final_index_re_arms() {
        let mut engine = uniform_engine(3);
        engine.play();
        engine.seek(SeekTarget::End);
        assert_eq!(engine.state(), PlaybackState::Ended);

        engine.seek(SeekTarget::Index(1));
        assert_eq!(engine.state(), PlaybackState::Paused);
        engine.play();
        assert_eq!(engine.state(), PlaybackState::Playing);
        assert_eq!(engine.pending_wait_ms(), Some(800.0));
    }

    #[test]
    fn seek_from_ended_to_the_final_index_stays_ended() {
        let mut engine = uniform_engine(3);
        engine.play();
        engine.seek(SeekTarget::End);

        engine.seek(SeekTarget::Index(3));
        assert_eq!(engine.state(), PlaybackState::Ended);
    }

    #[test]
    fn next_and_previous_clamp_to_the_view_edges() {
        let mut engine = uniform_engine(3);
        engine.play();
        engine.pause();

        engine.seek(SeekTarget::Previous);
        assert_eq!(engine.cursor(), 1);
        engine.seek(SeekTarget::Next);
        engine.seek(SeekTarget::Next);
        engine.seek(SeekTarget::Next);
        assert_eq!(engine.cursor(), 3);
        assert_eq!(engine.state(), PlaybackState::Paused);
    }

    #[test]
    fn mode_change_reschedules_the_current_gap_fresh() {
        let mut engine = engine_with_stamps(&[Some(0), Some(2), Some(5)]);
        engine.play();
        assert_eq!(engine.pending_wait_ms(), Some(800.0));
        assert_eq!(engine.tick(700.0), None);

        engine.set_mode(TimingMode::RealTime);
        // Not the 100 ms remainder: the gap restarts under the new mode.
        assert_eq!(engine.pending_wait_ms(), Some(2000.0));
    }

    #[test]
    fn empty_view_ends_immediately_on_play() {
        let mut engine = uniform_engine(0);
        engine.play();
        assert_eq!(engine.state(), PlaybackState::Ended);
        assert_eq!(engine.cursor(), 0);
    }

    #[test]
    fn toggles_never_touch_scheduling() {
        let mut engine = uniform_engine(3);
        engine.play();
        assert_eq!(engine.tick(250.0), None);

        let mut toggles = engine.toggles();
        toggles.skip_tool_events = true;
        toggles.show_clock = false;
        engine.set_toggles(toggles);

        assert_eq!(engine.pending_wait_ms(), Some(550.0));
        assert_eq!(engine.state(), PlaybackState::Playing);
    }
}
