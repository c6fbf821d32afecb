//! Playback timing engine for interactive replay.

mod engine;
mod timing;

pub use engine::{PlaybackEngine, PlaybackState, SeekTarget, ViewToggles};
pub use timing::{
    GapTimeline, TimingConfig, TimingMode, DEFAULT_BASE_INTERVAL_MS, DEFAULT_COMPRESSED_TARGET_MS,
    MIN_SCHEDULED_DELAY_MS,
};
