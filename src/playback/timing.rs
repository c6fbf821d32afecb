//! Inter-event delay computation for the three replay disciplines.

use log_model::SessionView;
use time::OffsetDateTime;

/// Default wait between reveals under the Uniform discipline.
pub const DEFAULT_BASE_INTERVAL_MS: u64 = 800;
/// Default whole-replay duration under the Compressed discipline.
pub const DEFAULT_COMPRESSED_TARGET_MS: u64 = 60_000;
/// Floor applied to scheduled waits in generated player documents. The
/// engine itself reports exact delays; drivers apply the floor.
pub const MIN_SCHEDULED_DELAY_MS: u64 = 50;

/// Tunable delay-model constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    pub base_interval_ms: u64,
    pub compressed_target_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            base_interval_ms: DEFAULT_BASE_INTERVAL_MS,
            compressed_target_ms: DEFAULT_COMPRESSED_TARGET_MS,
        }
    }
}

/// The three delay-computation disciplines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimingMode {
    #[default]
    Uniform,
    RealTime,
    Compressed,
}

impl TimingMode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::RealTime => "realtime",
            Self::Compressed => "compressed",
        }
    }
}

/// Per-event timestamps of one view, reduced to epoch milliseconds.
///
/// This is everything the delay model needs; event payloads stay behind in
/// the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapTimeline {
    stamps_ms: Vec<Option<i128>>,
}

impl GapTimeline {
    #[must_use]
    pub fn from_view(view: &SessionView<'_>) -> Self {
        Self {
            stamps_ms: view
                .events()
                .map(|event| event.timestamp.map(epoch_ms))
                .collect(),
        }
    }

    #[must_use]
    pub fn from_stamps(stamps: Vec<Option<OffsetDateTime>>) -> Self {
        Self {
            stamps_ms: stamps
                .into_iter()
                .map(|stamp| stamp.map(epoch_ms))
                .collect(),
        }
    }

    /// Number of events on the timeline.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stamps_ms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stamps_ms.is_empty()
    }

    /// Real duration of the gap between events `position` and
    /// `position + 1` (both 1-based). `None` when either stamp is absent.
    /// Regressions clamp to zero.
    #[must_use]
    pub fn gap_ms(&self, position: usize) -> Option<u64> {
        if position == 0 || position >= self.stamps_ms.len() {
            return None;
        }
        let earlier = self.stamps_ms[position - 1]?;
        let later = self.stamps_ms[position]?;
        Some(u64::try_from((later - earlier).max(0)).unwrap_or(u64::MAX))
    }

    /// Real span between the first and last stamped events; `None` when no
    /// event carries a timestamp.
    #[must_use]
    pub fn total_real_ms(&self) -> Option<u64> {
        let mut present = self.stamps_ms.iter().flatten();
        let first = *present.next()?;
        let last = *present.last().unwrap_or(&first);
        Some(u64::try_from((last - first).max(0)).unwrap_or(u64::MAX))
    }

    /// Exact delay in milliseconds before advancing off event `position`
    /// (1-based), under `mode` at speed `speed`.
    ///
    /// Missing timestamps degrade a single gap to Uniform; a zero or
    /// undeterminable total degrades the whole Compressed session.
    #[must_use]
    pub fn delay_ms(
        &self,
        position: usize,
        mode: TimingMode,
        speed: f64,
        config: &TimingConfig,
    ) -> f64 {
        let uniform = config.base_interval_ms as f64 / speed;

        match mode {
            TimingMode::Uniform => uniform,
            TimingMode::RealTime => self
                .gap_ms(position)
                .map_or(uniform, |gap| gap as f64 / speed),
            TimingMode::Compressed => match self.total_real_ms() {
                Some(total) if total > 0 => self.gap_ms(position).map_or(uniform, |gap| {
                    (gap as f64 * config.compressed_target_ms as f64) / total as f64 / speed
                }),
                _ => uniform,
            },
        }
    }
}

fn epoch_ms(stamp: OffsetDateTime) -> i128 {
    stamp.unix_timestamp_nanos() / 1_000_000
}
