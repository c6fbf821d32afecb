//! Replay AI coding-agent session transcripts.
//!
//! Two JSONL source formats (Claude-style and Codex-style) normalize into
//! one canonical session model, which renders into Markdown, static HTML,
//! or self-contained interactive player documents that reveal the
//! conversation over a timeline.
//!
//! # Public API Overview
//! - Parse a transcript with an adapter: [`ClaudeLogAdapter`] /
//!   [`CodexLogAdapter`] behind the [`LogAdapter`] contract.
//! - Select a subset of events with [`RangeSet`] and wrap the session in a
//!   [`SessionView`].
//! - Render the view with [`render`] under an [`OutputFormat`], [`Theme`],
//!   and [`AnsiMode`].
//! - Drive interactive replay with [`PlaybackEngine`]; the generated
//!   player documents embed the same delay model.
//!
//! The CLI, pickers, TUI/web front ends, and video capture are external
//! collaborators: they drive exactly this surface.

pub mod config;
pub mod core;
pub mod playback;
pub mod render;

/// Canonical model types.
pub use log_model::{
    AgentKind, CanonicalSession, ContentBlock, Event, EventDraft, RangeError, RangeSet, Role,
    SessionView, ToolInvocation, ToolStatus,
};

/// Adapter contract and implementations.
pub use log_adapter::{AdapterError, LogAdapter, ParseWarning, ParsedSession};
pub use log_adapter_claude::ClaudeLogAdapter;
pub use log_adapter_codex::CodexLogAdapter;

/// ANSI processing for tool output.
pub use crate::core::text::ansi::{sgr_spans, strip_ansi, Color, Style, StyledSpan};

/// Rendering surface.
pub use crate::render::{render, AnsiMode, OutputFormat, RenderError, RenderOptions, Theme};

/// Playback timing engine.
pub use crate::playback::{
    GapTimeline, PlaybackEngine, PlaybackState, SeekTarget, TimingConfig, TimingMode, ViewToggles,
    DEFAULT_BASE_INTERVAL_MS, DEFAULT_COMPRESSED_TARGET_MS, MIN_SCHEDULED_DELAY_MS,
};

/// Environment configuration.
pub use crate::config::EnvConfig;

/// Picks the adapter for a source format once, at the model-construction
/// boundary.
#[must_use]
pub fn adapter_for(agent: AgentKind) -> Box<dyn LogAdapter> {
    match agent {
        AgentKind::Claude => Box::new(ClaudeLogAdapter),
        AgentKind::Codex => Box::new(CodexLogAdapter),
    }
}
