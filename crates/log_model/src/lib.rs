//! Canonical session model shared by every log adapter and renderer.
//!
//! One `CanonicalSession` is built per input transcript, never mutated
//! afterwards. Range selection produces read-only [`SessionView`]s over it;
//! renderers only ever see views.

mod content;
mod event;
mod range;
mod view;

pub use content::{segment_text, summarize_tool_result, truncate_summary, SUMMARY_LIMIT};
pub use event::{
    AgentKind, CanonicalSession, ContentBlock, Event, EventDraft, Role, ToolInvocation, ToolStatus,
};
pub use range::{RangeError, RangeSet};
pub use view::SessionView;
