//! Adapter contract for turning one raw transcript format into the
//! canonical session model.
//!
//! This crate intentionally defines only the shared parse contract, the
//! non-fatal warning vocabulary, and the call/result correlation helper.
//! Source-format specifics live in the per-format adapter crates.

mod correlate;
mod error;

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log_model::{AgentKind, CanonicalSession};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub use correlate::ToolCorrelator;
pub use error::AdapterError;

/// A successfully parsed session plus everything that went wrong along
/// the way without being fatal.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSession {
    pub session: CanonicalSession,
    pub warnings: Vec<ParseWarning>,
}

/// Non-fatal parse diagnostics. Adapters skip and continue; callers decide
/// whether to surface these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// A line failed JSON or schema decoding and was skipped.
    MalformedRecord { line: usize, detail: String },
    /// A timestamp string failed RFC 3339 parsing and was dropped.
    InvalidTimestamp { line: usize, value: String },
    /// A tool result arrived whose call identifier was never seen.
    UnmatchedToolResult { line: usize, call_id: String },
    /// A tool call never received its result before the stream ended.
    UnresolvedToolCall { call_id: String, tool_name: String },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedRecord { line, detail } => {
                write!(f, "line {line}: skipped malformed record: {detail}")
            }
            Self::InvalidTimestamp { line, value } => {
                write!(f, "line {line}: dropped unparsable timestamp '{value}'")
            }
            Self::UnmatchedToolResult { line, call_id } => {
                write!(f, "line {line}: tool result for unknown call '{call_id}'")
            }
            Self::UnresolvedToolCall { call_id, tool_name } => {
                write!(f, "tool call '{call_id}' ({tool_name}) never resolved")
            }
        }
    }
}

/// Capability: produce canonical events from one source format.
///
/// Implementations tolerate malformed individual records — skip, warn,
/// continue — and never abort the whole parse on one bad line.
pub trait LogAdapter {
    /// The source format this adapter understands.
    fn agent(&self) -> AgentKind;

    /// Parses one raw event stream into a canonical session.
    fn parse(&self, reader: &mut dyn BufRead) -> Result<ParsedSession, AdapterError>;

    /// Opens `path` and parses it.
    fn parse_path(&self, path: &Path) -> Result<ParsedSession, AdapterError> {
        let file = File::open(path)
            .map_err(|source| AdapterError::io("opening transcript", path, source))?;
        let mut reader = BufReader::new(file);
        self.parse(&mut reader)
    }
}

/// Parses an RFC 3339 timestamp, degrading to `None` with a warning.
///
/// Absent timestamps are legal everywhere downstream, so a bad stamp is a
/// data anomaly, not an error.
pub fn parse_timestamp(
    value: Option<&str>,
    line: usize,
    warnings: &mut Vec<ParseWarning>,
) -> Option<OffsetDateTime> {
    let value = value?;
    match OffsetDateTime::parse(value, &Rfc3339) {
        Ok(stamp) => Some(stamp),
        Err(_) => {
            tracing::warn!(line, value, "dropping unparsable timestamp");
            warnings.push(ParseWarning::InvalidTimestamp {
                line,
                value: value.to_string(),
            });
            None
        }
    }
}
