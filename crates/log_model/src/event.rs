use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

/// Source format a session was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Claude,
    Codex,
}

impl AgentKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::Codex => "codex",
        }
    }
}

/// Who produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
    System,
}

impl Role {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
            Self::System => "system",
        }
    }
}

/// Terminal state of one tool call/result pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    /// Call seen, result never arrived.
    Pending,
    Success,
    Error,
    /// Result seen, call never arrived.
    Unmatched,
}

/// A paired call/result record for one external tool use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub name: String,
    pub input: Value,
    pub result: Option<Value>,
    pub status: ToolStatus,
}

impl ToolInvocation {
    /// A call awaiting its result.
    #[must_use]
    pub fn pending(name: impl Into<String>, input: Value) -> Self {
        Self {
            name: name.into(),
            input,
            result: None,
            status: ToolStatus::Pending,
        }
    }

    /// A synthetic invocation for a result whose call was never seen.
    #[must_use]
    pub fn unmatched(result: Value) -> Self {
        Self {
            name: "unknown".to_string(),
            input: Value::Null,
            result: Some(result),
            status: ToolStatus::Unmatched,
        }
    }

    /// Attaches the result and flips the status out of `Pending`.
    pub fn resolve(&mut self, result: Value, is_error: bool) {
        self.result = Some(result);
        self.status = if is_error {
            ToolStatus::Error
        } else {
            ToolStatus::Success
        };
    }
}

/// One displayable unit of event content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    Code {
        language: Option<String>,
        code: String,
    },
    ToolResult {
        summary: String,
    },
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Image {
        source: String,
    },
}

/// One ordered unit of conversation or tool activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// 1-based, dense, matches source order.
    pub index: usize,
    #[serde(with = "time::serde::rfc3339::option")]
    pub timestamp: Option<OffsetDateTime>,
    pub role: Role,
    pub content: Vec<ContentBlock>,
    pub tool: Option<ToolInvocation>,
}

impl Event {
    /// Concatenated plain text of all `Text` blocks, newline-joined.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut parts = Vec::new();
        for block in &self.content {
            if let ContentBlock::Text { text } = block {
                parts.push(text.as_str());
            }
        }
        parts.join("\n")
    }

    /// True when the event carries no renderable payload at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.tool.is_none()
    }
}

/// An event before index assignment; what adapters accumulate.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub role: Role,
    pub timestamp: Option<OffsetDateTime>,
    pub content: Vec<ContentBlock>,
    pub tool: Option<ToolInvocation>,
}

impl EventDraft {
    #[must_use]
    pub fn message(role: Role, timestamp: Option<OffsetDateTime>, content: Vec<ContentBlock>) -> Self {
        Self {
            role,
            timestamp,
            content,
            tool: None,
        }
    }

    #[must_use]
    pub fn tool_call(timestamp: Option<OffsetDateTime>, invocation: ToolInvocation) -> Self {
        Self {
            role: Role::Tool,
            timestamp,
            content: Vec::new(),
            tool: Some(invocation),
        }
    }
}

/// The normalized, source-format-independent representation of one transcript.
///
/// Immutable once assembled; exactly one per input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalSession {
    pub agent: AgentKind,
    pub session_id: String,
    pub events: Vec<Event>,
}

impl CanonicalSession {
    /// Assigns dense 1-based indices in draft order and seals the session.
    #[must_use]
    pub fn assemble(
        agent: AgentKind,
        session_id: impl Into<String>,
        drafts: Vec<EventDraft>,
    ) -> Self {
        let events = drafts
            .into_iter()
            .enumerate()
            .map(|(position, draft)| Event {
                index: position + 1,
                timestamp: draft.timestamp,
                role: draft.role,
                content: draft.content,
                tool: draft.tool,
            })
            .collect();

        Self {
            agent,
            session_id: session_id.into(),
            events,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
