//! Claude-style JSONL transcript adapter.
//!
//! One line per record; conversation records are tagged `user` /
//! `assistant` and wrap a `message` whose `content` is either a plain
//! string or a list of typed blocks (`text`, `tool_use`, `tool_result`,
//! `image`). Tool results arrive inside later `user` records and correlate
//! by `tool_use_id`.

use std::io::BufRead;

use serde::Deserialize;
use serde_json::Value;

use log_adapter::{
    parse_timestamp, AdapterError, LogAdapter, ParseWarning, ParsedSession, ToolCorrelator,
};
use log_model::{
    segment_text, summarize_tool_result, truncate_summary, AgentKind, CanonicalSession,
    ContentBlock, EventDraft, Role, ToolInvocation, SUMMARY_LIMIT,
};

/// Adapter for Claude-style session transcripts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaudeLogAdapter;

impl LogAdapter for ClaudeLogAdapter {
    fn agent(&self) -> AgentKind {
        AgentKind::Claude
    }

    fn parse(&self, reader: &mut dyn BufRead) -> Result<ParsedSession, AdapterError> {
        let mut drafts: Vec<EventDraft> = Vec::new();
        let mut warnings: Vec<ParseWarning> = Vec::new();
        let mut correlator = ToolCorrelator::new();
        let mut session_id: Option<String> = None;

        for (line_index, line_result) in reader.lines().enumerate() {
            let line_number = line_index + 1;
            let line =
                line_result.map_err(|source| AdapterError::read_line(line_number, source))?;
            if line.trim().is_empty() {
                continue;
            }

            let record = match serde_json::from_str::<RawRecord>(&line) {
                Ok(record) => record,
                Err(source) => {
                    tracing::warn!(line = line_number, error = %source, "skipping malformed record");
                    warnings.push(ParseWarning::MalformedRecord {
                        line: line_number,
                        detail: source.to_string(),
                    });
                    continue;
                }
            };

            match record {
                RawRecord::User(record) => {
                    remember_session_id(&mut session_id, &record.session_id);
                    let timestamp =
                        parse_timestamp(record.timestamp.as_deref(), line_number, &mut warnings);
                    let parts = split_content(&record.message.content);

                    for result in &parts.tool_results {
                        attach_result(
                            result,
                            timestamp,
                            line_number,
                            &mut drafts,
                            &mut correlator,
                            &mut warnings,
                        );
                    }

                    if let Some(content) = parts.message_blocks() {
                        drafts.push(EventDraft::message(Role::User, timestamp, content));
                    }
                }
                RawRecord::Assistant(record) => {
                    remember_session_id(&mut session_id, &record.session_id);
                    let timestamp =
                        parse_timestamp(record.timestamp.as_deref(), line_number, &mut warnings);
                    let parts = split_content(&record.message.content);

                    if let Some(content) = parts.message_blocks() {
                        drafts.push(EventDraft::message(Role::Assistant, timestamp, content));
                    }

                    for call in parts.tool_calls {
                        let position = drafts.len();
                        correlator.record_call(call.id.clone(), position);
                        drafts.push(EventDraft::tool_call(
                            timestamp,
                            ToolInvocation::pending(call.name, call.input),
                        ));
                    }
                }
                RawRecord::System(record) => {
                    remember_session_id(&mut session_id, &record.session_id);
                    let timestamp =
                        parse_timestamp(record.timestamp.as_deref(), line_number, &mut warnings);
                    let text = record.content.unwrap_or_default();
                    if !text.trim().is_empty() {
                        drafts.push(EventDraft::message(
                            Role::System,
                            timestamp,
                            segment_text(&text),
                        ));
                    }
                }
                RawRecord::Other => {}
            }
        }

        warnings.extend(correlator.finish(&drafts));

        let session_id =
            session_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        Ok(ParsedSession {
            session: CanonicalSession::assemble(AgentKind::Claude, session_id, drafts),
            warnings,
        })
    }
}

fn remember_session_id(slot: &mut Option<String>, candidate: &Option<String>) {
    if slot.is_none() {
        slot.clone_from(candidate);
    }
}

fn attach_result(
    result: &RawToolResult,
    timestamp: Option<time::OffsetDateTime>,
    line_number: usize,
    drafts: &mut Vec<EventDraft>,
    correlator: &mut ToolCorrelator,
    warnings: &mut Vec<ParseWarning>,
) {
    let summary = truncate_summary(&summarize_tool_result(&result.content), SUMMARY_LIMIT);

    match correlator.claim(&result.tool_use_id) {
        Some(position) => {
            let draft = &mut drafts[position];
            if let Some(invocation) = draft.tool.as_mut() {
                invocation.resolve(result.content.clone(), result.is_error);
            }
            if !summary.trim().is_empty() {
                draft.content.push(ContentBlock::ToolResult { summary });
            }
        }
        None => {
            warnings.push(ParseWarning::UnmatchedToolResult {
                line: line_number,
                call_id: result.tool_use_id.clone(),
            });
            let mut draft =
                EventDraft::tool_call(timestamp, ToolInvocation::unmatched(result.content.clone()));
            if !summary.trim().is_empty() {
                draft.content.push(ContentBlock::ToolResult { summary });
            }
            drafts.push(draft);
        }
    }
}

// ── Raw JSONL shapes ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum RawRecord {
    #[serde(rename = "user")]
    User(RawConversationRecord),
    #[serde(rename = "assistant")]
    Assistant(RawConversationRecord),
    #[serde(rename = "system")]
    System(RawSystemRecord),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConversationRecord {
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    message: RawMessage,
}

#[derive(Debug, Default, Deserialize)]
struct RawMessage {
    #[serde(default)]
    content: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSystemRecord {
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum RawContentBlock {
    #[serde(rename = "text")]
    Text {
        #[serde(default)]
        text: String,
    },
    #[serde(rename = "tool_use")]
    ToolUse {
        id: String,
        name: String,
        #[serde(default)]
        input: Value,
    },
    #[serde(rename = "tool_result")]
    ToolResult {
        tool_use_id: String,
        #[serde(default)]
        content: Value,
        #[serde(default)]
        is_error: bool,
    },
    #[serde(rename = "image")]
    Image {
        #[serde(default)]
        source: Value,
    },
    #[serde(other)]
    Other,
}

struct RawToolCall {
    id: String,
    name: String,
    input: Value,
}

struct RawToolResult {
    tool_use_id: String,
    content: Value,
    is_error: bool,
}

#[derive(Default)]
struct ContentParts {
    texts: Vec<String>,
    images: Vec<String>,
    tool_calls: Vec<RawToolCall>,
    tool_results: Vec<RawToolResult>,
}

impl ContentParts {
    /// Segmented text plus image references, or `None` when the record
    /// carried no message payload of its own.
    fn message_blocks(&self) -> Option<Vec<ContentBlock>> {
        let text = self.texts.join("\n");
        let mut blocks = segment_text(&text);
        blocks.extend(self.images.iter().map(|source| ContentBlock::Image {
            source: source.clone(),
        }));
        if blocks.is_empty() {
            None
        } else {
            Some(blocks)
        }
    }
}

/// Splits a `message.content` value (plain string or block list) into its
/// typed parts. Unrecognized blocks are ignored.
fn split_content(content: &Value) -> ContentParts {
    let mut parts = ContentParts::default();

    match content {
        Value::String(text) => parts.texts.push(text.clone()),
        Value::Array(items) => {
            for item in items {
                let Ok(block) = serde_json::from_value::<RawContentBlock>(item.clone()) else {
                    continue;
                };
                match block {
                    RawContentBlock::Text { text } => parts.texts.push(text),
                    RawContentBlock::ToolUse { id, name, input } => {
                        parts.tool_calls.push(RawToolCall { id, name, input });
                    }
                    RawContentBlock::ToolResult {
                        tool_use_id,
                        content,
                        is_error,
                    } => {
                        parts.tool_results.push(RawToolResult {
                            tool_use_id,
                            content,
                            is_error,
                        });
                    }
                    RawContentBlock::Image { source } => {
                        let media_type = source
                            .get("media_type")
                            .and_then(Value::as_str)
                            .unwrap_or("image");
                        parts.images.push(media_type.to_string());
                    }
                    RawContentBlock::Other => {}
                }
            }
        }
        _ => {}
    }

    parts
}
