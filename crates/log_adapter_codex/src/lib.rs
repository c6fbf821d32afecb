//! Codex-style JSONL transcript adapter.
//!
//! Rollout files interleave `event_msg` records (already-rendered user and
//! agent messages) with `response_item` records (raw model I/O: `message`
//! payloads, function calls, and their outputs). When a stream carries any
//! `event_msg` user/agent messages, `response_item` `message` payloads are
//! duplicates and are suppressed; deciding that requires one buffering
//! pre-pass over the decoded records.

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

/// Adapter for Codex-style rollout transcripts.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodexLogAdapter;

impl LogAdapter for CodexLogAdapter {
    fn agent(&self) -> AgentKind {
        AgentKind::Codex
    }

    fn parse(&self, reader: &mut dyn BufRead) -> Result<ParsedSession, AdapterError> {
        let mut warnings: Vec<ParseWarning> = Vec::new();
        let mut records: Vec<(usize, RawRecord)> = Vec::new();

        for (line_index, line_result) in reader.lines().enumerate() {
            let line_number = line_index + 1;
            let line =
                line_result.map_err(|source| AdapterError::read_line(line_number, source))?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<RawRecord>(&line) {
                Ok(record) => records.push((line_number, record)),
                Err(source) => {
                    tracing::warn!(line = line_number, error = %source, "skipping malformed record");
                    warnings.push(ParseWarning::MalformedRecord {
                        line: line_number,
                        detail: source.to_string(),
                    });
                }
            }
        }

        let use_event_msgs = records.iter().any(|(_, record)| {
            matches!(
                record,
                RawRecord::EventMsg {
                    payload: RawEventPayload::UserMessage { .. }
                        | RawEventPayload::AgentMessage { .. },
                    ..
                }
            )
        });

        let mut drafts: Vec<EventDraft> = Vec::new();
        let mut correlator = ToolCorrelator::new();
        let mut session_id: Option<String> = None;

        for (line_number, record) in records {
            match record {
                RawRecord::SessionMeta { payload } => {
                    if session_id.is_none() {
                        session_id = payload
                            .get("id")
                            .and_then(Value::as_str)
                            .map(ToString::to_string);
                    }
                }
                RawRecord::EventMsg { timestamp, payload } => {
                    let timestamp =
                        parse_timestamp(timestamp.as_deref(), line_number, &mut warnings);
                    match payload {
                        RawEventPayload::UserMessage { message } => {
                            push_message(&mut drafts, Role::User, timestamp, &message);
                        }
                        RawEventPayload::AgentMessage { message } => {
                            push_message(&mut drafts, Role::Assistant, timestamp, &message);
                        }
                        RawEventPayload::Other => {}
                    }
                }
                RawRecord::ResponseItem { timestamp, payload } => {
                    let timestamp =
                        parse_timestamp(timestamp.as_deref(), line_number, &mut warnings);
                    match payload {
                        RawItemPayload::Message { role, content } => {
                            if use_event_msgs {
                                continue;
                            }
                            let Some(role) = conversation_role(&role) else {
                                continue;
                            };
                            push_message(&mut drafts, role, timestamp, &flatten_content(&content));
                        }
                        RawItemPayload::FunctionCall {
                            name,
                            arguments,
                            call_id,
                        } => {
                            let invocation = normalize_function_call(&name, &arguments);
                            record_call(&mut drafts, &mut correlator, call_id, timestamp, invocation);
                        }
                        RawItemPayload::CustomToolCall {
                            name,
                            input,
                            call_id,
                        } => {
                            let invocation =
                                ToolInvocation::pending(name, serde_json::json!({ "input": input }));
                            record_call(&mut drafts, &mut correlator, call_id, timestamp, invocation);
                        }
                        RawItemPayload::FunctionCallOutput { call_id, output }
                        | RawItemPayload::CustomToolCallOutput { call_id, output } => {
                            attach_output(
                                call_id,
                                output,
                                timestamp,
                                line_number,
                                &mut drafts,
                                &mut correlator,
                                &mut warnings,
                            );
                        }
                        RawItemPayload::Other => {}
                    }
                }
                RawRecord::Other => {}
            }
        }

        warnings.extend(correlator.finish(&drafts));

        let session_id =
            session_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        Ok(ParsedSession {
            session: CanonicalSession::assemble(AgentKind::Codex, session_id, drafts),
            warnings,
        })
    }
}

fn push_message(
    drafts: &mut Vec<EventDraft>,
    role: Role,
    timestamp: Option<time::OffsetDateTime>,
    text: &str,
) {
    if text.trim().is_empty() {
        return;
    }
    drafts.push(EventDraft::message(role, timestamp, segment_text(text)));
}

fn record_call(
    drafts: &mut Vec<EventDraft>,
    correlator: &mut ToolCorrelator,
    call_id: Option<String>,
    timestamp: Option<time::OffsetDateTime>,
    invocation: ToolInvocation,
) {
    let position = drafts.len();
    if let Some(call_id) = call_id {
        correlator.record_call(call_id, position);
    }
    drafts.push(EventDraft::tool_call(timestamp, invocation));
}

fn attach_output(
    call_id: Option<String>,
    output: Value,
    timestamp: Option<time::OffsetDateTime>,
    line_number: usize,
    drafts: &mut Vec<EventDraft>,
    correlator: &mut ToolCorrelator,
    warnings: &mut Vec<ParseWarning>,
) {
    let summary = truncate_summary(&summarize_tool_result(&output), SUMMARY_LIMIT);
    let claimed = call_id.as_deref().and_then(|id| correlator.claim(id));

    match claimed {
        Some(position) => {
            let draft = &mut drafts[position];
            if let Some(invocation) = draft.tool.as_mut() {
                invocation.resolve(output, false);
            }
            if !summary.trim().is_empty() {
                draft.content.push(ContentBlock::ToolResult { summary });
            }
        }
        None => {
            warnings.push(ParseWarning::UnmatchedToolResult {
                line: line_number,
                call_id: call_id.unwrap_or_default(),
            });
            let mut draft = EventDraft::tool_call(timestamp, ToolInvocation::unmatched(output));
            if !summary.trim().is_empty() {
                draft.content.push(ContentBlock::ToolResult { summary });
            }
            drafts.push(draft);
        }
    }
}

fn conversation_role(role: &str) -> Option<Role> {
    match role {
        "user" => Some(Role::User),
        "assistant" => Some(Role::Assistant),
        _ => None,
    }
}

/// Joins `input_text` / `output_text` / `text` members of a content list,
/// or passes a plain string through.
fn flatten_content(content: &Value) -> String {
    match content {
        Value::String(text) => text.clone(),
        Value::Array(items) => {
            let mut texts = Vec::new();
            for item in items {
                let kind = item.get("type").and_then(Value::as_str);
                if matches!(kind, Some("input_text" | "output_text" | "text")) {
                    if let Some(text) = item.get("text").and_then(Value::as_str) {
                        texts.push(text.to_string());
                    }
                }
            }
            texts.join("\n")
        }
        _ => String::new(),
    }
}

/// Maps Codex function calls onto the canonical tool vocabulary.
///
/// `shell_command` becomes `Bash` (workdir folded into the command) and
/// `update_plan` becomes `Task`, matching how the rest of the pipeline
/// names those activities.
fn normalize_function_call(name: &str, arguments: &Value) -> ToolInvocation {
    let args = decode_arguments(arguments);

    match name {
        "shell_command" => {
            let mut command = args
                .get("command")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            if let Some(workdir) = args.get("workdir").and_then(Value::as_str) {
                if !workdir.is_empty() {
                    command = format!("cd {workdir}\n{command}");
                }
            }
            ToolInvocation::pending("Bash", serde_json::json!({ "command": command }))
        }
        "update_plan" => {
            let description = args
                .get("explanation")
                .and_then(Value::as_str)
                .unwrap_or("update_plan")
                .to_string();
            ToolInvocation::pending("Task", serde_json::json!({ "description": description }))
        }
        other => {
            let name = if other.is_empty() { "Unknown" } else { other };
            ToolInvocation::pending(name, args)
        }
    }
}

/// Function-call arguments arrive either as an object or as a JSON-encoded
/// string; anything undecodable degrades to an empty object.
fn decode_arguments(arguments: &Value) -> Value {
    match arguments {
        Value::Object(_) => arguments.clone(),
        Value::String(encoded) => match serde_json::from_str::<Value>(encoded) {
            Ok(Value::Object(map)) => Value::Object(map),
            _ => Value::Object(serde_json::Map::new()),
        },
        _ => Value::Object(serde_json::Map::new()),
    }
}

// ── Raw JSONL shapes ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum RawRecord {
    #[serde(rename = "session_meta")]
    SessionMeta {
        #[serde(default)]
        payload: Value,
    },
    #[serde(rename = "event_msg")]
    EventMsg {
        #[serde(default)]
        timestamp: Option<String>,
        payload: RawEventPayload,
    },
    #[serde(rename = "response_item")]
    ResponseItem {
        #[serde(default)]
        timestamp: Option<String>,
        payload: RawItemPayload,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum RawEventPayload {
    #[serde(rename = "user_message")]
    UserMessage {
        #[serde(default)]
        message: String,
    },
    #[serde(rename = "agent_message")]
    AgentMessage {
        #[serde(default)]
        message: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum RawItemPayload {
    #[serde(rename = "message")]
    Message {
        #[serde(default)]
        role: String,
        #[serde(default)]
        content: Value,
    },
    #[serde(rename = "function_call")]
    FunctionCall {
        #[serde(default)]
        name: String,
        #[serde(default)]
        arguments: Value,
        #[serde(default)]
        call_id: Option<String>,
    },
    #[serde(rename = "custom_tool_call")]
    CustomToolCall {
        #[serde(default)]
        name: String,
        #[serde(default)]
        input: String,
        #[serde(default)]
        call_id: Option<String>,
    },
    #[serde(rename = "function_call_output")]
    FunctionCallOutput {
        #[serde(default)]
        call_id: Option<String>,
        #[serde(default)]
        output: Value,
    },
    #[serde(rename = "custom_tool_call_output")]
    CustomToolCallOutput {
        #[serde(default)]
        call_id: Option<String>,
        #[serde(default)]
        output: Value,
    },
    #[serde(other)]
    Other,
}
