use std::io::Write;

use log_adapter::{LogAdapter, ParseWarning};
use log_adapter_codex::CodexLogAdapter;
use log_model::{AgentKind, Role, ToolStatus};

fn parse(lines: &[&str]) -> log_adapter::ParsedSession {
    let joined = lines.join("\n");
    let mut reader = joined.as_bytes();
    CodexLogAdapter
        .parse(&mut reader)
        .expect("parse never fails on record-level problems")
}

#[test]
fn event_messages_become_conversation_events() {
    let parsed = parse(&[
        r#"{"type":"session_meta","payload":{"id":"rollout-42","cwd":"/work"}}"#,
        r#"{"type":"event_msg","timestamp":"2026-06-01T12:00:00Z","payload":{"type":"user_message","message":"add a test"}}"#,
        r#"{"type":"event_msg","timestamp":"2026-06-01T12:00:09Z","payload":{"type":"agent_message","message":"Done."}}"#,
    ]);

    let session = parsed.session;
    assert_eq!(session.agent, AgentKind::Codex);
    assert_eq!(session.session_id, "rollout-42");
    assert_eq!(session.len(), 2);
    assert_eq!(session.events[0].role, Role::User);
    assert_eq!(session.events[1].role, Role::Assistant);
    assert_eq!(session.events[1].plain_text(), "Done.");
}

#[test]
fn response_item_messages_are_suppressed_when_event_msgs_exist() {
    let parsed = parse(&[
        r#"{"type":"event_msg","payload":{"type":"user_message","message":"hello"}}"#,
        r#"{"type":"response_item","payload":{"type":"message","role":"user","content":[{"type":"input_text","text":"hello"}]}}"#,
    ]);

    assert_eq!(parsed.session.len(), 1);
}

#[test]
fn response_item_messages_are_used_when_no_event_msgs_exist() {
    let parsed = parse(&[
        r#"{"type":"response_item","payload":{"type":"message","role":"user","content":[{"type":"input_text","text":"hi"},{"type":"input_text","text":"there"}]}}"#,
        r#"{"type":"response_item","payload":{"type":"message","role":"assistant","content":[{"type":"output_text","text":"hey"}]}}"#,
    ]);

    assert_eq!(parsed.session.len(), 2);
    assert_eq!(parsed.session.events[0].plain_text(), "hi\nthere");
}

#[test]
fn shell_commands_normalize_to_bash_with_workdir_prefix() {
    let parsed = parse(&[
        r#"{"type":"response_item","payload":{"type":"function_call","name":"shell_command","arguments":"{\"command\":\"cargo build\",\"workdir\":\"/repo\"}","call_id":"call_1"}}"#,
    ]);

    let tool = parsed.session.events[0].tool.as_ref().expect("tool invocation");
    assert_eq!(tool.name, "Bash");
    assert_eq!(tool.input["command"], "cd /repo\ncargo build");
    assert_eq!(tool.status, ToolStatus::Pending);
}

#[test]
fn update_plan_normalizes_to_task() {
    let parsed = parse(&[
        r#"{"type":"response_item","payload":{"type":"function_call","name":"update_plan","arguments":"{\"explanation\":\"outline the fix\"}","call_id":"call_2"}}"#,
    ]);

    let tool = parsed.session.events[0].tool.as_ref().expect("tool invocation");
    assert_eq!(tool.name, "Task");
    assert_eq!(tool.input["description"], "outline the fix");
}

#[test]
fn call_output_resolves_the_pending_invocation() {
    let parsed = parse(&[
        r#"{"type":"response_item","payload":{"type":"function_call","name":"shell_command","arguments":"{\"command\":\"ls\"}","call_id":"call_3"}}"#,
        r#"{"type":"response_item","payload":{"type":"function_call_output","call_id":"call_3","output":"Cargo.toml\nsrc"}}"#,
    ]);

    let session = parsed.session;
    assert_eq!(session.len(), 1);
    let tool = session.events[0].tool.as_ref().expect("tool invocation");
    assert_eq!(tool.status, ToolStatus::Success);
    assert_eq!(tool.result, Some(serde_json::json!("Cargo.toml\nsrc")));
    assert!(parsed.warnings.is_empty());
}

#[test]
fn orphan_output_becomes_an_unmatched_event() {
    let parsed = parse(&[
        r#"{"type":"response_item","payload":{"type":"function_call_output","call_id":"call_missing","output":"stray"}}"#,
    ]);

    let tool = parsed.session.events[0].tool.as_ref().expect("synthetic invocation");
    assert_eq!(tool.status, ToolStatus::Unmatched);
    assert!(matches!(
        parsed.warnings.as_slice(),
        [ParseWarning::UnmatchedToolResult { call_id, .. }] if call_id == "call_missing"
    ));
}

#[test]
fn undecodable_arguments_degrade_to_an_empty_object() {
    let parsed = parse(&[
        r#"{"type":"response_item","payload":{"type":"function_call","name":"apply_patch","arguments":"{not json","call_id":"call_4"}}"#,
    ]);

    let tool = parsed.session.events[0].tool.as_ref().expect("tool invocation");
    assert_eq!(tool.name, "apply_patch");
    assert_eq!(tool.input, serde_json::json!({}));
}

#[test]
fn custom_tool_calls_wrap_their_raw_input() {
    let parsed = parse(&[
        r#"{"type":"response_item","payload":{"type":"custom_tool_call","name":"lint","input":"src/main.rs","call_id":"call_5"}}"#,
        r#"{"type":"response_item","payload":{"type":"custom_tool_call_output","call_id":"call_5","output":"clean"}}"#,
    ]);

    let tool = parsed.session.events[0].tool.as_ref().expect("tool invocation");
    assert_eq!(tool.name, "lint");
    assert_eq!(tool.input["input"], "src/main.rs");
    assert_eq!(tool.status, ToolStatus::Success);
}

#[test]
fn malformed_lines_warn_and_the_parse_continues() {
    let parsed = parse(&[
        r#"{"type":"event_msg","payload":{"type":"user_message","message":"first"}}"#,
        r#"not json at all"#,
        r#"{"type":"event_msg","payload":{"type":"agent_message","message":"second"}}"#,
    ]);

    assert_eq!(parsed.session.len(), 2);
    assert!(matches!(
        parsed.warnings.as_slice(),
        [ParseWarning::MalformedRecord { line: 2, .. }]
    ));
}

#[test]
fn empty_messages_are_dropped() {
    let parsed = parse(&[
        r#"{"type":"event_msg","payload":{"type":"user_message","message":"   "}}"#,
    ]);
    assert!(parsed.session.is_empty());
}

#[test]
fn missing_session_meta_falls_back_to_a_generated_id() {
    let parsed = parse(&[
        r#"{"type":"event_msg","payload":{"type":"user_message","message":"hi"}}"#,
    ]);
    assert!(!parsed.session.session_id.is_empty());
}

#[test]
fn parse_path_reads_a_rollout_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        r#"{{"type":"session_meta","payload":{{"id":"rollout-file"}}}}"#
    )
    .expect("write meta");
    writeln!(
        file,
        r#"{{"type":"event_msg","payload":{{"type":"user_message","message":"hello"}}}}"#
    )
    .expect("write message");

    let parsed = CodexLogAdapter.parse_path(file.path()).expect("parse file");
    assert_eq!(parsed.session.session_id, "rollout-file");
    assert_eq!(parsed.session.len(), 1);
}
