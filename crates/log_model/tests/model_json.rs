use serde_json::json;
use time::macros::datetime;

use log_model::{
    AgentKind, CanonicalSession, ContentBlock, EventDraft, Role, ToolInvocation, ToolStatus,
};

fn session_with_tool_edge_cases() -> CanonicalSession {
    let drafts = vec![
        EventDraft::message(
            Role::User,
            Some(datetime!(2026-04-05 08:00:00 UTC)),
            vec![ContentBlock::Text {
                text: "run the tests".to_string(),
            }],
        ),
        EventDraft::tool_call(
            Some(datetime!(2026-04-05 08:00:02 UTC)),
            ToolInvocation::pending("Bash", json!({"command": "cargo test"})),
        ),
        EventDraft::tool_call(
            Some(datetime!(2026-04-05 08:00:07 UTC)),
            ToolInvocation::unmatched(json!("stray output")),
        ),
        EventDraft::message(Role::System, None, Vec::new()),
    ];
    CanonicalSession::assemble(AgentKind::Claude, "round-trip", drafts)
}

#[test]
fn canonical_json_round_trips_exactly() {
    let session = session_with_tool_edge_cases();

    let encoded = serde_json::to_string(&session).expect("serialize session");
    let decoded: CanonicalSession = serde_json::from_str(&encoded).expect("deserialize session");
    assert_eq!(session, decoded);
}

#[test]
fn pending_and_unmatched_statuses_survive_the_wire() {
    let session = session_with_tool_edge_cases();
    let value = serde_json::to_value(&session).expect("serialize session");

    assert_eq!(value["events"][1]["tool"]["status"], "pending");
    assert_eq!(value["events"][1]["tool"]["result"], serde_json::Value::Null);
    assert_eq!(value["events"][2]["tool"]["status"], "unmatched");
    assert_eq!(value["events"][2]["tool"]["result"], "stray output");

    let decoded: CanonicalSession =
        serde_json::from_value(value).expect("deserialize session");
    assert_eq!(
        decoded.events[1].tool.as_ref().map(|tool| tool.status),
        Some(ToolStatus::Pending)
    );
    assert_eq!(
        decoded.events[2].tool.as_ref().map(|tool| tool.status),
        Some(ToolStatus::Unmatched)
    );
}

#[test]
fn indices_stay_dense_after_round_trip() {
    let session = session_with_tool_edge_cases();
    let encoded = serde_json::to_string(&session).expect("serialize session");
    let decoded: CanonicalSession = serde_json::from_str(&encoded).expect("deserialize session");

    let indices: Vec<usize> = decoded.events.iter().map(|event| event.index).collect();
    assert_eq!(indices, (1..=session.len()).collect::<Vec<_>>());
}
