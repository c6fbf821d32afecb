#![allow(dead_code)]

use std::sync::Once;

/// Routes adapter warnings through tracing during integration runs.
/// `RUST_LOG=log_replay=debug` makes skip-and-continue decisions visible.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A Claude-style transcript exercising text, tools, results, and a
/// missing timestamp.
pub const CLAUDE_SAMPLE: &str = concat!(
    r#"{"type":"user","timestamp":"2026-07-20T10:00:00Z","sessionId":"it-claude","message":{"content":"please run the tests"}}"#,
    "\n",
    r#"{"type":"assistant","timestamp":"2026-07-20T10:00:02Z","message":{"content":[{"type":"text","text":"Running them now."},{"type":"tool_use","id":"toolu_a","name":"Bash","input":{"command":"cargo test"}}]}}"#,
    "\n",
    r#"{"type":"user","timestamp":"2026-07-20T10:00:05Z","message":{"content":[{"type":"tool_result","tool_use_id":"toolu_a","content":"test result: ok. 12 passed"}]}}"#,
    "\n",
    r#"{"type":"assistant","message":{"content":[{"type":"text","text":"All green."}]}}"#,
    "\n",
);
