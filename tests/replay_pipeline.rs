mod support;

use log_replay::{
    adapter_for, render, AgentKind, AnsiMode, OutputFormat, RangeSet, RenderOptions, SessionView,
    Theme, ToolStatus,
};

#[test]
fn full_pipeline_renders_every_format_from_one_parse() {
    support::init_tracing();
    let adapter = adapter_for(AgentKind::Claude);
    let parsed = adapter
        .parse(&mut support::CLAUDE_SAMPLE.as_bytes())
        .expect("parse sample");
    assert!(parsed.warnings.is_empty());

    let session = parsed.session;
    let view = SessionView::full(&session);

    for format in [
        OutputFormat::Markdown,
        OutputFormat::Html,
        OutputFormat::Player,
        OutputFormat::Terminal,
    ] {
        let output = render(
            &view,
            &RenderOptions {
                format,
                theme: Theme::Console,
                ..RenderOptions::default()
            },
        )
        .unwrap_or_else(|error| panic!("{} render failed: {error}", format.as_str()));
        assert!(
            output.contains("cargo test"),
            "{} lost the tool call",
            format.as_str()
        );
    }
}

#[test]
fn tool_status_edge_cases_render_in_every_format() {
    support::init_tracing();
    // One pending call (no result) and one orphan result.
    let transcript = concat!(
        r#"{"type":"assistant","message":{"content":[{"type":"tool_use","id":"t1","name":"Grep","input":{"pattern":"todo","path":"src"}}]}}"#,
        "\n",
        r#"{"type":"user","message":{"content":[{"type":"tool_result","tool_use_id":"ghost","content":"orphan output"}]}}"#,
        "\n",
    );
    let parsed = adapter_for(AgentKind::Claude)
        .parse(&mut transcript.as_bytes())
        .expect("parse transcript");

    let statuses: Vec<ToolStatus> = parsed
        .session
        .events
        .iter()
        .filter_map(|event| event.tool.as_ref().map(|tool| tool.status))
        .collect();
    assert_eq!(statuses, vec![ToolStatus::Pending, ToolStatus::Unmatched]);

    let view = SessionView::full(&parsed.session);
    for format in [
        OutputFormat::Markdown,
        OutputFormat::Html,
        OutputFormat::Player,
        OutputFormat::Terminal,
    ] {
        let rendered = render(
            &view,
            &RenderOptions {
                format,
                ..RenderOptions::default()
            },
        );
        assert!(rendered.is_ok(), "{} errored on edge cases", format.as_str());
    }
}

#[test]
fn ansi_laden_tool_output_stays_intact_across_modes() {
    support::init_tracing();
    let result_record = serde_json::json!({
        "type": "user",
        "message": {"content": [{
            "type": "tool_result",
            "tool_use_id": "t1",
            "content": format!(
                "Compiling 10%{cr}Compiling 100%{nl}{green}Finished{reset} release",
                cr = '\r', nl = '\n', green = "\u{1b}[32m", reset = "\u{1b}[0m"
            ),
        }]},
    });
    let transcript = format!(
        "{}{nl}{}{nl}",
        r#"{"type":"assistant","message":{"content":[{"type":"tool_use","id":"t1","name":"Bash","input":{"command":"cargo build"}}]}}"#,
        result_record,
        nl = '\n',
    );
    let parsed = adapter_for(AgentKind::Claude)
        .parse(&mut transcript.as_bytes())
        .expect("parse transcript");
    let view = SessionView::full(&parsed.session);

    let stripped = render(
        &view,
        &RenderOptions {
            format: OutputFormat::Html,
            ansi_mode: AnsiMode::Strip,
            ..RenderOptions::default()
        },
    )
    .expect("render stripped");
    // Carriage-return overwrite keeps only the final progress line.
    assert!(stripped.contains("Compiling 100%"));
    assert!(!stripped.contains("Compiling 10%"));
    assert!(stripped.contains("Finished"));
    assert!(!stripped.contains('\u{1b}'));

    let colored = render(
        &view,
        &RenderOptions {
            format: OutputFormat::Html,
            ansi_mode: AnsiMode::Color,
            ..RenderOptions::default()
        },
    )
    .expect("render colored");
    assert!(colored.contains("<span style=\"color:#98c379\">Finished</span>"));
}

#[test]
fn range_and_theme_compose_over_the_same_session() {
    support::init_tracing();
    let parsed = adapter_for(AgentKind::Claude)
        .parse(&mut support::CLAUDE_SAMPLE.as_bytes())
        .expect("parse sample");
    let session = parsed.session;

    let range = RangeSet::parse("1-2", session.len()).expect("valid range");
    let view = SessionView::over(&session, &range);
    let output = render(
        &view,
        &RenderOptions {
            format: OutputFormat::Player,
            theme: Theme::Light,
            ..RenderOptions::default()
        },
    )
    .expect("render player");

    assert!(output.contains("please run the tests"));
    assert!(output.contains("Running them now."));
    assert!(!output.contains("All green."));
    assert!(output.contains("--body-bg: #f0f0f0"));
}
