mod support;

use log_replay::{
    render, strip_ansi, ClaudeLogAdapter, LogAdapter, OutputFormat, RangeSet, RenderOptions,
    SessionView,
};

fn markdown_options() -> RenderOptions {
    RenderOptions {
        format: OutputFormat::Markdown,
        ..RenderOptions::default()
    }
}

/// Extracts (role, body) pairs back out of rendered Markdown, one per
/// `##` heading.
fn extract_pairs(markdown: &str) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for line in markdown.lines() {
        if let Some(heading) = line.strip_prefix("## ") {
            let role = heading
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_lowercase();
            pairs.push((role, String::new()));
        } else if let Some((_, body)) = pairs.last_mut() {
            body.push_str(line);
            body.push('\n');
        }
    }
    pairs
}

#[test]
fn markdown_reproduces_event_order_and_roles() {
    support::init_tracing();
    let parsed = ClaudeLogAdapter
        .parse(&mut support::CLAUDE_SAMPLE.as_bytes())
        .expect("parse sample");
    let session = parsed.session;
    let view = SessionView::full(&session);

    let markdown = render(&view, &markdown_options()).expect("render markdown");
    let pairs = extract_pairs(&markdown);

    let expected_roles: Vec<String> = session
        .events
        .iter()
        .map(|event| event.role.as_str().to_string())
        .collect();
    let found_roles: Vec<String> = pairs.iter().map(|(role, _)| role.clone()).collect();
    assert_eq!(found_roles, expected_roles);

    for (event, (_, body)) in session.events.iter().zip(&pairs) {
        let text = strip_ansi(&event.plain_text());
        if !text.trim().is_empty() {
            assert!(
                body.contains(text.trim()),
                "event {} text missing from its section",
                event.index
            );
        }
    }
}

#[test]
fn range_filtered_markdown_keeps_relative_order() {
    support::init_tracing();
    let parsed = ClaudeLogAdapter
        .parse(&mut support::CLAUDE_SAMPLE.as_bytes())
        .expect("parse sample");
    let session = parsed.session;

    let range = RangeSet::parse("2-", session.len()).expect("valid range");
    let view = SessionView::over(&session, &range);
    let markdown = render(&view, &markdown_options()).expect("render markdown");
    let pairs = extract_pairs(&markdown);

    let expected_roles: Vec<String> = view
        .events()
        .map(|event| event.role.as_str().to_string())
        .collect();
    assert_eq!(
        pairs.iter().map(|(role, _)| role.clone()).collect::<Vec<_>>(),
        expected_roles
    );
    // User numbering restarts within the view.
    assert!(!markdown.contains("## User ("));
}

#[test]
fn empty_range_renders_an_empty_but_valid_transcript() {
    support::init_tracing();
    let parsed = ClaudeLogAdapter
        .parse(&mut support::CLAUDE_SAMPLE.as_bytes())
        .expect("parse sample");
    let session = parsed.session;

    let range = RangeSet::parse("100-", session.len()).expect("valid range");
    let view = SessionView::over(&session, &range);
    let markdown = render(&view, &markdown_options()).expect("render markdown");

    assert!(extract_pairs(&markdown).is_empty());
    assert!(markdown.starts_with("# Session Transcript"));
}
