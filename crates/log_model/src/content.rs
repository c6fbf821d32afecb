//! Splits raw message text into structured content blocks.

use serde_json::Value;

use crate::event::ContentBlock;

/// Tool result summaries are cut at this many characters.
pub const SUMMARY_LIMIT: usize = 500;

/// Segments message text into `Text`, `Code`, and `Table` blocks.
///
/// Fenced code runs from a ``` line to the closing fence; an unterminated
/// fence swallows the remainder of the text as code. A pipe table starts at
/// a `|`-bearing line followed by a `|:- `-only separator line and runs
/// until the first line without a `|`.
#[must_use]
pub fn segment_text(text: &str) -> Vec<ContentBlock> {
    let lines: Vec<&str> = text.lines().collect();
    let mut blocks = Vec::new();
    let mut plain: Vec<&str> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if let Some(language) = fence_language(line) {
            flush_plain(&mut plain, &mut blocks);
            let mut code: Vec<&str> = Vec::new();
            i += 1;
            while i < lines.len() && fence_language(lines[i]).is_none() {
                code.push(lines[i]);
                i += 1;
            }
            // Skip the closing fence when present.
            if i < lines.len() {
                i += 1;
            }
            blocks.push(ContentBlock::Code {
                language,
                code: code.join("\n"),
            });
            continue;
        }

        if i + 1 < lines.len() && line.contains('|') && is_table_separator(lines[i + 1]) {
            flush_plain(&mut plain, &mut blocks);
            let headers = split_table_row(line);
            i += 2;
            let mut rows = Vec::new();
            while i < lines.len() && lines[i].contains('|') && !lines[i].trim().is_empty() {
                rows.push(split_table_row(lines[i]));
                i += 1;
            }
            blocks.push(ContentBlock::Table { headers, rows });
            continue;
        }

        plain.push(line);
        i += 1;
    }

    flush_plain(&mut plain, &mut blocks);
    blocks
}

fn flush_plain(plain: &mut Vec<&str>, blocks: &mut Vec<ContentBlock>) {
    if plain.iter().all(|line| line.trim().is_empty()) {
        plain.clear();
        return;
    }
    blocks.push(ContentBlock::Text {
        text: plain.join("\n").trim_matches('\n').to_string(),
    });
    plain.clear();
}

fn fence_language(line: &str) -> Option<Option<String>> {
    let rest = line.trim_start().strip_prefix("```")?;
    let language = rest.trim();
    if language.is_empty() {
        Some(None)
    } else {
        Some(Some(language.to_string()))
    }
}

fn is_table_separator(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.contains('|') && trimmed.chars().all(|ch| matches!(ch, '|' | ':' | '-' | ' '))
}

fn split_table_row(line: &str) -> Vec<String> {
    line.trim()
        .trim_matches('|')
        .split('|')
        .map(|cell| cell.trim().to_string())
        .collect()
}

/// Flattens a tool result payload into displayable text.
///
/// Strings pass through; block lists contribute their `text` members;
/// anything else falls back to compact JSON.
#[must_use]
pub fn summarize_tool_result(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(items) => {
            let mut texts = Vec::new();
            for item in items {
                if item.get("type").and_then(Value::as_str) == Some("text") {
                    if let Some(text) = item.get("text").and_then(Value::as_str) {
                        texts.push(text.to_string());
                    }
                }
            }
            texts.join("\n")
        }
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Cuts a summary at `limit` characters, marking the cut.
#[must_use]
pub fn truncate_summary(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(limit).collect();
    cut.push_str("\n... (truncated)");
    cut
}
