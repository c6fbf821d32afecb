//! Shared building blocks for the HTML-family renderers: HTML escaping,
//! message markdown via mdast, ANSI span styling, and tool formatting.

use markdown::{mdast, to_mdast, ParseOptions};
use once_cell::sync::Lazy;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use log_model::{ContentBlock, ToolInvocation, ToolStatus};

use crate::core::text::ansi::{sgr_spans, strip_ansi, Color, Style};
use crate::render::{AnsiMode, RenderError};

pub(crate) fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            ch => escaped.push(ch),
        }
    }
    escaped
}

pub(crate) fn clip(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        text.chars().take(limit).collect()
    }
}

pub(crate) fn rfc3339_string(stamp: Option<OffsetDateTime>) -> Option<String> {
    stamp.and_then(|stamp| stamp.format(&Rfc3339).ok())
}

pub(crate) fn clock_label(stamp: OffsetDateTime) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        stamp.hour(),
        stamp.minute(),
        stamp.second()
    )
}

/// Session-relative offset like `+4:09` or `+1:02:33`.
pub(crate) fn relative_label(stamp: OffsetDateTime, session_start: OffsetDateTime) -> String {
    let total_seconds = (stamp - session_start).whole_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("+{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("+{minutes}:{seconds:02}")
    }
}

// ── ANSI styling to inline CSS ──────────────────────────────────────────

/// Basic-palette colors, matching the player's dark code background.
const NAMED_COLORS: [&str; 16] = [
    "#000000", "#e06c75", "#98c379", "#e5c07b", "#61afef", "#c678dd", "#56b6c2", "#dcdfe4",
    "#5c6370", "#e06c75", "#98c379", "#e5c07b", "#61afef", "#c678dd", "#56b6c2", "#ffffff",
];

/// The xterm 256-color palette: 16 named slots, a 6x6x6 cube, a gray ramp.
static XTERM_PALETTE: Lazy<[(u8, u8, u8); 256]> = Lazy::new(|| {
    let mut palette = [(0u8, 0u8, 0u8); 256];
    for (slot, hex) in NAMED_COLORS.iter().enumerate() {
        let value = u32::from_str_radix(&hex[1..], 16).unwrap_or(0);
        palette[slot] = ((value >> 16) as u8, (value >> 8) as u8, value as u8);
    }
    let steps = [0u8, 95, 135, 175, 215, 255];
    for red in 0..6 {
        for green in 0..6 {
            for blue in 0..6 {
                palette[16 + 36 * red + 6 * green + blue] =
                    (steps[red], steps[green], steps[blue]);
            }
        }
    }
    for gray in 0..24 {
        let level = 8 + 10 * gray as u8;
        palette[232 + gray] = (level, level, level);
    }
    palette
});

fn color_css(color: Color) -> String {
    match color {
        Color::Named(slot) => NAMED_COLORS[usize::from(slot) % 16].to_string(),
        Color::Fixed(slot) => {
            let (r, g, b) = XTERM_PALETTE[usize::from(slot)];
            format!("rgb({r},{g},{b})")
        }
        Color::Rgb(r, g, b) => format!("rgb({r},{g},{b})"),
    }
}

fn style_css(style: &Style) -> String {
    let mut props = Vec::new();
    if let Some(fg) = style.fg {
        props.push(format!("color:{}", color_css(fg)));
    }
    if let Some(bg) = style.bg {
        props.push(format!("background:{}", color_css(bg)));
    }
    if style.bold {
        props.push("font-weight:bold".to_string());
    }
    if style.dim {
        props.push("opacity:0.7".to_string());
    }
    if style.italic {
        props.push("font-style:italic".to_string());
    }
    if style.underline {
        props.push("text-decoration:underline".to_string());
    }
    if style.strikethrough {
        props.push("text-decoration:line-through".to_string());
    }
    props.join(";")
}

/// Escaped HTML for terminal-tainted text under the selected ANSI mode.
pub(crate) fn ansi_html(text: &str, mode: AnsiMode) -> String {
    match mode {
        AnsiMode::Strip => escape(&strip_ansi(text)),
        AnsiMode::Color => {
            let mut out = String::new();
            for span in sgr_spans(text) {
                if span.style.is_plain() {
                    out.push_str(&escape(&span.text));
                } else {
                    out.push_str(&format!(
                        "<span style=\"{}\">{}</span>",
                        style_css(&span.style),
                        escape(&span.text)
                    ));
                }
            }
            out
        }
    }
}

// ── Message markdown to HTML ────────────────────────────────────────────

/// Converts message markdown into escaped HTML via the mdast tree.
pub(crate) fn markdown_to_html(text: &str, mode: AnsiMode) -> Result<String, RenderError> {
    let tree = to_mdast(text, &ParseOptions::gfm()).map_err(|message| {
        RenderError::MarkdownParse {
            detail: message.to_string(),
        }
    })?;
    let mut out = String::new();
    emit_node(&tree, mode, &mut out);
    Ok(out)
}

fn emit_children(node: &mdast::Node, mode: AnsiMode, out: &mut String) {
    if let Some(children) = node.children() {
        for child in children {
            emit_node(child, mode, out);
        }
    }
}

fn emit_node(node: &mdast::Node, mode: AnsiMode, out: &mut String) {
    match node {
        mdast::Node::Root(_) => emit_children(node, mode, out),
        mdast::Node::Paragraph(_) => {
            out.push_str("<p>");
            emit_children(node, mode, out);
            out.push_str("</p>\n");
        }
        mdast::Node::Heading(heading) => {
            // Headings shift one level down so message structure stays
            // below the document's own title.
            let level = (heading.depth + 1).min(6);
            out.push_str(&format!("<h{level}>"));
            emit_children(node, mode, out);
            out.push_str(&format!("</h{level}>\n"));
        }
        mdast::Node::Text(text) => out.push_str(&escape(&text.value)),
        mdast::Node::Strong(_) => {
            out.push_str("<strong>");
            emit_children(node, mode, out);
            out.push_str("</strong>");
        }
        mdast::Node::Emphasis(_) => {
            out.push_str("<em>");
            emit_children(node, mode, out);
            out.push_str("</em>");
        }
        mdast::Node::Delete(_) => {
            out.push_str("<del>");
            emit_children(node, mode, out);
            out.push_str("</del>");
        }
        mdast::Node::InlineCode(code) => {
            out.push_str("<code>");
            out.push_str(&escape(&code.value));
            out.push_str("</code>");
        }
        mdast::Node::Code(code) => {
            out.push_str(&code_block_html(code.lang.as_deref(), &code.value, mode));
        }
        mdast::Node::Blockquote(_) => {
            out.push_str("<blockquote>");
            emit_children(node, mode, out);
            out.push_str("</blockquote>\n");
        }
        mdast::Node::List(list) => {
            let tag = if list.ordered { "ol" } else { "ul" };
            out.push_str(&format!("<{tag}>\n"));
            emit_children(node, mode, out);
            out.push_str(&format!("</{tag}>\n"));
        }
        mdast::Node::ListItem(_) => {
            out.push_str("<li>");
            emit_children(node, mode, out);
            out.push_str("</li>\n");
        }
        mdast::Node::Link(link) => {
            out.push_str(&format!("<a href=\"{}\">", escape(&link.url)));
            emit_children(node, mode, out);
            out.push_str("</a>");
        }
        mdast::Node::Image(image) => {
            out.push_str(&format!("<em>[image: {}]</em>", escape(&image.alt)));
        }
        mdast::Node::Break(_) => out.push_str("<br>\n"),
        mdast::Node::ThematicBreak(_) => out.push_str("<hr>\n"),
        mdast::Node::Table(table) => emit_table(table, mode, out),
        // Raw HTML from transcripts is untrusted; show it, never inject it.
        mdast::Node::Html(html) => out.push_str(&escape(&html.value)),
        other => emit_children(other, mode, out),
    }
}

fn emit_table(table: &mdast::Table, mode: AnsiMode, out: &mut String) {
    out.push_str("<table>\n");
    let mut rows = table.children.iter();

    if let Some(header) = rows.next() {
        out.push_str("<thead><tr>");
        if let Some(cells) = header.children() {
            for cell in cells {
                out.push_str("<th>");
                emit_children(cell, mode, out);
                out.push_str("</th>");
            }
        }
        out.push_str("</tr></thead>\n");
    }

    out.push_str("<tbody>\n");
    for row in rows {
        out.push_str("<tr>");
        if let Some(cells) = row.children() {
            for cell in cells {
                out.push_str("<td>");
                emit_children(cell, mode, out);
                out.push_str("</td>");
            }
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody></table>\n");
}

fn code_block_html(language: Option<&str>, code: &str, mode: AnsiMode) -> String {
    let class = language
        .map(|lang| format!(" class=\"language-{}\"", escape(lang)))
        .unwrap_or_default();
    format!(
        "<pre><code{class}>{}</code></pre>\n",
        ansi_html(code, mode)
    )
}

// ── Content blocks ──────────────────────────────────────────────────────

/// One content block rendered for the HTML-family formats.
pub(crate) fn content_block_html(block: &ContentBlock, mode: AnsiMode) -> Result<String, RenderError> {
    Ok(match block {
        ContentBlock::Text { text } => format!(
            "<div class=\"message-body\">{}</div>",
            markdown_to_html(text, mode)?
        ),
        ContentBlock::Code { language, code } => code_block_html(language.as_deref(), code, mode),
        ContentBlock::Table { headers, rows } => {
            let mut out = String::from("<table>\n<thead><tr>");
            for header in headers {
                out.push_str(&format!("<th>{}</th>", ansi_html(header, mode)));
            }
            out.push_str("</tr></thead>\n<tbody>\n");
            for row in rows {
                out.push_str("<tr>");
                for cell in row {
                    out.push_str(&format!("<td>{}</td>", ansi_html(cell, mode)));
                }
                out.push_str("</tr>\n");
            }
            out.push_str("</tbody></table>\n");
            out
        }
        ContentBlock::Image { source } => {
            format!("<em>[image: {}]</em>", escape(source))
        }
        ContentBlock::ToolResult { summary } => format!(
            "<details><summary>Tool Result</summary><pre>{}</pre></details>",
            ansi_html(summary, mode)
        ),
    })
}

// ── Tool invocations ────────────────────────────────────────────────────

fn input_str<'a>(input: &'a Value, key: &str) -> &'a str {
    input.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn write_line_count(input: &Value) -> usize {
    let content = input_str(input, "content");
    if content.is_empty() {
        0
    } else {
        content.lines().count()
    }
}

/// Status marker shown for anything but a clean success.
pub(crate) fn status_label(status: ToolStatus) -> Option<&'static str> {
    match status {
        ToolStatus::Success => None,
        ToolStatus::Pending => Some("pending"),
        ToolStatus::Error => Some("error"),
        ToolStatus::Unmatched => Some("unmatched"),
    }
}

/// Tool call summary in Markdown, specialized per well-known tool.
pub(crate) fn tool_markdown(tool: &ToolInvocation) -> String {
    let input = &tool.input;
    match tool.name.as_str() {
        "Read" => format!("**Read**: `{}`", input_str(input, "file_path")),
        "Write" => format!(
            "**Write**: `{}` ({} lines)",
            input_str(input, "file_path"),
            write_line_count(input)
        ),
        "Edit" => format!(
            "**Edit**: `{}`\n```diff\n- {}\n+ {}\n```",
            input_str(input, "file_path"),
            clip(input_str(input, "old_string"), 200),
            clip(input_str(input, "new_string"), 200)
        ),
        "Bash" => format!("**Bash**:\n```bash\n{}\n```", input_str(input, "command")),
        "Grep" => format!(
            "**Grep**: `{}` in `{}`",
            input_str(input, "pattern"),
            input_str(input, "path")
        ),
        "Glob" => format!("**Glob**: `{}`", input_str(input, "pattern")),
        "Task" => format!("**Task**: {}", input_str(input, "description")),
        name => format!("**{name}**"),
    }
}

/// Tool call summary as a tool-section body for the HTML formats.
pub(crate) fn tool_html(tool: &ToolInvocation) -> String {
    let input = &tool.input;
    let mut html = match tool.name.as_str() {
        "Read" => format!(
            "<span class=\"tool-name\">Read</span>: <code>{}</code>",
            escape(input_str(input, "file_path"))
        ),
        "Write" => format!(
            "<span class=\"tool-name\">Write</span>: <code>{}</code> ({} lines)",
            escape(input_str(input, "file_path")),
            write_line_count(input)
        ),
        "Edit" => format!(
            "<span class=\"tool-name\">Edit</span>: <code>{}</code><pre>- {}\n+ {}</pre>",
            escape(input_str(input, "file_path")),
            escape(&clip(input_str(input, "old_string"), 200)),
            escape(&clip(input_str(input, "new_string"), 200))
        ),
        "Bash" => format!(
            "<span class=\"tool-name\">Bash</span>:<pre>{}</pre>",
            escape(input_str(input, "command"))
        ),
        "Grep" => format!(
            "<span class=\"tool-name\">Grep</span>: <code>{}</code> in <code>{}</code>",
            escape(input_str(input, "pattern")),
            escape(input_str(input, "path"))
        ),
        "Glob" => format!(
            "<span class=\"tool-name\">Glob</span>: <code>{}</code>",
            escape(input_str(input, "pattern"))
        ),
        "Task" => format!(
            "<span class=\"tool-name\">Task</span>: {}",
            escape(input_str(input, "description"))
        ),
        name => format!("<span class=\"tool-name\">{}</span>", escape(name)),
    };

    if let Some(label) = status_label(tool.status) {
        html.push_str(&format!(" <span class=\"tool-status\">[{label}]</span>"));
    }
    html
}

/// Icon plus header/body pair for the terminal-styled document.
pub(crate) fn tool_terminal(tool: &ToolInvocation) -> (String, String) {
    let input = &tool.input;
    let icon = match tool.name.as_str() {
        "Read" => "\u{1F4C4}",
        "Write" => "\u{270F}\u{FE0F}",
        "Edit" => "\u{1F527}",
        "Bash" => "$",
        "Grep" | "Glob" => "\u{1F50D}",
        "Task" => "\u{1F916}",
        "WebFetch" => "\u{1F310}",
        _ => "\u{2022}",
    };

    match tool.name.as_str() {
        "Read" => (
            format!(
                "{icon} Read <span class=\"t-path\">{}</span>",
                escape(input_str(input, "file_path"))
            ),
            String::new(),
        ),
        "Write" => (
            format!(
                "{icon} Write <span class=\"t-path\">{}</span>",
                escape(input_str(input, "file_path"))
            ),
            format!("<div class=\"t-dim\">{} lines</div>", write_line_count(input)),
        ),
        "Edit" => (
            format!(
                "{icon} Edit <span class=\"t-path\">{}</span>",
                escape(input_str(input, "file_path"))
            ),
            format!(
                "<div class=\"t-diff\"><span class=\"t-diff-del\">- {}</span><span class=\"t-diff-add\">+ {}</span></div>",
                escape(&clip(input_str(input, "old_string"), 200)),
                escape(&clip(input_str(input, "new_string"), 200))
            ),
        ),
        "Bash" => (
            format!("{icon} Bash"),
            format!(
                "<pre class=\"t-cmd\">{}</pre>",
                escape(input_str(input, "command"))
            ),
        ),
        "Grep" => (
            format!(
                "{icon} Grep <span class=\"t-str\">\"{}\"</span> <span class=\"t-dim\">in {}</span>",
                escape(input_str(input, "pattern")),
                escape(input.get("path").and_then(Value::as_str).unwrap_or("."))
            ),
            String::new(),
        ),
        "Glob" => (
            format!(
                "{icon} Glob <span class=\"t-str\">{}</span>",
                escape(input_str(input, "pattern"))
            ),
            String::new(),
        ),
        "Task" => (
            format!(
                "{icon} Task <span class=\"t-str\">{}</span>",
                escape(input_str(input, "description"))
            ),
            String::new(),
        ),
        name => (format!("{icon} {}", escape(name)), String::new()),
    }
}
