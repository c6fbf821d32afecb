//! Terminal-styled player document generator.
//!
//! A dark, monospace rendition of the session: user prompts behind a `❯`,
//! assistant responses behind an accent bar, tool activity as boxed rows
//! with a spinner that completes shortly after reveal. Replay here is
//! uniform-interval; the full three-discipline engine lives in the
//! interactive player document.

use log_model::{ContentBlock, Event, Role, SessionView, ToolStatus};

use crate::render::body::{ansi_html, content_block_html, escape, markdown_to_html, tool_terminal};
use crate::render::{DocumentRenderer, RenderError, RenderOptions};

const TEMPLATE: &str = include_str!("assets/terminal.html");

pub(crate) struct TerminalRenderer;

impl DocumentRenderer for TerminalRenderer {
    fn render(
        &self,
        view: &SessionView<'_>,
        options: &RenderOptions,
    ) -> Result<String, RenderError> {
        let mut blocks: Vec<String> = Vec::new();
        for event in view.events() {
            message_blocks(event, options, &mut blocks)?;
        }

        Ok(TEMPLATE
            .replace(
                "{{BASE_INTERVAL}}",
                &options.timing.base_interval_ms.to_string(),
            )
            .replace("{{SESSION}}", &escape(&view.session().session_id))
            .replace("{{MESSAGES}}", &blocks.join("\n")))
    }
}

fn message_blocks(
    event: &Event,
    options: &RenderOptions,
    blocks: &mut Vec<String>,
) -> Result<(), RenderError> {
    match event.role {
        Role::User => {
            let mut body = String::new();
            for block in &event.content {
                match block {
                    ContentBlock::Text { text } => {
                        body.push_str(&ansi_html(text.trim(), options.ansi_mode));
                    }
                    other => body.push_str(&content_block_html(other, options.ansi_mode)?),
                }
            }
            if !body.is_empty() {
                blocks.push(format!(
                    "<div class=\"t-msg t-user\"><div class=\"t-prompt\">\u{276F}</div><div class=\"t-user-text\">{body}</div></div>"
                ));
            }
        }
        Role::Assistant => {
            let mut body = String::new();
            for block in &event.content {
                match block {
                    ContentBlock::Text { text } => {
                        body.push_str(&markdown_to_html(text, options.ansi_mode)?);
                    }
                    other => body.push_str(&content_block_html(other, options.ansi_mode)?),
                }
            }
            if !body.is_empty() {
                blocks.push(format!(
                    "<div class=\"t-msg t-assistant\"><div class=\"t-response\">{body}</div></div>"
                ));
            }
        }
        Role::System => {
            let text = event.plain_text();
            if !text.trim().is_empty() {
                blocks.push(format!(
                    "<div class=\"t-msg t-system\">{}</div>",
                    ansi_html(text.trim(), options.ansi_mode)
                ));
            }
        }
        Role::Tool => tool_blocks(event, options, blocks),
    }
    Ok(())
}

fn tool_blocks(event: &Event, options: &RenderOptions, blocks: &mut Vec<String>) {
    let Some(tool) = &event.tool else {
        return;
    };

    let (header, body) = tool_terminal(tool);
    let result_summary = event.content.iter().find_map(|block| match block {
        ContentBlock::ToolResult { summary } => Some(summary.as_str()),
        _ => None,
    });

    if tool.status != ToolStatus::Unmatched {
        let empty_class = if body.is_empty() && result_summary.is_none() {
            " t-tool-empty"
        } else {
            ""
        };
        let pending_attr = if tool.status == ToolStatus::Pending {
            " data-pending=\"1\""
        } else {
            ""
        };
        let mut html = format!(
            "<div class=\"t-msg t-tool{empty_class}\" data-tool=\"{}\"{pending_attr}><div class=\"t-tool-header\"><span class=\"t-spinner\"></span>{header}</div>",
            escape(&tool.name.to_lowercase()),
        );
        if !body.is_empty() {
            html.push_str(&format!("<div class=\"t-tool-body\">{body}</div>"));
        }
        html.push_str("</div>");
        blocks.push(html);
    }

    if let Some(summary) = result_summary {
        if !summary.trim().is_empty() {
            blocks.push(format!(
                "<div class=\"t-msg t-tool\" data-tool=\"result\"><div class=\"t-tool-header\"><span class=\"t-spinner\"></span>\u{1F4DD} Result</div><div class=\"t-tool-body\"><pre class=\"t-cmd\">{}</pre></div></div>",
                ansi_html(summary, options.ansi_mode)
            ));
        }
    }
}
