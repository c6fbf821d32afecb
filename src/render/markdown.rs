//! Markdown transcript output.
//!
//! Every event in the view gets a `##` heading in order, so the role
//! sequence of the source stream can be read straight back out of the
//! document. ANSI styling is always stripped here; Markdown has nowhere
//! to put it.

use log_model::{ContentBlock, Role, SessionView};

use crate::core::text::ansi::strip_ansi;
use crate::render::body::{status_label, tool_markdown};
use crate::render::{DocumentRenderer, RenderError, RenderOptions};

pub(crate) struct MarkdownRenderer;

impl DocumentRenderer for MarkdownRenderer {
    fn render(
        &self,
        view: &SessionView<'_>,
        _options: &RenderOptions,
    ) -> Result<String, RenderError> {
        let session = view.session();
        let mut lines: Vec<String> = Vec::new();
        lines.push("# Session Transcript\n".to_string());
        lines.push(format!(
            "Source: `{}` ({})\n",
            session.session_id,
            session.agent.as_str()
        ));
        lines.push("---\n".to_string());

        let mut user_number = 0;
        for event in view.events() {
            match event.role {
                Role::User => {
                    user_number += 1;
                    lines.push(format!("## User ({user_number})\n"));
                }
                Role::Assistant => lines.push("## Assistant\n".to_string()),
                Role::Tool => lines.push("## Tool\n".to_string()),
                Role::System => lines.push("## System\n".to_string()),
            }

            if let Some(tool) = &event.tool {
                let mut summary = tool_markdown(tool);
                if let Some(label) = status_label(tool.status) {
                    summary.push_str(&format!(" _[{label}]_"));
                }
                lines.push(format!("{summary}\n"));
            }

            for block in &event.content {
                lines.push(block_markdown(block));
            }
        }

        lines.push("\n---\n*Converted from session transcript.*\n".to_string());
        Ok(lines.join("\n"))
    }
}

fn block_markdown(block: &ContentBlock) -> String {
    match block {
        ContentBlock::Text { text } => {
            format!("{}\n", strip_ansi(text).trim())
        }
        ContentBlock::Code { language, code } => format!(
            "```{}\n{}\n```\n",
            language.as_deref().unwrap_or_default(),
            strip_ansi(code)
        ),
        ContentBlock::Table { headers, rows } => {
            let mut out = String::new();
            out.push_str(&format!("| {} |\n", headers.join(" | ")));
            out.push_str(&format!(
                "|{}\n",
                " --- |".repeat(headers.len().max(1))
            ));
            for row in rows {
                out.push_str(&format!("| {} |\n", row.join(" | ")));
            }
            out
        }
        ContentBlock::Image { source } => format!("_[image: {source}]_\n"),
        ContentBlock::ToolResult { summary } => format!(
            "<details><summary>Tool Result</summary>\n\n```\n{}\n```\n\n</details>\n",
            strip_ansi(summary)
        ),
    }
}
