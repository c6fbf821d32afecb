//! Static HTML transcript output.

use log_model::{Event, Role, SessionView};

use crate::render::body::{content_block_html, tool_html};
use crate::render::{DocumentRenderer, RenderError, RenderOptions};

const TEMPLATE: &str = include_str!("assets/static.html");

pub(crate) struct HtmlRenderer;

impl DocumentRenderer for HtmlRenderer {
    fn render(
        &self,
        view: &SessionView<'_>,
        options: &RenderOptions,
    ) -> Result<String, RenderError> {
        let mut blocks: Vec<String> = Vec::new();
        let mut user_number = 0;

        for event in view.events() {
            if event.role == Role::User {
                user_number += 1;
            }
            blocks.push(message_block(event, user_number, options)?);
        }

        Ok(TEMPLATE
            .replace("{{THEME}}", options.theme.css_vars())
            .replace("{{MESSAGES}}", &blocks.join("\n")))
    }
}

pub(crate) fn role_label(role: Role, user_number: usize) -> String {
    match role {
        Role::User => format!("User ({user_number})"),
        Role::Assistant => "Assistant".to_string(),
        Role::Tool => "Tool".to_string(),
        Role::System => "System".to_string(),
    }
}

fn message_block(
    event: &Event,
    user_number: usize,
    options: &RenderOptions,
) -> Result<String, RenderError> {
    let mut parts = vec![format!(
        "<div class=\"role-label\">{}</div>",
        role_label(event.role, user_number)
    )];

    if let Some(tool) = &event.tool {
        parts.push(format!(
            "<div class=\"tool-section\">{}</div>",
            tool_html(tool)
        ));
    }
    for block in &event.content {
        parts.push(content_block_html(block, options.ansi_mode)?);
    }

    Ok(format!(
        "<div class=\"message {}\">\n{}\n</div>",
        event.role.as_str(),
        parts.join("\n")
    ))
}
