//! Interactive player document generator.
//!
//! The emitted document is self-contained: the range-filtered events are
//! rendered as hidden message blocks carrying `data-timestamp` /
//! `data-kind` attributes, and the embedded script reveals them under the
//! same state machine and delay model the in-process
//! [`PlaybackEngine`](crate::playback::PlaybackEngine) implements. The
//! player exposes only standard pointer and keyboard interaction.

use log_model::{Event, Role, SessionView};
use time::OffsetDateTime;

use crate::render::body::{clock_label, content_block_html, relative_label, rfc3339_string, tool_html};
use crate::render::html::role_label;
use crate::render::{DocumentRenderer, RenderError, RenderOptions};

const TEMPLATE: &str = include_str!("assets/player.html");

pub(crate) struct PlayerRenderer;

impl DocumentRenderer for PlayerRenderer {
    fn render(
        &self,
        view: &SessionView<'_>,
        options: &RenderOptions,
    ) -> Result<String, RenderError> {
        let session_start = view.first_timestamp();
        let mut blocks: Vec<String> = Vec::new();
        let mut user_number = 0;

        for event in view.events() {
            if event.role == Role::User {
                user_number += 1;
            }
            blocks.push(message_block(event, user_number, session_start, options)?);
        }

        Ok(TEMPLATE
            .replace("{{THEME}}", options.theme.css_vars())
            .replace(
                "{{BASE_INTERVAL}}",
                &options.timing.base_interval_ms.to_string(),
            )
            .replace(
                "{{COMPRESSED_TARGET}}",
                &options.timing.compressed_target_ms.to_string(),
            )
            .replace("{{MESSAGES}}", &blocks.join("\n")))
    }
}

fn message_block(
    event: &Event,
    user_number: usize,
    session_start: Option<OffsetDateTime>,
    options: &RenderOptions,
) -> Result<String, RenderError> {
    let timestamp_attr = rfc3339_string(event.timestamp)
        .map(|stamp| format!(" data-timestamp=\"{stamp}\""))
        .unwrap_or_default();

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
        "<div class=\"message {role}\"{timestamp_attr} data-kind=\"{role}\">\n{time_label}<div class=\"message-content\">\n{content}\n</div>\n</div>",
        role = event.role.as_str(),
        time_label = time_label(event.timestamp, session_start),
        content = parts.join("\n"),
    ))
}

/// Absolute wall-clock label plus session-relative offset for one message.
fn time_label(
    stamp: Option<OffsetDateTime>,
    session_start: Option<OffsetDateTime>,
) -> String {
    let Some(stamp) = stamp else {
        return String::new();
    };
    let mut label = format!(
        "<div class=\"message-time\">\n  <div class=\"message-time-absolute\">{}</div>\n",
        clock_label(stamp)
    );
    if let Some(start) = session_start {
        label.push_str(&format!(
            "  <div class=\"message-time-relative\">{}</div>\n",
            relative_label(stamp, start)
        ));
    }
    label.push_str("</div>\n");
    label
}
