//! Rendering: one `render` contract, four output formats.

mod body;
mod html;
mod markdown;
mod player;
mod terminal;
pub mod theme;

use log_model::SessionView;
use thiserror::Error;

use crate::playback::TimingConfig;

pub use theme::Theme;

/// Output formats an excluded front end can request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Markdown,
    /// Static HTML transcript.
    Html,
    /// Self-contained interactive player document.
    Player,
    /// Self-contained terminal-styled player document.
    Terminal,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "markdown" | "md" => Self::Markdown,
            "staticHtml" | "html" => Self::Html,
            "player" => Self::Player,
            "terminal" => Self::Terminal,
            _ => return None,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Html => "staticHtml",
            Self::Player => "player",
            Self::Terminal => "terminal",
        }
    }

    fn renderer(&self) -> &'static dyn DocumentRenderer {
        match self {
            Self::Markdown => &markdown::MarkdownRenderer,
            Self::Html => &html::HtmlRenderer,
            Self::Player => &player::PlayerRenderer,
            Self::Terminal => &terminal::TerminalRenderer,
        }
    }
}

/// How embedded terminal escapes in tool output are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnsiMode {
    #[default]
    Strip,
    Color,
}

impl AnsiMode {
    pub fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "strip" => Self::Strip,
            "color" => Self::Color,
            _ => return None,
        })
    }
}

/// Everything a renderer needs besides the view itself.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub format: OutputFormat,
    pub theme: Theme,
    pub ansi_mode: AnsiMode,
    pub timing: TimingConfig,
}

/// Rendering failures. Empty views are not one of them: every renderer
/// degrades to a valid near-empty document.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to parse message markdown: {detail}")]
    MarkdownParse { detail: String },
}

/// Shared render contract dispatched per format.
trait DocumentRenderer: Sync {
    fn render(&self, view: &SessionView<'_>, options: &RenderOptions)
        -> Result<String, RenderError>;
}

/// Renders a view into the format selected by `options`. Deterministic for
/// the static formats; the player formats embed the timing configuration.
pub fn render(view: &SessionView<'_>, options: &RenderOptions) -> Result<String, RenderError> {
    options.format.renderer().render(view, options)
}
