//! ANSI escape extraction, stripping, and SGR span parsing.
//!
//! Tool output captured from terminals arrives with escape sequences
//! embedded. Renderers either strip them or map SGR styling onto markup;
//! both paths share one scanner. An unterminated sequence is never an
//! escape: the ESC byte onward stays literal text.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnsiCodeKind {
    Csi,
    Osc,
    Apc,
    Dcs,
    Ss3,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsiCode {
    pub code: String,
    pub length: usize,
    pub kind: AnsiCodeKind,
}

impl AnsiCode {
    /// True for SGR (style/color) sequences: CSI terminated by `m`.
    #[must_use]
    pub fn is_sgr(&self) -> bool {
        self.kind == AnsiCodeKind::Csi && self.code.ends_with('m')
    }
}

/// Extracts the escape sequence starting at byte `pos`, if one is complete.
pub fn extract_ansi_code(input: &str, pos: usize) -> Option<AnsiCode> {
    let bytes = input.as_bytes();
    if pos >= bytes.len() || bytes[pos] != 0x1b {
        return None;
    }
    if pos + 1 >= bytes.len() {
        return None;
    }

    match bytes[pos + 1] {
        b'[' => extract_csi(input, pos),
        b']' => extract_string_terminated(input, pos, AnsiCodeKind::Osc),
        b'_' => extract_string_terminated(input, pos, AnsiCodeKind::Apc),
        b'P' => extract_string_terminated(input, pos, AnsiCodeKind::Dcs),
        b'O' => extract_ss3(input, pos),
        _ => None,
    }
}

fn extract_csi(input: &str, pos: usize) -> Option<AnsiCode> {
    let bytes = input.as_bytes();
    let mut idx = pos + 2;
    while idx < bytes.len() {
        let b = bytes[idx];
        if (0x40..=0x7e).contains(&b) {
            let end = idx + 1;
            return Some(AnsiCode {
                code: input[pos..end].to_string(),
                length: end - pos,
                kind: AnsiCodeKind::Csi,
            });
        }
        idx += 1;
    }
    None
}

fn extract_ss3(input: &str, pos: usize) -> Option<AnsiCode> {
    let bytes = input.as_bytes();
    if pos + 2 >= bytes.len() {
        return None;
    }
    let end = pos + 3;
    Some(AnsiCode {
        code: input[pos..end].to_string(),
        length: end - pos,
        kind: AnsiCodeKind::Ss3,
    })
}

fn extract_string_terminated(input: &str, pos: usize, kind: AnsiCodeKind) -> Option<AnsiCode> {
    let bytes = input.as_bytes();
    let mut idx = pos + 2;
    while idx < bytes.len() {
        if bytes[idx] == 0x07 {
            let end = idx + 1;
            return Some(AnsiCode {
                code: input[pos..end].to_string(),
                length: end - pos,
                kind,
            });
        }
        if bytes[idx] == 0x1b && idx + 1 < bytes.len() && bytes[idx + 1] == b'\\' {
            let end = idx + 2;
            return Some(AnsiCode {
                code: input[pos..end].to_string(),
                length: end - pos,
                kind,
            });
        }
        idx += 1;
    }
    None
}

/// Removes every recognized escape sequence and non-printing control byte,
/// honoring carriage-return overwrite: text after a bare `\r` replaces the
/// current visual line up to the next line break.
#[must_use]
pub fn strip_ansi(input: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let bytes = input.as_bytes();
    let mut idx = 0;

    while idx < input.len() {
        if bytes[idx] == 0x1b {
            if let Some(code) = extract_ansi_code(input, idx) {
                idx += code.length;
                continue;
            }
            // Unterminated: keep the ESC as literal text.
            current.push('\u{1b}');
            idx += 1;
            continue;
        }

        let ch = input[idx..].chars().next().expect("in-bounds char");
        match ch {
            '\n' => {
                lines.push(std::mem::take(&mut current));
            }
            '\r' => {
                // \r\n is a plain line break; a bare \r restarts the line.
                if bytes.get(idx + 1) != Some(&b'\n') {
                    current.clear();
                }
            }
            '\t' => current.push('\t'),
            ch if (ch as u32) < 0x20 || ch == '\u{7f}' => {}
            ch => current.push(ch),
        }
        idx += ch.len_utf8();
    }

    lines.push(current);
    lines.join("\n")
}

/// A color captured from an SGR sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Basic palette slot 0-15 (SGR 30-37 / 90-97 and backgrounds).
    Named(u8),
    /// 256-color palette index (SGR 38;5;n).
    Fixed(u8),
    /// Truecolor (SGR 38;2;r;g;b).
    Rgb(u8, u8, u8),
}

/// Active SGR attributes for one span of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

impl Style {
    #[must_use]
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

/// A run of text under one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub style: Style,
    pub text: String,
}

/// Parses SGR styling into flat spans; every non-SGR control sequence is
/// discarded (there is no terminal grid to apply it to), and an
/// unterminated sequence stays literal.
#[must_use]
pub fn sgr_spans(input: &str) -> Vec<StyledSpan> {
    let mut spans: Vec<StyledSpan> = Vec::new();
    let mut state = Style::default();
    let mut run = String::new();
    let bytes = input.as_bytes();
    let mut idx = 0;

    fn flush(run: &mut String, style: Style, spans: &mut Vec<StyledSpan>) {
        if run.is_empty() {
            return;
        }
        spans.push(StyledSpan {
            style,
            text: std::mem::take(run),
        });
    }

    while idx < input.len() {
        if bytes[idx] == 0x1b {
            if let Some(code) = extract_ansi_code(input, idx) {
                if code.is_sgr() {
                    flush(&mut run, state, &mut spans);
                    apply_sgr(&mut state, &code.code);
                }
                idx += code.length;
                continue;
            }
            run.push('\u{1b}');
            idx += 1;
            continue;
        }

        let ch = input[idx..].chars().next().expect("in-bounds char");
        run.push(ch);
        idx += ch.len_utf8();
    }

    flush(&mut run, state, &mut spans);
    spans
}

fn apply_sgr(state: &mut Style, code: &str) {
    let Some(params) = code
        .strip_prefix("\u{1b}[")
        .and_then(|rest| rest.strip_suffix('m'))
    else {
        return;
    };

    if params.is_empty() {
        *state = Style::default();
        return;
    }

    let parts: Vec<&str> = params.split(';').collect();
    let mut idx = 0;
    while idx < parts.len() {
        let code = parts[idx].parse::<u16>().unwrap_or(0);

        // Extended color forms consume their payload in one step.
        if code == 38 || code == 48 {
            if idx + 2 < parts.len() && parts[idx + 1] == "5" {
                if let Ok(slot) = parts[idx + 2].parse::<u8>() {
                    set_color(state, code, Color::Fixed(slot));
                }
                idx += 3;
                continue;
            }
            if idx + 4 < parts.len() && parts[idx + 1] == "2" {
                let channels = (
                    parts[idx + 2].parse::<u8>(),
                    parts[idx + 3].parse::<u8>(),
                    parts[idx + 4].parse::<u8>(),
                );
                if let (Ok(r), Ok(g), Ok(b)) = channels {
                    set_color(state, code, Color::Rgb(r, g, b));
                }
                idx += 5;
                continue;
            }
        }

        match code {
            0 => *state = Style::default(),
            1 => state.bold = true,
            2 => state.dim = true,
            3 => state.italic = true,
            4 => state.underline = true,
            9 => state.strikethrough = true,
            21 => state.bold = false,
            22 => {
                state.bold = false;
                state.dim = false;
            }
            23 => state.italic = false,
            24 => state.underline = false,
            29 => state.strikethrough = false,
            39 => state.fg = None,
            49 => state.bg = None,
            30..=37 => state.fg = Some(Color::Named((code - 30) as u8)),
            90..=97 => state.fg = Some(Color::Named((code - 90 + 8) as u8)),
            40..=47 => state.bg = Some(Color::Named((code - 40) as u8)),
            100..=107 => state.bg = Some(Color::Named((code - 100 + 8) as u8)),
            _ => {}
        }
        idx += 1;
    }
}

fn set_color(state: &mut Style, selector: u16, color: Color) {
    if selector == 38 {
        state.fg = Some(color);
    } else {
        state.bg = Some(color);
    }
}
