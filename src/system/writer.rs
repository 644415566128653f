// src/system/writer.rs

use colored::{Color, Colorize};
use std::io::{self, Write as _};

/// The output capability the dispatcher renders usage and error text through.
///
/// Implementations decide where lines go (a terminal, a buffer) and how text is
/// wrapped and coloured. The dispatcher never writes to stdout directly.
pub trait Writer {
    /// Emits one line of text. The line is written as-is; wrapping is the
    /// caller's job (see [`Writer::wrap`]).
    fn write(&mut self, line: &str);

    /// Wraps `text` to `width` columns (or the writer's own width when `None`),
    /// indenting every line after the first by `continuation_indent` spaces.
    /// Returns the text with embedded newlines.
    fn wrap(&self, text: &str, width: Option<usize>, continuation_indent: usize) -> String;

    /// Highlights `text` in `color`. Writers that do not colour return it unchanged.
    fn color(&self, text: &str, _color: Option<Color>) -> String {
        text.to_string()
    }
}

/// Shared wrapping routine. `None` width leaves the text untouched.
fn wrap_text(text: &str, width: Option<usize>, continuation_indent: usize) -> String {
    let Some(width) = width else {
        return text.to_string();
    };
    let indent = " ".repeat(continuation_indent);
    let options = textwrap::Options::new(width).subsequent_indent(&indent);
    textwrap::fill(text, options)
}

/// Writes to standard output, wrapping at a configurable width and colouring
/// through `colored` when enabled.
#[derive(Debug, Clone)]
pub struct TerminalWriter {
    wrap_width: Option<usize>,
    use_colors: bool,
}

impl TerminalWriter {
    /// Creates a writer that wraps at `wrap_width` (if any) and follows
    /// `colored`'s global colour decision.
    pub fn new(wrap_width: Option<usize>) -> Self {
        Self {
            wrap_width,
            use_colors: colored::control::SHOULD_COLORIZE.should_colorize(),
        }
    }

    /// Overrides whether this writer colours its output.
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }
}

impl Default for TerminalWriter {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Writer for TerminalWriter {
    fn write(&mut self, line: &str) {
        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", line) {
            log::debug!("Failed to write to stdout: {}", e);
        }
    }

    fn wrap(&self, text: &str, width: Option<usize>, continuation_indent: usize) -> String {
        wrap_text(text, width.or(self.wrap_width), continuation_indent)
    }

    fn color(&self, text: &str, color: Option<Color>) -> String {
        match color {
            Some(c) if self.use_colors => text.color(c).to_string(),
            _ => text.to_string(),
        }
    }
}

/// Collects written lines in memory instead of printing them.
///
/// Multi-line writes are split so that [`RecordingWriter::lines`] always holds
/// one entry per output line.
#[derive(Debug, Clone, Default)]
pub struct RecordingWriter {
    lines: Vec<String>,
    wrap_width: Option<usize>,
}

impl RecordingWriter {
    /// Creates an empty recorder that never wraps unless asked to.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty recorder that wraps at `wrap_width` by default.
    pub fn with_wrap_width(wrap_width: usize) -> Self {
        Self {
            lines: Vec::new(),
            wrap_width: Some(wrap_width),
        }
    }

    /// All lines recorded so far.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The recorded output joined with newlines.
    pub fn output(&self) -> String {
        self.lines.join("\n")
    }

    /// Whether any recorded line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }

    /// Discards everything recorded so far.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Writer for RecordingWriter {
    fn write(&mut self, line: &str) {
        if line.is_empty() {
            self.lines.push(String::new());
            return;
        }
        self.lines.extend(line.lines().map(str::to_string));
    }

    fn wrap(&self, text: &str, width: Option<usize>, continuation_indent: usize) -> String {
        wrap_text(text, width.or(self.wrap_width), continuation_indent)
    }
}

// MARK: --- UNIT TESTS ---
