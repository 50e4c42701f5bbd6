//! Terminal output for the CLI.
//!
//! Status lines carry a bracketed tag (`[INFO]`, `[WARN]`, ...). Colors are
//! only used on a TTY and never when `NO_COLOR` is set.

use crate::library::SeriesSummary;
use std::io::{self, IsTerminal, Write};

/// SGR attributes, valued by their escape code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Bold = 1,
    Dim = 2,
    Red = 31,
    Green = 32,
    Yellow = 33,
    Blue = 34,
    Magenta = 35,
    Cyan = 36,
    Gray = 90,
}

/// Kind of a tagged status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Ok,
    Warn,
    Error,
    Step,
    Progress,
}

impl Level {
    fn tag(self) -> (&'static str, Style) {
        match self {
            Level::Info => ("INFO", Style::Blue),
            Level::Ok => ("OK", Style::Green),
            Level::Warn => ("WARN", Style::Yellow),
            Level::Error => ("ERROR", Style::Red),
            Level::Step => ("STEP", Style::Cyan),
            Level::Progress => ("..", Style::Cyan),
        }
    }
}

/// Writes tagged status lines and formats library entries.
#[derive(Debug)]
pub struct Console {
    colors: bool,
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl Console {
    /// Colors follow stdout being a terminal, unless `NO_COLOR` is set.
    pub fn new() -> Self {
        Self::with_colors(std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal())
    }

    pub fn with_colors(colors: bool) -> Self {
        Self { colors }
    }

    /// Wraps `text` in the given attributes. Plain text when colors are off.
    pub fn style(&self, text: &str, styles: &[Style]) -> String {
        if !self.colors || styles.is_empty() {
            return text.to_string();
        }

        let sgr = styles
            .iter()
            .map(|&style| (style as u8).to_string())
            .collect::<Vec<_>>()
            .join(";");
        format!("\x1b[{sgr}m{text}\x1b[0m")
    }

    /// Formats `message` behind the bold colored tag of `level`.
    pub fn tagged(&self, level: Level, message: &str) -> String {
        let (tag, color) = level.tag();
        format!("[{}] {}", self.style(tag, &[color, Style::Bold]), message)
    }

    pub fn info(&self, message: &str) {
        println!("{}", self.tagged(Level::Info, message));
    }

    pub fn success(&self, message: &str) {
        println!("{}", self.tagged(Level::Ok, message));
    }

    pub fn warning(&self, message: &str) {
        println!("{}", self.tagged(Level::Warn, message));
    }

    /// Errors go to stderr.
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.tagged(Level::Error, message));
    }

    pub fn step(&self, message: &str) {
        println!("{}", self.tagged(Level::Step, message));
    }

    /// Blank line, then `title` as a header.
    pub fn section(&self, title: &str) {
        println!("\n{}", self.style(title, &[Style::Magenta, Style::Bold]));
    }

    pub fn muted(&self, text: &str) -> String {
        self.style(text, &[Style::Gray, Style::Dim])
    }

    /// Rewrites the current line with a progress message.
    ///
    /// Without colors (piped output) each update goes on its own line.
    pub fn progress_update(&self, message: &str) {
        let line = self.tagged(Level::Progress, message);
        if !self.colors {
            println!("{line}");
            return;
        }

        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "\r\x1b[2K{line}");
        let _ = stdout.flush();
    }

    /// Ends an in-place progress line.
    pub fn finish_progress(&self) {
        if self.colors {
            println!();
        }
    }

    pub fn count(&self, n: usize) -> String {
        self.style(&n.to_string(), &[Style::Green, Style::Bold])
    }

    /// `owned/out`, green once nothing is missing and red otherwise.
    pub fn progress_label(&self, summary: &SeriesSummary) -> String {
        let color = if summary.is_complete() {
            Style::Green
        } else {
            Style::Red
        };
        self.style(&summary.progress_label, &[color, Style::Bold])
    }

    /// Next release as `date title`, preferring the ISO date. A muted dash if none.
    pub fn release(&self, summary: &SeriesSummary) -> String {
        let Some(soon) = &summary.soon_out else {
            return self.muted("-");
        };
        let date = soon.date_iso.as_deref().unwrap_or(&soon.date_raw);
        format!(
            "{} {}",
            self.style(date, &[Style::Yellow]),
            self.muted(&soon.title)
        )
    }

    /// One library line: title, progress, missing count and next release.
    pub fn series_line(&self, summary: &SeriesSummary) -> String {
        let missing = match summary.missing_count {
            0 => String::new(),
            n => format!(" ({} missing)", self.style(&n.to_string(), &[Style::Red])),
        };

        format!(
            "{}  {}{}  {}",
            self.style(&summary.title, &[Style::Bold]),
            self.progress_label(summary),
            missing,
            self.release(summary)
        )
    }
}
