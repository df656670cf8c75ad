//! Colors and status glyphs.

use console::Style;

/// Outcome shown in front of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Ok,
    Warn,
    Fail,
    Skip,
}

impl Mark {
    fn glyph(self) -> &'static str {
        match self {
            Mark::Ok => "✓",
            Mark::Warn => "⚠",
            Mark::Fail => "✗",
            Mark::Skip => "○",
        }
    }
}

/// Styling for terminal output. A plain theme renders the same text
/// without escape codes.
#[derive(Debug, Clone, Default)]
pub struct BootstrapTheme {
    colored: bool,
}

impl BootstrapTheme {
    /// Colored theme.
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// No colors, for pipes, CI and `--no-color`.
    pub fn plain() -> Self {
        Self { colored: false }
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.colored {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// `✓ msg`, `⚠ msg`, `✗ msg` or `○ msg`.
    pub fn mark(&self, mark: Mark, msg: &str) -> String {
        let style = match mark {
            Mark::Ok => Style::new().green(),
            Mark::Warn => Style::new().color256(208),
            Mark::Fail => Style::new().red().bold(),
            Mark::Skip => Style::new().dim(),
        };
        self.paint(style, &format!("{} {}", mark.glyph(), msg))
    }

    /// Section title for a checklist group.
    pub fn header(&self, title: &str) -> String {
        format!(
            "{} {}",
            self.paint(Style::new().bold().cyan(), "▸"),
            self.paint(Style::new().bold(), title)
        )
    }

    /// Follow-up advice under a status line.
    pub fn hint(&self, text: &str) -> String {
        self.paint(Style::new().cyan().dim(), text)
    }

    /// Box-drawing around error blocks.
    pub fn border(&self, text: &str) -> String {
        self.paint(Style::new().dim(), text)
    }

    /// A command line quoted in output.
    pub fn command(&self, text: &str) -> String {
        self.paint(Style::new().dim().italic(), text)
    }

    /// A failed command with its output, framed, then the hint.
    pub fn error_block(&self, command: &str, output: &str, hint: Option<&str>) -> Vec<String> {
        let bar = self.border("│");
        let mut lines = vec![
            format!("    {}", self.border(&format!("┌─ Command {}", "─".repeat(26)))),
            format!("    {} {}", bar, self.command(command)),
        ];
        if !output.is_empty() {
            lines.push(format!("    {}", self.border(&format!("├─ Output {}", "─".repeat(27)))));
            lines.extend(output.lines().map(|l| format!("    {} {}", bar, l)));
        }
        lines.push(format!("    {}", self.border(&format!("└{}", "─".repeat(36)))));
        if let Some(hint) = hint {
            lines.push(format!("    {}", self.hint(hint)));
        }
        lines
    }
}

/// Colors are on unless `NO_COLOR` is set or stdout is not a terminal.
pub fn should_use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none() && console::Term::stdout().is_term()
}
