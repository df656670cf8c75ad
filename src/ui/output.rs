//! How much the UI prints.

/// Verbosity chosen with `--verbose` / `--quiet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Also echo what installers and syncs printed.
    Verbose,
    #[default]
    Normal,
    /// Spinners and results, no chatter.
    Quiet,
    /// Errors only.
    Silent,
}

impl OutputMode {
    /// Pick the mode from the global flags; `--quiet` wins.
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        match (verbose, quiet) {
            (_, true) => Self::Quiet,
            (true, false) => Self::Verbose,
            (false, false) => Self::Normal,
        }
    }

    /// Captured stdout/stderr of successful commands is echoed.
    pub fn shows_command_output(&self) -> bool {
        *self == Self::Verbose
    }

    /// Progress spinners are drawn.
    pub fn shows_spinners(&self) -> bool {
        *self != Self::Silent
    }

    /// Messages, successes, warnings and hints are printed.
    pub fn shows_status(&self) -> bool {
        *self != Self::Silent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_flag_wins() {
        assert_eq!(OutputMode::from_flags(true, true), OutputMode::Quiet);
        assert_eq!(OutputMode::from_flags(true, false), OutputMode::Verbose);
        assert_eq!(OutputMode::from_flags(false, false), OutputMode::Normal);
    }

    #[test]
    fn only_verbose_echoes_command_output() {
        assert!(OutputMode::Verbose.shows_command_output());
        assert!(!OutputMode::Quiet.shows_command_output());
    }

    #[test]
    fn silent_prints_no_status() {
        assert!(!OutputMode::Silent.shows_status());
        assert!(!OutputMode::Silent.shows_spinners());
        assert!(OutputMode::Quiet.shows_status());
    }
}
