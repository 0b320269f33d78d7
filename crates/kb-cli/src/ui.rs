//! Terminal presentation choices, decided once from the global flags.

use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{GlobalFlags, OutputFormat};

#[derive(Clone, Copy, Debug, Default)]
pub struct UiPrefs {
    /// Color outcome words in table output.
    pub table_color: bool,
    /// Show spinners and bars on stderr.
    pub progress: bool,
    /// Width tables shrink to, from `COLUMNS`.
    pub term_width: Option<usize>,
}

static PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let _ = PREFS.set(resolve(
        flags,
        std::io::stdout().is_terminal(),
        std::env::var_os("NO_COLOR").is_some(),
        std::env::var("COLUMNS").ok(),
    ));
}

/// Preferences set by [`init`], or plain output when it never ran.
#[must_use]
pub fn prefs() -> UiPrefs {
    PREFS.get().copied().unwrap_or_default()
}

fn resolve(flags: &GlobalFlags, tty: bool, no_color: bool, columns: Option<String>) -> UiPrefs {
    let interactive = tty && !flags.quiet;
    UiPrefs {
        table_color: interactive && !no_color && flags.format == OutputFormat::Table,
        progress: interactive && flags.format != OutputFormat::Json,
        term_width: columns
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|width| *width >= 40),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(format: OutputFormat, quiet: bool) -> GlobalFlags {
        GlobalFlags {
            format,
            quiet,
            verbose: false,
            concurrency: None,
        }
    }

    #[test]
    fn json_output_never_shows_progress() {
        let prefs = resolve(&flags(OutputFormat::Json, false), true, false, None);
        assert!(!prefs.progress && !prefs.table_color);
    }

    #[test]
    fn interactive_table_gets_color_unless_disabled() {
        let table = flags(OutputFormat::Table, false);
        assert!(resolve(&table, true, false, None).table_color);
        assert!(!resolve(&table, true, true, None).table_color);
        assert!(!resolve(&table, false, false, None).progress);
        assert!(!resolve(&flags(OutputFormat::Table, true), true, false, None).progress);
    }

    #[test]
    fn narrow_or_garbage_widths_are_ignored() {
        let table = flags(OutputFormat::Table, false);
        assert_eq!(resolve(&table, true, false, Some("120".into())).term_width, Some(120));
        assert_eq!(resolve(&table, true, false, Some("20".into())).term_width, None);
        assert_eq!(resolve(&table, true, false, Some("wide".into())).term_width, None);
    }
}
