use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::ui;

const SPINNER: &str = "{spinner:.cyan} {msg} ({elapsed})";
const COUNTER: &str = "{prefix:.bold} [{wide_bar:.cyan/blue}] {pos}/{len} {msg}";

/// Terminal feedback for long runs. Every method is a no-op when progress
/// display is off (non-terminal stdout, `--quiet`, or JSON output).
pub struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    /// Open-ended work, e.g. a sync whose unit count is not known up front.
    #[must_use]
    pub fn spinner(message: &str) -> Self {
        Self::shown(|| {
            let bar = ProgressBar::new_spinner().with_style(style(SPINNER));
            bar.enable_steady_tick(Duration::from_millis(120));
            bar.set_message(message.to_string());
            bar
        })
    }

    /// `total` documents, counted up as each finishes.
    #[must_use]
    pub fn bar(total: usize, message: &str) -> Self {
        if total == 0 {
            return Self { bar: None };
        }
        Self::shown(|| {
            ProgressBar::new(total as u64)
                .with_style(style(COUNTER))
                .with_prefix(message.to_string())
        })
    }

    fn shown(make: impl FnOnce() -> ProgressBar) -> Self {
        Self {
            bar: ui::prefs().progress.then(make),
        }
    }

    /// A clone for callbacks that run away from the owning task.
    #[must_use]
    pub fn handle(&self) -> Option<ProgressBar> {
        self.bar.clone()
    }

    pub fn finish_ok(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(message.to_string());
        }
    }

    pub fn finish_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    pub fn finish_err(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.abandon_with_message(message.to_string());
        }
    }
}

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template).unwrap_or_else(|_| ProgressStyle::default_bar())
}
