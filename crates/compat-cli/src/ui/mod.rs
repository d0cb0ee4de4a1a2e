//! Terminal output: status messages, run progress and failure diagnostics.
//!
//! Everything here writes to stderr. Colors are applied through [`paint`],
//! which honours `--no-color`, `NO_COLOR` and `FORCE_COLOR`.

mod format;
mod messages;
mod progress;

use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};

use owo_colors::{OwoColorize, Style};

pub use format::{
    format_duration, format_failure, format_sequence, format_summary_line, print_run_summary,
};
pub use messages::{info, success};
pub use progress::RunProgress;

static COLORS: AtomicBool = AtomicBool::new(true);
static QUIET: AtomicBool = AtomicBool::new(false);

/// Check if running in a CI environment.
pub fn is_ci() -> bool {
    ["CI", "GITHUB_ACTIONS", "GITLAB_CI", "CIRCLECI", "TRAVIS"]
        .iter()
        .any(|var| std::env::var_os(var).is_some())
}

/// `NO_COLOR` wins over `FORCE_COLOR`; otherwise colors follow whether
/// stderr is attended.
pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::user_attended_stderr()
}

/// Sets color and verbosity for the rest of the process.
pub fn init(no_color: bool, quiet: bool) {
    set_colors(!no_color && should_use_color());
    QUIET.store(quiet, Ordering::Relaxed);
}

pub fn set_colors(enabled: bool) {
    COLORS.store(enabled, Ordering::Relaxed);
}

pub fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}

pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

/// Renders `value` with `style` when colors are enabled.
pub fn paint<T: Display>(value: T, style: Style) -> String {
    if colors_enabled() {
        value.style(style).to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn paint_is_plain_without_colors() {
        set_colors(false);
        assert_eq!(paint("ok", Style::new().green().bold()), "ok");

        set_colors(true);
        let colored = paint("ok", Style::new().green());
        assert!(colored.contains("ok"));
        assert_ne!(colored, "ok");
        set_colors(false);
    }

    #[test]
    #[serial]
    fn no_color_overrides_force_color() {
        unsafe {
            std::env::set_var("NO_COLOR", "1");
            std::env::set_var("FORCE_COLOR", "1");
        }
        assert!(!should_use_color());
        unsafe {
            std::env::remove_var("NO_COLOR");
        }
        assert!(should_use_color());
        unsafe {
            std::env::remove_var("FORCE_COLOR");
        }
    }
}
