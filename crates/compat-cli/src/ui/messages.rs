//! Status lines, suppressed by `--quiet`.

use owo_colors::Style;

use super::{is_quiet, paint};

pub fn success(message: &str) {
    if !is_quiet() {
        eprintln!("{} {}", paint("✓", Style::new().green().bold()), message);
    }
}

pub fn info(message: &str) {
    if !is_quiet() {
        eprintln!("{} {}", paint("ℹ", Style::new().blue().bold()), message);
    }
}
