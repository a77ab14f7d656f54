//! Terminal output for humans: status lines and build summaries.
//!
//! Everything here writes to stderr. Stdout carries command output
//! (`sheaf config schema`) and, in a worker process, the worker protocol.

mod format;
mod messages;

pub use format::{
    format_duration, format_size, modules_line, print_build_summary, print_modules_summary,
    SummaryRow,
};
pub use messages::{info, success, warning};

/// Check if color output should be enabled.
///
/// Respects `NO_COLOR` and `FORCE_COLOR`, then falls back to whether stderr
/// is attended.
pub fn should_use_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    console::user_attended_stderr()
}

/// Apply the color decision to `console`'s stderr styling.
pub fn init_colors() {
    console::set_colors_enabled_stderr(should_use_color());
}
