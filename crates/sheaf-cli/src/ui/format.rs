//! Sizes, durations and build summaries.

use console::Term;
use owo_colors::OwoColorize;
use sheaf_bundler::ModulesReport;
use std::time::Duration;

/// One written bundle in the summary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    /// Bundle file name.
    pub name: String,
    pub target: String,
    /// Scripts concatenated into the bundle.
    pub files: usize,
    pub size: u64,
    pub duration: Duration,
}

/// Format a byte count with the largest fitting unit (`1.50 MB`).
///
/// ```
/// use sheaf_cli::ui::format_size;
///
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(1_048_576), "1.00 MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit])
    }
}

/// Format a duration as `50ms`, `1.50s` or `2m 5s`.
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// One line describing a module build.
pub fn modules_line(report: &ModulesReport) -> String {
    if report.mode.is_development() {
        format!("{} linked", report.linked)
    } else {
        format!(
            "{} minified, {} linked, {} directories",
            report.minified, report.linked, report.directories
        )
    }
}

/// Print the module stage result to stderr.
pub fn print_modules_summary(report: &ModulesReport) {
    eprintln!(
        "  {} {} {} {}",
        "▸".blue(),
        "modules".bright_white().bold(),
        modules_line(report).dimmed(),
        format!("({})", format_duration(report.duration)).dimmed()
    );
}

/// Print a table of written bundles to stderr.
pub fn print_build_summary(rows: &[SummaryRow]) {
    let width = (Term::stderr().size().1 as usize).min(80);

    eprintln!("\n{}", "Bundles".bold().underline());
    eprintln!("{}", "─".repeat(width));

    for row in rows {
        eprintln!(
            "  {} {} {} {} {}",
            "▸".blue(),
            row.name.bright_white().bold(),
            format!("[{}]", row.target).cyan(),
            format!("{} from {} files", format_size(row.size), row.files).dimmed(),
            format!("({})", format_duration(row.duration)).dimmed()
        );
    }

    eprintln!("{}", "─".repeat(width));

    let total_size: u64 = rows.iter().map(|row| row.size).sum();
    eprintln!(
        "  {} {}",
        "Total:".bold(),
        format_size(total_size).green()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheaf_bundler::BuildMode;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(10_485_760), "10.00 MB");
        assert_eq!(format_size(2_147_483_648), "2.00 GB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(0)), "0ms");
        assert_eq!(format_duration(Duration::from_millis(999)), "999ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
    }

    #[test]
    fn test_modules_line_per_mode() {
        let production = ModulesReport {
            mode: BuildMode::Production,
            minified: 7,
            linked: 1,
            directories: 4,
            ..Default::default()
        };
        assert_eq!(modules_line(&production), "7 minified, 1 linked, 4 directories");

        let development = ModulesReport {
            mode: BuildMode::Development,
            linked: 5,
            ..Default::default()
        };
        assert_eq!(modules_line(&development), "5 linked");
    }

    #[test]
    fn test_print_build_summary_empty() {
        print_build_summary(&[]);
    }
}
