use easy_language_core::{Fragment, SimplificationReport};
use owo_colors::OwoColorize;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!("\n{} {} {}", "Easy Language".bold().bright_blue(), "v".dimmed(), VERSION.dimmed());
    eprintln!("{}", "Extract and reinsert page-builder flow text\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print a labelled value
pub fn print_field(label: &str, value: &str) {
    eprintln!("  {} {}", format!("{}:", label).dimmed(), value.bright_white());
}

/// Print the outcome of a simplification pass
pub fn print_report(report: &SimplificationReport) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Simplification Summary".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());
    print_field("Builder", &report.builder);
    print_field("Fragments", &report.total.to_string());
    print_field("Processed", &report.processed.to_string());
    print_field("Changed", &report.changed.to_string());
    if report.failed > 0 {
        eprintln!("  {} {}", "Failed:".dimmed(), report.failed.to_string().bright_red());
    }
    print_field("Remaining", &report.remaining.to_string());
    eprintln!();
}

/// Render fragments as numbered plain-text lines
pub fn format_fragments(fragments: &[Fragment]) -> String {
    let mut output = String::new();
    for (index, fragment) in fragments.iter().enumerate() {
        let kind = if fragment.is_html { "html" } else { "text" };
        output.push_str(&format!("{:>3} [{}] {}\n", index + 1, kind, fragment.text.replace('\n', " ")));
    }
    output
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
