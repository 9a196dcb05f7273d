//! Pure formatting functions for UI output.
//!
//! Everything here writes to stdout/stderr only; no prompts, since the tool
//! runs unattended in CI.

use console::style;

use crate::boundary::BoundaryWarning;

/// Format an error message with a red label.
pub fn format_error(message: &str) -> String {
    format!("{} {}", style("ERROR:").red(), message)
}

/// Format a success message with a green checkmark.
pub fn format_success(message: &str) -> String {
    format!("{} {}", style("✓").green(), message)
}

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{}", format_error(message));
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{}", format_success(message));
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Render the `git push` output captured from a failed push.
pub fn format_push_streams(stdout: &str, stderr: &str) -> String {
    let mut out = String::new();
    if !stdout.trim().is_empty() {
        out.push_str(&format!("stdout:\n{}\n", stdout.trim_end()));
    }
    if !stderr.trim().is_empty() {
        out.push_str(&format!("stderr:\n{}\n", stderr.trim_end()));
    }
    if out.is_empty() {
        out.push_str("(no output captured)\n");
    }
    out
}
