//! Terminal feedback for a resolution run: status lines on stderr and a
//! spinner while the tree is being walked.

use std::io::Write;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

/// Width the status label is right-aligned to.
const LABEL_WIDTH: usize = 12;

/// `   Resolving github.com/etcd-io/etcd v3.6.0-rc.0`, `    Resolved 412 modules ...`
pub fn status(label: &str, message: &str) {
    emit(&status_line(&Style::new().green().bold().for_stderr(), label, message));
}

/// Same layout with a yellow label, used for `Degraded` summaries.
pub fn status_warn(label: &str, message: &str) {
    emit(&status_line(&Style::new().yellow().bold().for_stderr(), label, message));
}

fn status_line(style: &Style, label: &str, message: &str) -> String {
    format!("{:>width$} {message}", style.apply_to(label), width = LABEL_WIDTH)
}

fn emit(line: &str) {
    let _ = writeln!(std::io::stderr(), "{line}");
}

/// Spinner shown while manifests are fetched. Clear it with
/// [`ProgressBar::finish_and_clear`] before printing the summary.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_is_right_aligned() {
        let line = status_line(&Style::new(), "Resolved", "3 modules");
        assert_eq!(console::strip_ansi_codes(&line), "    Resolved 3 modules");
    }

    #[test]
    fn long_label_is_not_truncated() {
        let line = status_line(&Style::new().yellow(), "Degraded-modules", "2");
        assert_eq!(console::strip_ansi_codes(&line), "Degraded-modules 2");
    }
}
