// Output formatting and styling

use std::io::IsTerminal;

use colored::Colorize;

/// Output styling configuration
pub struct OutputStyle {
    pub use_colors: bool,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            use_colors: std::io::stdout().is_terminal(),
        }
    }
}

impl OutputStyle {
    /// Format success message
    pub fn success(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✓".green().bold(), msg)
        } else {
            format!("✓ {}", msg)
        }
    }

    /// Format error message
    pub fn error(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✗".red().bold(), msg)
        } else {
            format!("✗ {}", msg)
        }
    }

    /// Format skipped-item message
    pub fn skipped(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "-".yellow().bold(), msg)
        } else {
            format!("- {}", msg)
        }
    }
}

/// Print success message
pub fn print_success(msg: &str) {
    println!("{}", OutputStyle::default().success(msg));
}

/// Print error message to stderr
pub fn print_error(msg: &str) {
    eprintln!("{}", OutputStyle::default().error(msg));
}

/// Print skipped-item message
pub fn print_skipped(msg: &str) {
    println!("{}", OutputStyle::default().skipped(msg));
}
