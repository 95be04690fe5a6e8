//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "warning".yellow(), msg);
}

/// Print success status (green check)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("[{}] {}", "✔".green(), msg);
}

/// Print stopped/failed status (red cross)
pub fn failure(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("[{}] {}", "✘".red(), msg);
}

/// Print completed action with a bold subject
pub fn action(label: &str, subject: &(impl std::fmt::Display + ?Sized)) {
    success(&format!("{}: {}", label, subject.to_string().bold()));
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}
