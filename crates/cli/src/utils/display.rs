//! Display utilities for the OATH CLI

use colored::Colorize;

/// Format a section header
pub fn section_title(title: &str) -> String {
    format!("\n{}", title.bold().underline())
}

/// Format a success message
pub fn success(message: &str) -> String {
    format!("✅ {}", message.green().bold())
}

/// Format a warning message
pub fn warning(message: &str) -> String {
    format!("⚠️  {}", message.yellow().bold())
}

/// Format a key-value section
pub fn key_value_box(title: &str, items: Vec<(&str, String)>) -> String {
    let mut result = format!("{}", title.bold().underline());

    for (key, value) in items {
        result.push_str(&format!("\n  {}: {}", key.bold(), value));
    }

    result
}

/// Format a code, or a placeholder when the card withheld it
pub fn code(code: Option<&str>) -> String {
    match code {
        Some(code) => code.cyan().bold().to_string(),
        None => "[requires calculate]".dimmed().to_string(),
    }
}
