// Output formatting and styling

use colored::Colorize;

/// Output styling configuration
pub struct OutputStyle {
    pub use_colors: bool,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

impl OutputStyle {
    pub fn plain() -> Self {
        Self { use_colors: false }
    }

    /// Format error message
    pub fn error(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✗".red().bold(), msg)
        } else {
            format!("✗ {}", msg)
        }
    }

    /// Format info message
    pub fn info(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "ℹ".blue(), msg)
        } else {
            format!("ℹ {}", msg)
        }
    }

    /// Render flattened text with visible line breaks and a highlighted caret
    pub fn flattened(&self, text: &str) -> String {
        let visible = text.replace('\r', "\\r").replace('\n', "\\n\n");
        if self.use_colors {
            visible.replace(
                quill_completion::CURSOR_MARKER,
                &quill_completion::CURSOR_MARKER.magenta().bold().to_string(),
            )
        } else {
            visible
        }
    }

    /// Format a completion suggestion the way an editor would ghost it
    pub fn suggestion(&self, text: &str) -> String {
        if self.use_colors {
            text.dimmed().italic().to_string()
        } else {
            text.to_string()
        }
    }

    /// Format a key-value pair
    pub fn key_value(&self, key: &str, value: &str) -> String {
        if self.use_colors {
            format!("  {}: {}", key.bold(), value)
        } else {
            format!("  {}: {}", key, value)
        }
    }
}

pub fn print_error(msg: &str) {
    let style = OutputStyle::default();
    eprintln!("{}", style.error(msg));
}

pub fn print_info(msg: &str) {
    let style = OutputStyle::default();
    println!("{}", style.info(msg));
}
