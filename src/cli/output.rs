//! Output formatting for CLI commands

use serde::Serialize;

/// Output context for consistent formatting across commands
///
/// Every command writes exactly one JSON document to stdout; diagnostics go
/// to stderr through tracing.
#[derive(Debug, Clone, Copy)]
pub struct OutputContext {
    pretty: bool,
}

impl OutputContext {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// One JSON value per line, for line-oriented consumers
    pub fn compact() -> Self {
        Self { pretty: false }
    }

    pub fn render<T: Serialize>(&self, data: &T) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(data)
        } else {
            serde_json::to_string(data)
        };
        rendered.unwrap_or_else(|e| error_json(&format!("Failed to serialize output: {e}")))
    }

    pub fn print<T: Serialize>(&self, data: &T) {
        println!("{}", self.render(data));
    }

    /// Print an `{"error": ...}` document
    pub fn print_error(&self, message: &str) {
        self.print(&serde_json::json!({ "error": message }));
    }
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}
