//! Output formatters for run results
//!
//! Provides table, JSON and one-line summary formats, plus the centered
//! terminal lines used while a run is in progress.

use crate::models::{RunSummary, TaskRecord};

const RESET: &str = "\x1b[0m";

/// Terminal colours used by the runner
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Default,
    Green,
    Red,
    Cyan,
}

impl Color {
    fn code(self) -> &'static str {
        match self {
            Color::Default => "\x1b[37m",
            Color::Green => "\x1b[32m",
            Color::Red => "\x1b[31m",
            Color::Cyan => "\x1b[36m",
        }
    }
}

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
    Summary,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "summary" => Some(OutputFormat::Summary),
            _ => None,
        }
    }
}

/// Result formatter
#[derive(Clone, Debug)]
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
    width: usize,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
            width: 80,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(20);
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Wrap text in an ANSI colour when colour is enabled
    pub fn paint(&self, text: &str, color: Color) -> String {
        if self.colorize {
            format!("{}{text}{RESET}", color.code())
        } else {
            text.to_string()
        }
    }

    /// Full-width separator line
    pub fn separator(&self) -> String {
        "#".repeat(self.width)
    }

    /// Center text in the terminal width; `fancy` pads with dashes
    pub fn centered(&self, text: &str, fancy: bool, color: Color) -> String {
        let fill = if fancy { '-' } else { ' ' };
        let text_len = text.chars().count() + 2;
        let padded = format!(" {} ", self.paint(text, color));
        if text_len >= self.width {
            return padded;
        }
        let left = (self.width - text_len) / 2;
        let right = self.width - text_len - left;
        let mut line = fill.to_string().repeat(left);
        line.push_str(&padded);
        if fancy {
            line.push_str(&fill.to_string().repeat(right));
        }
        line
    }

    /// Verdict line of one task
    pub fn format_task(&self, iteration: u32, task: &TaskRecord) -> String {
        if task.passed {
            self.centered(
                &format!("{iteration} {}: PASSED!", task.attribute),
                false,
                Color::Green,
            )
        } else {
            self.centered(
                &format!("<{iteration}> {}: FAILED!", task.attribute),
                false,
                Color::Red,
            )
        }
    }

    /// Error line, upper-cased
    pub fn format_error(&self, text: &str) -> String {
        self.centered(&text.to_uppercase(), false, Color::Red)
    }

    /// Remaining time line; overruns are highlighted
    pub fn format_time_left(&self, remaining_secs: f64, total_secs: f64) -> String {
        let remaining = format!("{remaining_secs:.2}");
        let remaining = if remaining_secs < 0.0 {
            self.paint(&remaining, Color::Red)
        } else {
            remaining
        };
        self.centered(
            &format!("Time remaining: {remaining} of {total_secs} seconds"),
            false,
            Color::Default,
        )
    }

    /// Format the final summary
    pub fn format_summary(&self, summary: &RunSummary) -> String {
        match self.format {
            OutputFormat::Table => self.format_summary_table(summary),
            OutputFormat::Json => serde_json::to_string(summary).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(summary).unwrap_or_default(),
            OutputFormat::Summary => self.format_summary_brief(summary),
        }
    }

    fn format_summary_table(&self, summary: &RunSummary) -> String {
        let mut lines = vec![
            self.separator(),
            self.centered("TEST ENDED", false, Color::Cyan),
        ];
        for line in summary.to_string().lines() {
            lines.push(self.centered(line, false, Color::Default));
        }

        if summary.tasks_failed > 0 {
            lines.push(self.centered(
                &format!("Pass rate: {:.1}%", summary.pass_rate()),
                false,
                Color::Red,
            ));
        }
        lines.push(self.separator());
        lines.join("\n")
    }

    fn format_summary_brief(&self, summary: &RunSummary) -> String {
        format!(
            "{} iterations, {}/{} tasks passed ({} failed) in {:.2}s",
            summary.iterations,
            summary.tasks_passed,
            summary.tasks_run,
            summary.tasks_failed,
            summary.total_elapsed_secs
        )
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RunTotals, WorkloadId};
    use std::time::Duration;

    fn summary() -> RunSummary {
        let mut totals = RunTotals::new();
        totals.record(true);
        totals.record(false);
        totals.complete_iteration();
        totals.summary(Duration::from_millis(2500))
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("TABLE"), Some(OutputFormat::Table));
        assert_eq!(OutputFormat::from_str("csv"), None);
    }

    #[test]
    fn test_formatter_creation() {
        let formatter = ResultFormatter::new(OutputFormat::Json).no_color();
        assert_eq!(formatter.format, OutputFormat::Json);
        assert!(!formatter.colorize);
    }

    #[test]
    fn test_centered_width() {
        let formatter = ResultFormatter::default().no_color().with_width(40);
        let line = formatter.centered("abc", true, Color::Cyan);
        assert_eq!(line.chars().count(), 40);
        assert!(line.starts_with('-'));
        assert!(line.contains(" abc "));
    }

    #[test]
    fn test_paint() {
        let formatter = ResultFormatter::default();
        assert_eq!(formatter.paint("ok", Color::Green), "\x1b[32mok\x1b[0m");
        assert_eq!(formatter.no_color().paint("ok", Color::Green), "ok");
    }

    #[test]
    fn test_format_task() {
        let formatter = ResultFormatter::default().no_color();
        let mut task = TaskRecord::new(WorkloadId::Workload1, "wl_1");
        assert!(formatter.format_task(4, &task).contains("<4> wl_1: FAILED!"));
        task.passed = true;
        assert!(formatter.format_task(4, &task).contains("4 wl_1: PASSED!"));
    }

    #[test]
    fn test_format_summary_table() {
        let output = ResultFormatter::default().no_color().format_summary(&summary());
        assert!(output.contains("TEST ENDED"));
        assert!(output.contains("Total runtime: 2.50 seconds"));
        assert!(output.contains("Total iterations: 1"));
        assert!(output.contains("Total tasks: 2"));
        assert!(output.contains("Passed: 1"));
        assert!(output.contains("Failed: 1"));
    }

    #[test]
    fn test_format_summary_json() {
        let output = ResultFormatter::new(OutputFormat::Json).format_summary(&summary());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["tasks_run"], 2);
        assert_eq!(value["tasks_failed"], 1);
    }

    #[test]
    fn test_format_summary_brief() {
        let output = ResultFormatter::new(OutputFormat::Summary).format_summary(&summary());
        assert_eq!(output, "1 iterations, 1/2 tasks passed (1 failed) in 2.50s");
    }

    #[test]
    fn test_negative_time_left() {
        let formatter = ResultFormatter::default();
        let line = formatter.format_time_left(-1.5, 10.0);
        assert!(line.contains("\x1b[31m-1.50\x1b[0m"));
    }
}
