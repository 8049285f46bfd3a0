//! Terminal progress output
//!
//! Prints the banner, per-iteration headers, task verdicts and the final
//! summary of a run.

use crate::models::{RunFlags, RunSummary, Seed, TaskRecord, WorkloadSelection};

use super::formatter::{Color, OutputFormat, ResultFormatter};

/// Writes run progress to stdout
#[derive(Clone, Debug)]
pub struct Console {
    formatter: ResultFormatter,
    progress: bool,
    summary: bool,
}

impl Console {
    pub fn new(formatter: ResultFormatter) -> Self {
        // Machine-readable summaries should not be mixed with progress lines
        let progress = formatter.format() == OutputFormat::Table;
        Self {
            formatter,
            progress,
            summary: true,
        }
    }

    /// Print nothing at all
    pub fn silent() -> Self {
        Self {
            formatter: ResultFormatter::default().no_color(),
            progress: false,
            summary: false,
        }
    }

    /// Only print the final summary
    pub fn quiet(mut self, quiet: bool) -> Self {
        if quiet {
            self.progress = false;
        }
        self
    }

    fn line(&self, text: String) {
        if self.progress {
            println!("{text}");
        }
    }

    /// Banner, selected workloads and run configuration
    pub fn pre_exec(&self, workloads: &WorkloadSelection, flags: RunFlags) {
        let f = &self.formatter;
        self.line(f.separator());
        self.line(f.centered("W o r k l o a d - R u n n e r", true, Color::Cyan));
        self.line(f.separator());
        self.line(f.centered("TEST STARTED", false, Color::Cyan));
        self.line(f.centered("Now running...", false, Color::Default));

        for workload in workloads {
            self.line(f.centered(&format!("> {workload} <"), false, Color::Default));
        }

        let seed_line = if flags.is_random {
            "Test started with a random seed"
        } else {
            "Test started with a user-defined seed"
        };
        self.line(f.centered(seed_line, false, Color::Default));

        let mode_line = if flags.is_iter {
            "Test will run based on input iterations"
        } else {
            "Test will run based on input runtime"
        };
        self.line(f.centered(mode_line, false, Color::Default));
    }

    pub fn iteration_header(&self, iteration: u32, total: u32, seed: Seed) {
        let f = &self.formatter;
        self.line(f.separator());
        self.line(f.centered(&format!("Seed: {seed}"), false, Color::Default));
        self.line(f.centered(
            &format!("Iteration {iteration} of {total}"),
            false,
            Color::Default,
        ));
    }

    pub fn time_header(&self, remaining_secs: f64, total_secs: f64, seed: Seed) {
        let f = &self.formatter;
        self.line(f.separator());
        self.line(f.centered(&format!("Seed: {seed}"), false, Color::Default));
        self.line(f.format_time_left(remaining_secs, total_secs));
    }

    /// Verdict of a task, with its log paths when it failed
    pub fn task(&self, iteration: u32, task: &TaskRecord) {
        let f = &self.formatter;
        if let Some(err) = &task.error {
            self.line(f.format_error(err));
        }
        self.line(f.format_task(iteration, task));

        if task.passed {
            return;
        }
        if let Some(path) = task.stdout_path.as_ref().filter(|p| p.exists()) {
            self.line(f.centered(
                &format!("Path to output log: {}", path.display()),
                false,
                Color::Red,
            ));
        }
        if let Some(path) = task.stderr_path.as_ref().filter(|p| p.exists()) {
            self.line(f.centered(
                &format!("Path to error log: {}", path.display()),
                false,
                Color::Red,
            ));
        }
    }

    pub fn summary(&self, summary: &RunSummary) {
        if self.summary {
            println!("{}", self.formatter.format_summary(summary));
        }
    }
}
