//! Iteration control loop
//!
//! Drives a run iteration by iteration, either for a fixed count or for as
//! long as a time budget allows, and keeps the running totals.

use anyhow::Result;
use std::time::Duration;
use tracing::{debug, info};

use super::dispatcher::Dispatcher;
use super::seed::SeedSequence;
use crate::models::{RunFlags, RunMode, RunReport, RunTotals, Seed};
use crate::output::Console;
use crate::utils::timer::{TimeBudget, Timer};

/// Regression run controller
pub struct IterationController {
    dispatcher: Dispatcher,
    seeds: SeedSequence,
    mode: RunMode,
    start_seed: Option<Seed>,
    console: Console,
}

/// Seed bookkeeping carried from one iteration to the next
struct RunState {
    seed: Seed,
    totals: RunTotals,
    history: Vec<Seed>,
}

impl IterationController {
    /// Create a controller; the start seed is drawn at random unless set
    pub fn new(dispatcher: Dispatcher, seeds: SeedSequence, mode: RunMode) -> Self {
        Self {
            dispatcher,
            seeds,
            mode,
            start_seed: None,
            console: Console::silent(),
        }
    }

    /// Start from a caller-supplied seed
    pub fn with_seed(mut self, seed: Option<Seed>) -> Self {
        self.start_seed = seed;
        self
    }

    pub fn with_console(mut self, console: Console) -> Self {
        self.console = console;
        self
    }

    pub fn flags(&self) -> RunFlags {
        RunFlags::new(&self.mode, self.start_seed)
    }

    /// Run until the mode's termination condition is met
    pub async fn run(&self) -> Result<RunReport> {
        self.dispatcher.sinks().ensure_root().await?;

        let flags = self.flags();
        self.console.pre_exec(&self.dispatcher.selection(), flags);

        let start_seed = self
            .start_seed
            .unwrap_or_else(|| self.seeds.draw_initial());

        info!(
            "Starting run of {} workload(s) for {} from seed {}{}",
            self.dispatcher.selection().len(),
            self.mode,
            start_seed,
            if flags.is_random { " (random)" } else { "" }
        );

        let timer = Timer::start("run");
        let mut state = RunState {
            seed: start_seed,
            totals: RunTotals::new(),
            history: Vec::new(),
        };

        match self.mode {
            RunMode::IterationBound(count) => {
                for iteration in 1..=count {
                    self.console.iteration_header(iteration, count, state.seed);
                    self.step(iteration, &mut state).await;
                }
            }
            RunMode::TimeBound(total) => {
                let budget = TimeBudget::start(total);
                let mut iteration = 0;
                let mut last_iteration = Duration::ZERO;

                while budget.allows(last_iteration) {
                    iteration += 1;
                    self.console.time_header(
                        budget.remaining_secs(),
                        total.as_secs_f64(),
                        state.seed,
                    );

                    let iteration_timer = Timer::start(format!("iteration {iteration}"));
                    self.step(iteration, &mut state).await;
                    last_iteration = iteration_timer.stop();
                }
            }
        }

        let summary = state.totals.summary(timer.stop());
        info!(
            "Run completed in {:.2}s - {} iterations, {}/{} tasks passed",
            summary.total_elapsed_secs, summary.iterations, summary.tasks_passed, summary.tasks_run
        );
        self.console.summary(&summary);

        Ok(RunReport {
            summary,
            start_seed,
            is_random: flags.is_random,
            seeds: state.history,
        })
    }

    /// One iteration: dispatch, record verdicts, advance the seed
    async fn step(&self, iteration: u32, state: &mut RunState) {
        state.history.push(state.seed);

        let record = self.dispatcher.run_iteration(iteration, state.seed).await;
        for task in &record.tasks {
            self.console.task(iteration, task);
        }

        state.totals.absorb(&record);

        info!(
            "Iteration {} (seed {}): {}/{} passed",
            iteration,
            state.seed,
            record.passed(),
            record.tasks.len()
        );
        debug!("Verdicts for seed {}: {:?}", state.seed, record.verdicts());

        state.seed = self.seeds.advance(state.seed);
    }
}
