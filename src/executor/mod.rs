//! Run execution engine
//!
//! Seed sequencing, parallel dispatch of one iteration, and the iteration
//! control loop.

mod controller;
mod dispatcher;
#[cfg(test)]
mod fake;
mod seed;

pub use controller::IterationController;
pub use dispatcher::Dispatcher;
pub use seed::{SeedSequence, DEFAULT_SEED_HIGH, DEFAULT_SEED_LOW};
