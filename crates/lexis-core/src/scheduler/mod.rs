//! Word scheduling.
//!
//! Picks the next word a learner sees, builds answer options, and records
//! answers with their next review time.

mod interval;
mod study;

pub use interval::{next_review_time, review_delay};
pub use study::Scheduler;
