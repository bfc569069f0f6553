pub mod executor;
pub mod schedule;
