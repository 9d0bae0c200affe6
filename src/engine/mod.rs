pub mod pipeline;
pub mod schedule;
