//! Per-mode body composers.

pub mod latency;
pub mod queue_pairs;
pub mod wqe_sizes;
