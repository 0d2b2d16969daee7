pub mod stats;

pub use stats::{CachedStats, StatsInvalidator, StatsService};
