pub mod calculator;
pub mod stats;

pub use calculator::{StatsInput, compute_library_statistics, compute_statistics};
pub use stats::{DistributionBucket, MonthlyBucket, RankedEntry, StatsBundle};
