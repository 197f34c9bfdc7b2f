//! Pattern analysis over categorized URLs
//!
//! Produces per-category counts and percentages, handle naming-pattern
//! buckets, host distribution and the set of duplicate URLs.

mod naming;
mod report;

pub use naming::{naming_patterns, BucketStat, NamingBucket, NamingStats};
pub use report::{
    count_and_percentage, detect_duplicates, host_distribution, CategoryBreakdown,
    CategoryShare, CategoryStats, PatternAnalyzer, PatternReport,
};
