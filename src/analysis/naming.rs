/// Handle naming-pattern statistics
///
/// A handle is the last non-empty path segment of a URL
/// (`/products/red-shoe-es1234` has handle `red-shoe-es1234`). Each handle is
/// tested against every bucket independently.
use crate::url::last_path_segment;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

static SKU_LIKE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|[^a-z])[a-z]{1,4}-?[0-9]{2,}").ok());

/// A naming trait a handle may have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingBucket {
    ContainsDigits,
    NoDigits,
    /// Words joined with `-` and no `_`
    HyphenSeparated,
    ContainsUnderscore,
    /// A short letter code followed by a number, such as `es1234` or `ah-200`
    SkuLike,
}

impl NamingBucket {
    pub const ALL: [NamingBucket; 5] = [
        Self::ContainsDigits,
        Self::NoDigits,
        Self::HyphenSeparated,
        Self::ContainsUnderscore,
        Self::SkuLike,
    ];

    /// Returns true if the handle belongs to this bucket
    pub fn matches(&self, handle: &str) -> bool {
        match self {
            Self::ContainsDigits => handle.chars().any(|c| c.is_ascii_digit()),
            Self::NoDigits => !handle.chars().any(|c| c.is_ascii_digit()),
            Self::HyphenSeparated => handle.contains('-') && !handle.contains('_'),
            Self::ContainsUnderscore => handle.contains('_'),
            Self::SkuLike => SKU_LIKE
                .as_ref()
                .map(|regex| regex.is_match(handle))
                .unwrap_or(false),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ContainsDigits => "Contains digits",
            Self::NoDigits => "No digits",
            Self::HyphenSeparated => "Hyphen separated",
            Self::ContainsUnderscore => "Contains underscore",
            Self::SkuLike => "SKU-like code",
        }
    }
}

impl fmt::Display for NamingBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Count and share of sampled handles in one bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BucketStat {
    pub count: usize,
    /// `count / sampled`, 0.0 when nothing was sampled
    pub fraction: f64,
}

/// Naming-pattern statistics over a list of URLs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamingStats {
    /// Number of URLs that had a handle at all
    pub sampled: usize,
    pub buckets: BTreeMap<NamingBucket, BucketStat>,
}

impl NamingStats {
    pub fn get(&self, bucket: NamingBucket) -> BucketStat {
        self.buckets.get(&bucket).copied().unwrap_or(BucketStat {
            count: 0,
            fraction: 0.0,
        })
    }
}

/// Computes naming-pattern statistics for the handles of `urls`
///
/// URLs without a handle (the site root) are not sampled.
pub fn naming_patterns<'a, I>(urls: I) -> NamingStats
where
    I: IntoIterator<Item = &'a str>,
{
    let mut sampled = 0usize;
    let mut counts: BTreeMap<NamingBucket, usize> =
        NamingBucket::ALL.iter().map(|b| (*b, 0)).collect();

    for handle in urls.into_iter().filter_map(last_path_segment) {
        sampled += 1;
        for bucket in NamingBucket::ALL {
            if bucket.matches(&handle) {
                *counts.entry(bucket).or_insert(0) += 1;
            }
        }
    }

    let buckets = counts
        .into_iter()
        .map(|(bucket, count)| {
            let fraction = if sampled == 0 {
                0.0
            } else {
                count as f64 / sampled as f64
            };
            (bucket, BucketStat { count, fraction })
        })
        .collect();

    NamingStats { sampled, buckets }
}
