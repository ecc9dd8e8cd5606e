//! LIX scoring, outlier rejection and aggregation.

mod aggregate;
mod outlier;
mod score;

pub use aggregate::{
    Analysis, AnalysisStats, ItemStats, ScoredItem, SkipReason, SkippedItem, aggregate,
    natural_cmp,
};
pub use outlier::{DEFAULT_DEVIATION_CAP, OutlierSplit, filter_outliers, mean, median, std_dev};
pub use score::{ContentStats, find_lix_in_text, is_colophon, lix};
