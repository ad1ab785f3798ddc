//! tally-core: standard transaction schema and monthly aggregation logic.

pub mod classify;
pub mod combine;
pub mod filter;
pub mod metrics;
pub mod pipeline;
pub mod spending;
pub mod summary;
pub mod transaction;

pub use classify::{Classifier, classify_in_batches};
pub use combine::{CombinedMonthlyMetric, combine_sources};
pub use filter::filter_date_range;
pub use metrics::{MonthlyMetric, aggregate_monthly};
pub use pipeline::normalize;
pub use spending::{CategoryTotal, FALLBACK_CATEGORY, expense_by_category, top_expenses};
pub use summary::{Summary, summarize};
pub use transaction::{Transaction, YearMonth};
