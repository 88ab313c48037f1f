// Core algorithm exports
pub mod analytics;
pub mod calendar;
pub mod error;
pub mod filters;
pub mod matcher;
pub mod ranking;

pub use analytics::{Aggregator, AnalyticsConfig, SectorStats, StatisticsSnapshot};
pub use calendar::{bucket_by_month, trailing_window, MonthKey, SeriesPoint, WINDOW_MONTHS};
pub use error::CoreError;
pub use filters::{is_eligible, matches_availability, matches_gender_preference, matches_sector};
pub use matcher::{MatchResult, Matcher, RankedCaregiver};
pub use ranking::{compare_candidates, rank};
