//! Composition analytics over quarter snapshots and across the panel.

pub mod composition;
pub mod series;

pub use composition::{
    cap_weighted_distribution, category_distribution, concentration, concentration_top_n, hhi,
    summary, top_n_share, top_n_share_by_cap, top_n_share_equal, weighted_shares,
};
pub use series::{
    concentration_series, distinct_category_series, entity_count_series, hhi_series,
    top_n_share_series, total_market_cap_series,
};
