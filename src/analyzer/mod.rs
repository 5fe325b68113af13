pub mod comparison;
pub mod indicators;
pub mod stats;

pub use comparison::{
    compare_snapshots, AggregateSnapshot, Comparison, ComparisonMetric, ComparisonState, Insight,
};
pub use indicators::{agent_rows, conversion_funnel, kpi_cards, Tone};
