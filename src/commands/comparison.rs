use crate::analyzer::comparison::{compare_snapshots, AggregateSnapshot, ComparisonState};
use crate::loader::DashboardData;
use crate::state::{AppState, SessionAccess};

/// Compares two period snapshots. A missing side yields the
/// "not available" state rather than an error.
pub fn compare_periods(
    state: &AppState,
    current: Option<AggregateSnapshot>,
    previous: Option<AggregateSnapshot>,
) -> Result<ComparisonState, String> {
    let threshold = state.session(|s| Ok(s.config.insight_threshold_pct))?;
    Ok(compare_snapshots(
        current.as_ref(),
        previous.as_ref(),
        threshold,
    ))
}

/// Compares the loaded period against a previous one.
pub fn compare_with_loaded(
    state: &AppState,
    previous: Option<AggregateSnapshot>,
) -> Result<ComparisonState, String> {
    state.session(|s| {
        let current = s.data.as_ref().map(|d| AggregateSnapshot::from_kpis(&d.kpis));
        Ok(compare_snapshots(
            current.as_ref(),
            previous.as_ref(),
            s.config.insight_threshold_pct,
        ))
    })
}

/// Compares two full read models by their KPI summaries.
pub fn compare_datasets(
    state: &AppState,
    current: &DashboardData,
    previous: &DashboardData,
) -> Result<ComparisonState, String> {
    compare_periods(
        state,
        Some(AggregateSnapshot::from_kpis(&current.kpis)),
        Some(AggregateSnapshot::from_kpis(&previous.kpis)),
    )
}
