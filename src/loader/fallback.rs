use crate::loader::types::{DashboardData, KpiSummary};

/// Fixed July dataset substituted, as a whole, when any resource fails to load.
/// Agent, daily and quoted-model lists are empty.
pub fn fallback_dataset() -> DashboardData {
    DashboardData {
        kpis: KpiSummary {
            total_calls: 23093,
            calls_handled: 19866,
            handling_rate: 86.0,
            average_csat: 4.4,
            chats_received: 12718,
            chats_finalized: 12707,
            finalization_rate: 99.9,
            active_agents: 44,
            total_quotes: 1250,
            converted_quotes: 188,
            conversion_rate: 15.0,
            out_of_queue_rate: 32.5,
            average_tire_metric: 4.5,
            unanswered: 3227,
            no_answer_rate: 14.0,
            total_employees: None,
        },
        agents: Vec::new(),
        daily_calls: Vec::new(),
        quoted_models: Vec::new(),
    }
}
