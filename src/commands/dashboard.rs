use std::time::Duration;

use serde::Serialize;

use crate::analyzer::indicators::{
    agent_rows, conversion_funnel, kpi_cards, model_conversion_tone, top_agents, AgentRow,
    FunnelStage, KpiCard, Tone,
};
use crate::loader::{load_from_source, DashboardData, QuotedModel};
use crate::state::{AppState, LoadStatus, SessionAccess};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub data: DashboardData,
    pub load_status: Option<LoadStatus>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotedModelRow {
    #[serde(flatten)]
    pub model: QuotedModel,
    pub tone: Tone,
}

/// Loads the four resources from the configured source and replaces the
/// session's read model. Never fails on a bad source: the fallback dataset
/// comes back with a `fallback` status instead.
pub async fn refresh_dashboard(state: &AppState) -> Result<DashboardResponse, String> {
    let (source, timeout) = state.session(|s| {
        Ok((
            s.config.data_source.clone(),
            Duration::from_secs(s.config.load_timeout_secs),
        ))
    })?;

    let outcome = load_from_source(&source, timeout).await;

    state.session_mut(|s| {
        let data = s.replace_data(outcome);
        Ok(DashboardResponse {
            data: data.as_ref().clone(),
            load_status: s.load_status.clone(),
        })
    })
}

pub fn get_dashboard(state: &AppState) -> Result<DashboardResponse, String> {
    state.session(|s| {
        Ok(DashboardResponse {
            data: s.data()?.as_ref().clone(),
            load_status: s.load_status.clone(),
        })
    })
}

pub fn get_kpi_cards(state: &AppState) -> Result<Vec<KpiCard>, String> {
    state.session(|s| Ok(kpi_cards(&s.data()?.kpis, &s.config)))
}

pub fn get_conversion_funnel(state: &AppState) -> Result<Vec<FunnelStage>, String> {
    state.session(|s| Ok(conversion_funnel(&s.data()?.kpis)))
}

/// Agent table rows; `limit` keeps the first N in source order.
pub fn get_agent_rows(state: &AppState, limit: Option<usize>) -> Result<Vec<AgentRow>, String> {
    state.session(|s| {
        let agents = &s.data()?.agents;
        let agents = match limit {
            Some(n) => top_agents(agents, n),
            None => agents.as_slice(),
        };
        Ok(agent_rows(agents, &s.config))
    })
}

pub fn get_quoted_models(state: &AppState) -> Result<Vec<QuotedModelRow>, String> {
    state.session(|s| {
        Ok(s.data()?
            .quoted_models
            .iter()
            .map(|m| QuotedModelRow {
                model: m.clone(),
                tone: model_conversion_tone(m, &s.config),
            })
            .collect())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, DataSource};
    use crate::loader::fallback_dataset;

    fn state_for(dir: &std::path::Path) -> AppState {
        AppState::new(AppConfig {
            data_source: DataSource::Directory {
                path: dir.to_path_buf(),
            },
            ..AppConfig::default()
        })
    }

    /// GIVEN an empty data directory
    /// WHEN the dashboard is refreshed
    /// THEN the fallback literal is served with a fallback status
    #[tokio::test]
    async fn test_refresh_from_empty_dir_serves_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(dir.path());

        let resp = refresh_dashboard(&state).await.unwrap();
        assert_eq!(resp.data, fallback_dataset());
        assert!(matches!(resp.load_status, Some(LoadStatus::Fallback { .. })));

        let cards = get_kpi_cards(&state).unwrap();
        assert_eq!(cards.len(), 15);
        assert!(get_agent_rows(&state, None).unwrap().is_empty());
    }

    #[test]
    fn test_queries_before_refresh_fail() {
        let state = AppState::default();
        assert!(get_dashboard(&state).is_err());
        assert!(get_conversion_funnel(&state).is_err());
        assert!(get_quoted_models(&state).is_err());
    }

    #[tokio::test]
    async fn test_agent_rows_limit() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("kpis_calculados.json"),
            r#"{"total_ligacoes": 10}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("agentes_consolidados.json"),
            r#"[{"nome": "A", "ligacoes": 5, "chats": 0, "csat": 4.9, "performance": 90},
                {"nome": "B", "ligacoes": 4, "chats": 2, "csat": "N/A", "performance": 50}]"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("atendimentos_diarios.json"), "[]").unwrap();
        std::fs::write(
            dir.path().join("mais_cotados.json"),
            r#"[{"modelo": "X", "vendidos": 10, "conversao": 1, "percentual": 10.0}]"#,
        )
        .unwrap();
        let state = state_for(dir.path());

        let resp = refresh_dashboard(&state).await.unwrap();
        assert_eq!(resp.load_status, Some(LoadStatus::Loaded));

        let rows = get_agent_rows(&state, Some(1)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "A");

        let models = get_quoted_models(&state).unwrap();
        assert_eq!(models[0].tone, Tone::Danger);
    }
}
