use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::DataSource;
use crate::error::AppError;
use crate::loader::fallback::fallback_dataset;
use crate::loader::fetch::{DirectoryFetcher, HttpFetcher, ResourceFetcher};
use crate::loader::types::{AgentRecord, DailyCalls, DashboardData, KpiSummary, QuotedModel};

pub const KPIS_RESOURCE: &str = "kpis_calculados.json";
pub const AGENTS_RESOURCE: &str = "agentes_consolidados.json";
pub const DAILY_CALLS_RESOURCE: &str = "atendimentos_diarios.json";
pub const QUOTED_MODELS_RESOURCE: &str = "mais_cotados.json";

/// Result of one atomic load: either all four resources, or the fallback
/// dataset in full. There is no partial state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum LoadOutcome {
    Loaded { data: DashboardData },
    #[serde(rename_all = "camelCase")]
    Fallback { data: DashboardData, reason: String },
}

impl LoadOutcome {
    pub fn data(&self) -> &DashboardData {
        match self {
            LoadOutcome::Loaded { data } | LoadOutcome::Fallback { data, .. } => data,
        }
    }

    pub fn into_data(self) -> DashboardData {
        match self {
            LoadOutcome::Loaded { data } | LoadOutcome::Fallback { data, .. } => data,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, LoadOutcome::Fallback { .. })
    }

    fn fallback(err: AppError) -> Self {
        log::error!("Dashboard data load failed, using fallback dataset: {}", err);
        LoadOutcome::Fallback {
            data: fallback_dataset(),
            reason: err.to_string(),
        }
    }
}

/// Fetch the four resources concurrently and combine them.
///
/// Any fetch or parse failure, or the timeout expiring, yields the full
/// fallback dataset. Never returns an error.
pub async fn load_dashboard<F: ResourceFetcher>(fetcher: &F, timeout: Duration) -> LoadOutcome {
    let start = Instant::now();
    match tokio::time::timeout(timeout, fetch_all(fetcher)).await {
        Ok(Ok(data)) => {
            log::info!(
                "Dashboard data loaded in {} ms: {} agents, {} days, {} models",
                start.elapsed().as_millis(),
                data.agents.len(),
                data.daily_calls.len(),
                data.quoted_models.len()
            );
            LoadOutcome::Loaded { data }
        }
        Ok(Err(err)) => LoadOutcome::fallback(err),
        Err(_) => LoadOutcome::fallback(AppError::Timeout(timeout.as_secs())),
    }
}

/// Build the fetcher for `source` and load through it.
pub async fn load_from_source(source: &DataSource, timeout: Duration) -> LoadOutcome {
    match source {
        DataSource::Directory { path } => load_dashboard(&DirectoryFetcher::new(path), timeout).await,
        DataSource::Http { base_url } => match HttpFetcher::new(base_url.as_str()) {
            Ok(fetcher) => load_dashboard(&fetcher, timeout).await,
            Err(err) => LoadOutcome::fallback(err),
        },
    }
}

async fn fetch_all<F: ResourceFetcher>(fetcher: &F) -> Result<DashboardData, AppError> {
    let (kpis, agents, daily_calls, quoted_models) = tokio::try_join!(
        fetch_json::<F, KpiSummary>(fetcher, KPIS_RESOURCE),
        fetch_json::<F, Vec<AgentRecord>>(fetcher, AGENTS_RESOURCE),
        fetch_json::<F, Vec<DailyCalls>>(fetcher, DAILY_CALLS_RESOURCE),
        fetch_json::<F, Vec<QuotedModel>>(fetcher, QUOTED_MODELS_RESOURCE),
    )?;
    Ok(DashboardData {
        kpis,
        agents,
        daily_calls,
        quoted_models,
    })
}

async fn fetch_json<F: ResourceFetcher, T: DeserializeOwned>(
    fetcher: &F,
    resource: &str,
) -> Result<T, AppError> {
    let body = fetcher.fetch(resource).await?;
    serde_json::from_str(&body).map_err(|e| AppError::Custom(format!("{resource}: {e}")))
}
