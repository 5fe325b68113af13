//! Threshold-based status of the KPI cards, agent rows and conversion funnel.

use serde::Serialize;

use super::stats::{mean, round1, share_pct};
use crate::config::AppConfig;
use crate::loader::types::{AgentRecord, CsatScore, KpiSummary, QuotedModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Tone {
    Success,
    Warning,
    Danger,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Polarity {
    HigherIsBetter,
    LowerIsBetter,
}

/// Success when the value meets the threshold on the good side (inclusive),
/// Danger otherwise, Neutral when there is no threshold.
pub fn tone_for(value: f64, threshold: Option<f64>, polarity: Polarity) -> Tone {
    let Some(threshold) = threshold else {
        return Tone::Neutral;
    };
    let ok = match polarity {
        Polarity::HigherIsBetter => value >= threshold,
        Polarity::LowerIsBetter => value <= threshold,
    };
    if ok {
        Tone::Success
    } else {
        Tone::Danger
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiCard {
    pub key: &'static str,
    pub label: &'static str,
    pub value: f64,
    pub is_percentage: bool,
    pub threshold: Option<f64>,
    pub polarity: Polarity,
    pub tone: Tone,
}

/// The overview cards, in display order.
pub fn kpi_cards(kpis: &KpiSummary, config: &AppConfig) -> Vec<KpiCard> {
    use Polarity::{HigherIsBetter, LowerIsBetter};

    let cards: [(&'static str, &'static str, f64, bool, Option<f64>, Polarity); 15] = [
        ("total_ligacoes", "Total de Ligações", kpis.total_calls as f64, false, None, HigherIsBetter),
        ("ligacoes_atendidas", "Ligações Atendidas", kpis.calls_handled as f64, false, None, HigherIsBetter),
        (
            "taxa_atendimento",
            "Taxa de Atendimento",
            kpis.handling_rate,
            true,
            Some(config.handling_rate_target),
            HigherIsBetter,
        ),
        ("csat_medio", "CSAT Médio", kpis.average_csat, false, Some(config.csat_target), HigherIsBetter),
        ("chats_recebidos", "Chats Recebidos", kpis.chats_received as f64, false, None, HigherIsBetter),
        ("chats_finalizados", "Chats Finalizados", kpis.chats_finalized as f64, false, None, HigherIsBetter),
        (
            "taxa_finalizacao",
            "Taxa Finalização",
            kpis.finalization_rate,
            true,
            Some(config.finalization_rate_target),
            HigherIsBetter,
        ),
        ("agentes_ativos", "Agentes Ativos", kpis.active_agents as f64, false, None, HigherIsBetter),
        ("total_orcamentos", "Total Orçamentos", kpis.total_quotes as f64, false, None, HigherIsBetter),
        (
            "orcamentos_convertidos",
            "Orçamentos Convertidos",
            kpis.converted_quotes as f64,
            false,
            None,
            HigherIsBetter,
        ),
        (
            "percentual_convertidos",
            "% Orçamentos Convertidos",
            kpis.conversion_rate,
            true,
            Some(config.conversion_rate_target),
            HigherIsBetter,
        ),
        (
            "percentual_fora_fila",
            "% Fora da Fila",
            kpis.out_of_queue_rate,
            true,
            Some(config.out_of_queue_rate_limit),
            LowerIsBetter,
        ),
        (
            "media_pneu",
            "Média de Pneu",
            kpis.average_tire_metric,
            false,
            Some(config.tire_metric_target),
            HigherIsBetter,
        ),
        ("sem_resposta", "Sem Resposta", kpis.unanswered as f64, false, None, HigherIsBetter),
        (
            "taxa_nao_resposta",
            "Taxa Não Resposta",
            kpis.no_answer_rate,
            true,
            Some(config.no_answer_rate_limit),
            LowerIsBetter,
        ),
    ];

    cards
        .into_iter()
        .map(|(key, label, value, is_percentage, threshold, polarity)| KpiCard {
            key,
            label,
            value,
            is_percentage,
            threshold,
            polarity,
            tone: tone_for(value, threshold, polarity),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelStage {
    pub name: &'static str,
    pub value: u64,
    /// Share of the first stage, rounded to one decimal.
    pub percent_of_first: f64,
}

/// Contacts → handled calls → chats received → chats finalized.
/// The first stage is always 100%; later stages are 0% when the first is 0.
pub fn conversion_funnel(kpis: &KpiSummary) -> Vec<FunnelStage> {
    let stages = [
        ("Contatos Totais", kpis.total_calls),
        ("Ligações Atendidas", kpis.calls_handled),
        ("Chats Recebidos", kpis.chats_received),
        ("Chats Finalizados", kpis.chats_finalized),
    ];
    let first = stages[0].1 as f64;
    stages
        .iter()
        .enumerate()
        .map(|(i, &(name, value))| FunnelStage {
            name,
            value,
            percent_of_first: if i == 0 {
                100.0
            } else {
                round1(share_pct(value as f64, first))
            },
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PerformanceTier {
    High,
    Medium,
    Low,
}

impl PerformanceTier {
    pub fn tone(&self) -> Tone {
        match self {
            PerformanceTier::High => Tone::Success,
            PerformanceTier::Medium => Tone::Warning,
            PerformanceTier::Low => Tone::Danger,
        }
    }
}

pub fn performance_tier(performance: f64, config: &AppConfig) -> PerformanceTier {
    if performance >= config.agent_performance_good {
        PerformanceTier::High
    } else if performance >= config.agent_performance_fair {
        PerformanceTier::Medium
    } else {
        PerformanceTier::Low
    }
}

/// "N/A" scores are neutral.
pub fn agent_csat_tone(csat: CsatScore, config: &AppConfig) -> Tone {
    match csat {
        CsatScore::Score(v) => tone_for(v, Some(config.agent_csat_target), Polarity::HigherIsBetter),
        CsatScore::NotApplicable => Tone::Neutral,
    }
}

/// calls / (calls + unanswered) × 100, 0 when the agent had no contact.
pub fn agent_answer_rate(agent: &AgentRecord) -> f64 {
    let calls = agent.calls as f64;
    let total = calls + agent.unanswered.unwrap_or(0) as f64;
    share_pct(calls, total)
}

/// Mean of the rated agents; None when no agent has a score.
pub fn average_agent_csat(agents: &[AgentRecord]) -> Option<f64> {
    let scores: Vec<f64> = agents.iter().filter_map(|a| a.csat.value()).collect();
    if scores.is_empty() {
        None
    } else {
        Some(mean(&scores))
    }
}

/// First `n` agents in source order (the export is already ranked).
pub fn top_agents(agents: &[AgentRecord], n: usize) -> &[AgentRecord] {
    &agents[..n.min(agents.len())]
}

/// Agents that handled at least one chat, first `n`.
pub fn top_chat_agents(agents: &[AgentRecord], n: usize) -> Vec<&AgentRecord> {
    agents.iter().filter(|a| a.chats > 0).take(n).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRow {
    pub name: String,
    pub calls: u64,
    pub chats: u64,
    pub csat: CsatScore,
    pub csat_tone: Tone,
    pub performance: f64,
    pub tier: PerformanceTier,
    pub answer_rate: f64,
}

pub fn agent_rows(agents: &[AgentRecord], config: &AppConfig) -> Vec<AgentRow> {
    agents
        .iter()
        .map(|a| AgentRow {
            name: a.name.clone(),
            calls: a.calls,
            chats: a.chats,
            csat: a.csat,
            csat_tone: agent_csat_tone(a.csat, config),
            performance: a.performance,
            tier: performance_tier(a.performance, config),
            answer_rate: round1(agent_answer_rate(a)),
        })
        .collect()
}

pub fn model_conversion_tone(model: &QuotedModel, config: &AppConfig) -> Tone {
    tone_for(
        model.percent,
        Some(config.model_conversion_target),
        Polarity::HigherIsBetter,
    )
}
