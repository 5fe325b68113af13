//! Period-over-period comparison of two aggregate snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::stats::percent_change;
use crate::loader::types::KpiSummary;

pub mod metric_keys {
    pub const CALLS_HANDLED: &str = "totalLigacoesAtendidas";
    pub const IGNORED_RATE: &str = "percentualIgnoradas";
    pub const OMNICHAT_TOTAL: &str = "totalOmnichat";
    pub const QUOTES_TOTAL: &str = "totalOrcamentos";
    pub const AVERAGE_CSAT: &str = "csatMedio";
    pub const CONVERSION_RATE: &str = "taxaConversao";
}

pub const UNAVAILABLE_TITLE: &str = "Comparação não disponível";
pub const UNAVAILABLE_HINT: &str = "Selecione dois períodos para comparar os dados";

/// One period's KPI rollup, keyed by metric name. Missing keys read as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateSnapshot(BTreeMap<String, f64>);

impl AggregateSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> f64 {
        self.0.get(key).copied().unwrap_or(0.0)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        self.0.insert(key.into(), value);
    }

    /// Snapshot of a loaded KPI summary under the tracked metric keys.
    pub fn from_kpis(kpis: &KpiSummary) -> Self {
        [
            (metric_keys::CALLS_HANDLED, kpis.calls_handled as f64),
            (metric_keys::IGNORED_RATE, kpis.no_answer_rate),
            (metric_keys::OMNICHAT_TOTAL, kpis.chats_received as f64),
            (metric_keys::QUOTES_TOTAL, kpis.total_quotes as f64),
            (metric_keys::AVERAGE_CSAT, kpis.average_csat),
            (metric_keys::CONVERSION_RATE, kpis.conversion_rate),
        ]
        .into_iter()
        .collect()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for AggregateSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        AggregateSnapshot(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayFormat {
    Number,
    Percentage,
    Currency,
}

impl DisplayFormat {
    pub fn format(&self, value: f64) -> String {
        match self {
            DisplayFormat::Percentage => format!("{:.1}%", value),
            DisplayFormat::Currency => format!("R$ {}", format_number_br(value)),
            DisplayFormat::Number => format_number_br(value),
        }
    }
}

/// pt-BR grouping: "19.866", "4,4", "1.234,57". At most two decimals.
pub fn format_number_br(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let negative = rounded < 0.0;
    let abs = rounded.abs();
    let int_part = abs.trunc() as u64;
    let cents = ((abs - abs.trunc()) * 100.0).round() as u64;

    let digits = int_part.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if cents > 0 {
        let frac = format!("{:02}", cents);
        out.push(',');
        out.push_str(frac.trim_end_matches('0'));
    }
    out
}

pub struct TrackedMetric {
    pub key: &'static str,
    pub title: &'static str,
    pub format: DisplayFormat,
}

/// Metrics compared between periods, in display order.
pub const TRACKED_METRICS: [TrackedMetric; 6] = [
    TrackedMetric {
        key: metric_keys::CALLS_HANDLED,
        title: "Ligações Atendidas",
        format: DisplayFormat::Number,
    },
    TrackedMetric {
        key: metric_keys::IGNORED_RATE,
        title: "Taxa de Ignoradas",
        format: DisplayFormat::Percentage,
    },
    TrackedMetric {
        key: metric_keys::OMNICHAT_TOTAL,
        title: "Atendimentos Omnichat",
        format: DisplayFormat::Number,
    },
    TrackedMetric {
        key: metric_keys::QUOTES_TOTAL,
        title: "Orçamentos Gerados",
        format: DisplayFormat::Number,
    },
    TrackedMetric {
        key: metric_keys::AVERAGE_CSAT,
        title: "CSAT Médio",
        format: DisplayFormat::Number,
    },
    TrackedMetric {
        key: metric_keys::CONVERSION_RATE,
        title: "Taxa de Conversão",
        format: DisplayFormat::Percentage,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonMetric {
    pub key: String,
    pub title: String,
    pub current: f64,
    pub previous: f64,
    pub difference: f64,
    pub percent_change: f64,
    pub format: DisplayFormat,
    pub trend: Trend,
}

impl ComparisonMetric {
    /// "+100 (+100.0%)", "-0,1 (-2.4%)", "0 (0.0%)".
    ///
    /// Decreases carry a `-` on the difference as well as on the percentage,
    /// so "0,1 (-2.4%)" is never produced.
    pub fn delta_label(&self) -> String {
        let sign = |v: f64| if v > 0.0 { "+" } else if v < 0.0 { "-" } else { "" };
        format!(
            "{}{} ({}{:.1}%)",
            sign(self.difference),
            self.format.format(self.difference.abs()),
            sign(self.percent_change),
            self.percent_change.abs()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Increase,
    Decrease,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InsightTag {
    Improvement,
    AttentionNeeded,
}

/// A significant period-over-period change, ready to display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub key: String,
    pub title: String,
    pub direction: Direction,
    pub magnitude_pct: f64,
    pub tag: InsightTag,
    pub headline: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub period: String,
    pub calls: f64,
    pub omnichat: f64,
    pub quotes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub metrics: Vec<ComparisonMetric>,
    pub trend: Vec<TrendPoint>,
    pub insights: Vec<Insight>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum ComparisonState {
    #[serde(rename_all = "camelCase")]
    Unavailable { title: String, hint: String },
    Available(Comparison),
}

impl ComparisonState {
    pub fn unavailable() -> Self {
        ComparisonState::Unavailable {
            title: UNAVAILABLE_TITLE.to_string(),
            hint: UNAVAILABLE_HINT.to_string(),
        }
    }

    pub fn comparison(&self) -> Option<&Comparison> {
        match self {
            ComparisonState::Available(c) => Some(c),
            ComparisonState::Unavailable { .. } => None,
        }
    }
}

/// Compare two periods. Either snapshot missing → `Unavailable`, never a
/// zero-filled comparison.
pub fn compare_snapshots(
    current: Option<&AggregateSnapshot>,
    previous: Option<&AggregateSnapshot>,
    insight_threshold_pct: f64,
) -> ComparisonState {
    let (Some(current), Some(previous)) = (current, previous) else {
        return ComparisonState::unavailable();
    };
    let metrics = comparison_metrics(current, previous);
    let insights = derive_insights(&metrics, insight_threshold_pct);
    ComparisonState::Available(Comparison {
        trend: trend_points(current, previous),
        metrics,
        insights,
    })
}

/// One entry per tracked metric, in `TRACKED_METRICS` order.
pub fn comparison_metrics(
    current: &AggregateSnapshot,
    previous: &AggregateSnapshot,
) -> Vec<ComparisonMetric> {
    TRACKED_METRICS
        .iter()
        .map(|m| {
            let cur = current.get(m.key);
            let prev = previous.get(m.key);
            let difference = cur - prev;
            let trend = if difference > 0.0 {
                Trend::Up
            } else if difference < 0.0 {
                Trend::Down
            } else {
                Trend::Flat
            };
            ComparisonMetric {
                key: m.key.to_string(),
                title: m.title.to_string(),
                current: cur,
                previous: prev,
                difference,
                percent_change: percent_change(cur, prev),
                format: m.format,
                trend,
            }
        })
        .collect()
}

/// Metrics whose |percent change| reaches the threshold (inclusive).
/// Smaller changes are left out entirely.
pub fn derive_insights(metrics: &[ComparisonMetric], threshold_pct: f64) -> Vec<Insight> {
    metrics
        .iter()
        .filter(|m| m.percent_change.abs() >= threshold_pct)
        .map(|m| {
            let magnitude = m.percent_change.abs();
            let (direction, verb, tag, qualifier) = if m.difference > 0.0 {
                (Direction::Increase, "aumentou", InsightTag::Improvement, "Melhoria")
            } else {
                (
                    Direction::Decrease,
                    "diminuiu",
                    InsightTag::AttentionNeeded,
                    "Atenção necessária",
                )
            };
            Insight {
                key: m.key.clone(),
                title: m.title.clone(),
                direction,
                magnitude_pct: magnitude,
                tag,
                headline: format!("{} {} {:.1}%", m.title, verb, magnitude),
                detail: format!("{} em relação ao período anterior", qualifier),
            }
        })
        .collect()
}

fn trend_points(current: &AggregateSnapshot, previous: &AggregateSnapshot) -> Vec<TrendPoint> {
    let point = |period: &str, s: &AggregateSnapshot| TrendPoint {
        period: period.to_string(),
        calls: s.get(metric_keys::CALLS_HANDLED),
        omnichat: s.get(metric_keys::OMNICHAT_TOTAL),
        quotes: s.get(metric_keys::QUOTES_TOTAL),
    };
    vec![point("Anterior", previous), point("Atual", current)]
}
