use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::parser::deserializers::{de, parse_float_prefix, parse_iso_date};

/// Marker used by the agent export when an agent has no rated contacts.
pub const CSAT_NOT_APPLICABLE: &str = "N/A";

/// Aggregate KPIs of one period (`kpis_calculados.json`).
/// Keys absent from the resource read as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    #[serde(rename = "total_ligacoes", default, deserialize_with = "de::lenient_u64")]
    pub total_calls: u64,
    #[serde(rename = "ligacoes_atendidas", default, deserialize_with = "de::lenient_u64")]
    pub calls_handled: u64,
    #[serde(rename = "taxa_atendimento", default, deserialize_with = "de::lenient_f64")]
    pub handling_rate: f64,
    #[serde(rename = "csat_medio", default, deserialize_with = "de::lenient_f64")]
    pub average_csat: f64,
    #[serde(rename = "chats_recebidos", default, deserialize_with = "de::lenient_u64")]
    pub chats_received: u64,
    #[serde(rename = "chats_finalizados", default, deserialize_with = "de::lenient_u64")]
    pub chats_finalized: u64,
    #[serde(rename = "taxa_finalizacao", default, deserialize_with = "de::lenient_f64")]
    pub finalization_rate: f64,
    #[serde(rename = "agentes_ativos", default, deserialize_with = "de::lenient_u64")]
    pub active_agents: u64,
    #[serde(rename = "total_orcamentos", default, deserialize_with = "de::lenient_u64")]
    pub total_quotes: u64,
    #[serde(rename = "orcamentos_convertidos", default, deserialize_with = "de::lenient_u64")]
    pub converted_quotes: u64,
    #[serde(rename = "percentual_convertidos", default, deserialize_with = "de::lenient_f64")]
    pub conversion_rate: f64,
    #[serde(rename = "percentual_fora_fila", default, deserialize_with = "de::lenient_f64")]
    pub out_of_queue_rate: f64,
    #[serde(rename = "media_pneu", default, deserialize_with = "de::lenient_f64")]
    pub average_tire_metric: f64,
    #[serde(rename = "sem_resposta", default, deserialize_with = "de::lenient_u64")]
    pub unanswered: u64,
    #[serde(rename = "taxa_nao_resposta", default, deserialize_with = "de::lenient_f64")]
    pub no_answer_rate: f64,
    #[serde(
        rename = "total_funcionarios",
        default,
        deserialize_with = "de::lenient_opt_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_employees: Option<u64>,
}

/// Agent satisfaction score: a number, or "N/A" when nothing was rated.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CsatScore {
    Score(f64),
    #[default]
    NotApplicable,
}

impl CsatScore {
    pub fn value(&self) -> Option<f64> {
        match self {
            CsatScore::Score(v) => Some(*v),
            CsatScore::NotApplicable => None,
        }
    }
}

impl Serialize for CsatScore {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            CsatScore::Score(v) => serializer.serialize_f64(*v),
            CsatScore::NotApplicable => serializer.serialize_str(CSAT_NOT_APPLICABLE),
        }
    }
}

impl<'de> Deserialize<'de> for CsatScore {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(CsatScore::NotApplicable),
            Value::Number(n) => Ok(n.as_f64().map_or(CsatScore::NotApplicable, CsatScore::Score)),
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(CSAT_NOT_APPLICABLE) {
                    return Ok(CsatScore::NotApplicable);
                }
                parse_float_prefix(trimmed)
                    .map(CsatScore::Score)
                    .ok_or_else(|| serde::de::Error::custom(format!("CSAT inválido: {s:?}")))
            }
            other => Err(serde::de::Error::custom(format!(
                "CSAT inválido: {other}"
            ))),
        }
    }
}

/// One agent row of `agentes_consolidados.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "ligacoes", default, deserialize_with = "de::lenient_u64")]
    pub calls: u64,
    #[serde(default, deserialize_with = "de::lenient_u64")]
    pub chats: u64,
    #[serde(default)]
    pub csat: CsatScore,
    #[serde(default, deserialize_with = "de::lenient_f64")]
    pub performance: f64,
    #[serde(
        rename = "sem_resposta",
        default,
        deserialize_with = "de::lenient_opt_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub unanswered: Option<u64>,
}

/// One day of `atendimentos_diarios.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCalls {
    #[serde(rename = "data")]
    pub date: String,
    #[serde(rename = "atendidas", default, deserialize_with = "de::lenient_u64")]
    pub handled: u64,
    #[serde(rename = "ignoradas", default, deserialize_with = "de::lenient_u64")]
    pub ignored: u64,
}

impl DailyCalls {
    /// ISO ("2025-07-03") or day-first ("03/07/2025") dates.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_iso_date(&self.date)
            .or_else(|| NaiveDate::parse_from_str(self.date.trim(), "%d/%m/%Y").ok())
    }
}

/// One row of `mais_cotados.json`. Both capitalized and lowercase keys occur.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotedModel {
    #[serde(rename = "modelo", alias = "Modelo")]
    pub model: String,
    #[serde(
        rename = "vendidos",
        alias = "Vendidos",
        default,
        deserialize_with = "de::lenient_u64"
    )]
    pub sold: u64,
    #[serde(
        rename = "conversao",
        alias = "Conversao",
        default,
        deserialize_with = "de::lenient_u64"
    )]
    pub converted: u64,
    #[serde(
        rename = "percentual",
        alias = "Percentual",
        default,
        deserialize_with = "de::lenient_f64"
    )]
    pub percent: f64,
}

/// The combined read model built from the four resources.
/// Replaced wholesale on refresh, never patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub kpis: KpiSummary,
    pub agents: Vec<AgentRecord>,
    pub daily_calls: Vec<DailyCalls>,
    pub quoted_models: Vec<QuotedModel>,
}
