//! Dashboard filter state: a plain value container with change notification.
//!
//! No validation happens here. A CSAT range with `min_csat > max_csat` or a
//! reversed date range is stored as given and simply matches nothing.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::loader::types::{AgentRecord, CsatScore, DailyCalls, DashboardData};
use crate::parser::deserializers::{parse_float_prefix, parse_iso_date};

pub const DEFAULT_MIN_CSAT: f64 = 0.0;
pub const DEFAULT_MAX_CSAT: f64 = 5.0;

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 1).unwrap_or_default()
}

fn default_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 31).unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MetricType {
    #[default]
    #[serde(rename = "todos")]
    All,
    #[serde(rename = "ligacoes")]
    Calls,
    #[serde(rename = "omnichat")]
    Omnichat,
    #[serde(rename = "orcamentos")]
    Quotes,
    #[serde(rename = "csat")]
    Csat,
}

impl MetricType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::All => "todos",
            MetricType::Calls => "ligacoes",
            MetricType::Omnichat => "omnichat",
            MetricType::Quotes => "orcamentos",
            MetricType::Csat => "csat",
        }
    }

    /// `All` includes every section; any other selector only itself.
    pub fn includes(&self, section: MetricType) -> bool {
        *self == MetricType::All || *self == section
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "todos" | "all" => Ok(MetricType::All),
            "ligacoes" | "calls" => Ok(MetricType::Calls),
            "omnichat" => Ok(MetricType::Omnichat),
            "orcamentos" | "quotes" => Ok(MetricType::Quotes),
            "csat" => Ok(MetricType::Csat),
            other => Err(AppError::Custom(format!("Tipo de métrica desconhecido: {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Empty = all agents.
    #[serde(alias = "vendedor")]
    pub agent: String,
    #[serde(alias = "tipoMetrica")]
    pub metric_type: MetricType,
    #[serde(alias = "minCSAT")]
    pub min_csat: f64,
    #[serde(alias = "maxCSAT")]
    pub max_csat: f64,
    #[serde(alias = "busca", default)]
    pub search: String,
}

impl Default for FilterState {
    /// July 2025, all agents, all metrics, CSAT 0..5, no search.
    fn default() -> Self {
        FilterState {
            start_date: default_start_date(),
            end_date: default_end_date(),
            agent: String::new(),
            metric_type: MetricType::All,
            min_csat: DEFAULT_MIN_CSAT,
            max_csat: DEFAULT_MAX_CSAT,
            search: String::new(),
        }
    }
}

impl FilterState {
    /// New state with one field replaced; `self` is left untouched.
    pub fn with_field(&self, field: FilterField) -> FilterState {
        let mut next = self.clone();
        match field {
            FilterField::StartDate(d) => next.start_date = d,
            FilterField::EndDate(d) => next.end_date = d,
            FilterField::Agent(a) => next.agent = a,
            FilterField::MetricType(m) => next.metric_type = m,
            FilterField::MinCsat(v) => next.min_csat = v,
            FilterField::MaxCsat(v) => next.max_csat = v,
            FilterField::Search(s) => next.search = s,
        }
        next
    }
}

/// A single field change coming from the view.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterField {
    StartDate(NaiveDate),
    EndDate(NaiveDate),
    Agent(String),
    MetricType(MetricType),
    MinCsat(f64),
    MaxCsat(f64),
    Search(String),
}

impl FilterField {
    /// Build a change from a raw form value.
    ///
    /// CSAT inputs read the leading number; an unreadable minimum becomes 0 and
    /// an unreadable or zero maximum becomes 5, as the form always did.
    pub fn parse(key: &str, raw: &str) -> Result<FilterField, AppError> {
        match key {
            "startDate" => parse_iso_date(raw)
                .map(FilterField::StartDate)
                .ok_or_else(|| AppError::InvalidDate(raw.to_string())),
            "endDate" => parse_iso_date(raw)
                .map(FilterField::EndDate)
                .ok_or_else(|| AppError::InvalidDate(raw.to_string())),
            "agent" | "vendedor" => Ok(FilterField::Agent(raw.to_string())),
            "metricType" | "tipoMetrica" => raw.parse().map(FilterField::MetricType),
            "minCsat" | "minCSAT" => Ok(FilterField::MinCsat(
                parse_float_prefix(raw).unwrap_or(DEFAULT_MIN_CSAT),
            )),
            "maxCsat" | "maxCSAT" => Ok(FilterField::MaxCsat(
                parse_float_prefix(raw)
                    .filter(|v| *v != 0.0)
                    .unwrap_or(DEFAULT_MAX_CSAT),
            )),
            "search" | "busca" => Ok(FilterField::Search(raw.to_string())),
            other => Err(AppError::Custom(format!("Filtro desconhecido: {other:?}"))),
        }
    }
}

type FilterListener = Box<dyn FnMut(&FilterState) + Send>;

/// Holds the current filters and tells the listener about every change,
/// always with the full new state.
pub struct FilterStore {
    state: FilterState,
    listener: Option<FilterListener>,
}

impl Default for FilterStore {
    fn default() -> Self {
        FilterStore::new(FilterState::default())
    }
}

impl fmt::Debug for FilterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterStore")
            .field("state", &self.state)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl FilterStore {
    pub fn new(initial: FilterState) -> Self {
        FilterStore {
            state: initial,
            listener: None,
        }
    }

    pub fn with_listener<L>(initial: FilterState, listener: L) -> Self
    where
        L: FnMut(&FilterState) + Send + 'static,
    {
        FilterStore {
            state: initial,
            listener: Some(Box::new(listener)),
        }
    }

    pub fn set_listener<L>(&mut self, listener: L)
    where
        L: FnMut(&FilterState) + Send + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn set_field(&mut self, field: FilterField) -> &FilterState {
        let next = self.state.with_field(field);
        self.replace(next)
    }

    /// Back to the fixed defaults, whatever the prior state.
    pub fn reset(&mut self) -> &FilterState {
        self.replace(FilterState::default())
    }

    fn replace(&mut self, next: FilterState) -> &FilterState {
        self.state = next;
        if let Some(listener) = self.listener.as_mut() {
            listener(&self.state);
        }
        &self.state
    }
}

/// What the view shows once the filters are applied. The loaded read model
/// itself is never altered.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredView {
    pub metric_type: MetricType,
    pub agents: Vec<AgentRecord>,
    pub daily_calls: Vec<DailyCalls>,
}

pub fn apply_filters(data: &DashboardData, filters: &FilterState) -> FilteredView {
    let search = filters.search.trim().to_lowercase();
    let agents = data
        .agents
        .iter()
        .filter(|a| filters.agent.is_empty() || a.name == filters.agent)
        .filter(|a| search.is_empty() || a.name.to_lowercase().contains(&search))
        .filter(|a| csat_in_range(a, filters))
        .cloned()
        .collect();

    let daily_calls = data
        .daily_calls
        .iter()
        .filter(|d| match d.parsed_date() {
            Some(date) => filters.start_date <= date && date <= filters.end_date,
            None => true,
        })
        .cloned()
        .collect();

    FilteredView {
        metric_type: filters.metric_type,
        agents,
        daily_calls,
    }
}

/// Unrated agents only pass while the range still covers the whole scale.
fn csat_in_range(agent: &AgentRecord, filters: &FilterState) -> bool {
    match agent.csat {
        CsatScore::Score(v) => filters.min_csat <= v && v <= filters.max_csat,
        CsatScore::NotApplicable => {
            filters.min_csat <= DEFAULT_MIN_CSAT && filters.max_csat >= DEFAULT_MAX_CSAT
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn agent(name: &str, csat: CsatScore) -> AgentRecord {
        AgentRecord {
            name: name.to_string(),
            calls: 10,
            chats: 1,
            csat,
            performance: 70.0,
            unanswered: None,
        }
    }

    fn sample_data() -> DashboardData {
        DashboardData {
            agents: vec![
                agent("Ana Souza", CsatScore::Score(4.8)),
                agent("Bruno Lima", CsatScore::Score(3.2)),
                agent("Carla Dias", CsatScore::NotApplicable),
            ],
            daily_calls: vec![
                DailyCalls { date: "2025-06-30".into(), handled: 1, ignored: 0 },
                DailyCalls { date: "2025-07-15".into(), handled: 2, ignored: 0 },
                DailyCalls { date: "Total".into(), handled: 3, ignored: 0 },
            ],
            ..DashboardData::default()
        }
    }

    #[test]
    fn test_default_literal() {
        let f = FilterState::default();
        assert_eq!(f.start_date, date(2025, 7, 1));
        assert_eq!(f.end_date, date(2025, 7, 31));
        assert_eq!(f.agent, "");
        assert_eq!(f.metric_type, MetricType::All);
        assert_eq!(f.min_csat, 0.0);
        assert_eq!(f.max_csat, 5.0);
        assert_eq!(f.search, "");
    }

    /// GIVEN a store with a listener
    /// WHEN a field is set
    /// THEN the listener receives the complete new state and the old value is replaced
    #[test]
    fn test_set_field_notifies_full_state() {
        let seen: Arc<Mutex<Vec<FilterState>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut store = FilterStore::with_listener(FilterState::default(), move |s| {
            sink.lock().unwrap().push(s.clone());
        });

        store.set_field(FilterField::Agent("Ana Souza".into()));
        store.set_field(FilterField::MinCsat(4.0));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].agent, "Ana Souza");
        assert_eq!(seen[1].min_csat, 4.0);
        assert_eq!(seen[1].end_date, date(2025, 7, 31));
        assert_eq!(store.state(), &seen[1]);
    }

    #[test]
    fn test_with_field_leaves_original() {
        let before = FilterState::default();
        let after = before.with_field(FilterField::Search("ana".into()));
        assert_eq!(before.search, "");
        assert_eq!(after.search, "ana");
    }

    #[test]
    fn test_reset_restores_literal() {
        let mut store = FilterStore::default();
        store.set_field(FilterField::StartDate(date(2024, 1, 1)));
        store.set_field(FilterField::MetricType(MetricType::Csat));
        store.set_field(FilterField::MaxCsat(2.0));
        store.set_field(FilterField::Search("x".into()));
        assert_eq!(store.reset(), &FilterState::default());
    }

    #[test]
    fn test_reset_notifies() {
        let count = Arc::new(Mutex::new(0));
        let c = Arc::clone(&count);
        let mut store = FilterStore::default();
        store.set_listener(move |_| *c.lock().unwrap() += 1);
        store.reset();
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn test_inverted_csat_range_accepted() {
        let mut store = FilterStore::default();
        store.set_field(FilterField::MinCsat(4.5));
        store.set_field(FilterField::MaxCsat(1.0));
        assert_eq!(store.state().min_csat, 4.5);
        assert_eq!(store.state().max_csat, 1.0);
        let view = apply_filters(&sample_data(), store.state());
        assert!(view.agents.is_empty());
    }

    #[test]
    fn test_parse_fields() {
        assert_eq!(
            FilterField::parse("startDate", "2025-07-10").unwrap(),
            FilterField::StartDate(date(2025, 7, 10))
        );
        assert!(matches!(
            FilterField::parse("endDate", "31/07/2025"),
            Err(AppError::InvalidDate(_))
        ));
        assert_eq!(
            FilterField::parse("tipoMetrica", "orcamentos").unwrap(),
            FilterField::MetricType(MetricType::Quotes)
        );
        assert_eq!(FilterField::parse("minCSAT", "").unwrap(), FilterField::MinCsat(0.0));
        assert_eq!(FilterField::parse("minCSAT", "3.5").unwrap(), FilterField::MinCsat(3.5));
        assert_eq!(FilterField::parse("maxCSAT", "abc").unwrap(), FilterField::MaxCsat(5.0));
        assert_eq!(FilterField::parse("maxCSAT", "0").unwrap(), FilterField::MaxCsat(5.0));
        assert_eq!(FilterField::parse("maxCsat", "4").unwrap(), FilterField::MaxCsat(4.0));
        assert!(FilterField::parse("cor", "azul").is_err());
    }

    #[test]
    fn test_serde_accepts_form_keys() {
        let f: FilterState = serde_json::from_str(
            r#"{"startDate": "2025-07-01", "endDate": "2025-07-31", "vendedor": "",
                "tipoMetrica": "todos", "minCSAT": 0, "maxCSAT": 5}"#,
        )
        .unwrap();
        assert_eq!(f, FilterState::default());
    }

    #[test]
    fn test_apply_filters_defaults_keep_everything_in_range() {
        let view = apply_filters(&sample_data(), &FilterState::default());
        assert_eq!(view.agents.len(), 3);
        // June row dropped, unparsable "Total" row kept
        let dates: Vec<&str> = view.daily_calls.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-07-15", "Total"]);
    }

    #[test]
    fn test_apply_filters_search_and_agent() {
        let data = sample_data();
        let f = FilterState::default().with_field(FilterField::Search(" LIMA ".into()));
        assert_eq!(apply_filters(&data, &f).agents[0].name, "Bruno Lima");

        let f = FilterState::default().with_field(FilterField::Agent("Ana Souza".into()));
        let view = apply_filters(&data, &f);
        assert_eq!(view.agents.len(), 1);
        assert_eq!(view.agents[0].name, "Ana Souza");
    }

    #[test]
    fn test_apply_filters_csat_range_drops_unrated() {
        let f = FilterState::default().with_field(FilterField::MinCsat(4.0));
        let view = apply_filters(&sample_data(), &f);
        let names: Vec<&str> = view.agents.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Ana Souza"]);
    }

    #[test]
    fn test_apply_filters_does_not_touch_model() {
        let data = sample_data();
        let before = data.clone();
        let f = FilterState::default().with_field(FilterField::Agent("nobody".into()));
        let _ = apply_filters(&data, &f);
        assert_eq!(data, before);
    }

    #[test]
    fn test_metric_type_includes() {
        assert!(MetricType::All.includes(MetricType::Csat));
        assert!(MetricType::Calls.includes(MetricType::Calls));
        assert!(!MetricType::Calls.includes(MetricType::Quotes));
        assert_eq!(MetricType::Quotes.to_string(), "orcamentos");
    }
}
