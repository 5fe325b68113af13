pub mod fallback;
pub mod fetch;
pub mod load;
pub mod types;

pub use fallback::fallback_dataset;
pub use fetch::{DirectoryFetcher, HttpFetcher, ResourceFetcher};
pub use load::{load_dashboard, load_from_source, LoadOutcome};
pub use types::{AgentRecord, CsatScore, DailyCalls, DashboardData, KpiSummary, QuotedModel};
