use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::filters::FilterStore;
use crate::loader::{DashboardData, LoadOutcome};
use crate::parser::UploadedFileResult;

/// How the current read model was obtained.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum LoadStatus {
    Loaded,
    Fallback { reason: String },
}

/// Everything one dashboard session holds between commands.
#[derive(Debug, Default)]
pub struct Session {
    pub config: AppConfig,
    pub data: Option<Arc<DashboardData>>,
    pub load_status: Option<LoadStatus>,
    pub filters: FilterStore,
    pub uploads: Vec<UploadedFileResult>,
}

impl Session {
    pub fn new(config: AppConfig) -> Self {
        Session {
            config,
            ..Session::default()
        }
    }

    /// Swap in the result of a load. The previous model is dropped whole.
    pub fn replace_data(&mut self, outcome: LoadOutcome) -> Arc<DashboardData> {
        let (status, data) = match outcome {
            LoadOutcome::Loaded { data } => (LoadStatus::Loaded, data),
            LoadOutcome::Fallback { data, reason } => (LoadStatus::Fallback { reason }, data),
        };
        let data = Arc::new(data);
        self.data = Some(Arc::clone(&data));
        self.load_status = Some(status);
        data
    }

    pub fn data(&self) -> Result<&Arc<DashboardData>, AppError> {
        self.data
            .as_ref()
            .ok_or_else(|| AppError::Custom("Dados do dashboard ainda não carregados".into()))
    }

    pub fn remove_upload(&mut self, index: usize) -> Result<UploadedFileResult, AppError> {
        if index >= self.uploads.len() {
            return Err(AppError::InvalidIndex(index));
        }
        Ok(self.uploads.remove(index))
    }
}

pub struct AppState {
    pub session: Mutex<Session>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        AppState {
            session: Mutex::new(Session::new(config)),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new(AppConfig::default())
    }
}

pub trait SessionAccess {
    fn session<F, T>(&self, f: F) -> Result<T, String>
    where
        F: FnOnce(&Session) -> Result<T, AppError>;

    fn session_mut<F, T>(&self, f: F) -> Result<T, String>
    where
        F: FnOnce(&mut Session) -> Result<T, AppError>;
}

impl SessionAccess for AppState {
    fn session<F, T>(&self, f: F) -> Result<T, String>
    where
        F: FnOnce(&Session) -> Result<T, AppError>,
    {
        let guard = self.session.lock().map_err(|e| format!("Mutex poisoned: {}", e))?;
        f(&guard).map_err(|e| e.to_string())
    }

    fn session_mut<F, T>(&self, f: F) -> Result<T, String>
    where
        F: FnOnce(&mut Session) -> Result<T, AppError>,
    {
        let mut guard = self.session.lock().map_err(|e| format!("Mutex poisoned: {}", e))?;
        f(&mut guard).map_err(|e| e.to_string())
    }
}
