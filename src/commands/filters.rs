use crate::filters::{apply_filters, FilterField, FilterState, FilteredView};
use crate::state::{AppState, SessionAccess};

pub fn get_filters(state: &AppState) -> Result<FilterState, String> {
    state.session(|s| Ok(s.filters.state().clone()))
}

/// Sets one filter from a raw form value and returns the full new state.
pub fn set_filter(state: &AppState, key: &str, value: &str) -> Result<FilterState, String> {
    let field = FilterField::parse(key, value).map_err(|e| e.to_string())?;
    state.session_mut(|s| Ok(s.filters.set_field(field).clone()))
}

pub fn reset_filters(state: &AppState) -> Result<FilterState, String> {
    state.session_mut(|s| Ok(s.filters.reset().clone()))
}

/// The loaded model seen through the current filters.
pub fn get_filtered_view(state: &AppState) -> Result<FilteredView, String> {
    state.session(|s| Ok(apply_filters(s.data()?, s.filters.state())))
}
