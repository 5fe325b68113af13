use crate::config::{apply_pairs, config_to_pairs, AppConfig};
use crate::state::{AppState, SessionAccess};

pub fn get_config(state: &AppState) -> Result<AppConfig, String> {
    state.session(|s| Ok(s.config.clone()))
}

pub fn update_config(state: &AppState, config: AppConfig) -> Result<(), String> {
    state.session_mut(|s| {
        s.config = config;
        Ok(())
    })
}

/// Updates the keys given as strings; other settings stay as they are.
pub fn update_config_values(
    state: &AppState,
    values: Vec<(String, String)>,
) -> Result<AppConfig, String> {
    state.session_mut(|s| {
        apply_pairs(&mut s.config, values);
        Ok(s.config.clone())
    })
}

pub fn get_config_values(state: &AppState) -> Result<Vec<(String, String)>, String> {
    state.session(|s| {
        Ok(config_to_pairs(&s.config)
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_config_values_partial() {
        let state = AppState::default();
        let c = update_config_values(
            &state,
            vec![
                ("csat_target".into(), "4.5".into()),
                ("desconhecida".into(), "1".into()),
            ],
        )
        .unwrap();
        assert_eq!(c.csat_target, 4.5);
        assert_eq!(c.load_timeout_secs, AppConfig::default().load_timeout_secs);
        assert_eq!(get_config(&state).unwrap(), c);
    }

    #[test]
    fn test_update_config_replaces() {
        let state = AppState::default();
        let config = AppConfig {
            insight_threshold_pct: 10.0,
            ..AppConfig::default()
        };
        update_config(&state, config.clone()).unwrap();
        assert_eq!(get_config(&state).unwrap(), config);

        let values = get_config_values(&state).unwrap();
        assert!(values.contains(&("insight_threshold_pct".to_string(), "10".to_string())));
    }
}
