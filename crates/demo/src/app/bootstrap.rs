use std::env::{self, VarError};
use std::path::PathBuf;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const SCENARIO_ENV_VAR: &str = "AMB_SCENARIO";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DemoConfig {
    /// `None` runs the built-in scenario.
    pub(crate) scenario_path: Option<PathBuf>,
}

pub(crate) fn build_app() -> DemoConfig {
    init_tracing();
    info!("=== Ambition Demo ===");

    let config = DemoConfig {
        scenario_path: scenario_path_from_var(env::var(SCENARIO_ENV_VAR)),
    };
    info!(
        scenario = config
            .scenario_path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "builtin".to_string()),
        "demo_config"
    );
    config
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn scenario_path_from_var(value: Result<String, VarError>) -> Option<PathBuf> {
    match value {
        Ok(raw) => {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
        }
        Err(VarError::NotPresent) => None,
        Err(VarError::NotUnicode(raw)) => {
            warn!(
                var = SCENARIO_ENV_VAR,
                value = ?raw,
                "scenario path is not unicode; using builtin scenario"
            );
            None
        }
    }
}
