use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub prospects_path: String,
    pub state_path: String,
    pub filter_columns: Vec<String>,
    pub default_template: Option<String>, // Optional override of the built-in copy
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            prospects_path: std::env::var("WHATSBLAST_PROSPECTS")
                .unwrap_or_else(|_| "prospects.json".to_string()),
            state_path: std::env::var("WHATSBLAST_STATE")
                .unwrap_or_else(|_| ".whatsblast_state.json".to_string()),
            filter_columns: std::env::var("WHATSBLAST_FILTER_COLUMNS")
                .unwrap_or_else(|_| "zone".to_string())
                .split(',')
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
            default_template: std::env::var("WHATSBLAST_TEMPLATE")
                .ok()
                .filter(|t| !t.trim().is_empty()),
        };

        if config.filter_columns.is_empty() {
            anyhow::bail!("WHATSBLAST_FILTER_COLUMNS must declare at least one column");
        }
        if config.prospects_path.trim().is_empty() {
            anyhow::bail!("WHATSBLAST_PROSPECTS cannot be empty");
        }
        if config.state_path.trim().is_empty() {
            anyhow::bail!("WHATSBLAST_STATE cannot be empty");
        }

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Prospects file: {}", config.prospects_path);
        tracing::debug!("State file: {}", config.state_path);
        tracing::debug!("Filter columns: {:?}", config.filter_columns);
        if config.default_template.is_some() {
            tracing::info!("Default template overridden from environment");
        }

        Ok(config)
    }
}
