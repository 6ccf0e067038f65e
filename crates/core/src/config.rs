//! Panel configuration. Every field has a default so a partial (or absent)
//! config block still yields a working panel.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub run_endpoint: String,
    pub train_endpoint: String,
    /// localStorage key recording that the intro panel was auto-expanded.
    pub intro_storage_key: String,
    pub intro_delay_ms: u32,
    /// Delay before the second normalization sweep over an injected result.
    pub settle_delay_ms: u32,
    pub chart_min_height_px: u32,
    pub max_agents: u32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            run_endpoint: "/run_simulation".to_string(),
            train_endpoint: "/train_and_run".to_string(),
            intro_storage_key: "infoSectionSeen".to_string(),
            intro_delay_ms: 1000,
            settle_delay_ms: 500,
            chart_min_height_px: 450,
            max_agents: 10,
        }
    }
}

impl PanelConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn endpoint(&self, with_training: bool) -> &str {
        if with_training {
            &self.train_endpoint
        } else {
            &self.run_endpoint
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = PanelConfig::from_json(r#"{"run_endpoint": "/api/run"}"#).unwrap();
        assert_eq!(cfg.run_endpoint, "/api/run");
        assert_eq!(cfg.train_endpoint, "/train_and_run");
        assert_eq!(cfg.chart_min_height_px, 450);
    }

    #[test]
    fn endpoint_follows_mode() {
        let cfg = PanelConfig::default();
        assert_eq!(cfg.endpoint(false), "/run_simulation");
        assert_eq!(cfg.endpoint(true), "/train_and_run");
    }
}
