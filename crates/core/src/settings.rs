//! Request payload and the form → payload serializer.

use serde::{Deserialize, Serialize};

use crate::agents::AgentType;
use crate::schema::{FieldId, DEFAULT_MAX_ITERATION};

/// Body of a run request. Optional fields are omitted from the JSON when
/// their control is not on the page, which the server reads as "use default".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    pub num_agents: u32,
    pub max_iteration: u32,
    pub health_config: i64,
    pub anim_profile: i64,
    pub beta: f64,
    pub agent_types: Vec<AgentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_update_frequency: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replay_buffer_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_epsilon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epsilon_decay: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_epsilon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden_size: Option<i64>,
}

impl SimulationSettings {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("missing value for {0}")]
    Missing(&'static str),
    #[error("invalid value for {field}: {raw:?}")]
    Invalid { field: &'static str, raw: String },
}

/// Read access to the current value of every control on the page.
pub trait FormSource {
    /// Raw control value, or `None` when the control is not present.
    fn raw(&self, field: FieldId) -> Option<String>;

    /// Raw value of agent selector `index`, or `None` when there is none.
    fn agent_selector(&self, index: usize) -> Option<String>;
}

/// Integer coercion with `parseInt` semantics: leading sign and digits,
/// anything after them ignored.
pub fn coerce_int(raw: &str) -> Option<i64> {
    let s = raw.trim();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    rest[..digits].parse::<i64>().ok().map(|v| v * sign)
}

/// Float coercion with `parseFloat` semantics: the longest numeric prefix.
pub fn coerce_float(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let candidate_len = s
        .bytes()
        .take_while(|b| b.is_ascii_digit() || matches!(*b, b'.' | b'-' | b'+' | b'e' | b'E'))
        .count();
    (1..=candidate_len)
        .rev()
        .find_map(|end| s[..end].parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn required_int(form: &impl FormSource, field: FieldId) -> Result<i64, SettingsError> {
    let raw = form.raw(field).ok_or(SettingsError::Missing(field.key()))?;
    coerce_int(&raw).ok_or(SettingsError::Invalid {
        field: field.key(),
        raw,
    })
}

fn positive(field: FieldId, v: i64) -> Result<u32, SettingsError> {
    u32::try_from(v)
        .ok()
        .filter(|n| *n > 0)
        .ok_or(SettingsError::Invalid {
            field: field.key(),
            raw: v.to_string(),
        })
}

fn optional_int(form: &impl FormSource, field: FieldId) -> Result<Option<i64>, SettingsError> {
    match form.raw(field) {
        None => Ok(None),
        Some(raw) => coerce_int(&raw)
            .map(Some)
            .ok_or(SettingsError::Invalid {
                field: field.key(),
                raw,
            }),
    }
}

fn optional_float(form: &impl FormSource, field: FieldId) -> Result<Option<f64>, SettingsError> {
    match form.raw(field) {
        None => Ok(None),
        Some(raw) => coerce_float(&raw)
            .map(Some)
            .ok_or(SettingsError::Invalid {
                field: field.key(),
                raw,
            }),
    }
}

/// Reads every control into a fresh payload. Has no side effects.
pub fn build_settings(form: &impl FormSource) -> Result<SimulationSettings, SettingsError> {
    let num_agents = positive(
        FieldId::NumAgents,
        required_int(form, FieldId::NumAgents)?,
    )?;

    let max_iteration = match form.raw(FieldId::MaxIteration) {
        None => DEFAULT_MAX_ITERATION,
        Some(_) => required_int(form, FieldId::MaxIteration)?,
    };
    let max_iteration = positive(FieldId::MaxIteration, max_iteration)?;

    let health_config = required_int(form, FieldId::HealthConfig)?;
    let anim_profile = required_int(form, FieldId::AnimProfile)?;

    let beta_raw = form
        .raw(FieldId::Beta)
        .ok_or(SettingsError::Missing(FieldId::Beta.key()))?;
    let beta = coerce_float(&beta_raw).ok_or(SettingsError::Invalid {
        field: FieldId::Beta.key(),
        raw: beta_raw,
    })?;

    let agent_types = (0..num_agents as usize)
        .map(|i| match form.agent_selector(i) {
            None => AgentType::Random,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(index = i, value = %raw, "unknown agent type, using Random");
                AgentType::Random
            }),
        })
        .collect();

    Ok(SimulationSettings {
        num_agents,
        max_iteration,
        health_config,
        anim_profile,
        beta,
        agent_types,
        learning_rate: optional_float(form, FieldId::LearningRate)?,
        target_update_frequency: optional_int(form, FieldId::TargetUpdateFrequency)?,
        replay_buffer_size: optional_int(form, FieldId::ReplayBufferSize)?,
        batch_size: optional_int(form, FieldId::BatchSize)?,
        initial_epsilon: optional_float(form, FieldId::InitialEpsilon)?,
        epsilon_decay: optional_float(form, FieldId::EpsilonDecay)?,
        min_epsilon: optional_float(form, FieldId::MinEpsilon)?,
        hidden_size: optional_int(form, FieldId::HiddenSize)?,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::BTreeMap;

    /// In-memory form used by tests across the crate.
    #[derive(Default)]
    pub(crate) struct FakeForm {
        pub(crate) fields: BTreeMap<FieldId, String>,
        pub(crate) agents: Vec<String>,
    }

    impl FakeForm {
        pub(crate) fn basic(agents: &[&str]) -> Self {
            let mut fields = BTreeMap::new();
            fields.insert(FieldId::NumAgents, agents.len().to_string());
            fields.insert(FieldId::MaxIteration, "500".to_string());
            fields.insert(FieldId::HealthConfig, "1".to_string());
            fields.insert(FieldId::AnimProfile, "3".to_string());
            fields.insert(FieldId::Beta, "0.9".to_string());
            Self {
                fields,
                agents: agents.iter().map(|s| s.to_string()).collect(),
            }
        }

        pub(crate) fn with(mut self, field: FieldId, raw: &str) -> Self {
            self.fields.insert(field, raw.to_string());
            self
        }
    }

    impl FormSource for FakeForm {
        fn raw(&self, field: FieldId) -> Option<String> {
            self.fields.get(&field).cloned()
        }

        fn agent_selector(&self, index: usize) -> Option<String> {
            self.agents.get(index).cloned()
        }
    }

    #[test]
    fn serializes_agent_types_in_selector_order() {
        let form = FakeForm::basic(&["RL", "Random", "Heuristic"]);
        let s = build_settings(&form).unwrap();
        assert_eq!(s.num_agents, 3);
        assert_eq!(
            s.agent_types,
            vec![AgentType::Rl, AgentType::Random, AgentType::Heuristic]
        );

        let json: serde_json::Value = serde_json::from_str(&s.to_json().unwrap()).unwrap();
        assert_eq!(json["num_agents"], 3);
        assert_eq!(json["agent_types"], serde_json::json!(["RL", "Random", "Heuristic"]));
    }

    #[test]
    fn absent_optional_controls_are_omitted() {
        let form = FakeForm::basic(&["Random", "Random"]);
        let json = build_settings(&form).unwrap().to_json().unwrap();
        for key in ["learning_rate", "batch_size", "hidden_size", "min_epsilon"] {
            assert!(!json.contains(key), "{key} leaked into {json}");
        }
    }

    #[test]
    fn present_optional_controls_are_coerced() {
        let form = FakeForm::basic(&["RL", "Random"])
            .with(FieldId::LearningRate, "0.0005")
            .with(FieldId::BatchSize, "128")
            .with(FieldId::HiddenSize, "64.0")
            .with(FieldId::EpsilonDecay, " 0.995 ");
        let s = build_settings(&form).unwrap();
        assert_eq!(s.learning_rate, Some(0.0005));
        assert_eq!(s.batch_size, Some(128));
        assert_eq!(s.hidden_size, Some(64));
        assert_eq!(s.epsilon_decay, Some(0.995));
        assert_eq!(s.replay_buffer_size, None);
    }

    #[test]
    fn missing_selector_reads_as_random() {
        let form = FakeForm::basic(&["RL"]).with(FieldId::NumAgents, "3");
        let s = build_settings(&form).unwrap();
        assert_eq!(s.agent_types.len(), 3);
        assert_eq!(s.agent_types[1], AgentType::Random);
        assert_eq!(s.agent_types[2], AgentType::Random);
    }

    #[test]
    fn max_iteration_defaults_when_control_is_absent() {
        let mut form = FakeForm::basic(&["Random", "Random"]);
        form.fields.remove(&FieldId::MaxIteration);
        assert_eq!(build_settings(&form).unwrap().max_iteration, 1000);
    }

    #[test]
    fn uncoercible_required_field_is_reported() {
        let form = FakeForm::basic(&["Random"]).with(FieldId::Beta, "abc");
        assert_eq!(
            build_settings(&form),
            Err(SettingsError::Invalid {
                field: "beta",
                raw: "abc".to_string()
            })
        );

        let form = FakeForm::basic(&["Random"]).with(FieldId::NumAgents, "0");
        assert!(build_settings(&form).is_err());
    }

    #[test]
    fn coercion_matches_parse_int_and_parse_float() {
        assert_eq!(coerce_int("42"), Some(42));
        assert_eq!(coerce_int(" 3.9 "), Some(3));
        assert_eq!(coerce_int("-7px"), Some(-7));
        assert_eq!(coerce_int(""), None);
        assert_eq!(coerce_int("x1"), None);

        assert_eq!(coerce_float("0.25"), Some(0.25));
        assert_eq!(coerce_float("1e-3"), Some(0.001));
        assert_eq!(coerce_float("0.5abc"), Some(0.5));
        assert_eq!(coerce_float("."), None);
    }
}
