//! Form snapshot and selector view helpers.
//!
//! Kept out of the wasm-only `web` module so the click-time snapshot and the
//! selector markup rules can be unit-tested on the host.

use std::collections::BTreeMap;

use warsim_panel::agents::{AgentRoster, AgentType};
use warsim_panel::schema::{self, FieldId};
use warsim_panel::settings::{coerce_int, FormSource};

/// Fade-in delay between consecutive agent selectors.
pub const SELECTOR_STAGGER_MS: usize = 100;

/// Text of every rendered control plus the selector roster, captured when an
/// action button is clicked.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormValues {
    fields: BTreeMap<FieldId, String>,
    agents: Vec<AgentType>,
}

impl FormValues {
    pub fn new(fields: BTreeMap<FieldId, String>, roster: &AgentRoster) -> Self {
        Self {
            fields,
            agents: roster.types().to_vec(),
        }
    }

    pub fn set(&mut self, field: FieldId, raw: impl Into<String>) {
        self.fields.insert(field, raw.into());
    }

    /// Drops a control, as if it were not on the page.
    pub fn remove(&mut self, field: FieldId) {
        self.fields.remove(&field);
    }
}

impl FormSource for FormValues {
    fn raw(&self, field: FieldId) -> Option<String> {
        self.fields.get(&field).cloned()
    }

    fn agent_selector(&self, index: usize) -> Option<String> {
        self.agents.get(index).map(|t| t.label().to_string())
    }
}

/// Initial text for every control the page renders.
pub fn default_fields() -> BTreeMap<FieldId, String> {
    let mut fields: BTreeMap<FieldId, String> = schema::param_specs()
        .into_iter()
        .map(|spec| (spec.field, spec.default_text()))
        .collect();
    for choice in [schema::health_profiles(), schema::animosity_profiles()] {
        fields.insert(choice.field, choice.default.to_string());
    }
    fields
}

/// Parses the agent-count input. `None` leaves the roster as it is.
///
/// Counts above `max_agents` are capped to the widget's own maximum.
pub fn parse_agent_count(raw: &str, max_agents: u32) -> Option<usize> {
    let n = coerce_int(raw)?;
    if n < 0 {
        return None;
    }
    Some(n.min(i64::from(max_agents)) as usize)
}

/// Commits an agent-count entry: rebuilds the roster and writes the count
/// actually used back into the form, so the request carries exactly the
/// selectors on screen. Returns `false` when the entry is ignored.
pub fn commit_agent_count(
    fields: &mut BTreeMap<FieldId, String>,
    roster: &mut AgentRoster,
    raw: &str,
    max_agents: u32,
) -> bool {
    let Some(n) = parse_agent_count(raw, max_agents) else {
        return false;
    };
    fields.insert(FieldId::NumAgents, n.to_string());
    roster.rebuild(n);
    true
}

/// Element id of a control, e.g. `learning-rate`.
pub fn field_dom_id(field: FieldId) -> String {
    field.key().replace('_', "-")
}

pub fn selector_id(index: usize) -> String {
    format!("agent-type-{index}")
}

pub fn selector_label(index: usize) -> String {
    format!("Agent {index}:")
}

/// Colour stripe on a selector, following its current value.
pub fn selector_border(agent_type: AgentType) -> String {
    format!("border-left: 4px solid {};", agent_type.color_var())
}

pub fn option_color(agent_type: AgentType) -> String {
    format!("color: {};", agent_type.color_var())
}

pub fn stagger_style(index: usize) -> String {
    format!("animation-delay: {}ms;", index * SELECTOR_STAGGER_MS)
}
