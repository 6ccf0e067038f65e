//! Agent types and the per-agent selector roster.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Policy an agent uses during the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AgentType {
    #[serde(rename = "RL")]
    Rl,
    Heuristic,
    #[default]
    Random,
}

impl AgentType {
    /// Wire label, also used as the `<option>` value.
    pub fn label(self) -> &'static str {
        match self {
            AgentType::Rl => "RL",
            AgentType::Heuristic => "Heuristic",
            AgentType::Random => "Random",
        }
    }

    /// CSS colour token for the selector's left border.
    pub fn color_var(self) -> &'static str {
        match self {
            AgentType::Rl => "var(--agent-rl)",
            AgentType::Heuristic => "var(--agent-heuristic)",
            AgentType::Random => "var(--agent-random)",
        }
    }

    pub fn is_learning(self) -> bool {
        matches!(self, AgentType::Rl)
    }

    pub fn all() -> &'static [AgentType] {
        &[AgentType::Rl, AgentType::Heuristic, AgentType::Random]
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown agent type: {0:?}")]
pub struct UnknownAgentType(pub String);

impl FromStr for AgentType {
    type Err = UnknownAgentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentType::all()
            .iter()
            .copied()
            .find(|t| t.label() == s.trim())
            .ok_or_else(|| UnknownAgentType(s.to_string()))
    }
}

/// The ordered agent-type selection, one entry per selector widget.
///
/// Every rebuild bumps `generation` so keyed views re-create their selectors
/// instead of diffing against the previous ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRoster {
    types: Vec<AgentType>,
    generation: u64,
}

impl AgentRoster {
    pub fn new(n: usize) -> Self {
        Self {
            types: vec![AgentType::Random; n],
            generation: 0,
        }
    }

    /// Replaces every selector with `n` fresh `Random` entries.
    pub fn rebuild(&mut self, n: usize) {
        self.types = vec![AgentType::Random; n];
        self.generation = self.generation.wrapping_add(1);
        tracing::debug!(agents = n, generation = self.generation, "agent selectors rebuilt");
    }

    /// Changes a single selector. Indices past the end are ignored.
    pub fn set(&mut self, index: usize, agent_type: AgentType) {
        if let Some(slot) = self.types.get_mut(index) {
            *slot = agent_type;
        }
    }

    pub fn get(&self, index: usize) -> Option<AgentType> {
        self.types.get(index).copied()
    }

    pub fn types(&self) -> &[AgentType] {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// RunMode: at least one agent uses the learning policy.
    pub fn run_mode(&self) -> bool {
        self.types.iter().any(|t| t.is_learning())
    }
}

impl Default for AgentRoster {
    fn default() -> Self {
        Self::new(crate::schema::DEFAULT_NUM_AGENTS)
    }
}
