//! Metadata for every form control: ranges, steps, defaults and help text.

pub const DEFAULT_NUM_AGENTS: usize = 3;
pub const DEFAULT_MAX_ITERATION: i64 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    NumAgents,
    MaxIteration,
    HealthConfig,
    AnimProfile,
    Beta,
    LearningRate,
    TargetUpdateFrequency,
    ReplayBufferSize,
    BatchSize,
    InitialEpsilon,
    EpsilonDecay,
    MinEpsilon,
    HiddenSize,
}

impl FieldId {
    /// JSON key and DOM id stem.
    pub fn key(self) -> &'static str {
        match self {
            FieldId::NumAgents => "num_agents",
            FieldId::MaxIteration => "max_iteration",
            FieldId::HealthConfig => "health_config",
            FieldId::AnimProfile => "anim_profile",
            FieldId::Beta => "beta",
            FieldId::LearningRate => "learning_rate",
            FieldId::TargetUpdateFrequency => "target_update_frequency",
            FieldId::ReplayBufferSize => "replay_buffer_size",
            FieldId::BatchSize => "batch_size",
            FieldId::InitialEpsilon => "initial_epsilon",
            FieldId::EpsilonDecay => "epsilon_decay",
            FieldId::MinEpsilon => "min_epsilon",
            FieldId::HiddenSize => "hidden_size",
        }
    }

    pub fn hyperparameters() -> &'static [FieldId] {
        &[
            FieldId::LearningRate,
            FieldId::TargetUpdateFrequency,
            FieldId::ReplayBufferSize,
            FieldId::BatchSize,
            FieldId::InitialEpsilon,
            FieldId::EpsilonDecay,
            FieldId::MinEpsilon,
            FieldId::HiddenSize,
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamSection {
    Simulation,
    Reinforcement,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Risk {
    Low,
    Medium,
    High,
}

impl Risk {
    pub fn label(self) -> &'static str {
        match self {
            Risk::Low => "Low risk",
            Risk::Medium => "Medium risk",
            Risk::High => "High risk",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParamSpec {
    pub field: FieldId,
    pub label: &'static str,
    pub section: ParamSection,
    pub description: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
    pub when_to_change: &'static str,
    pub risk: Risk,
}

impl ParamSpec {
    /// Default value as the text an `<input>` would hold.
    pub fn default_text(&self) -> String {
        format_for_step(self.default, self.step)
    }
}

/// A fixed list of numbered options rendered as a `<select>`.
#[derive(Clone, Debug, PartialEq)]
pub struct ChoiceSpec {
    pub field: FieldId,
    pub label: &'static str,
    pub options: &'static [(i64, &'static str)],
    pub default: i64,
}

pub struct SectionSpec {
    pub section: ParamSection,
    pub title: &'static str,
    pub blurb: &'static str,
}

pub fn sections_ordered() -> Vec<SectionSpec> {
    vec![
        SectionSpec {
            section: ParamSection::Simulation,
            title: "Simulation",
            blurb: "Battle size, length and starting conditions.",
        },
        SectionSpec {
            section: ParamSection::Reinforcement,
            title: "RL Hyperparameters",
            blurb: "DQN training controls, used only by agents set to RL.",
        },
    ]
}

pub fn health_profiles() -> ChoiceSpec {
    ChoiceSpec {
        field: FieldId::HealthConfig,
        label: "Starting health",
        options: &[
            (1, "Full health"),
            (2, "Low health"),
            (3, "Random health"),
            (4, "Half low, half full"),
        ],
        default: 1,
    }
}

pub fn animosity_profiles() -> ChoiceSpec {
    ChoiceSpec {
        field: FieldId::AnimProfile,
        label: "Initial animosity",
        options: &[(1, "High"), (2, "Low"), (3, "Random")],
        default: 3,
    }
}

pub fn param_specs() -> Vec<ParamSpec> {
    vec![
        ParamSpec {
            field: FieldId::NumAgents,
            label: "Number of agents",
            section: ParamSection::Simulation,
            description: "How many agents take part in the battle.",
            min: 1.0,
            max: 10.0,
            step: 1.0,
            default: DEFAULT_NUM_AGENTS as f64,
            when_to_change: "Raise for richer alliance dynamics; each agent adds to run time.",
            risk: Risk::Low,
        },
        ParamSpec {
            field: FieldId::MaxIteration,
            label: "Max iterations",
            section: ParamSection::Simulation,
            description: "Upper bound on simulation time steps.",
            min: 10.0,
            max: 5000.0,
            step: 10.0,
            default: DEFAULT_MAX_ITERATION as f64,
            when_to_change: "Lower for quick previews; raise if battles end before a winner emerges.",
            risk: Risk::Low,
        },
        ParamSpec {
            field: FieldId::Beta,
            label: "Discount factor (β)",
            section: ParamSection::Simulation,
            description: "Weight of future reward relative to immediate reward.",
            min: 0.0,
            max: 1.0,
            step: 0.01,
            default: 0.9,
            when_to_change: "Lower for short-sighted agents, raise for long-term planning.",
            risk: Risk::Medium,
        },
        // Reinforcement learning
        ParamSpec {
            field: FieldId::LearningRate,
            label: "Learning rate",
            section: ParamSection::Reinforcement,
            description: "Optimizer step size for the shared policy network.",
            min: 0.0001,
            max: 0.01,
            step: 0.0001,
            default: 0.001,
            when_to_change: "Lower if training diverges; raise if learning stalls.",
            risk: Risk::High,
        },
        ParamSpec {
            field: FieldId::TargetUpdateFrequency,
            label: "Target update frequency",
            section: ParamSection::Reinforcement,
            description: "Learner updates between target network syncs.",
            min: 1.0,
            max: 100.0,
            step: 1.0,
            default: 10.0,
            when_to_change: "Raise if Q-values oscillate.",
            risk: Risk::Medium,
        },
        ParamSpec {
            field: FieldId::ReplayBufferSize,
            label: "Replay buffer size",
            section: ParamSection::Reinforcement,
            description: "Transitions kept for experience replay.",
            min: 1000.0,
            max: 100_000.0,
            step: 1000.0,
            default: 10_000.0,
            when_to_change: "Raise for longer training runs.",
            risk: Risk::Low,
        },
        ParamSpec {
            field: FieldId::BatchSize,
            label: "Batch size",
            section: ParamSection::Reinforcement,
            description: "Transitions sampled per learner update.",
            min: 16.0,
            max: 512.0,
            step: 16.0,
            default: 64.0,
            when_to_change: "Raise for smoother gradients at the cost of speed.",
            risk: Risk::Low,
        },
        ParamSpec {
            field: FieldId::InitialEpsilon,
            label: "Initial epsilon",
            section: ParamSection::Reinforcement,
            description: "Starting probability of a random exploratory action.",
            min: 0.1,
            max: 1.0,
            step: 0.05,
            default: 1.0,
            when_to_change: "Lower if agents should exploit early.",
            risk: Risk::Medium,
        },
        ParamSpec {
            field: FieldId::EpsilonDecay,
            label: "Epsilon decay",
            section: ParamSection::Reinforcement,
            description: "Multiplier applied to epsilon after each step.",
            min: 0.9,
            max: 0.9999,
            step: 0.0001,
            default: 0.995,
            when_to_change: "Move towards 1.0 to explore for longer.",
            risk: Risk::Medium,
        },
        ParamSpec {
            field: FieldId::MinEpsilon,
            label: "Min epsilon",
            section: ParamSection::Reinforcement,
            description: "Floor for the exploration probability.",
            min: 0.0,
            max: 0.5,
            step: 0.01,
            default: 0.01,
            when_to_change: "Raise to keep some exploration late in training.",
            risk: Risk::Low,
        },
        ParamSpec {
            field: FieldId::HiddenSize,
            label: "Hidden layer size",
            section: ParamSection::Reinforcement,
            description: "Width of both hidden layers of the Q-network.",
            min: 16.0,
            max: 512.0,
            step: 16.0,
            default: 64.0,
            when_to_change: "Raise if the policy underfits; larger nets train slower.",
            risk: Risk::Medium,
        },
    ]
}

pub fn param_spec(field: FieldId) -> Option<ParamSpec> {
    param_specs().into_iter().find(|s| s.field == field)
}

fn decimals_for_step(step: f64) -> usize {
    if step >= 1.0 {
        0
    } else if step >= 0.1 {
        1
    } else if step >= 0.01 {
        2
    } else if step >= 0.001 {
        3
    } else {
        4
    }
}

/// Formats a value with as many decimals as its step needs.
pub fn format_for_step(v: f64, step: f64) -> String {
    let d = decimals_for_step(step);
    format!("{v:.d$}")
}
