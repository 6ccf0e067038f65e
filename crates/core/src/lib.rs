//! # warsim_panel
//!
//! Control-panel logic for the multi-agent war simulation service: the
//! configuration form, the run request it produces and the view state a run
//! drives. Everything here is target-independent so it can be tested on the
//! host; `warsim_web` binds it to the browser.
//!
//! ## Modules
//!
//! - [`agents`]: agent types and the per-agent selector roster
//! - [`controls`]: RunMode → RL panel / run / train action policy
//! - [`host`]: local vs remote host classification
//! - [`settings`]: request payload and the form serializer
//! - [`dispatch`]: run lifecycle, response decoding, status and preview state
//! - [`status`]: the status badge states
//! - [`markup`]: fragment injection with script re-activation
//! - [`normalize`]: presentation fixes for injected results
//! - [`intro`]: the persisted "intro already shown" flag
//! - [`schema`]: control ranges, steps, defaults and help text
//! - [`config`]: panel configuration

pub mod agents;
pub mod config;
pub mod controls;
pub mod dispatch;
pub mod host;
pub mod intro;
pub mod markup;
pub mod normalize;
pub mod schema;
pub mod settings;
pub mod status;

/// Prelude module for convenient imports.
///
/// ```
/// use warsim_panel::prelude::*;
///
/// let mut roster = AgentRoster::new(3);
/// roster.set(0, AgentType::Rl);
/// let controls = ControlState::derive(roster.run_mode(), HostLocality::classify("localhost"));
/// assert!(!controls.train_disabled);
/// ```
pub mod prelude {
    pub use crate::agents::{AgentRoster, AgentType};
    pub use crate::config::PanelConfig;
    pub use crate::controls::ControlState;
    pub use crate::dispatch::{parse_run_response, Dispatcher, RunError, RunRejected, RunRequest};
    pub use crate::host::HostLocality;
    pub use crate::markup::{inject_and_activate, MarkupHost, ScriptAttrs};
    pub use crate::normalize::{normalizations_for, Normalization, ResultNode};
    pub use crate::schema::FieldId;
    pub use crate::settings::{build_settings, FormSource, SettingsError, SimulationSettings};
    pub use crate::status::UiStatus;
}
