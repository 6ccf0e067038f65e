//! Dependent-UI policy: what the RL panel and the two run actions look like
//! for a given RunMode and host.

use crate::host::HostLocality;

pub const RUN_TOOLTIP_RL: &str = "Use 'Train & Run' for RL agents";
pub const TRAIN_TOOLTIP_REMOTE: &str = "Please host the application locally to use RL models";
pub const LOCAL_ONLY_BADGE: &str = "Local Only";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    pub rl_panel_visible: bool,
    pub train_visible: bool,
    pub train_disabled: bool,
    pub train_tooltip: Option<&'static str>,
    /// Remote hosts carry a "Local Only" marker on the train action.
    pub train_local_only: bool,
    pub run_disabled: bool,
    pub run_tooltip: Option<&'static str>,
}

impl ControlState {
    /// Settled state for the given inputs. Transitions are cosmetic and never
    /// feed back into this.
    pub fn derive(run_mode: bool, locality: HostLocality) -> Self {
        let remote = !locality.is_local();
        let train_tooltip = remote.then_some(TRAIN_TOOLTIP_REMOTE);

        if run_mode {
            Self {
                rl_panel_visible: true,
                train_visible: true,
                train_disabled: remote,
                train_tooltip,
                train_local_only: remote,
                run_disabled: true,
                run_tooltip: Some(RUN_TOOLTIP_RL),
            }
        } else {
            Self {
                rl_panel_visible: false,
                train_visible: false,
                train_disabled: true,
                train_tooltip,
                train_local_only: remote,
                run_disabled: false,
                run_tooltip: None,
            }
        }
    }

    /// Both actions are locked while a run is in flight.
    pub fn while_busy(mut self, busy: bool) -> Self {
        if busy {
            self.run_disabled = true;
            self.train_disabled = true;
        }
        self
    }
}
