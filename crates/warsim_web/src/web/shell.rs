use leptos::prelude::*;
use warsim_panel::agents::{AgentRoster, AgentType};
use warsim_panel::controls::{ControlState, LOCAL_ONLY_BADGE};
use warsim_panel::status::UiStatus;

use crate::form_model::{option_color, selector_border, selector_id, selector_label, stagger_style};

#[component]
pub(super) fn Topbar(status: Memo<UiStatus>) -> impl IntoView {
    view! {
        <header class="app-header">
            <h1 class="brand">"Multi-Agent War Simulation"</h1>
            <div class="app-header-right">
                <div
                    id="loading-spinner"
                    class="spinner"
                    class:is-hidden=move || !status.get().is_busy()
                    aria-hidden="true"
                ></div>
                <span id="status-badge" class=move || status.get().badge_class()>
                    {move || status.get().label()}
                </span>
            </div>
        </header>
    }
}

/// Collapsible "how it works" panel.
#[component]
pub(super) fn IntroPanel(open: RwSignal<bool>) -> impl IntoView {
    view! {
        <section class="card intro">
            <button
                type="button"
                class="intro-toggle"
                aria-controls="simulationInfoCollapse"
                aria-expanded=move || open.get().to_string()
                on:click=move |_| open.update(|o| *o = !*o)
            >
                <span>"About the simulation"</span>
                <span class="chevron" class:open=move || open.get()>"▾"</span>
            </button>
            <div id="simulationInfoCollapse" class="intro-body" class:is-hidden=move || !open.get()>
                <p>
                    "Agents share a battlefield and decide each turn whether to attack, "
                    "ally or wait. Health and animosity profiles set the starting "
                    "conditions; beta controls how strongly past attacks feed animosity."
                </p>
                <ul>
                    <li><strong>"RL"</strong>" agents run a DQN policy. They need a local host for training."</li>
                    <li><strong>"Heuristic"</strong>" agents follow fixed rules based on health and animosity."</li>
                    <li><strong>"Random"</strong>" agents pick a legal action uniformly."</li>
                </ul>
                <p class="subtle">
                    "Use \"Run Simulation\" for heuristic and random battles, or "
                    "\"Train & Run\" once any agent is set to RL."
                </p>
            </div>
        </section>
    }
}

/// One type selector per agent. Re-created as a whole on every roster rebuild.
#[component]
pub(super) fn AgentSelectors(roster: RwSignal<AgentRoster>) -> impl IntoView {
    view! {
        <div id="agent-types-container" class="agent-types">
            <For
                each=move || {
                    roster.with(|r| {
                        let generation = r.generation();
                        (0..r.len()).map(move |i| (generation, i)).collect::<Vec<_>>()
                    })
                }
                key=|k| *k
                children=move |(_, index): (u64, usize)| {
                    let current = move || {
                        roster.with(|r| r.get(index).unwrap_or_default())
                    };
                    let id = selector_id(index);
                    view! {
                        <div class="agent-type-selector" style=stagger_style(index)>
                            <label for=id.clone()>{selector_label(index)}</label>
                            <select
                                id=id
                                class="form-select form-select-sm"
                                style=move || selector_border(current())
                                on:change=move |ev| {
                                    let raw = event_target_value(&ev);
                                    match raw.parse::<AgentType>() {
                                        Ok(t) => roster.update(|r| r.set(index, t)),
                                        Err(e) => tracing::warn!(index, error = %e, "ignoring selector value"),
                                    }
                                }
                            >
                                {AgentType::all()
                                    .iter()
                                    .copied()
                                    .map(|t| {
                                        view! {
                                            <option
                                                value=t.label()
                                                style=option_color(t)
                                                selected=move || current() == t
                                            >
                                                {t.label()}
                                            </option>
                                        }
                                    })
                                    .collect_view()}
                            </select>
                        </div>
                    }
                }
            />
        </div>
    }
}

#[component]
pub(super) fn ActionBar(
    controls: Memo<ControlState>,
    run_pulse: RwSignal<bool>,
    train_pulse: RwSignal<bool>,
    on_run: Callback<()>,
    on_train: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="actions">
            <button
                id="run-btn"
                type="button"
                class="btn btn-primary"
                class:pulse-once=move || run_pulse.get()
                prop:disabled=move || controls.get().run_disabled
                title=move || controls.get().run_tooltip.unwrap_or_default()
                on:click=move |_| on_run.run(())
            >
                "Run Simulation"
            </button>
            <button
                id="train-btn"
                type="button"
                class="btn btn-success"
                class:is-hidden=move || !controls.get().train_visible
                class:pulse=move || train_pulse.get()
                prop:disabled=move || controls.get().train_disabled
                title=move || controls.get().train_tooltip.unwrap_or_default()
                on:click=move |_| on_train.run(())
            >
                "Train & Run"
                <Show when=move || controls.get().train_local_only>
                    <span class="badge bg-secondary ms-2 badge-small">{LOCAL_ONLY_BADGE}</span>
                </Show>
            </button>
        </div>
    }
}
