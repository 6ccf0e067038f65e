mod dom;
mod fetch;
mod logging;
mod parameter_field;
mod shell;
mod storage;

use gloo_timers::callback::Timeout;
use leptos::html::Div;
use leptos::prelude::*;
use leptos::reactive::owner::LocalStorage;
use wasm_bindgen_futures::spawn_local;
use warsim_panel::intro::{mark_seen, should_auto_expand, FlagStore};
use warsim_panel::prelude::*;
use warsim_panel::schema::{self, ParamSection};
use web_sys::Element;

use crate::form_model::{commit_agent_count, default_fields, FormValues};
use dom::ResultObserver;
use parameter_field::{ChoiceField, ParameterField};
use shell::{ActionBar, AgentSelectors, IntroPanel, Topbar};

const RUN_PULSE_DELAY_MS: u32 = 2000;
const RUN_PULSE_MS: u32 = 1500;
const TRAIN_PULSE_MS: u32 = 2000;

pub fn start() {
    console_error_panic_hook::set_once();
    logging::init();
    mount_to_body(|| view! { <App /> });
}

fn section_heading(section: ParamSection) -> (&'static str, &'static str) {
    schema::sections_ordered()
        .into_iter()
        .find(|s| s.section == section)
        .map(|s| (s.title, s.blurb))
        .unwrap_or(("", ""))
}

fn inject(result_ref: NodeRef<Div>, fragment: &str) -> Result<usize, RunError> {
    let root = result_ref
        .get_untracked()
        .ok_or_else(|| RunError::Payload("result container missing".to_string()))?;
    let mut host = dom::ContainerHost::new(root.into()).map_err(RunError::Payload)?;
    inject_and_activate(&mut host, fragment).map_err(RunError::Payload)
}

/// Post-injection work on a successful run: normalize now, watch for nodes
/// the fragment's scripts add, sweep again once layout settles, and bring
/// the result into view.
fn settle_result(
    result_ref: NodeRef<Div>,
    observer: StoredValue<Option<ResultObserver>, LocalStorage>,
    cfg: &PanelConfig,
) {
    let Some(root) = result_ref.get_untracked() else {
        return;
    };
    let root: Element = root.into();
    let px = cfg.chart_min_height_px;

    dom::normalize_tree(&root, px);
    match ResultObserver::attach(&root, px) {
        Ok(obs) => observer.set_value(Some(obs)),
        Err(e) => tracing::warn!(error = %e, "result observer unavailable"),
    }

    let settle_root = root.clone();
    Timeout::new(cfg.settle_delay_ms, move || {
        dom::normalize_tree(&settle_root, px);
    })
    .forget();

    // Measure after the `Complete` flush has settled the layout.
    Timeout::new(0, move || dom::scroll_into_view_if_needed(&root)).forget();
}

#[component]
fn App() -> impl IntoView {
    let config = StoredValue::new(
        web_sys::window()
            .and_then(|w| w.document())
            .map(|d| dom::read_config(&d))
            .unwrap_or_default(),
    );
    let locality = HostLocality::classify(&dom::hostname());
    let max_agents = config.with_value(|c| c.max_agents);
    let (count_label, count_min) = schema::param_spec(FieldId::NumAgents)
        .map(|s| (s.label, s.min))
        .unwrap_or(("Number of agents", 1.0));
    tracing::info!(?locality, "control panel starting");

    let fields = RwSignal::new(default_fields());
    let roster = RwSignal::new(AgentRoster::default());
    let dispatcher = RwSignal::new(Dispatcher::new());

    let run_mode = Memo::new(move |_| roster.with(|r| r.run_mode()));
    let status = Memo::new(move |_| dispatcher.with(|d| d.status()));
    let controls = Memo::new(move |_| {
        ControlState::derive(run_mode.get(), locality).while_busy(status.get().is_busy())
    });

    let intro_open = RwSignal::new(false);
    let run_pulse = RwSignal::new(false);
    let train_pulse = RwSignal::new(false);

    let result_ref: NodeRef<Div> = NodeRef::new();
    let observer: StoredValue<Option<ResultObserver>, LocalStorage> = StoredValue::new_local(None);

    let intro_key = config.with_value(|c| c.intro_storage_key.clone());
    if should_auto_expand(storage::BrowserFlags.get(&intro_key).as_deref()) {
        let delay = config.with_value(|c| c.intro_delay_ms);
        Timeout::new(delay, move || {
            intro_open.set(true);
            mark_seen(&mut storage::BrowserFlags, &intro_key);
        })
        .forget();
    }

    Timeout::new(RUN_PULSE_DELAY_MS, move || {
        run_pulse.set(true);
        Timeout::new(RUN_PULSE_MS, move || run_pulse.set(false)).forget();
    })
    .forget();

    Effect::new(move |prev: Option<bool>| {
        let on = run_mode.get();
        if on && prev == Some(false) {
            train_pulse.set(true);
            Timeout::new(TRAIN_PULSE_MS, move || train_pulse.set(false)).forget();
        }
        on
    });

    let finish_run = move |run_id: u64, outcome: Result<String, RunError>| {
        let html = match outcome {
            Ok(html) => html,
            Err(e) => {
                dispatcher.update(|d| {
                    d.finish(run_id, Err(e));
                });
                return;
            }
        };

        let revealed = dispatcher
            .try_update(|d| d.reveal_result(run_id))
            .unwrap_or(false);
        if !revealed {
            return;
        }

        // `is-hidden` comes off on the next reactive flush; the fragment's
        // scripts must run after it so charts measure a visible container.
        Timeout::new(0, move || {
            let outcome = inject(result_ref, &html).map(|_| html);
            let succeeded = outcome.is_ok();

            let applied = dispatcher
                .try_update(|d| d.finish(run_id, outcome))
                .unwrap_or(false);
            if applied && succeeded {
                config.with_value(|cfg| settle_result(result_ref, observer, cfg));
            }
        })
        .forget();
    };

    let start_run = move |with_training: bool| {
        let form = FormValues::new(fields.get_untracked(), &roster.get_untracked());
        let cfg = config.get_value();

        let Some(begun) = dispatcher.try_update(|d| d.begin(&cfg, &form, with_training)) else {
            return;
        };
        if matches!(begun, Err(RunRejected::Busy)) {
            return;
        }

        observer.set_value(None);
        if let Some(root) = result_ref.get_untracked() {
            root.set_inner_html("");
        }

        // Settings failures have already moved the dispatcher to `Error`.
        if let Ok(req) = begun {
            spawn_local(async move {
                let outcome = fetch::post_run(&req).await;
                finish_run(req.run_id, outcome);
            });
        }
    };

    let on_run = Callback::new(move |_: ()| start_run(false));
    let on_train = Callback::new(move |_: ()| start_run(true));

    let (sim_title, sim_blurb) = section_heading(ParamSection::Simulation);
    let (rl_title, rl_blurb) = section_heading(ParamSection::Reinforcement);

    let sliders = move |section: ParamSection| {
        schema::param_specs()
            .into_iter()
            .filter(|s| s.section == section && s.field != FieldId::NumAgents)
            .map(|spec| view! { <ParameterField spec=spec fields=fields /> })
            .collect_view()
    };

    view! {
        <div class="app">
            <Topbar status=status />
            <IntroPanel open=intro_open />

            <main class="layout">
                <section class="card settings">
                    <h2>{sim_title}</h2>
                    <p class="subtle">{sim_blurb}</p>

                    <div class="param-field">
                        <label class="param-label" for="num-agents">{count_label}</label>
                        <input
                            id="num-agents"
                            class="form-control"
                            type="number"
                            min=count_min
                            max=max_agents
                            prop:value=move || {
                                fields.with(|m| m.get(&FieldId::NumAgents).cloned().unwrap_or_default())
                            }
                            on:input=move |ev| {
                                let raw = event_target_value(&ev);
                                fields.update(|m| {
                                    m.insert(FieldId::NumAgents, raw);
                                });
                            }
                            on:change=move |ev| {
                                let raw = event_target_value(&ev);
                                let mut next_fields = fields.get_untracked();
                                let mut next_roster = roster.get_untracked();
                                if commit_agent_count(&mut next_fields, &mut next_roster, &raw, max_agents) {
                                    fields.set(next_fields);
                                    roster.set(next_roster);
                                } else {
                                    tracing::debug!(raw = %raw, "agent count ignored");
                                }
                            }
                        />
                    </div>
                    <AgentSelectors roster=roster />

                    <ChoiceField spec=schema::health_profiles() fields=fields />
                    <ChoiceField spec=schema::animosity_profiles() fields=fields />
                    {sliders(ParamSection::Simulation)}

                    <div
                        id="rl-settings"
                        class="fade-section"
                        class:is-hidden=move || !controls.get().rl_panel_visible
                    >
                        <h2>{rl_title}</h2>
                        <p class="subtle">{rl_blurb}</p>
                        {sliders(ParamSection::Reinforcement)}
                    </div>

                    <ActionBar
                        controls=controls
                        run_pulse=run_pulse
                        train_pulse=train_pulse
                        on_run=on_run
                        on_train=on_train
                    />
                </section>

                <section class="card output">
                    <div
                        id="static-preview"
                        class="static-preview"
                        class:is-hidden=move || !dispatcher.with(|d| d.preview_visible())
                    >
                        <p class:text-danger=move || dispatcher.with(|d| d.preview_is_error())>
                            {move || dispatcher.with(|d| d.preview_message().to_string())}
                        </p>
                    </div>
                    <div
                        id="animation-container"
                        class="animation-container"
                        node_ref=result_ref
                        class:is-hidden=move || !dispatcher.with(|d| d.result_visible())
                    ></div>
                </section>
            </main>
        </div>
    }
}
