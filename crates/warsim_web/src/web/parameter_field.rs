use std::collections::BTreeMap;

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use warsim_panel::schema::{format_for_step, ChoiceSpec, FieldId, ParamSpec};
use warsim_panel::settings::coerce_float;

use crate::form_model::field_dom_id;

/// How long a readout stays enlarged after its slider moves.
const BUMP_MS: u32 = 150;

fn field_text(fields: RwSignal<BTreeMap<FieldId, String>>, field: FieldId) -> String {
    fields.with(|m| m.get(&field).cloned().unwrap_or_default())
}

/// A range slider with a live value readout and a help tooltip.
#[component]
pub(super) fn ParameterField(
    spec: ParamSpec,
    fields: RwSignal<BTreeMap<FieldId, String>>,
) -> impl IntoView {
    let field = spec.field;
    let step = spec.step;
    let input_id = field_dom_id(field);
    let tip_id = format!("tip-{input_id}");
    let value_id = format!("{input_id}-value");
    let default_text = spec.default_text();
    let default_line = format!("Default: {default_text}");
    let limits_line = format!(
        "Limits: {} – {}",
        format_for_step(spec.min, step),
        format_for_step(spec.max, step),
    );

    let bump = RwSignal::new(false);

    let readout = move || {
        let raw = field_text(fields, field);
        match coerce_float(&raw) {
            Some(v) => format_for_step(v, step),
            None => raw,
        }
    };

    view! {
        <div class="param-field">
            <div class="param-label-row">
                <label class="param-label" for=input_id.clone()>
                    {spec.label}
                </label>
                <span
                    id=value_id
                    class="param-value"
                    class:bump=move || bump.get()
                >
                    {readout}
                </span>

                <span class="tooltip-wrap">
                    <button
                        type="button"
                        class="info-btn"
                        aria-label=format!("Info: {}", spec.label)
                        aria-describedby=tip_id.clone()
                    >
                        "i"
                    </button>
                    <div id=tip_id class="tooltip" role="tooltip">
                        <div class="tooltip-title">{spec.label}</div>
                        <div class="tooltip-body">{spec.description}</div>
                        <div class="tooltip-meta">
                            <div>{default_line}</div>
                            <div>{limits_line}</div>
                            <div class="tooltip-when">{format!("When to change: {}", spec.when_to_change)}</div>
                            <div class="tooltip-risk">{format!("Risk: {}", spec.risk.label())}</div>
                        </div>
                    </div>
                </span>
            </div>

            <div class="param-input-row">
                <input
                    id=input_id
                    class="form-range"
                    type="range"
                    min=spec.min
                    max=spec.max
                    step=step
                    prop:value=move || field_text(fields, field)
                    on:input=move |ev| {
                        let raw = event_target_value(&ev);
                        fields.update(|m| {
                            m.insert(field, raw);
                        });
                        bump.set(true);
                        Timeout::new(BUMP_MS, move || bump.set(false)).forget();
                    }
                />

                <button
                    type="button"
                    class="btn link"
                    on:click=move |_| {
                        fields.update(|m| {
                            m.insert(field, default_text.clone());
                        });
                    }
                >
                    "Reset"
                </button>
            </div>
        </div>
    }
}

/// A numbered-option `<select>` (health and animosity profiles).
#[component]
pub(super) fn ChoiceField(
    spec: ChoiceSpec,
    fields: RwSignal<BTreeMap<FieldId, String>>,
) -> impl IntoView {
    let field = spec.field;
    let input_id = field_dom_id(field);

    view! {
        <div class="param-field">
            <label class="param-label" for=input_id.clone()>{spec.label}</label>
            <select
                id=input_id
                class="form-select"
                on:change=move |ev| {
                    let raw = event_target_value(&ev);
                    fields.update(|m| {
                        m.insert(field, raw);
                    });
                }
            >
                {spec
                    .options
                    .iter()
                    .map(|(value, label)| {
                        let value = value.to_string();
                        let selected = {
                            let value = value.clone();
                            move || field_text(fields, field) == value
                        };
                        view! {
                            <option value=value selected=selected>
                                {*label}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
        </div>
    }
}
