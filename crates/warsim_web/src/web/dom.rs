//! Browser side of the result container: fragment injection, presentation
//! fixes, the mutation watcher and viewport scrolling.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlElement, MutationObserver, MutationObserverInit, MutationRecord,
    ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
};

use warsim_panel::config::PanelConfig;
use warsim_panel::markup::{MarkupHost, ScriptAttrs};
use warsim_panel::normalize::{
    candidate_selector, normalizations_for, Normalization, ResultNode, CHART_CLASS,
    END_MESSAGE_CLASS,
};

const CONFIG_ELEMENT_ID: &str = "warsim-config";

fn js_err(context: &str, e: JsValue) -> String {
    match e.as_string() {
        Some(s) => format!("{context}: {s}"),
        None => format!("{context}: {e:?}"),
    }
}

/// Reads the optional JSON config block from the page.
pub(super) fn read_config(document: &Document) -> PanelConfig {
    let Some(el) = document.get_element_by_id(CONFIG_ELEMENT_ID) else {
        return PanelConfig::default();
    };
    let raw = el.text_content().unwrap_or_default();
    match PanelConfig::from_json(&raw) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!(error = %e, "invalid #{CONFIG_ELEMENT_ID} block, using defaults");
            PanelConfig::default()
        }
    }
}

pub(super) fn hostname() -> String {
    web_sys::window()
        .and_then(|w| w.location().hostname().ok())
        .unwrap_or_default()
}

/// The result container as a [`MarkupHost`].
pub(super) struct ContainerHost {
    root: Element,
    document: Document,
}

impl ContainerHost {
    pub(super) fn new(root: Element) -> Result<Self, String> {
        let document = root
            .owner_document()
            .ok_or_else(|| "result container is detached".to_string())?;
        Ok(Self { root, document })
    }
}

impl MarkupHost for ContainerHost {
    type Script = Element;
    type Error = String;

    fn set_markup(&mut self, fragment: &str) -> Result<(), String> {
        self.root.set_inner_html(fragment);
        Ok(())
    }

    fn scripts(&self) -> Vec<Element> {
        let Ok(list) = self.root.query_selector_all("script") else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|n| n.dyn_into::<Element>().ok())
            .collect()
    }

    fn script_attrs(&self, script: &Element) -> ScriptAttrs {
        ScriptAttrs {
            src: script.get_attribute("src"),
            script_type: script.get_attribute("type"),
            id: Some(script.id()),
            is_async: script.has_attribute("async"),
            text: script.text_content().unwrap_or_default(),
        }
    }

    fn replace_script(&mut self, script: &Element, attrs: &ScriptAttrs) -> Result<(), String> {
        let fresh = self
            .document
            .create_element("script")
            .map_err(|e| js_err("create script", e))?;
        if let Some(src) = &attrs.src {
            fresh
                .set_attribute("src", src)
                .map_err(|e| js_err("set src", e))?;
        }
        if let Some(ty) = &attrs.script_type {
            fresh
                .set_attribute("type", ty)
                .map_err(|e| js_err("set type", e))?;
        }
        if let Some(id) = &attrs.id {
            fresh.set_id(id);
        }
        // Created scripts default to async; external ones must keep document order.
        js_sys::Reflect::set(&fresh, &JsValue::from_str("async"), &JsValue::from_bool(attrs.is_async))
            .map_err(|e| js_err("set async", e))?;
        fresh.set_text_content(Some(&attrs.text));

        script
            .replace_with_with_node_1(&fresh)
            .map_err(|e| js_err("replace script", e))
    }
}

fn has_class(el: &Element, class: &str) -> bool {
    // `className` is not a string on SVG nodes, so read the attribute.
    el.get_attribute("class")
        .is_some_and(|c| c.split_whitespace().any(|c| c == class))
}

struct DomNode<'a>(&'a Element);

impl ResultNode for DomNode<'_> {
    fn has_class(&self, class: &str) -> bool {
        has_class(self.0, class)
    }

    fn previous_sibling_has_class(&self, class: &str) -> bool {
        self.0
            .previous_element_sibling()
            .is_some_and(|prev| has_class(&prev, class))
    }

    fn text_content(&self) -> String {
        self.0.text_content().unwrap_or_default()
    }
}

fn apply(el: &Element, fix: Normalization) {
    match fix {
        Normalization::MarkEndMessage => {
            if el.set_attribute("class", END_MESSAGE_CLASS).is_err() {
                tracing::warn!("could not mark end message");
            }
        }
        Normalization::PinChartSize { min_height_px } => {
            let Some(html) = el.dyn_ref::<HtmlElement>() else {
                return;
            };
            let style = html.style();
            for (prop, value) in Normalization::chart_style(min_height_px) {
                if let Err(e) = style.set_property(prop, &value) {
                    tracing::warn!(prop, error = %js_err("set chart style", e), "could not pin chart size");
                }
            }
        }
    }
}

/// Applies every matching fix to `el`. Returns how many were applied.
pub(super) fn normalize_element(el: &Element, min_height_px: u32) -> usize {
    let fixes = normalizations_for(&DomNode(el), min_height_px);
    for fix in &fixes {
        apply(el, *fix);
    }
    fixes.len()
}

/// Sweeps every candidate below `root`.
pub(super) fn normalize_tree(root: &Element, min_height_px: u32) -> usize {
    let Ok(list) = root.query_selector_all(&candidate_selector()) else {
        return 0;
    };
    let applied = (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
        .map(|el| normalize_element(&el, min_height_px))
        .sum();
    if applied > 0 {
        tracing::debug!(applied, "result normalized");
    }
    applied
}

fn normalize_added(el: &Element, min_height_px: u32) {
    normalize_element(el, min_height_px);
    if has_class(el, CHART_CLASS) {
        if let Some(next) = el.next_element_sibling() {
            normalize_element(&next, min_height_px);
        }
    }
    normalize_tree(el, min_height_px);
}

/// Re-applies the fixes to nodes the fragment's own scripts add later.
/// Disconnects on drop.
pub(super) struct ResultObserver {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
}

impl ResultObserver {
    pub(super) fn attach(root: &Element, min_height_px: u32) -> Result<Self, String> {
        let callback = Closure::wrap(Box::new(move |records: js_sys::Array, _: MutationObserver| {
            for record in records.iter() {
                let Ok(record) = record.dyn_into::<MutationRecord>() else {
                    continue;
                };
                let added = record.added_nodes();
                for i in 0..added.length() {
                    if let Some(el) = added.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                        normalize_added(&el, min_height_px);
                    }
                }
            }
        }) as Box<dyn FnMut(js_sys::Array, MutationObserver)>);

        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())
            .map_err(|e| js_err("create observer", e))?;
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        observer
            .observe_with_options(root, &init)
            .map_err(|e| js_err("observe result container", e))?;

        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for ResultObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Smooth-scrolls `el` to the centre of the viewport if any part of it is
/// out of view.
pub(super) fn scroll_into_view_if_needed(el: &Element) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let viewport = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let rect = el.get_bounding_client_rect();
    if rect.top() >= 0.0 && rect.bottom() <= viewport {
        return;
    }
    let opts = ScrollIntoViewOptions::new();
    opts.set_behavior(ScrollBehavior::Smooth);
    opts.set_block(ScrollLogicalPosition::Center);
    el.scroll_into_view_with_scroll_into_view_options(&opts);
}
