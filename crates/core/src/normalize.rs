//! Presentation fixes for injected animation results.
//!
//! The rules only look at a single node, so they can run on the initial
//! fragment and on every node the fragment's own scripts add later. Both are
//! idempotent.

pub const CHART_CLASS: &str = "js-plotly-plot";
pub const END_MESSAGE_CLASS: &str = "end-message";

/// Read-only view of one element in the result container.
pub trait ResultNode {
    fn has_class(&self, class: &str) -> bool;

    /// Whether the previous *element* sibling carries `class`.
    fn previous_sibling_has_class(&self, class: &str) -> bool;

    fn text_content(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// Restyle the node as the end-of-run message.
    MarkEndMessage,
    /// Keep a chart from collapsing before its layout settles.
    PinChartSize { min_height_px: u32 },
}

impl Normalization {
    /// Inline style for `PinChartSize`.
    pub fn chart_style(min_height_px: u32) -> [(&'static str, String); 2] {
        [
            ("min-height", format!("{min_height_px}px")),
            ("width", "100%".to_string()),
        ]
    }
}

pub fn is_end_message<N: ResultNode>(node: &N) -> bool {
    !node.has_class(END_MESSAGE_CLASS)
        && node.previous_sibling_has_class(CHART_CLASS)
        && !node.text_content().is_empty()
}

pub fn is_chart<N: ResultNode>(node: &N) -> bool {
    node.has_class(CHART_CLASS)
}

/// Fixes that apply to `node`.
pub fn normalizations_for<N: ResultNode>(node: &N, min_height_px: u32) -> Vec<Normalization> {
    let mut out = Vec::new();
    if is_end_message(node) {
        out.push(Normalization::MarkEndMessage);
    }
    if is_chart(node) {
        out.push(Normalization::PinChartSize { min_height_px });
    }
    out
}

/// CSS selector matching every node either rule can apply to.
pub fn candidate_selector() -> String {
    format!(".{CHART_CLASS}, .{CHART_CLASS} + *")
}
