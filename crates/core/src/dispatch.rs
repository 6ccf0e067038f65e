//! Run lifecycle: request construction, response decoding and the view state
//! (status badge, idle preview, result container) driven by it.

use serde::Deserialize;
use serde_json::Value;

use crate::config::PanelConfig;
use crate::settings::{build_settings, FormSource, SettingsError};
use crate::status::UiStatus;

pub const IDLE_MESSAGE: &str = "Configure your simulation and click \"Run Simulation\" to start.";
pub const GENERIC_FAILURE: &str = "Error processing simulation. Please try again.";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RunError {
    /// The request could not be sent or the response could not be read.
    #[error("Error processing simulation. Please try again.")]
    Network(String),
    #[error("{message}")]
    Server { status: u16, message: String },
    /// Success status, but no usable animation in the body.
    #[error("{0}")]
    Payload(String),
    #[error("{0}")]
    Settings(#[from] SettingsError),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RunRejected {
    #[error("a run is already in progress")]
    Busy,
    /// Failed before a request was built; the dispatcher is already in `Error`.
    #[error(transparent)]
    Failed(RunError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    pub run_id: u64,
    pub endpoint: String,
    pub body: String,
    pub with_training: bool,
}

#[derive(Deserialize)]
struct RunResponse {
    #[serde(default)]
    animation_html: Option<String>,
    #[serde(default)]
    error: Option<Value>,
}

/// Truthy `error` values only; `""`, `null` and `false` count as absent.
fn error_text(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Decodes a run response into its animation fragment.
pub fn parse_run_response(status: u16, body: &str) -> Result<String, RunError> {
    let parsed = serde_json::from_str::<RunResponse>(body);

    if !(200..300).contains(&status) {
        let message = parsed
            .ok()
            .and_then(|r| error_text(r.error.as_ref()))
            .unwrap_or_else(|| format!("HTTP error! Status: {status}"));
        return Err(RunError::Server { status, message });
    }

    let resp = parsed.map_err(|e| RunError::Payload(format!("invalid response body: {e}")))?;
    if let Some(msg) = error_text(resp.error.as_ref()) {
        return Err(RunError::Payload(msg));
    }
    match resp.animation_html {
        Some(html) if !html.trim().is_empty() => Ok(html),
        _ => Err(RunError::Payload(
            "response did not include an animation".to_string(),
        )),
    }
}

/// Owns the run-related view state. Only the transition methods below
/// mutate it.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatcher {
    status: UiStatus,
    preview_visible: bool,
    preview_message: String,
    preview_is_error: bool,
    result_visible: bool,
    last_animation: Option<String>,
    run_id: u64,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            status: UiStatus::Ready,
            preview_visible: true,
            preview_message: IDLE_MESSAGE.to_string(),
            preview_is_error: false,
            result_visible: false,
            last_animation: None,
            run_id: 0,
        }
    }

    /// Serializes the form and moves to `Processing`.
    ///
    /// Rejected while another run is in flight. A form that cannot be
    /// serialized ends the run immediately in `Error`.
    pub fn begin(
        &mut self,
        cfg: &PanelConfig,
        form: &impl FormSource,
        with_training: bool,
    ) -> Result<RunRequest, RunRejected> {
        if self.status.is_busy() {
            tracing::warn!(run_id = self.run_id, "run requested while one is in flight");
            return Err(RunRejected::Busy);
        }

        let settings = build_settings(form);

        self.run_id = self.run_id.wrapping_add(1);
        self.status = UiStatus::Processing;
        self.preview_visible = false;
        self.result_visible = false;
        self.last_animation = None;

        let body = settings
            .map_err(RunError::from)
            .and_then(|s| {
                s.to_json()
                    .map_err(|e| RunError::Payload(format!("could not encode settings: {e}")))
            });

        match body {
            Ok(body) => {
                let endpoint = cfg.endpoint(with_training).to_string();
                tracing::info!(run_id = self.run_id, %endpoint, "dispatching run");
                Ok(RunRequest {
                    run_id: self.run_id,
                    endpoint,
                    body,
                    with_training,
                })
            }
            Err(e) => {
                let run_id = self.run_id;
                self.finish(run_id, Err(e.clone()));
                Err(RunRejected::Failed(e))
            }
        }
    }

    /// Shows the result container for run `run_id` ahead of injection, so the
    /// fragment's scripts lay out inside a visible box. A later failing
    /// `finish` hides it again.
    pub fn reveal_result(&mut self, run_id: u64) -> bool {
        if run_id != self.run_id || !self.status.is_busy() {
            tracing::debug!(run_id, current = self.run_id, "not revealing stale run");
            return false;
        }
        self.result_visible = true;
        true
    }

    /// Applies the outcome of run `run_id`. Outcomes for any other run, or
    /// arriving when nothing is in flight, are dropped.
    pub fn finish(&mut self, run_id: u64, outcome: Result<String, RunError>) -> bool {
        if run_id != self.run_id || !self.status.is_busy() {
            tracing::debug!(run_id, current = self.run_id, "dropping stale run outcome");
            return false;
        }

        match outcome {
            Ok(html) => {
                tracing::info!(run_id, bytes = html.len(), "run complete");
                self.status = UiStatus::Complete;
                self.preview_visible = false;
                self.result_visible = true;
                self.last_animation = Some(html);
            }
            Err(e) => {
                if let RunError::Network(detail) = &e {
                    tracing::warn!(run_id, %detail, "run failed: network");
                } else {
                    tracing::warn!(run_id, error = %e, "run failed");
                }
                self.status = UiStatus::Error;
                self.preview_visible = true;
                self.preview_message = format!("Error: {e}");
                self.preview_is_error = true;
                self.result_visible = false;
            }
        }
        true
    }

    pub fn status(&self) -> UiStatus {
        self.status
    }

    pub fn is_busy(&self) -> bool {
        self.status.is_busy()
    }

    pub fn preview_visible(&self) -> bool {
        self.preview_visible
    }

    pub fn preview_message(&self) -> &str {
        &self.preview_message
    }

    pub fn preview_is_error(&self) -> bool {
        self.preview_is_error
    }

    pub fn result_visible(&self) -> bool {
        self.result_visible
    }

    /// Fragment of the last successful run.
    pub fn last_animation(&self) -> Option<&str> {
        self.last_animation.as_deref()
    }

    pub fn run_id(&self) -> u64 {
        self.run_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldId;
    use crate::settings::tests::FakeForm;

    fn start(d: &mut Dispatcher, with_training: bool) -> RunRequest {
        let form = FakeForm::basic(&["RL", "Random", "Heuristic"]);
        d.begin(&PanelConfig::default(), &form, with_training).unwrap()
    }

    #[test]
    fn starts_ready_with_idle_preview() {
        let d = Dispatcher::new();
        assert_eq!(d.status(), UiStatus::Ready);
        assert!(d.preview_visible());
        assert!(!d.result_visible());
        assert_eq!(d.preview_message(), IDLE_MESSAGE);
    }

    #[test]
    fn begin_builds_request_for_selected_endpoint() {
        let mut d = Dispatcher::new();
        let req = start(&mut d, true);
        assert_eq!(req.endpoint, "/train_and_run");
        assert!(req.body.contains(r#""agent_types":["RL","Random","Heuristic"]"#));
        assert_eq!(d.status(), UiStatus::Processing);
        assert!(!d.preview_visible());

        let ok = d.finish(req.run_id, Ok("<div>x</div>".into()));
        assert!(ok);

        let req = start(&mut d, false);
        assert_eq!(req.endpoint, "/run_simulation");
    }

    #[test]
    fn successful_response_reveals_result() {
        let mut d = Dispatcher::new();
        let req = start(&mut d, false);
        let outcome = parse_run_response(200, r#"{"animation_html": "<div>...</div>"}"#);
        d.finish(req.run_id, outcome);

        assert_eq!(d.status(), UiStatus::Complete);
        assert!(d.result_visible());
        assert!(!d.preview_visible());
        assert_eq!(d.last_animation(), Some("<div>...</div>"));
    }

    #[test]
    fn container_is_visible_before_injection() {
        let mut d = Dispatcher::new();
        let req = start(&mut d, false);
        assert!(!d.result_visible());

        assert!(d.reveal_result(req.run_id));
        let mut visible_at_inject = None;
        let mut inject = |d: &Dispatcher, html: &str| {
            visible_at_inject = Some(d.result_visible());
            Ok::<_, RunError>(html.to_string())
        };
        let outcome = inject(&d, "<div>chart</div>");
        assert_eq!(d.status(), UiStatus::Processing);
        d.finish(req.run_id, outcome);

        assert_eq!(visible_at_inject, Some(true));
        assert_eq!(d.status(), UiStatus::Complete);
        assert!(d.result_visible());
    }

    #[test]
    fn failed_injection_hides_revealed_container() {
        let mut d = Dispatcher::new();
        let req = start(&mut d, false);
        d.reveal_result(req.run_id);
        d.finish(req.run_id, Err(RunError::Payload("replace script: boom".into())));

        assert_eq!(d.status(), UiStatus::Error);
        assert!(!d.result_visible());
        assert!(d.preview_visible());
        assert_eq!(d.preview_message(), "Error: replace script: boom");
    }

    #[test]
    fn reveal_ignores_stale_or_idle_runs() {
        let mut d = Dispatcher::new();
        assert!(!d.reveal_result(0));

        let req = start(&mut d, false);
        assert!(!d.reveal_result(req.run_id + 1));
        d.finish(req.run_id, Err(RunError::Network("offline".into())));
        assert!(!d.reveal_result(req.run_id));
        assert!(!d.result_visible());
    }

    #[test]
    fn server_error_restores_preview_with_message() {
        let mut d = Dispatcher::new();
        let req = start(&mut d, false);
        let outcome = parse_run_response(400, r#"{"error": "bad config"}"#);
        d.finish(req.run_id, outcome);

        assert_eq!(d.status(), UiStatus::Error);
        assert!(d.preview_visible());
        assert!(!d.result_visible());
        assert!(d.preview_is_error());
        assert_eq!(d.preview_message(), "Error: bad config");
    }

    #[test]
    fn network_failure_uses_generic_message() {
        let mut d = Dispatcher::new();
        let req = start(&mut d, false);
        d.finish(req.run_id, Err(RunError::Network("Failed to fetch".into())));

        assert_eq!(d.status(), UiStatus::Error);
        assert!(d.preview_visible());
        assert_eq!(d.preview_message(), format!("Error: {GENERIC_FAILURE}"));
    }

    #[test]
    fn second_run_replaces_first_outcome() {
        let mut d = Dispatcher::new();
        let first = start(&mut d, false);
        d.finish(first.run_id, Ok("<div>first</div>".into()));
        assert!(d.result_visible());

        let second = start(&mut d, false);
        assert!(!d.result_visible());
        assert_eq!(d.last_animation(), None);

        d.finish(second.run_id, parse_run_response(500, "not json"));
        assert_eq!(d.status(), UiStatus::Error);
        assert!(!d.result_visible());
        assert_eq!(d.last_animation(), None);
        assert_eq!(d.preview_message(), "Error: HTTP error! Status: 500");

        let third = start(&mut d, false);
        d.finish(third.run_id, Ok("<div>third</div>".into()));
        assert_eq!(d.status(), UiStatus::Complete);
        assert!(!d.preview_visible());
        assert_eq!(d.last_animation(), Some("<div>third</div>"));
    }

    #[test]
    fn overlapping_run_is_rejected() {
        let mut d = Dispatcher::new();
        let req = start(&mut d, false);
        let form = FakeForm::basic(&["Random"]);
        assert_eq!(
            d.begin(&PanelConfig::default(), &form, false),
            Err(RunRejected::Busy)
        );
        assert_eq!(d.run_id(), req.run_id);
        assert_eq!(d.status(), UiStatus::Processing);
    }

    #[test]
    fn stale_outcomes_are_dropped() {
        let mut d = Dispatcher::new();
        let req = start(&mut d, false);
        d.finish(req.run_id, Ok("<div/>".into()));
        assert!(!d.finish(req.run_id, Err(RunError::Payload("late".into()))));
        assert_eq!(d.status(), UiStatus::Complete);
    }

    #[test]
    fn invalid_form_fails_without_request() {
        let mut d = Dispatcher::new();
        let form = FakeForm::basic(&["Random"]).with(FieldId::Beta, "");
        let res = d.begin(&PanelConfig::default(), &form, false);
        assert!(matches!(res, Err(RunRejected::Failed(RunError::Settings(_)))));
        assert_eq!(d.status(), UiStatus::Error);
        assert!(d.preview_visible());
        assert!(d.preview_message().starts_with("Error: invalid value for beta"));
    }

    #[test]
    fn response_parsing_edge_cases() {
        assert_eq!(
            parse_run_response(200, r#"{"animation_html": "<p>ok</p>"}"#),
            Ok("<p>ok</p>".to_string())
        );
        assert_eq!(
            parse_run_response(200, r#"{"animation_html": "<p/>", "error": "boom"}"#),
            Err(RunError::Payload("boom".into()))
        );
        assert!(matches!(
            parse_run_response(200, r#"{"animation_html": "  "}"#),
            Err(RunError::Payload(_))
        ));
        assert!(matches!(
            parse_run_response(200, "<html>"),
            Err(RunError::Payload(_))
        ));
        assert_eq!(
            parse_run_response(502, r#"{"error": ""}"#),
            Err(RunError::Server {
                status: 502,
                message: "HTTP error! Status: 502".into()
            })
        );
        assert_eq!(
            parse_run_response(200, r#"{"animation_html": "<p/>", "error": null}"#),
            Ok("<p/>".to_string())
        );
    }
}
