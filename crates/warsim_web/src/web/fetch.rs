use gloo_net::http::Request;
use warsim_panel::dispatch::{parse_run_response, RunError, RunRequest};
use web_time::Instant;

/// POSTs the run body and decodes the response into an animation fragment.
pub(super) async fn post_run(req: &RunRequest) -> Result<String, RunError> {
    let started = Instant::now();

    let request = Request::post(&req.endpoint)
        .header("Content-Type", "application/json")
        .body(req.body.clone())
        .map_err(|e| RunError::Network(format!("building request failed: {e}")))?;

    let response = request.send().await.map_err(|e| {
        tracing::warn!(endpoint = %req.endpoint, error = %e, "run request failed");
        RunError::Network(e.to_string())
    })?;

    let status = response.status();
    let body = response.text().await.map_err(|e| {
        tracing::warn!(endpoint = %req.endpoint, status, error = %e, "reading run response failed");
        RunError::Network(e.to_string())
    })?;

    tracing::info!(
        run_id = req.run_id,
        endpoint = %req.endpoint,
        status,
        bytes = body.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "run response received"
    );
    parse_run_response(status, &body)
}
