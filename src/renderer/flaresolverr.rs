//! Renderer backed by a FlareSolverr service, which drives its own browser.
//!
//! FlareSolverr does not run page scripts for us, so there is no scroll trigger
//! here; lazy listings may come back shorter than with the Chromium backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{PageRenderer, RenderError, RenderedPage};
use crate::config::config::RendererConfig;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestPayload<'a> {
    cmd: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_timeout: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct FlareSolverrResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    pub session: Option<String>,
    pub solution: Option<Solution>,
}

#[derive(Debug, Deserialize)]
pub struct Solution {
    pub url: String,
    pub status: u16,
    pub response: String,
}

pub struct FlareSolverrRenderer {
    client: Client,
    endpoint: String,
    session: String,
    max_timeout_ms: u64,
}

impl FlareSolverrRenderer {
    /// Creates a FlareSolverr browser session that every render call reuses.
    pub async fn connect(config: &RendererConfig) -> Result<Self, RenderError> {
        let client = Client::new();
        let endpoint = config.flaresolverr_url.clone();

        let payload = RequestPayload {
            cmd: "sessions.create",
            url: None,
            session: None,
            max_timeout: None,
        };
        let response = send(&client, &endpoint, &payload, None).await?;

        if response.status != "ok" {
            return Err(RenderError::Launch(format!(
                "FlareSolverr refused to create a session: {}",
                response.message
            )));
        }
        let session = response
            .session
            .ok_or_else(|| RenderError::Launch("FlareSolverr returned no session id".to_string()))?;
        debug!(%session, "FlareSolverr session created");

        Ok(Self {
            client,
            endpoint,
            session,
            max_timeout_ms: config.ready_timeout_ms,
        })
    }
}

#[async_trait]
impl PageRenderer for FlareSolverrRenderer {
    async fn render(&mut self, url: &str) -> Result<RenderedPage, RenderError> {
        let payload = RequestPayload {
            cmd: "request.get",
            url: Some(url),
            session: Some(self.session.as_str()),
            max_timeout: Some(self.max_timeout_ms),
        };
        // Leave FlareSolverr room to report its own timeout before ours fires.
        let http_timeout = Duration::from_millis(self.max_timeout_ms) + Duration::from_secs(5);
        let response = send(&self.client, &self.endpoint, &payload, Some(http_timeout)).await?;

        page_from_response(url, response)
    }

    async fn close(self: Box<Self>) -> Result<(), RenderError> {
        let payload = RequestPayload {
            cmd: "sessions.destroy",
            url: None,
            session: Some(self.session.as_str()),
            max_timeout: None,
        };
        let response = send(&self.client, &self.endpoint, &payload, None).await?;
        if response.status != "ok" {
            warn!(session = %self.session, message = %response.message, "FlareSolverr session was not destroyed");
        }
        Ok(())
    }
}

async fn send(
    client: &Client,
    endpoint: &str,
    payload: &RequestPayload<'_>,
    timeout: Option<Duration>,
) -> Result<FlareSolverrResponse, RenderError> {
    let mut request = client
        .post(endpoint)
        .header(CONTENT_TYPE, "application/json")
        .json(payload);
    if let Some(timeout) = timeout {
        request = request.timeout(timeout);
    }

    // FlareSolverr reports failures as JSON with a 500 status, so the body is
    // decoded regardless of the HTTP status.
    Ok(request.send().await?.json::<FlareSolverrResponse>().await?)
}

/// Turns a decoded `request.get` answer into a rendered page.
pub fn page_from_response(
    url: &str,
    response: FlareSolverrResponse,
) -> Result<RenderedPage, RenderError> {
    if response.status != "ok" {
        return Err(RenderError::FlareSolverr {
            url: url.to_string(),
            message: response.message,
        });
    }

    let solution = response.solution.ok_or_else(|| RenderError::FlareSolverr {
        url: url.to_string(),
        message: "response carried no solution".to_string(),
    })?;

    if !(200..300).contains(&solution.status) {
        return Err(RenderError::Navigation {
            url: url.to_string(),
            message: format!("target answered with HTTP {}", solution.status),
        });
    }

    debug!(final_url = %solution.url, bytes = solution.response.len(), "page solved");

    Ok(RenderedPage {
        url: url.to_string(),
        markup: solution.response,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> FlareSolverrResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn request_payload_uses_camel_case_and_skips_unset_fields() {
        let payload = RequestPayload {
            cmd: "request.get",
            url: Some("https://shop.example/tees"),
            session: Some("abc"),
            max_timeout: Some(10_000),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "cmd": "request.get",
                "url": "https://shop.example/tees",
                "session": "abc",
                "maxTimeout": 10000
            })
        );

        let create = RequestPayload {
            cmd: "sessions.create",
            url: None,
            session: None,
            max_timeout: None,
        };
        assert_eq!(
            serde_json::to_value(&create).unwrap(),
            serde_json::json!({ "cmd": "sessions.create" })
        );
    }

    #[test]
    fn solved_page_keeps_requested_url() {
        let response = decode(
            r#"{
                "status": "ok",
                "message": "Challenge not detected!",
                "solution": {
                    "url": "https://shop.example/tees/",
                    "status": 200,
                    "response": "<a href=\"/t/AA0001.html\">tee</a>"
                }
            }"#,
        );

        let page = page_from_response("https://shop.example/tees", response).unwrap();
        assert_eq!(page.url, "https://shop.example/tees");
        assert_eq!(page.markup, r#"<a href="/t/AA0001.html">tee</a>"#);
    }

    #[test]
    fn error_status_is_a_render_failure() {
        let response = decode(
            r#"{"status": "error", "message": "Error: Maximum timeout reached. maxTimeout=10000 (ms)"}"#,
        );

        let err = page_from_response("https://shop.example/tees", response).unwrap_err();
        assert!(matches!(err, RenderError::FlareSolverr { .. }));
        assert!(err.to_string().contains("Maximum timeout"));
    }

    #[test]
    fn target_http_error_is_a_navigation_failure() {
        let response = decode(
            r#"{
                "status": "ok",
                "message": "",
                "solution": {"url": "https://shop.example/tees", "status": 403, "response": "denied"}
            }"#,
        );

        let err = page_from_response("https://shop.example/tees", response).unwrap_err();
        assert!(matches!(err, RenderError::Navigation { .. }));
    }
}
