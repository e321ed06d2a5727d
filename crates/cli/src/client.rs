//! HTTP client for the Partflow API.
//!
//! Provides [`ApiClient`] which encapsulates all HTTP interactions with the
//! server: the `branch-id` header on every request, the bearer token on
//! mutating requests, and the error taxonomy -- transport failures become
//! "server connection failed", server rejections surface the server's own
//! message verbatim. Commands delegate to this client rather than
//! constructing requests themselves.

use partflow_core::SessionContext;

/// HTTP client bound to one server, branch, and session.
pub(crate) struct ApiClient {
    base_url: String,
    session: SessionContext,
}

impl ApiClient {
    pub(crate) fn new(base_url: String, session: SessionContext) -> Self {
        ApiClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    /// GET a JSON endpoint.
    pub(crate) fn get(&self, path: &str) -> Result<serde_json::Value, String> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .agent()
            .get(&url)
            .header("branch-id", self.session.active_branch.as_str())
            .call()
            .map_err(|e| classify_transport_error(&e))?;
        read_response(response)
    }

    /// POST a JSON body. Sends the bearer token when the session has one.
    pub(crate) fn post(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .agent()
            .post(&url)
            .header("branch-id", self.session.active_branch.as_str());
        if let Some(token) = &self.session.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        let response = request
            .send_json(body)
            .map_err(|e| classify_transport_error(&e))?;
        read_response(response)
    }

    /// Agent that hands non-2xx responses back as responses, so the server's
    /// JSON error body survives to be shown verbatim.
    fn agent(&self) -> ureq::Agent {
        ureq::Agent::new_with_config(
            ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build(),
        )
    }
}

/// Turn a response into the parsed body, or the server's error message.
fn read_response(response: ureq::http::Response<ureq::Body>) -> Result<serde_json::Value, String> {
    let status = response.status();
    let body: serde_json::Value = response
        .into_body()
        .read_json()
        .unwrap_or(serde_json::Value::Null);

    if status.is_success() {
        return Ok(body);
    }

    // Surface the server's message verbatim when present.
    match body.get("error").and_then(|v| v.as_str()) {
        Some(msg) => Err(format!("error: {msg}")),
        None => Err(format!("error: request failed with status {}", status.as_u16())),
    }
}

/// Transport-level failures: the request never produced a response, so the
/// operation is assumed not applied and is safe to retry.
fn classify_transport_error(err: &ureq::Error) -> String {
    format!("error: server connection failed: {err}")
}
