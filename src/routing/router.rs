//! Route lookup and dispatch.

use crate::http::{HttpRequest, HttpResponse};
use crate::routing::handlers::{self, GatewayState};

/// Maps (method, path) to a handler. Constructed once at startup.
pub struct Router {
    state: GatewayState,
}

impl Router {
    pub fn new(state: GatewayState) -> Self {
        Self { state }
    }

    /// Produce the response for a framed request. Rules are checked in
    /// priority order; the preflight rule matches any path.
    pub async fn dispatch(&self, request: HttpRequest) -> HttpResponse {
        tracing::debug!(method = %request.method, path = %request.path, "Dispatching request");

        match (request.method.as_str(), request.path.as_str()) {
            ("OPTIONS", _) => HttpResponse::preflight(),
            ("POST", "/v1/chat/completions") => {
                handlers::chat_completions(&self.state, &request.body).await
            }
            ("POST", "/v1/completions") => {
                handlers::text_completions(&self.state, &request.body).await
            }
            ("GET", "/v1/models") => handlers::list_models(&self.state),
            ("GET", path) if path.starts_with("/v1/models/") => {
                handlers::get_model(&self.state, &path["/v1/models/".len()..])
            }
            ("POST", "/api/chat") => handlers::ollama_chat(&self.state, &request.body).await,
            ("GET", "/api/tags") => handlers::list_tags(&self.state),
            _ => {
                tracing::debug!(method = %request.method, path = %request.path, "No route matched");
                HttpResponse::text(404, "Not Found")
            }
        }
    }
}
