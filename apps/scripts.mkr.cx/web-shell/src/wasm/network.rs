use super::*;

use async_trait::async_trait;

/// `fetch`-backed transport. Relative URLs resolve against the page origin.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct GlooTransport;

#[async_trait(?Send)]
impl HttpTransport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut request_builder = match request.method {
            HttpMethod::Get => Request::get(&request.url),
            HttpMethod::Post => {
                Request::post(&request.url).header("content-type", "application/json")
            }
        };

        if let Some(token) = request.bearer_token.as_deref() {
            request_builder = request_builder.header("authorization", &format!("Bearer {token}"));
        }

        let response = if let Some(body) = request.body.as_ref() {
            let body = serde_json::to_string(body).map_err(|error| {
                TransportError(format!("failed to serialize request body: {error}"))
            })?;
            let request = request_builder.body(body).map_err(map_network_error)?;
            request.send().await.map_err(map_network_error)?
        } else {
            request_builder.send().await.map_err(map_network_error)?
        };

        let status = response.status();
        let body = response.text().await.map_err(map_network_error)?;
        Ok(HttpResponse { status, body })
    }
}

pub(super) fn map_network_error(error: gloo_net::Error) -> TransportError {
    TransportError(error.to_string())
}
