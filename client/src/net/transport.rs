//! Identity provider transport over `gloo-net`.

#![allow(clippy::unused_async)]

use std::time::Duration;

use postgate::toolkit::{ToolkitTransport, TransportResponse};

#[derive(Clone, Copy, Debug)]
pub struct FetchTransport {
    timeout: Duration,
}

impl FetchTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait::async_trait(?Send)]
impl ToolkitTransport for FetchTransport {
    async fn post(&self, url: &str, content_type: &str, body: String) -> Result<TransportResponse, String> {
        #[cfg(feature = "hydrate")]
        {
            let request = gloo_net::http::Request::post(url)
                .header("Content-Type", content_type)
                .body(body)
                .map_err(|e| e.to_string())?;
            let round_trip = async {
                let response = request.send().await.map_err(|e| e.to_string())?;
                let body = response.text().await.map_err(|e| e.to_string())?;
                Ok::<_, String>(TransportResponse { status: response.status(), body })
            };
            crate::net::timeout::with_timeout(self.timeout, round_trip)
                .await
                .unwrap_or_else(|| Err("identity provider request timed out".to_owned()))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (url, content_type, body, self.timeout);
            Err(crate::net::http::SERVER_UNAVAILABLE.to_owned())
        }
    }
}
