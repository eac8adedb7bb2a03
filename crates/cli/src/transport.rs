//! HTTP transport from the form session to the relay.

use reqwest::Url;
use std::time::Duration;

use intake_core::{RelayReceipt, SubmissionPayload, SubmissionTransport, TransportError};
use intake_relay::{ErrorEnvelope, SuccessEnvelope};

/// Posts payloads to the relay with an optional bearer token.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    relay_url: Url,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new(
        relay_url: Url,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            relay_url,
            api_key,
        })
    }
}

impl SubmissionTransport for HttpTransport {
    async fn send(&self, payload: &SubmissionPayload) -> Result<RelayReceipt, TransportError> {
        let mut request = self.client.post(self.relay_url.clone()).json(payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if status.is_success() {
            let envelope: SuccessEnvelope = serde_json::from_str(&text)
                .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;
            return Ok(RelayReceipt {
                message: envelope.message,
                upstream_status: Some(envelope.debug_info.response_status),
            });
        }

        tracing::debug!("relay answered {}: {}", status, text);
        let rejected = match serde_json::from_str::<ErrorEnvelope>(&text) {
            Ok(envelope) => TransportError::Rejected {
                status: status.as_u16(),
                error: envelope.error,
                message: envelope.message,
            },
            Err(_) => TransportError::Rejected {
                status: status.as_u16(),
                error: status.canonical_reason().unwrap_or("Error").to_string(),
                message: text,
            },
        };
        Err(rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Router};
    use intake_core::{FormData, FormSession, SubmitError};
    use intake_relay::{router, AppState, RelayConfig, RELAY_PATH};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });
        format!("http://{addr}")
    }

    async fn relay_in_front_of(webhook_status: StatusCode) -> Url {
        let webhook = serve(
            Router::new().route("/hook", post(move || async move { (webhook_status, "OK") })),
        )
        .await;
        let relay = serve(router(
            AppState::new(RelayConfig::with_webhook_url(Some(format!("{webhook}/hook"))))
                .expect("client"),
        ))
        .await;
        Url::parse(&format!("{relay}{RELAY_PATH}")).expect("url")
    }

    fn transport(url: Url) -> HttpTransport {
        HttpTransport::new(url, Some("anon-key".into()), Duration::from_secs(5)).expect("client")
    }

    fn complete_data() -> FormData {
        serde_json::from_str(include_str!("../tests/fixtures/complete.json")).expect("fixture")
    }

    #[tokio::test]
    async fn submits_through_relay_to_webhook() {
        let url = relay_in_front_of(StatusCode::OK).await;
        let mut session = FormSession::from_data(complete_data());

        let message = session.submit(&transport(url)).await.expect("accepted");
        assert!(message.starts_with("Thank you"));
        assert!(session.navigation().submitted);
    }

    #[tokio::test]
    async fn relay_rejection_is_reported_with_category() {
        let url = relay_in_front_of(StatusCode::SERVICE_UNAVAILABLE).await;
        let mut session = FormSession::from_data(complete_data());

        let err = session.submit(&transport(url)).await.expect_err("rejected");
        match err {
            SubmitError::Transport(TransportError::Rejected { status, error, .. }) => {
                assert_eq!(status, 502);
                assert_eq!(error, "Webhook request failed");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
        assert!(!session.is_submitting());
    }

    #[tokio::test]
    async fn non_json_errors_fall_back_to_status_text() {
        let base = serve(Router::new().route(
            "/submit",
            post(|| async { (StatusCode::UNAUTHORIZED, "no key") }),
        ))
        .await;
        let url = Url::parse(&format!("{base}/submit")).expect("url");
        let payload = SubmissionPayload::new(&complete_data(), chrono::Utc::now());

        let err = transport(url).send(&payload).await.expect_err("rejected");
        assert_eq!(
            err,
            TransportError::Rejected {
                status: 401,
                error: "Unauthorized".into(),
                message: "no key".into(),
            }
        );
    }
}
