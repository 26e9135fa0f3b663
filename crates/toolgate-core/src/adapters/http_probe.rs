use std::sync::Arc;
use std::time::{Duration, Instant};

use super::timeout_ms;
use crate::domain::HttpStatusReport;
use crate::http_client::{HttpClient, HttpRequest};
use crate::provider::{elapsed_ms, Provider, ProviderFuture};
use crate::request::ProbeUrl;
use crate::ProviderId;

/// Reachability check: one HEAD request, redirects followed by the transport.
///
/// Any status the server answers with is a successful probe; only transport
/// errors fail.
#[derive(Clone)]
pub struct HttpProbeAdapter {
    http_client: Arc<dyn HttpClient>,
    timeout: Duration,
}

impl HttpProbeAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, timeout: Duration) -> Self {
        Self {
            http_client,
            timeout,
        }
    }
}

impl Provider<ProbeUrl, HttpStatusReport> for HttpProbeAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::HttpProbe
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn fetch<'a>(&'a self, input: &'a ProbeUrl) -> ProviderFuture<'a, HttpStatusReport> {
        Box::pin(async move {
            let started = Instant::now();
            let request = HttpRequest::head(input.as_str()).with_timeout_ms(timeout_ms(self.timeout));
            let response = self.http_client.execute(request).await?;
            let latency_ms = elapsed_ms(started);

            Ok(Some(HttpStatusReport {
                status: response.status,
                status_text: reqwest::StatusCode::from_u16(response.status)
                    .ok()
                    .and_then(|status| status.canonical_reason())
                    .map(str::to_owned),
                server: response.header("server").map(str::to_owned),
                content_type: response.header("content-type").map(str::to_owned),
                latency_ms,
                final_url: response
                    .final_url
                    .unwrap_or_else(|| input.as_str().to_owned()),
            }))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::{HttpError, HttpMethod, HttpResponse, StaticHttpClient};
    use crate::provider::{invoke, FailureKind};

    #[tokio::test]
    async fn reports_status_and_headers_of_a_head_request() {
        let client = Arc::new(StaticHttpClient::new().route(
            "example.com",
            HttpResponse::new(301, "")
                .with_header("Server", "ECS")
                .with_header("Content-Type", "text/html")
                .with_final_url("https://www.example.com/"),
        ));
        let adapter = HttpProbeAdapter::new(client.clone(), Duration::from_secs(1));
        let url = ProbeUrl::parse("https://example.com").expect("valid");

        let report = invoke::<ProbeUrl, HttpStatusReport, _>(&adapter, &url)
            .await
            .into_data()
            .expect("report");
        assert_eq!(report.status, 301);
        assert_eq!(report.status_text.as_deref(), Some("Moved Permanently"));
        assert_eq!(report.server.as_deref(), Some("ECS"));
        assert_eq!(report.final_url, "https://www.example.com/");
        assert_eq!(client.recorded_requests()[0].method, HttpMethod::Head);
    }

    #[tokio::test]
    async fn error_statuses_are_still_reports() {
        let adapter = HttpProbeAdapter::new(Arc::new(StaticHttpClient::new()), Duration::from_secs(1));
        let url = ProbeUrl::parse("http://missing.example/page").expect("valid");

        let report = invoke::<ProbeUrl, HttpStatusReport, _>(&adapter, &url)
            .await
            .into_data()
            .expect("report");
        assert_eq!(report.status, 404);
        assert_eq!(report.final_url, "http://missing.example/page");
    }

    #[tokio::test]
    async fn connection_failures_fail_the_probe() {
        let adapter = HttpProbeAdapter::new(
            Arc::new(StaticHttpClient::new().fail("down.example", HttpError::connect("connection refused"))),
            Duration::from_secs(1),
        );
        let url = ProbeUrl::parse("https://down.example").expect("valid");

        let outcome = invoke::<ProbeUrl, HttpStatusReport, _>(&adapter, &url).await;
        assert_eq!(outcome.failure().map(|failure| failure.kind()), Some(FailureKind::Network));
    }
}
